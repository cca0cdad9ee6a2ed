//! clap `Command` tree for inspecting resource specs
//!
//! Structure: `<name> resources <list|info|example> [resource] [--options]`.
//! `run` turns parsed matches into the text to print.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::OptionalFields;
use crate::error::CliError;
use crate::example::ExampleFormat;
use crate::mapper::SpecMapper;

/// Environment variable read when `--specs-dir` is not given.
pub const SPECS_DIR_ENV: &str = "SPEC_DIR";

/// Configuration for building the command tree.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CliConfig {
    /// Root command name (e.g. "vesctl")
    pub name: String,
    /// Root command about/description
    pub about: String,
}

impl CliConfig {
    pub fn new(name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
        }
    }
}

/// Build the root `Command`.
pub fn build_command(config: &CliConfig) -> Command {
    Command::new(config.name.clone())
        .about(config.about.clone())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("specs-dir")
                .long("specs-dir")
                .env(SPECS_DIR_ENV)
                .global(true)
                .help("Directory containing the OpenAPI JSON documents"),
        )
        .subcommand(build_resources_command())
}

fn build_resources_command() -> Command {
    let resource_arg = || {
        Arg::new("resource")
            .help("Resource name (e.g. dns_zone)")
            .required(true)
    };

    Command::new("resources")
        .about("Inspect the specifications behind API resources")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List every mapped resource name"))
        .subcommand(
            Command::new("info")
                .about("Show which spec document describes a resource")
                .arg(resource_arg()),
        )
        .subcommand(
            Command::new("example")
                .about("Print an example create request for a resource")
                .arg(resource_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('o')
                        .value_parser(["json", "yaml"])
                        .default_value("json")
                        .help("Output format"),
                )
                .arg(
                    Arg::new("required-only")
                        .long("required-only")
                        .action(ArgAction::SetTrue)
                        .help("Omit optional fields"),
                ),
        )
}

/// Execute a parsed command against a mapper and return its output.
pub fn run(mapper: &SpecMapper, matches: &ArgMatches) -> Result<String, CliError> {
    match matches.subcommand() {
        Some(("resources", sub)) => run_resources(mapper, sub),
        _ => Err(CliError::MissingArgument {
            name: "command".to_string(),
        }),
    }
}

fn run_resources(mapper: &SpecMapper, matches: &ArgMatches) -> Result<String, CliError> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(mapper.mapped_resources().join("\n")),
        Some(("info", sub)) => {
            let resource = resource_arg(sub)?;
            let info = mapper.resource_info(resource);
            let (Some(file), Some(strategy)) = (&info.spec_file, info.strategy) else {
                return Err(CliError::ResourceNotFound {
                    resource: resource.to_string(),
                });
            };
            Ok(format!(
                "resource: {}\nspec file: {}\nmatched by: {}\ncreate schema: {}\nspec schema: {}",
                info.resource_name,
                file,
                strategy,
                yes_no(info.has_create_schema),
                yes_no(info.has_spec_schema),
            ))
        }
        Some(("example", sub)) => {
            let resource = resource_arg(sub)?;
            if mapper.find_spec(resource).is_none() {
                return Err(CliError::ResourceNotFound {
                    resource: resource.to_string(),
                });
            }

            let format: ExampleFormat = sub
                .get_one::<String>("format")
                .map(|f| f.parse::<ExampleFormat>())
                .transpose()?
                .unwrap_or_default();
            let optional = if sub.get_flag("required-only") {
                OptionalFields::RequiredOnly
            } else {
                mapper.config().optional_fields
            };

            let text = mapper.generate_example_with(resource, format, optional)?;
            if text.is_empty() {
                return Ok(format!(
                    "no create request schema found for resource '{resource}'"
                ));
            }
            Ok(text)
        }
        _ => Err(CliError::MissingArgument {
            name: "resources subcommand".to_string(),
        }),
    }
}

fn resource_arg(matches: &ArgMatches) -> Result<&str, CliError> {
    matches
        .get_one::<String>("resource")
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingArgument {
            name: "resource".to_string(),
        })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

//! `ephemera`: browse the daily context service from a terminal

mod browse;
mod commands;
mod config;
mod render;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ephemera_context::CalendarDate;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EphemeraConfig;

const DEFAULT_LOG_FILTER: &str = "ephemera=info";

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .value_parser(value_parser!(CalendarDate))
        .help("Day to show as YYYY-MM-DD (default: the service's today)")
}

fn year_arg() -> Arg {
    Arg::new("year")
        .required(true)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(i32))
        .help("Year to look up")
}

fn context_id_arg() -> Arg {
    Arg::new("context-id")
        .required(true)
        .help("Context identifier, as printed by `daily --detail`")
}

fn cli() -> Command {
    Command::new("ephemera")
        .version(ephemera_context::VERSION)
        .about("Ephemera daily context client")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("daily")
                .about("Show one day's context")
                .arg(date_arg())
                .arg(
                    Arg::new("detail")
                        .long("detail")
                        .action(ArgAction::SetTrue)
                        .help("Include news bodies and the generation prompt"),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Show the context for a past year")
                .arg(year_arg()),
        )
        .subcommand(
            Command::new("fossil")
                .about("Show the speculative context for a future year")
                .arg(year_arg()),
        )
        .subcommand(
            Command::new("assets")
                .about("List generated models for a context")
                .arg(context_id_arg()),
        )
        .subcommand(
            Command::new("forge")
                .about("Generate a model for a context and wait for it")
                .arg(context_id_arg())
                .arg(
                    Arg::new("modifier")
                        .long("modifier")
                        .help("Extra words appended to the generation prompt"),
                )
                .arg(Arg::new("style").long("style").help("Named style preset")),
        )
        .subcommand(Command::new("health").about("Check that the service is up"))
        .subcommand(
            Command::new("browse")
                .about("Walk through days interactively")
                .arg(date_arg()),
        )
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn string_arg(args: &ArgMatches, name: &str) -> Option<String> {
    args.get_one::<String>(name).cloned()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));

    let path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = EphemeraConfig::load(path)?;
    tracing::debug!(base_url = %config.client.base_url, "configuration loaded");

    match matches.subcommand() {
        Some(("daily", args)) => {
            let date = args.get_one::<CalendarDate>("date").copied();
            commands::daily(&config, date, args.get_flag("detail")).await
        }
        Some(("history", args)) => {
            let year = args.get_one::<i32>("year").copied().unwrap_or_default();
            commands::history(&config, year).await
        }
        Some(("fossil", args)) => {
            let year = args.get_one::<i32>("year").copied().unwrap_or_default();
            commands::fossil(&config, year).await
        }
        Some(("assets", args)) => {
            let context_id = string_arg(args, "context-id").unwrap_or_default();
            commands::assets(&config, &context_id).await
        }
        Some(("forge", args)) => {
            let context_id = string_arg(args, "context-id").unwrap_or_default();
            commands::forge(
                &config,
                &context_id,
                string_arg(args, "modifier"),
                string_arg(args, "style"),
            )
            .await
        }
        Some(("health", _)) => commands::health(&config).await,
        Some(("browse", args)) => {
            let date = args.get_one::<CalendarDate>("date").copied();
            commands::browse(&config, date).await
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn daily_parses_a_strict_date() {
        let matches = cli()
            .try_get_matches_from(["ephemera", "daily", "--date", "2026-01-05", "--detail"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "daily");
        assert_eq!(
            args.get_one::<CalendarDate>("date").map(ToString::to_string),
            Some("2026-01-05".to_string())
        );
        assert!(args.get_flag("detail"));
    }

    #[test]
    fn malformed_date_is_a_usage_error() {
        assert!(cli()
            .try_get_matches_from(["ephemera", "daily", "--date", "2026-1-5"])
            .is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let matches = cli()
            .try_get_matches_from(["ephemera", "history", "1969", "--log-json", "-c", "e.toml"])
            .unwrap();
        assert!(matches.get_flag("log-json"));
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("e.toml"))
        );
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<i32>("year"), Some(&1969));
    }

    #[test]
    fn forge_takes_optional_modifiers() {
        let matches = cli()
            .try_get_matches_from(["ephemera", "forge", "ctx-1", "--style", "clay"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(string_arg(args, "context-id").as_deref(), Some("ctx-1"));
        assert_eq!(string_arg(args, "modifier"), None);
        assert_eq!(string_arg(args, "style").as_deref(), Some("clay"));
    }
}

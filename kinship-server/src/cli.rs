use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for kinship-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: Option<u64>,
    pub config_file: Option<PathBuf>,
    pub max_request_size: Option<usize>,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = Self::command().get_matches();

        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self::from_matches(&matches)
    }

    fn command() -> Command {
        Command::new("kinship-server")
            .version(kinship::VERSION)
            .about("HTTP API server for the Kinship friend relationship service")
            .long_about(
                r#"Kinship Server exposes friendships, friend contexts and likes over a
JSON REST API. Every endpoint except /api/health expects an HS256 bearer
token whose `sub` claim is the calling user's id.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment variables.

Examples:
  kinship-server --port 8080 --jwt-secret change-me
  kinship-server --config kinship.toml --log-level debug"#,
            )
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .long_help(
                        "Port number for the HTTP server to listen on.
Environment variable: KINSHIP_PORT",
                    )
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .long_help(
                        "Path to a TOML, YAML or JSON file holding the storage,
logging and friends settings. KINSHIP_* environment variables are merged on top.
Environment variable: KINSHIP_CONFIG_FILE",
                    )
                    .value_hint(ValueHint::FilePath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("jwt_secret")
                    .long("jwt-secret")
                    .value_name("SECRET")
                    .help("JWT verification secret")
                    .long_help(
                        "Shared HS256 secret used to verify bearer tokens. Required.
Environment variable: KINSHIP_JWT_SECRET",
                    )
                    .value_hint(ValueHint::Other),
            )
            .arg(
                Arg::new("jwt_expiration")
                    .long("jwt-expiration")
                    .value_name("HOURS")
                    .help("JWT token expiration time in hours")
                    .long_help(
                        "How long tokens issued by the server remain valid.
Default is 24 hours.
Environment variable: KINSHIP_JWT_EXPIRATION_HOURS",
                    )
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("max_request_size")
                    .long("max-request-size")
                    .value_name("BYTES")
                    .help("Maximum request body size in bytes")
                    .long_help(
                        "Maximum size allowed for HTTP request bodies.
Larger requests will be rejected.
Environment variable: KINSHIP_MAX_REQUEST_SIZE",
                    )
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Logging level")
                    .long_help(
                        "Set the logging level. Valid values: error, warn, info, debug, trace
Replaces the level from the [logging] section of the config file.
A RUST_LOG filter, when set, takes precedence over both.",
                    )
                    .value_parser(["error", "warn", "info", "debug", "trace"]),
            )
            .arg(
                Arg::new("help_env")
                    .long("help-env")
                    .help("Show all environment variables")
                    .action(ArgAction::SetTrue),
            )
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Self {
            port: matches.get_one::<u16>("port").copied(),
            jwt_secret: matches.get_one::<String>("jwt_secret").cloned(),
            jwt_expiration_hours: matches.get_one::<u64>("jwt_expiration").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    /// Print comprehensive environment variable help
    fn print_env_help() {
        println!("Kinship Server Environment Variables");
        println!("====================================");
        println!();
        println!("Server Configuration:");
        println!("  KINSHIP_PORT                      - Server port (default: 3000)");
        println!(
            "  KINSHIP_MAX_REQUEST_SIZE          - Max request body size in bytes (default: 1MB)"
        );
        println!("  KINSHIP_CONFIG_FILE               - Path to the library config file");
        println!();
        println!("Authentication:");
        println!("  KINSHIP_JWT_SECRET                - JWT verification secret (required)");
        println!("  KINSHIP_JWT_EXPIRATION_HOURS      - JWT expiration in hours (default: 24)");
        println!();
        println!("Storage (double underscore separates nested keys):");
        println!("  KINSHIP_STORAGE__BACKEND          - memory or surrealdb (default: surrealdb)");
        println!("  KINSHIP_STORAGE__DATA_DIR         - Data directory for embedded storage");
        println!("  KINSHIP_STORAGE__SURREALDB__ENGINE     - memory or rocksdb (default: rocksdb)");
        println!(
            "  KINSHIP_STORAGE__SURREALDB__NAMESPACE  - SurrealDB namespace (default: kinship)"
        );
        println!("  KINSHIP_STORAGE__SURREALDB__DATABASE   - SurrealDB database (default: main)");
        println!();
        println!("Friends:");
        println!("  KINSHIP_FRIENDS__MAX_CONTEXT_LENGTH    - Longest context note (default: 1024)");
        println!();
        println!("Logging:");
        println!("  KINSHIP_LOGGING__LEVEL                 - error, warn, info, debug, trace");
        println!("  KINSHIP_LOGGING__FORMAT                - default, compact, pretty or json");
        println!("  KINSHIP_LOGGING__FILE                  - Also write logs to this file");
        println!("  RUST_LOG                               - Filter directives, override the level");
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
        println!("Use --help for CLI argument documentation.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let matches = CliArgs::command()
            .try_get_matches_from([
                "kinship-server",
                "--port",
                "8080",
                "--jwt-secret",
                "s3cret",
                "--jwt-expiration",
                "12",
                "--config",
                "kinship.yaml",
                "--log-level",
                "debug",
            ])
            .unwrap();
        let args = CliArgs::from_matches(&matches);

        assert_eq!(args.port, Some(8080));
        assert_eq!(args.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(args.jwt_expiration_hours, Some(12));
        assert_eq!(args.config_file, Some(PathBuf::from("kinship.yaml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.max_request_size, None);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result =
            CliArgs::command().try_get_matches_from(["kinship-server", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        CliArgs::command().debug_assert();
    }
}

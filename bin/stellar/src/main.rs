//! Stellar CLI
//!
//! Validates, inspects and scaffolds the content of a Stellar site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use stellar_schema::CollectionName;

/// Command-line interface for Stellar.
#[derive(Parser)]
#[command(
    name = "stellar",
    version,
    about = "Content schema tooling for Stellar sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "stellar.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Validate every document and relationship
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// List published entries and page block order
    List {
        /// Include draft entries
        #[arg(long)]
        drafts: bool,
    },
    /// Print the authoring schema as JSON
    Schema {
        /// Emit a single line instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },
    /// Create a new entry with every field stubbed
    New {
        /// Collection to add to (blog, authors, services, testimonials)
        collection: CollectionName,
        /// Display name; the slug is derived from it
        name: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    stellar::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { strict } => {
            stellar::cmd::check::run(&cli.config, strict)?;
        }
        Commands::List { drafts } => {
            stellar::cmd::list::run(&cli.config, drafts)?;
        }
        Commands::Schema { compact } => {
            stellar::cmd::schema::run(compact)?;
        }
        Commands::New { collection, name } => {
            stellar::cmd::new::run(&cli.config, collection, &name)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["stellar", "check", "--strict"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("stellar.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_list_with_drafts() {
        let args = ["stellar", "list", "--drafts"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::List { drafts } => {
                assert!(drafts);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_schema_defaults_to_pretty() {
        let args = ["stellar", "schema"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Schema { compact } => {
                assert!(!compact);
            }
            _ => panic!("Expected Schema command"),
        }
    }

    #[test]
    fn test_cli_new_command_parsing() {
        let args = ["stellar", "new", "blog", "My First Post"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::New { collection, name } => {
                assert_eq!(collection, CollectionName::Blog);
                assert_eq!(name, "My First Post");
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_new_rejects_unknown_collection() {
        let args = ["stellar", "new", "recipes", "Pancakes"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["stellar", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["stellar", "--config", "site/stellar.toml", "list"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site/stellar.toml"));
    }
}

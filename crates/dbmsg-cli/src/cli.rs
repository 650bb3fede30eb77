//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dbmsg: localized message bundles stored in an embedded database.
#[derive(Parser, Debug)]
#[command(name = "dbmsg", version, about = "Database-backed message bundles")]
pub struct Cli {
    /// Path to a `dbmsg.yaml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the store directory from the configuration.
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a message code for a locale.
    Get(GetArgs),
    /// Insert or replace one record.
    Put(PutArgs),
    /// Import records from a JSON array file.
    Import(ImportArgs),
    /// List stored records.
    List(ListArgs),
}

/// Arguments for `dbmsg get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Message code.
    pub code: String,

    /// Locale tag such as `en_US`; empty for the root bundle.
    #[arg(short, long, default_value = "")]
    pub locale: String,

    /// Positional argument for `{0}`, `{1}`, ... (repeatable).
    #[arg(short, long = "arg")]
    pub args: Vec<String>,

    /// Text returned when the code cannot be resolved.
    #[arg(long)]
    pub default: Option<String>,
}

/// Arguments for `dbmsg put`.
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Basename of the bundle.
    pub basename: String,

    /// Message code.
    pub key: String,

    /// Message pattern.
    pub value: String,

    /// Locale tag; omit for the root bundle.
    #[arg(short, long, default_value = "")]
    pub locale: String,
}

/// Arguments for `dbmsg import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file holding an array of records.
    pub file: PathBuf,
}

/// Arguments for `dbmsg list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list records of this basename.
    #[arg(short, long)]
    pub basename: Option<String>,

    /// Print records as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from([
            "dbmsg", "get", "greeting", "--locale", "en_US", "--arg", "Ada", "-a", "3",
        ])
        .unwrap();

        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.code, "greeting");
                assert_eq!(args.locale, "en_US");
                assert_eq!(args.args, vec!["Ada", "3"]);
                assert!(args.default.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dbmsg", "list", "--json", "-v", "--store", "/tmp/x"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.store.as_deref(), Some("/tmp/x"));
        assert!(matches!(cli.command, Command::List(ListArgs { json: true, .. })));
    }

    #[test]
    fn test_put_requires_value() {
        assert!(Cli::try_parse_from(["dbmsg", "put", "app", "greeting"]).is_err());
    }
}

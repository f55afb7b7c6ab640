use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::logging::LogDestination;

/// Fills an upload form from a catalog scene using the fill backend.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "stashfill")]
#[command(version)]
pub struct Cli {
    /// RON file with connection settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fill backend base URL
    #[arg(long, env = "STASHFILL_BACKEND")]
    pub backend: Option<String>,

    /// Catalog (GraphQL) base URL
    #[arg(long, env = "STASHFILL_CATALOG")]
    pub catalog: Option<String>,

    /// Catalog API key, sent as the ApiKey header
    #[arg(long, env = "STASHFILL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds to wait for the next chunk of a fill stream (0 disables)
    #[arg(long)]
    pub read_timeout: Option<u64>,

    /// Directory that receives torrent files sent by the backend
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Tracker announce URL shown on the upload page
    #[arg(long, default_value = "")]
    pub announce_url: String,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_and_verbosity() {
        let cli = Cli::try_parse_from([
            "stashfill",
            "--backend",
            "http://fill:9000",
            "--read-timeout",
            "0",
            "--log",
            "both",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.backend.as_deref(), Some("http://fill:9000"));
        assert_eq!(cli.read_timeout, Some(0));
        assert_eq!(cli.log, LogTarget::Both);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_log_target() {
        assert!(Cli::try_parse_from(["stashfill", "--log", "syslog"]).is_err());
    }
}

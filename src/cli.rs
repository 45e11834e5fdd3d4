use clap::Parser;
use std::path::PathBuf;

/// Dialdesk - call logging with server-defined feedback forms
#[derive(Parser, Debug, Clone)]
#[command(name = "dialdesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "DIALDESK_CONFIG", default_value = "dialdesk.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "DIALDESK_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "DIALDESK_PORT")]
    pub port: Option<u16>,

    /// Directory uploaded feedback files are written to
    #[arg(long, env = "DIALDESK_UPLOADS_DIR")]
    pub uploads_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["dialdesk"]);
        assert_eq!(cli.config, PathBuf::from("dialdesk.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.uploads_dir.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "dialdesk",
            "--config",
            "deploy/dialdesk.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--uploads-dir",
            "/var/lib/dialdesk/uploads",
        ]);
        assert_eq!(cli.config, PathBuf::from("deploy/dialdesk.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.uploads_dir, Some(PathBuf::from("/var/lib/dialdesk/uploads")));
    }
}

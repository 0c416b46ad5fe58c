//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::logging::LogFormat;

/// IXP Digital Twin file store and lab control
#[derive(Debug, Parser)]
#[command(name = "ixp-server", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "IXP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, env = "IXP_LOG_FORMAT", default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Orchestrator base URL
    #[arg(long, env = "IXP_ORCHESTRATOR_URL", global = true)]
    pub orchestrator_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),

    /// Talk to the lab orchestrator
    #[command(subcommand)]
    Lab(LabCommand),
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Listen host
    #[arg(long, env = "IXP_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "IXP_PORT")]
    pub port: Option<u16>,

    /// Directory for config documents
    #[arg(long, env = "IXP_CONFIGS_DIR")]
    pub configs_dir: Option<PathBuf>,

    /// Directory for resources
    #[arg(long, env = "IXP_RESOURCES_DIR")]
    pub resources_dir: Option<PathBuf>,

    /// Do not poll the orchestrator in the background
    #[arg(long)]
    pub no_monitor: bool,

    /// Reject arrays for peering_lan and route_servers
    #[arg(long)]
    pub strict_containers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum LabCommand {
    /// Print the current lab status
    Status,
    /// Start a lab from a stored config
    Start { filename: String },
    /// Tear down the running lab
    Stop,
    /// Print device statistics
    Devices,
    /// Print a snapshot on every poll until interrupted
    Watch,
}

impl Cli {
    /// Apply flags shared by every subcommand
    pub fn apply_globals(&self, config: &mut AppConfig) {
        if let Some(url) = &self.orchestrator_url {
            config.orchestrator.base_url.clone_from(url);
        }
    }
}

impl ServeArgs {
    /// Override file configuration with flags
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.configs_dir {
            config.storage.configs_dir.clone_from(dir);
        }
        if let Some(dir) = &self.resources_dir {
            config.storage.resources_dir.clone_from(dir);
        }
        if self.no_monitor {
            config.orchestrator.monitor_enabled = false;
        }
        if self.strict_containers {
            config.validation.allow_array_containers = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_flags_override_config() {
        let cli = Cli::try_parse_from([
            "ixp-server",
            "--orchestrator-url",
            "http://lab:9000",
            "serve",
            "--port",
            "6000",
            "--configs-dir",
            "/tmp/cfg",
            "--no-monitor",
            "--strict-containers",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply_globals(&mut config);
        let Some(Command::Serve(args)) = &cli.command else {
            panic!("expected serve");
        };
        args.apply(&mut config);

        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.configs_dir, PathBuf::from("/tmp/cfg"));
        assert_eq!(config.storage.resources_dir, PathBuf::from("resources"));
        assert_eq!(config.orchestrator.base_url, "http://lab:9000");
        assert!(!config.orchestrator.monitor_enabled);
        assert!(!config.validation.allow_array_containers);
    }

    #[test]
    fn lab_subcommands_parse() {
        let cli = Cli::try_parse_from(["ixp-server", "lab", "start", "ixp.conf"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Lab(LabCommand::Start { ref filename })) if filename == "ixp.conf"
        ));

        let cli = Cli::try_parse_from(["ixp-server", "--log-format", "json", "lab", "watch"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Some(Command::Lab(LabCommand::Watch))));
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ixp-server"]).unwrap();
        assert!(cli.command.is_none());
    }
}

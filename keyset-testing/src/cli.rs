//! Contains the code used to parse command line parameters for the keyset testing server.
//!
//! [CliArgs::run] is called by the main function and contains the bulk of our bootstrapping
//! code while the main function just sets up the basic environment

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::{Parser, Subcommand};
use keyset_testing_kms::Registry;

use crate::app_server::AppServer;
use crate::config;

/// Command line arguments to the keyset testing server.
///
/// Used for parsing with [clap].
#[derive(Parser, Debug)]
#[command(author, version, about, long_about, arg_required_else_help = true)]
pub struct CliArgs {
    /// Lowest log level to show
    #[arg(long = "log-level", value_name = "LOG_LEVEL", group = "log-level")]
    log_level: Option<log::LevelFilter>,

    /// Show verbose log output – sets log level to "debug"
    #[arg(short, long, group = "log-level")]
    verbose: bool,

    /// Show no log output – sets log level to "error"
    #[arg(short, long, group = "log-level")]
    quiet: bool,

    /// The subcommand to be invoked
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// represents a command specified via CLI
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Serve the `tink_testing_api.Keyset` gRPC service
    ///
    /// Listen addresses come from the configuration file, `--listen` and `--port`; at least
    /// one is required.
    Serve {
        /// Read the configuration from this TOML file
        #[clap(short, long)]
        config_file: Option<PathBuf>,

        /// Additional address to listen on
        #[clap(short, long)]
        listen: Vec<SocketAddr>,

        /// Listen on all interfaces at this port (IPv4 and IPv6)
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Generate an example config file for the keyset testing server
    GenConfig {
        config_file: PathBuf,

        /// Forcefully overwrite existing config file
        #[clap(short, long)]
        force: bool,
    },
}

impl CliArgs {
    /// returns the log level filter set by CLI args
    /// returns `None` if the user did not specify any log level filter via CLI
    ///
    /// NOTE: clap's argument groups ensure that the user can not specify more than one of the
    /// possible log level arguments.
    pub fn get_log_level(&self) -> Option<log::LevelFilter> {
        if self.verbose {
            return Some(log::LevelFilter::Debug);
        }
        if self.quiet {
            return Some(log::LevelFilter::Error);
        }
        self.log_level
    }

    /// The configuration the `serve` command runs with
    ///
    /// Returns `None` for any other command.
    pub fn serve_config(&self) -> anyhow::Result<Option<config::KeysetTesting>> {
        let Some(CliCommand::Serve {
            config_file,
            listen,
            port,
        }) = &self.command
        else {
            return Ok(None);
        };

        let mut config = match config_file {
            Some(p) => {
                ensure!(p.exists(), "config file {p:?} does not exist");
                config::KeysetTesting::load(p)?
            }
            None => config::KeysetTesting::new(),
        };
        config.listen.extend_from_slice(listen);
        if let Some(port) = port {
            config.add_if_any(*port);
        }
        config.validate()?;

        Ok(Some(config))
    }

    /// Run the keyset testing server with the given command line parameters
    ///
    /// `config` is the result of [Self::serve_config]; main needs it earlier to pick the
    /// log level.
    pub fn run(self, config: Option<config::KeysetTesting>) -> anyhow::Result<()> {
        use CliCommand::*;
        match &self.command {
            Some(GenConfig { config_file, force }) => {
                ensure!(
                    *force || !config_file.exists(),
                    "config file {config_file:?} already exists"
                );
                config::KeysetTesting::example_config().store(config_file)?;
            }

            Some(Serve { .. }) => {
                let config = config.context("serve requires a configuration")?;
                Self::serve(config)?;
            }

            None => {} // clap prints help if no command is given
        }

        Ok(())
    }

    fn serve(config: config::KeysetTesting) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            let srv = AppServer::bind(&config, Registry::default()).await?;
            srv.serve(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("could not listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            })
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_expands_to_both_address_families() {
        let cli = CliArgs::parse_from(["keyset-testing-server", "serve", "--port", "23456"]);
        let config = cli.serve_config().unwrap().unwrap();
        assert_eq!(config.listen.len(), 2);
        assert!(config.listen.iter().all(|a| a.port() == 23456));
        assert!(config.listen.iter().any(|a| a.is_ipv4()));
        assert!(config.listen.iter().any(|a| a.is_ipv6()));
    }

    #[test]
    fn serve_without_addresses_is_rejected() {
        let cli = CliArgs::parse_from(["keyset-testing-server", "serve"]);
        assert!(cli.serve_config().is_err());
    }

    #[test]
    fn log_level_flags() {
        let cli = CliArgs::parse_from(["keyset-testing-server", "-v", "gen-config", "x"]);
        assert_eq!(cli.get_log_level(), Some(log::LevelFilter::Debug));
        assert!(cli.serve_config().unwrap().is_none());

        let cli = CliArgs::parse_from([
            "keyset-testing-server",
            "--log-level",
            "trace",
            "gen-config",
            "x",
        ]);
        assert_eq!(cli.get_log_level(), Some(log::LevelFilter::Trace));

        let cli = CliArgs::parse_from(["keyset-testing-server", "gen-config", "x"]);
        assert_eq!(cli.get_log_level(), None);
    }

    #[test]
    fn conflicting_log_flags_are_rejected() {
        assert!(CliArgs::try_parse_from(["keyset-testing-server", "-v", "-q", "gen-config", "x"])
            .is_err());
    }
}

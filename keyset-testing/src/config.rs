//! Configuration readable from a config file.
//!
//! The keyset testing server can read its configuration from a TOML file. This module
//! contains a struct [`KeysetTesting`] which holds such a configuration.

use std::{
    fs,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6},
    path::{Path, PathBuf},
};

use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Default for [`KeysetTesting::max_message_size`]: 4 MiB, the gRPC default
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetTesting {
    /// list of [`SocketAddr`] to serve the gRPC API on
    ///
    /// Examples:
    /// - `127.0.0.1:23456`
    /// - `[::]:23456`
    pub listen: Vec<SocketAddr>,

    /// log verbosity
    ///
    /// Command line log level flags take precedence.
    #[serde(default)]
    pub verbosity: Verbosity,

    /// largest gRPC message in bytes accepted or sent
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// path to the file which provided this configuration
    ///
    /// This item is of course not read from the TOML but is added by the algorithm that parses
    /// the config file.
    #[serde(skip)]
    pub config_file_path: PathBuf,
}

fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
}

impl Verbosity {
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Warn,
            Verbosity::Verbose => log::LevelFilter::Debug,
        }
    }
}

impl KeysetTesting {
    /// load configuration from a TOML file
    ///
    /// NOTE: no validation is conducted; see [Self::validate]
    pub fn load<P: AsRef<Path>>(p: P) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(&fs::read_to_string(&p)?)?;
        config.config_file_path = p.as_ref().to_owned();
        Ok(config)
    }

    /// Write a config to a file
    pub fn store<P: AsRef<Path>>(&self, p: P) -> anyhow::Result<()> {
        fs::write(p, toml::to_string_pretty(&self)?)?;
        Ok(())
    }

    /// Validate a configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.listen.is_empty(),
            "no listen address configured: nothing to serve on"
        );
        ensure!(
            self.max_message_size > 0,
            "max_message_size must be greater than zero"
        );
        Ok(())
    }

    /// Creates a new configuration without listen addresses
    pub fn new() -> Self {
        Self {
            listen: vec![],
            verbosity: Verbosity::Quiet,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            config_file_path: PathBuf::new(),
        }
    }

    /// Add IPv6 __and__ IPv4 IF_ANY address to the listen interfaces
    ///
    /// The IPv6 address comes first. Where it binds a dual-stack socket, binding the IPv4
    /// address afterwards fails and is skipped by [crate::app_server::AppServer::bind].
    pub fn add_if_any(&mut self, port: u16) {
        let ipv6_any = SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, port, 0, 0));
        let ipv4_any = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        self.listen.push(ipv6_any);
        self.listen.push(ipv4_any);
    }

    /// Generate an example configuration
    pub fn example_config() -> Self {
        let mut config = Self::new();
        config
            .listen
            .push(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 23456)));
        config
    }
}

impl Default for KeysetTesting {
    fn default() -> Self {
        Self::new()
    }
}

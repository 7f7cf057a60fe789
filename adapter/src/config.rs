use std::fmt;
use std::str::FromStr;

use common::constants::{DEFAULT_HOST, DEFAULT_PORTS, NUM_CHANNELS};

use clap::ValueEnum;
use derive_more::IsVariant;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected host:port, got \"{0}\"")]
    MissingPort(String),

    #[error("empty host in \"{0}\"")]
    EmptyHost(String),

    #[error("bad port in \"{0}\"")]
    BadPort(String),

    #[error("at most 4 channels, got {0}")]
    TooManyChannels(usize),

    #[error("custom mode needs an endpoint for at least one channel")]
    NoEndpoints,
}

// Where the adapter's feeds come from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, IsVariant, ValueEnum)]
pub enum FeedMode {
    // Adapter not fitted.
    #[default]
    Disabled,
    // The standard feed ports on the standard host.
    WellKnown,
    // The standard host, ports may be overridden.
    Localhost,
    // Per channel host and port.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: &str, port: u16) -> Self {
        Endpoint { host: host.to_string(), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((host, port)) = s.rsplit_once(':') else {
            return Err(ConfigError::MissingPort(s.to_string()));
        };
        if host.is_empty() {
            return Err(ConfigError::EmptyHost(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::BadPort(s.to_string()))?;
        Ok(Endpoint::new(host, port))
    }
}

////////////////////////////////////////////////////////////////////////////////

// Only consulted when the adapter is (re)initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub mode: FeedMode,
    pub ports: [u16; NUM_CHANNELS],
    pub custom: [Option<Endpoint>; NUM_CHANNELS],
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            mode: FeedMode::Disabled,
            ports: DEFAULT_PORTS,
            custom: Default::default(),
        }
    }
}

impl FeedConfig {
    pub fn new(mode: FeedMode) -> Self {
        FeedConfig { mode, ..Default::default() }
    }

    pub fn with_ports(mut self, ports: &[u16]) -> Result<Self, ConfigError> {
        if ports.len() > NUM_CHANNELS {
            return Err(ConfigError::TooManyChannels(ports.len()));
        }
        self.ports[..ports.len()].copy_from_slice(ports);
        Ok(self)
    }

    pub fn with_custom(mut self, endpoints: Vec<Endpoint>) -> Result<Self, ConfigError> {
        if endpoints.len() > NUM_CHANNELS {
            return Err(ConfigError::TooManyChannels(endpoints.len()));
        }
        for (slot, endpoint) in self.custom.iter_mut().zip(endpoints) {
            *slot = Some(endpoint);
        }
        Ok(self)
    }

    // The endpoint each channel should connect to, if any.
    pub fn endpoints(&self) -> Result<[Option<Endpoint>; NUM_CHANNELS], ConfigError> {
        Ok(match self.mode {
            FeedMode::Disabled => Default::default(),
            FeedMode::WellKnown => DEFAULT_PORTS.map(|port| Some(Endpoint::new(DEFAULT_HOST, port))),
            FeedMode::Localhost => self.ports.map(|port| Some(Endpoint::new(DEFAULT_HOST, port))),
            FeedMode::Custom => {
                if self.custom.iter().all(Option::is_none) {
                    return Err(ConfigError::NoEndpoints);
                }
                self.custom.clone()
            }
        })
    }
}

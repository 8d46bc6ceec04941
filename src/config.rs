use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::race::{PassageTextSupplier, PetnameTextSupplier, TextSupplier};

pub const BIND_ADDR_VAR: &str = "TYPERACE_BIND_ADDR";
pub const TEXT_SOURCE_VAR: &str = "TYPERACE_TEXT_SOURCE";
pub const TEXT_WORDS_VAR: &str = "TYPERACE_TEXT_WORDS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not valid: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Where round texts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TextSource {
    Passages,
    Petname,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub text_source: TextSource,
    /// Words per generated text, petname source only
    pub text_words: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            text_source: TextSource::Passages,
            text_words: 30,
        }
    }
}

impl ServerConfig {
    /// Load from process environment, falling back to defaults for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = parse(BIND_ADDR_VAR, value)?;
        }
        if let Some(value) = lookup(TEXT_SOURCE_VAR) {
            config.text_source = parse(TEXT_SOURCE_VAR, value)?;
        }
        if let Some(value) = lookup(TEXT_WORDS_VAR) {
            config.text_words = parse(TEXT_WORDS_VAR, value)?;
            if config.text_words == 0 {
                return Err(ConfigError::Invalid {
                    var: TEXT_WORDS_VAR,
                    value: "0".to_string(),
                });
            }
        }

        Ok(config)
    }

    pub fn text_supplier(&self) -> Arc<dyn TextSupplier> {
        match self.text_source {
            TextSource::Passages => Arc::new(PassageTextSupplier::new()),
            TextSource::Petname => Arc::new(PetnameTextSupplier::new(self.text_words)),
        }
    }
}

fn parse<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

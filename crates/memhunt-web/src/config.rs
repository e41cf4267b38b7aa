//! Web server configuration.
//!
//! Every field has a default, so an empty TOML file is a valid config.

use std::net::SocketAddr;
use std::path::Path;

use memhunt_core::{
    DEFAULT_COMMON_TYPES_LIMIT, DEFAULT_SUMMARY_LIMIT, Error, ReportLimits, Result,
};
use serde::Deserialize;

/// Allowed-origin value that accepts any origin.
pub const ANY_ORIGIN: &str = "*";

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "127.0.0.1:8000")
    pub bind_address: String,
    /// Allowed CORS origin, or `*` for any
    pub cors_origin: String,
    /// Include internal error text in catch-all responses
    pub debug: bool,
    /// Max records returned by `/memory/summary`
    pub summary_limit: usize,
    /// Max records returned by `/memory/common-types`
    pub common_types_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            cors_origin: ANY_ORIGIN.to_string(),
            debug: false,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            common_types_limit: DEFAULT_COMMON_TYPES_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, names unknown
    /// keys, or fails [`ServerConfig::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::toml_parse_failed(e.message()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        std::fs::read_to_string(path)
            .map_err(|e| Error::file_read_failed(path, e.to_string()))
            .and_then(|source| Self::from_toml_str(&source))
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a zero limit, an unparseable bind
    /// address, or a CORS origin that is not a valid header value.
    pub fn validate(&self) -> Result<()> {
        if self.summary_limit == 0 {
            return Err(Error::invalid_config("summary_limit must be at least 1"));
        }
        if self.common_types_limit == 0 {
            return Err(Error::invalid_config(
                "common_types_limit must be at least 1",
            ));
        }
        self.socket_addr()?;
        if self.cors_origin != ANY_ORIGIN {
            self.cors_origin
                .parse::<http::HeaderValue>()
                .map_err(|e| {
                    Error::invalid_config(format!(
                        "cors_origin '{}' is not a valid header value: {e}",
                        self.cors_origin
                    ))
                })?;
        }
        Ok(())
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `bind_address` is not `host:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            Error::invalid_config(format!(
                "bind_address '{}' is not a socket address: {e}",
                self.bind_address
            ))
        })
    }

    /// Reporter caps derived from this config.
    #[must_use]
    pub const fn report_limits(&self) -> ReportLimits {
        ReportLimits {
            summary: self.summary_limit,
            common_types: self.common_types_limit,
        }
    }
}

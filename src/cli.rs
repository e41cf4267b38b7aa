//! CLI command definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use memhunt_core::Result;
use memhunt_web::ServerConfig;

/// memhunt - memory debugging tools
#[derive(Parser, Debug)]
#[command(name = "memhunt")]
#[command(version)]
#[command(about = "Inspect live heap objects over a small HTTP API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Print the route table and exit
    Routes,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to, overrides the config file
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Allowed CORS origin (`*` for any), overrides the config file
    #[arg(long)]
    pub cors_origin: Option<String>,

    /// Expose internal error details in responses
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Track this many sample objects so the endpoints have data
    #[arg(long, default_value_t = 0)]
    pub demo_objects: usize,
}

impl ServeArgs {
    /// Config file (or defaults) with CLI overrides applied, validated.
    pub fn resolve_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.bind_address.clone_from(bind);
        }
        if let Some(origin) = &self.cors_origin {
            config.cors_origin.clone_from(origin);
        }
        config.debug |= self.debug;

        config.validate()?;
        Ok(config)
    }
}

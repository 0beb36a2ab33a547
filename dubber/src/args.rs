use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use dubber_config::Config;

/// Video dubbing gateway
#[derive(Debug, Parser)]
#[command(name = "dubber", about = "Transcribe, translate, and re-voice uploaded videos")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "dubber.toml", env = "DUBBER_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "DUBBER_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override only the port of the listen address
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        let mut address = self.listen.unwrap_or_else(|| config.server.listen_address());

        if let Some(port) = self.port {
            address.set_port(port);
        }

        if self.listen.is_some() || self.port.is_some() {
            config.server.listen_address = Some(address);
        }
    }
}

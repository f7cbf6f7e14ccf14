use std::{net::SocketAddr, num::NonZeroUsize};

use clap::Parser;

use crate::relay::{RelayConfig, DEFAULT_CHUNK_SIZE};

/// Server the client connects to when no address is given.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:4000";

/// Command Line Arguments of the chat client.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Arguments {
    /// Server to connect to, as `host:port`.
    #[clap(short, long, value_parser, default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Maximum number of bytes taken from the connection per read.
    #[clap(long, value_parser, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: NonZeroUsize,

    /// Address to publish console events on.
    #[clap(short, long, value_parser)]
    pub console: Option<SocketAddr>,
}

impl Arguments {
    /// Relay settings derived from the command line.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            chunk_size: self.chunk_size,
        }
    }
}

/// Command Line Arguments of the echo server.
#[derive(Parser, Debug)]
#[clap(author, version, about = "Echo raw bytes back to every client.", long_about = None)]
pub struct EchoArguments {
    /// Address to listen on.
    #[clap(short, long, value_parser, default_value = DEFAULT_ADDRESS)]
    pub address: SocketAddr,

    /// Address to publish console events on.
    #[clap(short, long, value_parser)]
    pub console: Option<SocketAddr>,
}

#![warn(missing_docs)]

//! A minimal terminal chat client: one TCP connection, a task printing whatever bytes arrive,
//! and a loop relaying each typed line to the server until the user types `/quit`.

use std::{net::SocketAddr, time::Duration};

use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Install the log subscriber: formatted events on standard error, filtered by `RUST_LOG`
/// or `default_directive`, plus tokio console events published on `console` if given.
pub fn init_tracing(console: Option<SocketAddr>, default_directive: &str) {
    let console = console.map(|addr| {
        console_subscriber::ConsoleLayer::builder()
            .retention(Duration::from_secs(60))
            .server_addr(addr)
            .spawn::<Registry>()
    });

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(console).with(fmt).init();
}

/// Command line arguments of the client and the echo server.
pub mod arguments;

/// Resolve the server address and open the connection.
pub mod connector;

/// Forward raw bytes sent by a client back to it.
pub mod echo;

/// Print whatever arrives on the connection.
pub mod receiver;

/// Run the receive loop and the send loop over one connection with a shared shutdown signal.
pub mod relay;

/// Send each typed line over the connection.
pub mod sender;

pub use arguments::{Arguments, EchoArguments};
pub use connector::{connect, ConnectionError};

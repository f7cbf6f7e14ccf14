use anyhow::Context;
use clap::Parser;
use rawchat::{echo, init_tracing, EchoArguments};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = EchoArguments::parse();
    init_tracing(args.console, "info");

    let listener = TcpListener::bind(args.address)
        .await
        .context(format!("Failed to bind on {}", args.address))?;
    info!(address = %args.address, "Listening");

    loop {
        let (mut socket, addr) = listener
            .accept()
            .await
            .context("Failed to accept on socket")?;
        info!(%addr, "Accepted connection");

        tokio::spawn(async move {
            let (reader, writer) = socket.split();
            match echo::handle_connection(reader, writer).await {
                Ok(bytes) => info!(%addr, bytes, "Connection closed"),
                Err(e) => warn!(%addr, "Failed to handle connection: {e:#}"),
            }
        });
    }
}

use anyhow::Context;
use clap::Parser;
use rawchat::{connect, init_tracing, relay, Arguments};
use tokio::io::{stdin, stdout};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?
        .block_on(chat(args))
}

async fn chat(args: Arguments) -> anyhow::Result<()> {
    init_tracing(args.console, "warn");

    let stream = connect(&args.address).await?;
    println!("Connected to the server.");

    let (reader, writer) = stream.into_split();
    let session = relay::run(reader, writer, stdin(), stdout(), &args.relay_config()).await?;
    debug!(?session, "Disconnected");
    Ok(())
}

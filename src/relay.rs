use std::num::NonZeroUsize;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::{
    receiver::{receive_loop, Termination},
    sender::{send_loop, Exit},
};

/// Historical read size of the client.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(size) => size,
    None => panic!("chunk size must be non-zero"),
};

/// Settings of a relay session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Maximum number of bytes taken from the connection per read.
    pub chunk_size: NonZeroUsize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// How both halves of a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Why the send loop stopped.
    pub exit: Exit,

    /// Why the receive loop stopped, or `None` if it failed.
    pub termination: Option<Termination>,
}

/// Relay lines from `input` to `writer` and chunks from `reader` to `output` concurrently.
///
/// The receive loop runs on its own task. Once the send loop stops, for whatever reason,
/// the receive loop is cancelled, `writer` is shut down, and the receive task is joined
/// before returning.
pub async fn run<Reader, Writer, Input, Output>(
    reader: Reader,
    mut writer: Writer,
    input: Input,
    output: Output,
    config: &RelayConfig,
) -> anyhow::Result<Session>
where
    Reader: AsyncRead + Unpin + Send + 'static,
    Writer: AsyncWrite + Unpin,
    Input: AsyncRead + Unpin,
    Output: AsyncWrite + Unpin + Send + 'static,
{
    let token = CancellationToken::new();
    let receiver = tokio::spawn(receive(reader, output, config.chunk_size, token.clone()));

    let exit = send_loop(input, &mut writer).await;

    token.cancel();
    if let Err(e) = writer.shutdown().await {
        debug!(error = %e, "Unable to shut down connection writer");
    }
    let termination = receiver.await.context("Receive loop panicked")?;

    debug!(?exit, ?termination, "Session ended");
    Ok(Session { exit, termination })
}

/// Run the receive loop, reporting its failure as soon as it happens.
async fn receive<Reader, Output>(
    reader: Reader,
    output: Output,
    chunk_size: NonZeroUsize,
    token: CancellationToken,
) -> Option<Termination>
where
    Reader: AsyncRead + Unpin,
    Output: AsyncWrite + Unpin,
{
    match receive_loop(reader, output, chunk_size, token).await {
        Ok(termination) => Some(termination),
        Err(e) => {
            error!("{e:#}");
            None
        }
    }
}

use std::num::NonZeroUsize;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Printed once when the server closes the connection.
pub const DISCONNECT_NOTICE: &str = "Server disconnected.\n";

/// Why the receive loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The server performed an orderly close (read returned `Ok(0)`).
    RemoteClosed,

    /// The shutdown token was cancelled.
    Cancelled,
}

/// Read chunks of at most `chunk_size` bytes from `reader` and forward them on `output` verbatim.
///
/// Chunks are not reassembled into lines, so a message may appear split or merged with the next one.
///
/// # Termination
/// If EOF is signalled on `reader` by `Ok(0)`, write [`DISCONNECT_NOTICE`] and terminate the future.
/// If the `token` is cancelled, terminate the future without further reads.
/// If reading or writing fails, terminate the future with the error.
pub async fn receive_loop<Reader, Output>(
    mut reader: Reader,
    mut output: Output,
    chunk_size: NonZeroUsize,
    token: CancellationToken,
) -> anyhow::Result<Termination>
where
    Reader: AsyncRead + Unpin,
    Output: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; chunk_size.get()];

    loop {
        tokio::select! {
            result = reader.read(&mut buffer) => {
                let bytes_read = result.context("Error receiving data")?;
                if bytes_read == 0 {
                    output
                        .write_all(DISCONNECT_NOTICE.as_bytes())
                        .await
                        .context("Failed to print disconnect notice")?;
                    output.flush().await.context("Failed to flush output")?;
                    break Ok(Termination::RemoteClosed);
                }
                trace!(bytes_read, "Received chunk");
                output
                    .write_all(&buffer[..bytes_read])
                    .await
                    .context("Failed to print received data")?;
                output.flush().await.context("Failed to flush output")?;
            },
            _ = token.cancelled() => {
                break Ok(Termination::Cancelled);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io;
    use tokio_test::io::Builder as Mock;

    fn chunk(size: usize) -> NonZeroUsize {
        NonZeroUsize::new(size).unwrap()
    }

    #[tokio::test]
    async fn prints_chunks_verbatim() {
        let reader = Mock::new().read(b"hel").read(b"lo\nwor").build();
        let output = Mock::new()
            .write(b"hel")
            .write(b"lo\nwor")
            .write(DISCONNECT_NOTICE.as_bytes())
            .build();

        let termination = receive_loop(reader, output, chunk(1024), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(termination, Termination::RemoteClosed);
    }

    #[tokio::test]
    async fn small_chunks_lose_nothing() {
        let reader = Mock::new().read(b"abcdefghij").read(&[0xff, 0xfe]).build();
        let mut output = Vec::new();

        receive_loop(reader, &mut output, chunk(4), CancellationToken::new())
            .await
            .unwrap();

        let mut expected = b"abcdefghij\xff\xfe".to_vec();
        expected.extend_from_slice(DISCONNECT_NOTICE.as_bytes());
        assert_eq!(output, expected);
    }

    #[tokio::test]
    async fn orderly_close_prints_notice_once() {
        let reader = Mock::new().build();
        let mut output = Vec::new();

        let termination = receive_loop(reader, &mut output, chunk(1024), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(termination, Termination::RemoteClosed);
        assert_eq!(output, DISCONNECT_NOTICE.as_bytes());
    }

    #[tokio::test]
    async fn read_error_ends_loop() {
        let reader = Mock::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut output = Vec::new();

        let error = receive_loop(reader, &mut output, chunk(1024), CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Error receiving data");
        assert_eq!(output, b"partial");
    }

    #[tokio::test]
    async fn cancellation_unblocks_pending_read() {
        let (reader, _server) = tokio::io::duplex(64);
        let token = CancellationToken::new();

        let handle = tokio::spawn(receive_loop(
            reader,
            tokio::io::sink(),
            chunk(1024),
            token.clone(),
        ));
        token.cancel();

        assert_eq!(handle.await.unwrap().unwrap(), Termination::Cancelled);
    }
}

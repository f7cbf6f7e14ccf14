use anyhow::Context;
use std::marker::Unpin;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Forward raw bytes read on `reader` to `writer` until EOF, returning how many were echoed.
pub async fn handle_connection<Reader, Writer>(
    mut reader: Reader,
    mut writer: Writer,
) -> anyhow::Result<u64>
where
    Reader: AsyncRead + Unpin,
    Writer: AsyncWrite + Unpin,
{
    let mut buffer = [0; 1024];
    let mut echoed = 0;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .await
            .context("Failed to read")?;

        if bytes_read == 0 {
            break Ok(echoed);
        }
        trace!(bytes_read, "Echoing chunk");

        writer
            .write_all(&buffer[..bytes_read])
            .await
            .context("Failed to write")?;

        echoed += bytes_read as u64;
    }
}

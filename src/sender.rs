use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, trace, warn};

/// A line consisting of exactly this text ends the session. It is never sent.
pub const QUIT_COMMAND: &str = "/quit";

/// Why the send loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user typed [`QUIT_COMMAND`].
    Quit,

    /// Interactive input reached its end.
    InputClosed,
}

/// Read `input` line by line and forward each line on `writer`, without its line ending.
///
/// A failed write is logged and does not stop the loop.
///
/// # Termination
/// If the line read is exactly [`QUIT_COMMAND`], terminate the future without forwarding it.
/// If EOF is signalled on `input` by `Ok(0)`, terminate the future.
/// If reading `input` fails, log the error and terminate the future as if EOF was reached.
pub async fn send_loop<Input, Writer>(input: Input, mut writer: Writer) -> Exit
where
    Input: AsyncRead + Unpin,
    Writer: AsyncWrite + Unpin,
{
    let mut input = BufReader::new(input);
    let mut line = Vec::new();

    loop {
        line.clear();
        let bytes_read = match input.read_until(b'\n', &mut line).await {
            Ok(bytes_read) => bytes_read,
            Err(e) => {
                error!(error = %e, "Failed to read input");
                break Exit::InputClosed;
            }
        };

        if bytes_read == 0 {
            break Exit::InputClosed;
        }

        let message = strip_line_ending(&line);
        if message == QUIT_COMMAND.as_bytes() {
            break Exit::Quit;
        }
        if message.is_empty() {
            continue;
        }

        match writer.write_all(message).await {
            Ok(()) => trace!(bytes = message.len(), "Sent line"),
            Err(e) => warn!(error = %e, "Failed to send message"),
        }
    }
}

/// Remove a trailing `"\n"` or `"\r\n"`.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

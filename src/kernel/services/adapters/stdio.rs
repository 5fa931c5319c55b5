//! JSON-lines transport for one view over a pair of byte streams.
//!
//! Outbound envelopes are written one per line; each inbound line is parsed
//! as a JSON value and handed to the caller. Lines that are not JSON are
//! logged and skipped.

use crate::kernel::view::ViewPort;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Runs until every handle for the view is dropped.
pub async fn writer_loop<W>(mut port: ViewPort, mut out: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = port.recv().await {
        let mut line = match serde_json::to_vec(&message) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(view = %port.id(), kind = %message.kind, error = %e, "encode outbound failed");
                continue;
            }
        };
        line.push(b'\n');
        out.write_all(&line).await?;
        out.flush().await?;
    }

    tracing::debug!(view = %port.id(), "view writer loop ended");
    Ok(())
}

/// Runs until EOF.
pub async fn reader_loop<R>(input: R, mut on_message: impl FnMut(Value)) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let text = line.trim_ascii();
        if text.is_empty() {
            continue;
        }

        match serde_json::from_slice::<Value>(text) {
            Ok(value) => on_message(value),
            Err(e) => tracing::warn!(error = %e, "dropping non-JSON line from view"),
        }
    }

    tracing::debug!("view reader loop ended");
    Ok(())
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/stdio.rs"]
mod tests;

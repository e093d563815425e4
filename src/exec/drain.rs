// src/exec/drain.rs

//! Per-stream background line readers.
//!
//! One drain task per stream, started the moment the process is spawned.
//! The OS pipe buffers for stdout and stderr are independent and bounded,
//! so both streams must be drained concurrently from the start — reading
//! only one can deadlock the child once the other buffer fills.
//!
//! A read error stops that task only; the other stream and the overall wait
//! sequence are unaffected, and the task's join handle still completes so
//! the launcher never hangs on the completion barrier.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::output::{LineObserver, OutputCollector, StreamSource};

/// Spawn a background task that line-reads `stream` to completion,
/// appending every line to `collector` and notifying `observer`.
pub(crate) fn spawn_drain<R>(
    stream: R,
    source: StreamSource,
    collector: OutputCollector,
    observer: Option<Arc<dyn LineObserver>>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    collector.push(source, &line);
                    if let Some(observer) = &observer {
                        // The return value is the observer's own business.
                        let _ = observer.on_line(&line, source.is_stderr());
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    debug!(stream = source.name(), %err, "stream read failed; stopping drain");
                    break;
                }
            }
        }
    })
}

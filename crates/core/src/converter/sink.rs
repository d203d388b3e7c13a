//! Destination for converter process output.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Longest converter output line kept, in bytes.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

struct SinkState {
    log: File,
    tail: VecDeque<String>,
    tail_limit: usize,
}

/// Duplicates process output into the job log file and, when `echo` is set, into
/// the service log. The last `tail_limit` lines are also kept in memory.
///
/// Cheap to clone; clones share the same file.
#[derive(Clone)]
pub struct OutputSink {
    job_id: Arc<str>,
    echo: bool,
    state: Arc<Mutex<SinkState>>,
}

impl OutputSink {
    pub fn new(job_id: &str, log: File, echo: bool, tail_limit: usize) -> Self {
        Self {
            job_id: Arc::from(job_id),
            echo,
            state: Arc::new(Mutex::new(SinkState {
                log,
                tail: VecDeque::with_capacity(tail_limit),
                tail_limit,
            })),
        }
    }

    /// Appends one line of output.
    pub async fn write_line(&self, line: &str) -> std::io::Result<()> {
        if self.echo {
            info!(target: "partitura::converter::output", job_id = %self.job_id, "{}", line);
        }

        let mut state = self.state.lock().await;
        if state.tail_limit > 0 {
            if state.tail.len() == state.tail_limit {
                state.tail.pop_front();
            }
            state.tail.push_back(line.to_string());
        }
        state.log.write_all(line.as_bytes()).await?;
        state.log.write_all(b"\n").await
    }

    pub async fn flush(&self) -> std::io::Result<()> {
        self.state.lock().await.log.flush().await
    }

    /// The most recent lines, oldest first.
    pub async fn tail(&self) -> Vec<String> {
        self.state.lock().await.tail.iter().cloned().collect()
    }

    /// Drains `reader` line by line into the sink until EOF.
    ///
    /// Lines longer than [`MAX_LINE_BYTES`] are cut at that length and the rest
    /// of the line is discarded. Write failures are logged once and the stream
    /// keeps being drained so the child process never blocks on a full pipe.
    pub async fn pump<R>(&self, reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        let mut write_failed = false;

        loop {
            let chunk = match reader.fill_buf().await {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Failed to read converter output for job {}: {}", self.job_id, e);
                    break;
                }
            };
            if chunk.is_empty() {
                if !line.is_empty() {
                    self.emit(&line, &mut write_failed).await;
                }
                break;
            }

            let (used, complete) = match chunk.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (chunk.len(), false),
            };
            let room = MAX_LINE_BYTES.saturating_sub(line.len());
            line.extend_from_slice(&chunk[..used.min(room)]);
            reader.consume(used);

            if complete {
                self.emit(&line, &mut write_failed).await;
                line.clear();
            }
        }
    }

    async fn emit(&self, raw: &[u8], write_failed: &mut bool) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if let Err(e) = self.write_line(line).await {
            if !*write_failed {
                warn!("Failed to write converter output for job {}: {}", self.job_id, e);
                *write_failed = true;
            }
        }
    }
}

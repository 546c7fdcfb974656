use std::borrow::Cow;

use tokio::{io::AsyncRead, task::JoinHandle};
use tracing::{debug, warn};

use super::lines::LineReader;

const TRUNCATED_SUFFIX: &str = "...[truncated]";

/// Configuration for subprocess output logging.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    /// Max line length in bytes before truncation.
    pub max_line_length: usize,
    /// Log stderr at WARN level (false = DEBUG).
    pub stderr_warn: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            stderr_warn: true,
        }
    }
}

/// Cut `line` to at most `max` bytes on a char boundary.
pub(crate) fn truncate_line(line: &str, max: usize) -> Cow<'_, str> {
    if line.len() <= max {
        return Cow::Borrowed(line);
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}{TRUNCATED_SUFFIX}", &line[..end]))
}

/// Log every line of a child's stderr until it closes.
pub(crate) fn forward_stderr<R>(program: String, stderr: R, cfg: LogConfig) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = LineReader::new(stderr);
        loop {
            match reader.next_line().await {
                Ok(Some(line)) => {
                    let line = truncate_line(&line, cfg.max_line_length);
                    if cfg.stderr_warn {
                        warn!(%program, stream = "stderr", "{line}");
                    } else {
                        debug!(%program, stream = "stderr", "{line}");
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(%program, error = %e, "stopped reading stderr");
                    break;
                }
            }
        }
    })
}

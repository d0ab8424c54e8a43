use anyhow::Result;
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use std::{future::Future, path::PathBuf};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};

use crate::{
    config::MAX_LINE_BYTES,
    processor::Processor,
    protocol::{
        jsonrpc::{INVALID_REQUEST, PARSE_ERROR},
        Request, Response,
    },
};

use super::handlers::{self, MethodError};

/// Outcome of reading one protocol line.
enum LineRead {
    Eof,
    Line,
    TooLong,
}

pub struct ProcessorServer {
    pub(super) processor: Processor,
    max_line_bytes: usize,
}

impl ProcessorServer {
    pub fn new(processor: Processor) -> Self {
        Self {
            processor,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        // Ensure the path is absolute.
        let path = path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.clone()
            } else {
                std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(&path)
            }
        });

        Self::new(Processor::new(path))
    }

    /// Override the longest accepted request line, newline excluded.
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Serve requests on stdin/stdout until EOF or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Starting data processor for {}",
            self.processor.path().display()
        );

        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal");
        };

        self.serve_until(reader, writer, shutdown).await?;

        info!(
            "Shutting down after {} processed inputs",
            self.processor.results().len()
        );
        Ok(())
    }

    /// Serve newline-delimited requests from `reader` until EOF.
    pub async fn serve<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.serve_until(reader, writer, std::future::pending()).await
    }

    /// Serve newline-delimited requests until EOF or until `shutdown` completes.
    ///
    /// Shutdown is only observed while waiting for input, so a request that was
    /// already read is always handled and its response flushed.
    pub async fn serve_until<R, W, S>(
        &mut self,
        mut reader: R,
        mut writer: W,
        shutdown: S,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut line = Vec::new();

        loop {
            let read = tokio::select! {
                read = read_line(&mut reader, &mut line, self.max_line_bytes) => read,
                _ = &mut shutdown => break,
            };

            let response = match read {
                Ok(LineRead::Eof) => break,
                Ok(LineRead::Line) => match self.handle_line(&line).await {
                    Some(response) => response,
                    None => continue,
                },
                Ok(LineRead::TooLong) => {
                    warn!("Dropped request longer than {} bytes", self.max_line_bytes);
                    Response::error(
                        Some(json!(null)),
                        INVALID_REQUEST,
                        format!(
                            "Invalid request: line exceeds {} bytes",
                            self.max_line_bytes
                        ),
                    )
                }
                Err(e) => {
                    error!("Error reading request: {}", e);
                    break;
                }
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Handle a single protocol line. Blank lines produce no response.
    pub async fn handle_line(&mut self, line: &[u8]) -> Option<Response> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        let value = match serde_json::from_slice::<Value>(line) {
            Ok(value) => value,
            Err(e) => {
                debug!("Failed to parse request: {}", String::from_utf8_lossy(line));
                return Some(Response::error(
                    Some(json!(null)),
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        // Well-formed JSON that is not a request still gets its id echoed back.
        let id = value.get("id").cloned().unwrap_or(json!(null));
        let request = match serde_json::from_value::<Request>(value) {
            Ok(request) => request,
            Err(e) => {
                debug!("Invalid request: {}", e);
                return Some(Response::error(
                    Some(id),
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        Some(self.handle_request(request).await)
    }

    pub async fn handle_request(&mut self, request: Request) -> Response {
        debug!("Received request: {}", request.method);

        match request.method.as_str() {
            "initialize" => Response::success(
                request.id,
                json!({
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    },
                    "path": self.processor.path().display().to_string()
                }),
            ),
            method => {
                let params = request.params.unwrap_or(json!({}));
                match handlers::handle_method(self, method, params).await {
                    Ok(result) => Response::success(request.id, result),
                    Err(e) => {
                        if matches!(e, MethodError::NotFound(_)) {
                            debug!("Unknown method: {}", method);
                        } else {
                            error!("Method {} failed: {}", method, e);
                        }
                        Response::error(request.id, e.code(), e.to_string())
                    }
                }
            }
        }
    }
}

/// Read one line into `buf`, newline included. Lines longer than `max_bytes`
/// are discarded up to and including their newline.
async fn read_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_bytes: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    // One extra byte for the newline.
    let limit = max_bytes as u64 + 1;

    buf.clear();
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Eof);
    }

    if buf.last() == Some(&b'\n') || buf.len() <= max_bytes {
        return Ok(LineRead::Line);
    }

    loop {
        buf.clear();
        let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
        if n == 0 || buf.last() == Some(&b'\n') {
            break;
        }
    }
    buf.clear();
    Ok(LineRead::TooLong)
}

//! Transport layer for JSON-RPC communication
//!
//! Implements LSP-style message framing with Content-Length headers over
//! stdio and Unix domain sockets.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace};

use crate::CivicAlertError;

/// Upper bound for a single framed message body
pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// Upper bound for one header line, terminator included
pub const MAX_HEADER_LINE_BYTES: usize = 8 * 1024;

fn framing_error(message: impl Into<String>) -> anyhow::Error {
    CivicAlertError::transport(message).into()
}

/// A bidirectional stream of framed JSON messages
#[async_trait]
pub trait Transport: Send {
    /// Read the next message body. `Ok(None)` means the peer closed the
    /// stream cleanly between messages.
    async fn read_message(&mut self) -> Result<Option<String>>;

    async fn write_message(&mut self, content: &str) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    /// Transport description for logging
    fn description(&self) -> &'static str;
}

/// Content-Length framing over any buffered reader and writer
pub struct FramedTransport<R, W> {
    reader: R,
    writer: W,
    description: &'static str,
}

pub type StdioTransport = FramedTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;
pub type IpcTransport = FramedTransport<
    BufReader<tokio::net::unix::OwnedReadHalf>,
    tokio::net::unix::OwnedWriteHalf,
>;

impl<R, W> FramedTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, description: &'static str) -> Self {
        Self {
            reader,
            writer,
            description,
        }
    }
}

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            "JSON-RPC over stdin/stdout (LSP-style)",
        )
    }
}

impl IpcTransport {
    /// Connect to a listening socket (client side)
    pub async fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let stream = tokio::net::UnixStream::connect(path.as_ref())
            .await
            .map_err(|e| anyhow!("Failed to connect to {}: {}", path.as_ref().display(), e))?;
        Ok(Self::from_stream(stream))
    }

    /// Wrap an accepted connection (server side)
    pub fn from_stream(stream: tokio::net::UnixStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self::new(
            BufReader::new(read_half),
            write_half,
            "JSON-RPC over Unix domain socket (LSP-style)",
        )
    }
}

#[async_trait]
impl<R, W> Transport for FramedTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_message(&mut self) -> Result<Option<String>> {
        let mut content_length = None;
        let mut saw_header = false;

        loop {
            let mut line = String::new();
            let bytes_read = (&mut self.reader)
                .take(MAX_HEADER_LINE_BYTES as u64)
                .read_line(&mut line)
                .await?;

            if bytes_read == 0 {
                if saw_header {
                    return Err(framing_error("Connection closed inside message headers"));
                }
                return Ok(None);
            }
            if bytes_read == MAX_HEADER_LINE_BYTES && !line.ends_with('\n') {
                return Err(framing_error(format!(
                    "Header line exceeds {} bytes",
                    MAX_HEADER_LINE_BYTES
                )));
            }

            let line = line.trim_end();
            if line.is_empty() {
                if saw_header {
                    break;
                }
                // Stray blank line between messages
                continue;
            }
            saw_header = true;

            if let Some(length_str) = line.strip_prefix("Content-Length:") {
                let length = length_str.trim().parse::<usize>().map_err(|_| {
                    framing_error(format!("Invalid Content-Length: {}", length_str.trim()))
                })?;
                content_length = Some(length);
            }

            // Other headers (Content-Type, etc.) are ignored
            trace!("Received header: {}", line);
        }

        let content_length =
            content_length.ok_or_else(|| framing_error("Missing Content-Length header"))?;
        if content_length > MAX_MESSAGE_BYTES {
            return Err(framing_error(format!(
                "Message of {} bytes exceeds limit of {} bytes",
                content_length, MAX_MESSAGE_BYTES
            )));
        }

        let mut buffer = vec![0u8; content_length];
        self.reader.read_exact(&mut buffer).await?;

        let content = String::from_utf8(buffer)
            .map_err(|_| framing_error("Message body is not valid UTF-8"))?;
        debug!("Received message: {} bytes", content_length);
        trace!("Message content: {}", content);

        Ok(Some(content))
    }

    async fn write_message(&mut self, content: &str) -> Result<()> {
        self.writer
            .write_all(lsp_format::format_message(content).as_bytes())
            .await?;
        self.writer.flush().await?;

        debug!("Sent message: {} bytes", content.len());
        trace!("Message content: {}", content);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        debug!("{} closed", self.description);
        Ok(())
    }

    fn description(&self) -> &'static str {
        self.description
    }
}

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Standard input/output with LSP message framing
    Stdio,
    /// Unix domain socket with specified path
    UnixSocket { path: String },
}

impl TransportConfig {
    /// Build from the `[server]` settings section
    pub fn from_settings(settings: &crate::config::ServerSettings) -> Result<Self> {
        Self::from_parts(&settings.server.transport, Some(settings.socket_path()))
    }

    pub fn from_parts(transport: &str, socket_path: Option<&str>) -> Result<Self> {
        match transport {
            "stdio" => Ok(TransportConfig::Stdio),
            "socket" => {
                let path = socket_path.ok_or_else(|| {
                    anyhow!("Socket path is required when using socket transport")
                })?;
                Ok(TransportConfig::UnixSocket {
                    path: path.to_string(),
                })
            }
            other => Err(anyhow!("Unsupported transport type: {}", other)),
        }
    }

    pub fn description(&self) -> String {
        match self {
            TransportConfig::Stdio => "stdin/stdout".to_string(),
            TransportConfig::UnixSocket { path } => format!("Unix socket ({})", path),
        }
    }
}

/// Helper functions for working with LSP message format
pub mod lsp_format {
    pub fn format_message(content: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{}", content.len(), content)
    }
}

//! External GRIB decoder subprocess.
//!
//! GRIB bytes are written to the decoder's stdin; its stdout is the JSON dump
//! parsed by [`crate::message`]. Stdout is read up to a fixed bound, and a
//! decoder producing more than that is killed.

use async_trait::async_trait;
use bytes::Bytes;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use forecast_common::{ForecastError, ForecastResult};

/// Default decoder command line.
pub const DEFAULT_DECODER_COMMAND: &str = "grib_dump -j -";

/// Default stdout bound (50 MiB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 50 * 1024 * 1024;

/// Kept stderr for error messages.
const MAX_STDERR_BYTES: u64 = 16 * 1024;

/// Turns raw GRIB bytes into decoder JSON.
#[async_trait]
pub trait GridDecoder: Send + Sync {
    async fn decode(&self, grib: Bytes) -> ForecastResult<Vec<u8>>;
}

/// Runs an external command such as `grib_dump -j -`.
#[derive(Debug, Clone)]
pub struct GribDumpDecoder {
    program: String,
    args: Vec<String>,
    max_output_bytes: usize,
}

impl GribDumpDecoder {
    pub fn new(program: impl Into<String>, args: Vec<String>, max_output_bytes: usize) -> Self {
        Self {
            program: program.into(),
            args,
            max_output_bytes,
        }
    }

    /// Split a whitespace-separated command line into program and arguments.
    pub fn from_command_line(command: &str, max_output_bytes: usize) -> ForecastResult<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| ForecastError::Internal("empty decoder command".to_string()))?;
        Ok(Self::new(program, parts.collect(), max_output_bytes))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn max_output_bytes(&self) -> usize {
        self.max_output_bytes
    }
}

impl Default for GribDumpDecoder {
    fn default() -> Self {
        Self::new(
            "grib_dump",
            vec!["-j".to_string(), "-".to_string()],
            DEFAULT_MAX_OUTPUT_BYTES,
        )
    }
}

#[async_trait]
impl GridDecoder for GribDumpDecoder {
    #[instrument(skip(self, grib), fields(program = %self.program, bytes = grib.len()))]
    async fn decode(&self, grib: Bytes) -> ForecastResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ForecastError::Decode(format!("Failed to run {}: {}", self.program, e)))?;

        let (Some(mut stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(ForecastError::Internal("decoder pipes unavailable".to_string()));
        };

        // stdin is fed while stdout is drained
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&grib).await;
            drop(stdin);
            result
        });
        let stderr_reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.take(MAX_STDERR_BYTES).read_to_end(&mut buf).await;
            buf
        });

        let limit = self.max_output_bytes as u64;
        let mut output = Vec::new();
        let read = stdout.take(limit + 1).read_to_end(&mut output).await;

        if output.len() as u64 > limit {
            warn!(limit, "Decoder output exceeds limit, killing decoder");
            let _ = child.kill().await;
            writer.abort();
            return Err(ForecastError::Decode(format!(
                "{} output exceeds {} bytes",
                self.program, self.max_output_bytes
            )));
        }
        read.map_err(|e| ForecastError::Decode(format!("Failed to read decoder output: {}", e)))?;

        let status = child
            .wait()
            .await
            .map_err(|e| ForecastError::Decode(format!("Failed to wait for {}: {}", self.program, e)))?;
        let stderr = stderr_reader.await.unwrap_or_default();

        if !status.success() {
            return Err(ForecastError::Decode(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }

        // A successful decoder may exit before reading all of stdin
        if let Ok(Err(e)) = writer.await {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(ForecastError::Decode(format!(
                    "Failed to write to {}: {}",
                    self.program, e
                )));
            }
        }

        debug!(output_bytes = output.len(), "Decoded GRIB message");
        Ok(output)
    }
}

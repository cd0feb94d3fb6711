use std::io;
use std::path::Path;
use std::process::Stdio;

use engine_logging::engine_warn;
use thiserror::Error;
use tokio::process::Command;

/// Default external tool used to materialize video and animated content.
pub const DEFAULT_TOOL: &str = "yt-dlp";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaterializeError {
    #[error("{tool} is not available on the execution path")]
    ToolUnavailable { tool: String },
    #[error("failed to launch {tool}: {message}")]
    Launch { tool: String, message: String },
    #[error("{tool} exited with status {status} for {url}")]
    ToolFailed {
        tool: String,
        status: i32,
        url: String,
    },
}

/// Capability seam for "materialize a file for this reference URL" via an
/// external specialized downloader.
#[async_trait::async_trait]
pub trait Materializer: Send + Sync {
    /// Produce a local file for `url` at `out_template`, where the template
    /// ends in the tool's own extension placeholder.
    async fn materialize(&self, url: &str, out_template: &Path) -> Result<(), MaterializeError>;
}

#[derive(Debug, Clone)]
pub struct YtDlpMaterializer {
    tool: String,
}

impl YtDlpMaterializer {
    pub fn new() -> Self {
        Self::with_tool(DEFAULT_TOOL)
    }

    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl Default for YtDlpMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Materializer for YtDlpMaterializer {
    async fn materialize(&self, url: &str, out_template: &Path) -> Result<(), MaterializeError> {
        let output = Command::new(&self.tool)
            .arg("--output")
            .arg(out_template)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => MaterializeError::ToolUnavailable {
                    tool: self.tool.clone(),
                },
                _ => MaterializeError::Launch {
                    tool: self.tool.clone(),
                    message: err.to_string(),
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if let Some(line) = stderr.lines().last() {
                engine_warn!("{}: {}", self.tool, line);
            }
            return Err(MaterializeError::ToolFailed {
                tool: self.tool.clone(),
                status: output.status.code().unwrap_or(-1),
                url: url.to_owned(),
            });
        }

        Ok(())
    }
}

//! Rendering boundary for DOT graphs.

use super::GraphConfig;
use crate::effects::BoxError;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while rendering a graph
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("renderer I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// Failure reported by a custom renderer.
    #[error("renderer failed: {0}")]
    Other(BoxError),
}

/// Turns DOT text into an output file.
pub trait Renderer: Send + Sync {
    fn render(&self, dot: &str, output: &Path, config: &GraphConfig) -> Result<(), RenderError>;
}

/// Renders through the Graphviz command line, feeding the DOT text on stdin.
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphvizRenderer;

impl GraphvizRenderer {
    fn command(output: &Path, config: &GraphConfig) -> Command {
        let mut output_arg = OsString::from("-o");
        output_arg.push(output);

        let mut command = Command::new(&config.program);
        command
            .arg(output_arg)
            .arg(format!("-T{}", config.format))
            .arg(format!("-K{}", config.layout))
            .arg(format!("-s{}", config.scale))
            .arg(format!("-Gsize={}", config.size))
            .arg(format!("-Gdpi={}", config.dpi))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, dot: &str, output: &Path, config: &GraphConfig) -> Result<(), RenderError> {
        debug!(program = %config.program, output = %output.display(), "rendering state graph");

        let mut child = Self::command(output, config)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: config.program.clone(),
                source,
            })?;

        // stdin is closed before waiting; a renderer that exits early breaks
        // the pipe, and its exit status explains why
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        let finished = child.wait_with_output()?;
        if !finished.status.success() {
            return Err(RenderError::Failed {
                status: finished.status.to_string(),
                stderr: String::from_utf8_lossy(&finished.stderr).trim().to_string(),
            });
        }
        written?;
        Ok(())
    }
}

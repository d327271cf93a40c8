//! Command sinks: the gnuplot process and an in-memory recorder
//!
//! The session only ever writes newline-terminated commands and closes the
//! stream at the end. gnuplot's output is never read.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{GnuplotError, GnuplotResult};

/// Receiver of the session's command stream
pub trait PlotBackend {
    /// Write one command line
    fn send_line(&mut self, line: &str) -> GnuplotResult<()>;

    /// Close the command stream and wait for the consumer to finish
    fn close(&mut self) -> GnuplotResult<()>;

    /// Like `close`, but give up after `timeout`
    fn close_timeout(&mut self, _timeout: Duration) -> GnuplotResult<()> {
        self.close()
    }
}

/// A running gnuplot process fed through its standard input
#[derive(Debug)]
pub struct GnuplotProcess {
    path: PathBuf,
    child: Child,
    stdin: Option<ChildStdin>,
    status: Option<ExitStatus>,
}

impl GnuplotProcess {
    /// How often `close_timeout` polls for exit
    const POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// Start gnuplot, optionally with `-persist`
    pub fn spawn(path: &Path, persist: bool) -> GnuplotResult<Self> {
        let mut command = Command::new(path);
        if persist {
            command.arg("-persist");
        }
        command.stdin(Stdio::piped());

        let mut child = command.spawn().map_err(|source| GnuplotError::ProcessSpawn {
            path: path.to_path_buf(),
            source,
        })?;
        let stdin = child.stdin.take().ok_or_else(|| GnuplotError::ProcessSpawn {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "stdin was not captured"),
        })?;

        tracing::info!("Started {:?} (pid {}, persist: {})", path, child.id(), persist);
        Ok(Self {
            path: path.to_path_buf(),
            child,
            stdin: Some(stdin),
            status: None,
        })
    }

    /// Process id of the child
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exit status, once the process has been waited on
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.status
    }

    fn finish(&mut self, status: ExitStatus) -> GnuplotResult<()> {
        self.status = Some(status);
        tracing::info!("gnuplot (pid {}) exited with {}", self.child.id(), status);
        if status.success() {
            Ok(())
        } else {
            Err(GnuplotError::Io(io::Error::other(format!(
                "gnuplot exited with {}",
                status
            ))))
        }
    }
}

impl PlotBackend for GnuplotProcess {
    fn send_line(&mut self, line: &str) -> GnuplotResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "gnuplot stdin is closed"))?;
        tracing::debug!("gnuplot << {}", line);
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        stdin.write_all(buf.as_bytes())?;
        stdin.flush()?;
        Ok(())
    }

    fn close(&mut self) -> GnuplotResult<()> {
        if self.status.is_some() {
            return Ok(());
        }
        drop(self.stdin.take());
        let status = self.child.wait()?;
        self.finish(status)
    }

    fn close_timeout(&mut self, timeout: Duration) -> GnuplotResult<()> {
        if self.status.is_some() {
            return Ok(());
        }
        drop(self.stdin.take());

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait()? {
                return self.finish(status);
            }
            if Instant::now() >= deadline {
                tracing::warn!(
                    "gnuplot (pid {}) still running after {:?}, killing it",
                    self.child.id(),
                    timeout
                );
                self.child.kill()?;
                self.status = Some(self.child.wait()?);
                return Err(GnuplotError::ProcessTimeout(timeout));
            }
            thread::sleep(Self::POLL_INTERVAL);
        }
    }
}

/// Records the command stream in memory instead of running gnuplot
///
/// Useful for dry runs and tests. Writes can be made to fail after a given
/// number of lines to simulate a broken pipe.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    lines: Vec<String>,
    fail_after: Option<usize>,
    closed: bool,
    close_calls: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write after `n` successful ones
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Every line sent so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drain the recorded lines
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of times `close` was called
    pub fn close_calls(&self) -> usize {
        self.close_calls
    }
}

impl PlotBackend for RecordingBackend {
    fn send_line(&mut self, line: &str) -> GnuplotResult<()> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "recorder is closed").into());
        }
        if let Some(limit) = self.fail_after {
            if self.lines.len() >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "injected write failure").into());
            }
        }
        tracing::debug!("recorded << {}", line);
        self.lines.push(line.to_string());
        Ok(())
    }

    fn close(&mut self) -> GnuplotResult<()> {
        self.closed = true;
        self.close_calls += 1;
        Ok(())
    }
}

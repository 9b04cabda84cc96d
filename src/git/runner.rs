use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Raw result of one subprocess invocation. A non-zero exit is not an error
/// at this level; the facade decides what each exit code means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Executes a VCS command line against one working tree.
pub trait ProcessRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs the `git` binary with the working tree as its cwd.
#[derive(Debug, Clone)]
pub struct GitRunner {
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl GitRunner {
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
            timeout: None,
        }
    }

    /// A zero duration disables the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn wait(&self, child: &mut Child, command: &str) -> Result<Option<i32>> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?.code());
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.code());
            }
            if Instant::now() >= deadline {
                warn!(command, timeout_secs = timeout.as_secs(), "Killing timed out command");
                if let Err(err) = child.kill() {
                    warn!(command, error = %err, "Failed to kill timed out command");
                }
                let _ = child.wait();
                return Err(Error::TimedOut {
                    command: command.to_string(),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ProcessRunner for GitRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let command = format!("git {}", args.join(" "));
        debug!(command = %command, "Running");

        let mut child = Command::new("git")
            .current_dir(&self.workdir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes off-thread so a large output cannot block the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let code = self.wait(&mut child, &command)?;

        let output = CommandOutput {
            stdout: collect(stdout),
            stderr: collect(stderr),
            code,
        };
        debug!(command = %command, code = ?output.code, "Finished");
        Ok(output)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::Path,
    process::Stdio,
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, BufReader},
    process::{Child, Command},
    time::timeout,
};

use crate::config;

/// Captured outcome of a finished subprocess, with streams decoded as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The exact command line that was invoked.
    pub argv:      Vec<String>,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
    /// Contents written to stdout.
    pub stdout:    String,
    /// Contents written to stderr.
    pub stderr:    String,
}

impl ExecutionResult {
    /// True when the process exited with code zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The command line as a single displayable string.
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }

    /// True when the exit code matches the shell's could-not-execute
    /// convention (126/127). glibc's exec machinery runs an ENOEXEC file
    /// through `/bin/sh`, so a binary built for another architecture can
    /// come back as one of these exits instead of a spawn error.
    pub fn looks_unexecutable(&self) -> bool {
        matches!(self.exit_code, Some(126) | Some(127))
    }
}

/// Errors surfaced by the subprocess layer.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    /// The OS refused to start the process at all.
    #[error("could not execute `{program}`: {source}")]
    Spawn {
        /// argv[0] of the attempted invocation.
        program: String,
        /// The underlying OS error.
        source:  std::io::Error,
    },

    /// The process outlived the wall-clock limit and was terminated.
    /// Never retried; this means an infinite loop or a blocking read.
    #[error("`{command}` exceeded the {limit:?} time limit")]
    TimedOut {
        /// The command line that was terminated.
        command: String,
        /// The limit that was exceeded.
        limit:   Duration,
    },

    /// Pipe plumbing failed after the process had started.
    #[error(transparent)]
    Capture(#[from] anyhow::Error),
}

impl ProcessError {
    /// True for spawn failures a forced recompile can plausibly fix: the
    /// binary is missing, not executable here, or built for another
    /// architecture (a stale artifact checked into version control).
    pub fn is_stale_binary(&self) -> bool {
        match self {
            ProcessError::Spawn { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ) || source.raw_os_error() == Some(libc_enoexec()),
            _ => false,
        }
    }
}

/// ENOEXEC without pulling in libc for one constant.
const fn libc_enoexec() -> i32 {
    8
}

/// Drop guard that terminates the child if the surrounding future is
/// dropped, which is how a timeout reaps the process.
struct ChildGuard(Option<Child>);

impl ChildGuard {
    /// Returns a mutable reference to the guarded child.
    fn child_mut(&mut self) -> anyhow::Result<&mut Child> {
        self.0.as_mut().context("child process already reaped")
    }

    /// Marks the child as reaped so drop has nothing to kill.
    fn disarm(&mut self) {
        let _ = self.0.take();
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(child) = self.0.as_mut() {
            let _ = child.start_kill();
        }
    }
}

/// Spawns `argv`, writes `stdin` to the child, and waits for completion,
/// capturing both output streams as text.
///
/// * `cwd`: working directory for the child (the fixture directory).
/// * `env`: variables layered over the inherited environment.
/// * `limit`: optional wall-clock limit; exceeding it kills the child and
///   yields [`ProcessError::TimedOut`].
///
/// Blocks the calling thread on the shared runtime; the harness is
/// strictly sequential by design.
pub fn run_captured(
    argv: &[String],
    stdin: &str,
    cwd: &Path,
    env: &[(OsString, OsString)],
    limit: Option<Duration>,
) -> Result<ExecutionResult, ProcessError> {
    let rt = config::runtime();
    rt.block_on(run_captured_inner(argv, stdin, cwd, env, limit))
}

/// Async body of [`run_captured`].
async fn run_captured_inner(
    argv: &[String],
    stdin: &str,
    cwd: &Path,
    env: &[(OsString, OsString)],
    limit: Option<Duration>,
) -> Result<ExecutionResult, ProcessError> {
    let (program, args) = argv
        .split_first()
        .context("cannot run an empty command line")?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        cmd.env(key, value);
    }

    tracing::debug!(command = %argv.join(" "), "spawning");

    let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;
    let mut guard = ChildGuard(Some(child));

    if let Some(mut handle) = guard.child_mut()?.stdin.take() {
        let payload = stdin.as_bytes().to_vec();
        tokio::spawn(async move {
            if !payload.is_empty() {
                let _ = handle.write_all(&payload).await;
            }
            let _ = handle.shutdown().await;
        });
    }

    let stdout = guard
        .child_mut()?
        .stdout
        .take()
        .context("missing stdout pipe")?;
    let stderr = guard
        .child_mut()?
        .stderr
        .take()
        .context("missing stderr pipe")?;

    let out_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        BufReader::new(stdout)
            .read_to_end(&mut buf)
            .await
            .context("failed to read stdout")?;
        Ok::<Vec<u8>, anyhow::Error>(buf)
    });
    let err_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        BufReader::new(stderr)
            .read_to_end(&mut buf)
            .await
            .context("failed to read stderr")?;
        Ok::<Vec<u8>, anyhow::Error>(buf)
    });

    let wait_future = async move {
        let status = guard
            .child_mut()?
            .wait()
            .await
            .context("failed to wait on process")?;
        let stdout = out_task.await.context("stdout task join error")??;
        let stderr = err_task.await.context("stderr task join error")??;
        // Reaped normally.
        guard.disarm();
        Ok::<_, anyhow::Error>((status, stdout, stderr))
    };

    let (status, stdout, stderr) = match limit {
        Some(limit) => match timeout(limit, wait_future).await {
            Ok(finished) => finished?,
            Err(_elapsed) => {
                return Err(ProcessError::TimedOut {
                    command: argv.join(" "),
                    limit,
                });
            }
        },
        None => wait_future.await?,
    };

    Ok(ExecutionResult {
        argv:      argv.to_vec(),
        exit_code: status.code(),
        stdout:    String::from_utf8_lossy(&stdout).into_owned(),
        stderr:    String::from_utf8_lossy(&stderr).into_owned(),
    })
}

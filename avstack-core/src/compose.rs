// SPDX-License-Identifier: Apache-2.0

//! Container orchestrator abstraction.
//!
//! The CLI never talks to Docker directly; everything goes through the
//! `Orchestrator` trait so tests can substitute a recording fake. The
//! production implementation shells out to `docker` / `docker-compose`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{StackError, StackResult};

/// Capabilities the CLI needs from the container runtime: report liveness,
/// build/start/stop the service group, list processes, stream logs.
pub trait Orchestrator {
    /// Check that the container runtime daemon is reachable.
    fn ping(&self) -> StackResult<()>;

    /// Build the service images using the given environment file.
    fn build(&self, env_file: &Path) -> StackResult<()>;

    /// Start the service group detached, using the given environment file.
    fn up(&self, env_file: &Path) -> StackResult<()>;

    /// Tear the service group down.
    fn down(&self) -> StackResult<()>;

    /// Return the orchestrator's process listing as text.
    fn processes(&self) -> StackResult<String>;

    /// Stream aggregated logs (follow mode) until interrupted.
    fn follow_logs(&self) -> StackResult<()>;
}

/// Production orchestrator backed by the `docker-compose` CLI.
#[derive(Debug, Clone)]
pub struct DockerCompose {
    compose_file: PathBuf,
}

impl DockerCompose {
    /// `compose_file` is resolved against `project_dir`; relative paths
    /// inside the compose file resolve against its own directory.
    pub fn new(compose_file: impl Into<PathBuf>, project_dir: impl AsRef<Path>) -> Self {
        Self {
            compose_file: project_dir.as_ref().join(compose_file.into()),
        }
    }

    /// Base `docker-compose` invocation with the compose file pinned.
    fn compose(&self) -> Command {
        let mut cmd = Command::new("docker-compose");
        cmd.arg("-f").arg(&self.compose_file);
        cmd
    }

    /// Run a compose subcommand with inherited stdio, mapping a non-zero
    /// exit to ComposeFailed.
    fn run(&self, mut cmd: Command, op: &'static str) -> StackResult<()> {
        tracing::debug!(op = op, "Invoking docker-compose");

        let status = cmd.status().map_err(|e| StackError::Io {
            context: "spawning docker-compose",
            source: e,
        })?;

        if !status.success() {
            tracing::error!(op = op, code = ?status.code(), "docker-compose failed");
            return Err(StackError::ComposeFailed {
                op,
                code: status.code(),
            });
        }

        Ok(())
    }
}

impl Orchestrator for DockerCompose {
    fn ping(&self) -> StackResult<()> {
        // `docker info` exits non-zero when the daemon is down. Output is
        // noise here; only the exit status matters.
        let status = Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to invoke docker");
                StackError::DockerUnavailable
            })?;

        if !status.success() {
            return Err(StackError::DockerUnavailable);
        }

        Ok(())
    }

    fn build(&self, env_file: &Path) -> StackResult<()> {
        let mut cmd = self.compose();
        cmd.arg("--env-file").arg(env_file).arg("build");
        self.run(cmd, "build")
    }

    fn up(&self, env_file: &Path) -> StackResult<()> {
        let mut cmd = self.compose();
        cmd.arg("--env-file").arg(env_file).arg("up").arg("-d");
        self.run(cmd, "up")
    }

    fn down(&self) -> StackResult<()> {
        let mut cmd = self.compose();
        cmd.arg("down");
        self.run(cmd, "down")
    }

    fn processes(&self) -> StackResult<String> {
        let output = self
            .compose()
            .arg("ps")
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| StackError::Io {
                context: "spawning docker-compose ps",
                source: e,
            })?;

        if !output.status.success() {
            return Err(StackError::ComposeFailed {
                op: "ps",
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn follow_logs(&self) -> StackResult<()> {
        // Runs until the user interrupts; stdio is inherited so the stream
        // goes straight to the terminal.
        let mut cmd = self.compose();
        cmd.arg("logs").arg("-f");
        self.run(cmd, "logs")
    }
}

//! External helper processes
//!
//! A receiver relays a network audio stream through a helper program that
//! re-exports it over local HTTP. At most one helper runs per service; the
//! [`HelperSlot`] owns it and guarantees the previous process is gone before
//! a new one starts.

use std::process::{Child, Command, Stdio};

use tracing::{debug, error, info, warn};

use crate::error::ProcessError;

/// A running helper process
pub trait HelperProcess {
    fn pid(&self) -> u32;

    /// Stop the process and reap it
    fn terminate(&mut self) -> Result<(), ProcessError>;
}

/// Starts helper processes
pub trait ProcessLauncher {
    fn launch(&self, program: &str, args: &[String])
        -> Result<Box<dyn HelperProcess>, ProcessError>;
}

/// Launches real OS processes with all standard streams closed
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher;

impl ProcessLauncher for CommandLauncher {
    fn launch(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<Box<dyn HelperProcess>, ProcessError> {
        info!(program, ?args, "spawning helper");
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                program: program.to_string(),
                source,
            })?;
        Ok(Box::new(ChildProcess { child: Some(child) }))
    }
}

/// [`HelperProcess`] backed by a [`std::process::Child`]
///
/// The process is killed when the handle is dropped.
#[derive(Debug)]
pub struct ChildProcess {
    child: Option<Child>,
}

impl HelperProcess for ChildProcess {
    fn pid(&self) -> u32 {
        self.child.as_ref().map(Child::id).unwrap_or(0)
    }

    fn terminate(&mut self) -> Result<(), ProcessError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let pid = child.id();

        // kill() fails with InvalidInput once the child has exited on its own
        if let Err(source) = child.kill() {
            if source.kind() != std::io::ErrorKind::InvalidInput {
                return Err(ProcessError::TerminateFailed { pid, source });
            }
        }
        child
            .wait()
            .map_err(|source| ProcessError::TerminateFailed { pid, source })?;
        debug!(pid, "helper terminated");
        Ok(())
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            error!(error = %e, "helper cleanup failed");
        }
    }
}

/// Holder for at most one live helper process
#[derive(Default)]
pub struct HelperSlot {
    current: Option<Box<dyn HelperProcess>>,
}

impl std::fmt::Debug for HelperSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperSlot")
            .field("pid", &self.pid())
            .finish()
    }
}

impl HelperSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        self.current.as_ref().map(|p| p.pid())
    }

    /// Terminate the current process, if any, then launch a new one
    ///
    /// Returns the new pid. On launch failure the slot is left empty.
    pub fn replace(
        &mut self,
        launcher: &dyn ProcessLauncher,
        program: &str,
        args: &[String],
    ) -> Result<u32, ProcessError> {
        self.release();
        let process = launcher.launch(program, args)?;
        let pid = process.pid();
        debug!(program, pid, "helper started");
        self.current = Some(process);
        Ok(pid)
    }

    /// Terminate the current process; returns whether there was one
    ///
    /// The slot is emptied even when termination reports an error.
    pub fn release(&mut self) -> bool {
        match self.current.take() {
            Some(mut process) => {
                let pid = process.pid();
                if let Err(e) = process.terminate() {
                    warn!(pid, error = %e, "failed to terminate helper");
                }
                true
            }
            None => false,
        }
    }
}

use crate::error::{Error, Result};
use crate::plan::Invocation;
use std::path::Path;
use std::process::Command;

/// How an external program finished. `code` is `None` when it was killed by
/// a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub code: Option<i32>,
}

impl Exit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The side effects a plan needs from the outside world.
pub trait Executor {
    /// Run a program to completion.
    fn run(&mut self, invocation: &Invocation) -> Result<Exit>;

    /// Hand a file to the default viewer.
    fn open(&mut self, path: &Path) -> Result<()>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn run(&mut self, invocation: &Invocation) -> Result<Exit> {
        (**self).run(invocation)
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        (**self).open(path)
    }
}

/// Spawns real processes with the launcher's stdio so script output stays
/// visible.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&mut self, invocation: &Invocation) -> Result<Exit> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|e| {
                Error::ExternalProcessFailed(format!(
                    "Failed to launch {}: {e}",
                    invocation.program
                ))
            })?;

        Ok(Exit {
            code: status.code(),
        })
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        open::that(path).map_err(|e| {
            Error::ExternalProcessFailed(format!("Failed to open {}: {e}", path.display()))
        })
    }
}

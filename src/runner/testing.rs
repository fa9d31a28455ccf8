use super::{Executor, Exit};
use crate::plan::Invocation;
use crate::Result;
use std::path::{Path, PathBuf};

/// Records every call and fails invocations whose command line matches
/// `fail_on`.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    pub runs: Vec<Invocation>,
    pub opened: Vec<PathBuf>,
    pub fail_on: Option<String>,
}

impl RecordingExecutor {
    pub fn failing_on(command_line: &str) -> Self {
        Self {
            fail_on: Some(command_line.to_string()),
            ..Default::default()
        }
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.runs.iter().map(|i| i.command_line()).collect()
    }
}

impl Executor for RecordingExecutor {
    fn run(&mut self, invocation: &Invocation) -> Result<Exit> {
        self.runs.push(invocation.clone());
        let failed = self
            .fail_on
            .as_deref()
            .is_some_and(|f| invocation.command_line() == f);
        Ok(Exit {
            code: Some(if failed { 1 } else { 0 }),
        })
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        self.opened.push(path.to_path_buf());
        Ok(())
    }
}

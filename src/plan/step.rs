use std::fmt;
use std::path::{Path, PathBuf};

/// One external process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// The command line as a single string, for logs and error messages.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a program and wait for it to exit.
    Run(Invocation),
    /// Copy a file, creating the destination directory if needed.
    Copy { from: PathBuf, to: PathBuf },
    /// Commit `path` in `repo`. Skipped when nothing is staged for it.
    Commit {
        repo: PathBuf,
        path: PathBuf,
        message: String,
    },
    /// Open a file in the default viewer.
    Open(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub action: Action,
}

impl Step {
    pub fn new(label: &str, action: Action) -> Self {
        Self {
            label: label.to_string(),
            action,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Action::Run(inv) => write!(
                f,
                "{}: {} (in {})",
                self.label,
                inv.command_line(),
                inv.cwd.display()
            ),
            Action::Copy { from, to } => write!(
                f,
                "{}: copy {} -> {}",
                self.label,
                from.display(),
                to.display()
            ),
            Action::Commit {
                repo,
                path,
                message,
            } => write!(
                f,
                "{}: git commit -m \"{message}\" -- {} (in {})",
                self.label,
                path.display(),
                repo.display()
            ),
            Action::Open(path) => write!(f, "{}: open {}", self.label, path.display()),
        }
    }
}

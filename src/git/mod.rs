use crate::error::{Error, Result};
use git2::{Repository, Status};
use std::path::{Path, PathBuf};

const STAGED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

fn open(dir: &Path) -> Result<Repository> {
    match Repository::discover(dir) {
        Ok(repo) if !repo.is_bare() => Ok(repo),
        Ok(_) => Err(Error::NotAGitRepository(dir.to_path_buf())),
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            Err(Error::NotAGitRepository(dir.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Root of the work tree containing `dir`. `dir` itself may not exist yet;
/// the search starts from its nearest existing ancestor.
pub fn discover_root(dir: &Path) -> Result<PathBuf> {
    let existing = dir
        .ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .unwrap_or(Path::new("."));
    let repo = open(existing).map_err(|e| match e {
        Error::NotAGitRepository(_) => Error::NotAGitRepository(dir.to_path_buf()),
        e => e,
    })?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::NotAGitRepository(dir.to_path_buf()))
}

/// Whether `path` (relative to `dir`) has changes staged against `HEAD`.
/// A path git knows nothing about has nothing staged.
pub fn has_staged_changes(dir: &Path, path: &Path) -> Result<bool> {
    let repo = open(dir)?;
    let root = repo
        .workdir()
        .ok_or_else(|| Error::NotAGitRepository(dir.to_path_buf()))?
        .canonicalize()?;

    let target = dir.canonicalize()?.join(path);
    let relative = target
        .strip_prefix(&root)
        .map_err(|_| Error::NotAGitRepository(dir.to_path_buf()))?;

    match repo.status_file(relative) {
        Ok(status) => {
            tracing::debug!(path = %relative.display(), ?status, "publish file status");
            Ok(status.intersects(STAGED))
        }
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

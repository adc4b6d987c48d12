//! `--clean`: remove the build directory before anything runs.

use crate::core::{BuildResult, Workspace};
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::shell::{Shell, Status};

/// Delete `build/`. Returns whether it existed.
pub fn clean(workspace: &Workspace, shell: &Shell) -> BuildResult<bool> {
    let build_dir = workspace.build_dir();
    let removed = remove_dir_all_if_exists(&build_dir)?;
    if removed {
        shell.status(Status::Removed, build_dir.display());
    } else {
        tracing::debug!("nothing to clean at {}", build_dir.display());
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRepo;

    #[test]
    fn test_clean_removes_build_dir() {
        let repo = FakeRepo::new();
        repo.write("build/CMakeCache.txt", "stale");

        assert!(clean(&repo.workspace, &Shell::quiet()).unwrap());
        assert!(!repo.workspace.build_dir().exists());
        assert!(!clean(&repo.workspace, &Shell::quiet()).unwrap());
    }
}

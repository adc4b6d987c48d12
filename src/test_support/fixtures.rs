//! Scratch repositories for tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::Workspace;

/// A throwaway vosk-api checkout.
pub struct FakeRepo {
    pub dir: TempDir,
    pub workspace: Workspace,
}

impl FakeRepo {
    /// Repository with `src/`, the public header and the binding directories.
    pub fn new() -> Self {
        FakeRepo::named("vosk-api")
    }

    /// Same layout, checked out under a directory called `name`.
    pub fn named(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(name);
        for sub in ["src", "python", "java", "csharp"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("src/vosk_api.h"), "/* vosk api */\n").unwrap();

        FakeRepo {
            workspace: Workspace::new(&root),
            dir,
        }
    }

    pub fn root(&self) -> &Path {
        self.workspace.root()
    }

    /// Create a directory (and parents) relative to the repository root.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write a file relative to the repository root.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// A Kaldi tree next to the repository, as `../kaldi` with `src/`.
    pub fn sibling_kaldi(&self) -> PathBuf {
        let kaldi = self.dir.path().join("kaldi");
        fs::create_dir_all(kaldi.join("src")).unwrap();
        kaldi
    }

    /// Scratch path outside the repository.
    pub fn scratch(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

impl Default for FakeRepo {
    fn default() -> Self {
        FakeRepo::new()
    }
}

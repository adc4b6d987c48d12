//! Layout of the vosk-api repository being built.

use std::path::{Path, PathBuf};

/// Header installed alongside the shared library.
pub const PUBLIC_HEADER: &str = "vosk_api.h";

/// Paths derived from the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Workspace { root: root.into() }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Out-of-tree build directory (also used by the CMake strategy).
    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Native sources and Makefiles.
    pub fn native_src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn public_header(&self) -> PathBuf {
        self.native_src_dir().join(PUBLIC_HEADER)
    }

    pub fn python_dir(&self) -> PathBuf {
        self.root.join("python")
    }

    pub fn python_test_dir(&self) -> PathBuf {
        self.python_dir().join("test")
    }

    pub fn java_dir(&self) -> PathBuf {
        self.root.join("java")
    }

    pub fn csharp_dir(&self) -> PathBuf {
        self.root.join("csharp")
    }

    /// C examples doubling as the native smoke test.
    pub fn c_dir(&self) -> PathBuf {
        self.root.join("c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let ws = Workspace::new("/work/vosk-api");
        assert_eq!(ws.build_dir(), PathBuf::from("/work/vosk-api/build"));
        assert_eq!(
            ws.public_header(),
            PathBuf::from("/work/vosk-api/src/vosk_api.h")
        );
        assert_eq!(
            ws.python_test_dir(),
            PathBuf::from("/work/vosk-api/python/test")
        );
    }
}

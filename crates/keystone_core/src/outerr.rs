//! Path-addressed stdout/stderr capture.
//!
//! An [`OutErr`] names the pair of files a spawn's process output must end
//! up in. Racing branches write to branch-suffixed siblings of the final
//! destination; the winner's files are renamed into place and the loser's
//! are discarded. Files are created lazily on first write, so a branch that
//! produces no output leaves nothing behind.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A pair of capture files for a spawn's stdout and stderr
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutErr {
    out_path: PathBuf,
    err_path: PathBuf,
}

impl OutErr {
    /// Create a capture pair for the given paths
    #[must_use]
    pub fn new(out_path: impl Into<PathBuf>, err_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            err_path: err_path.into(),
        }
    }

    /// Get the stdout capture path
    #[must_use]
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// Get the stderr capture path
    #[must_use]
    pub fn err_path(&self) -> &Path {
        &self.err_path
    }

    /// Derive a sibling capture pair with `suffix` appended to each file name
    ///
    /// This is how racing branches obtain scratch destinations that are
    /// deterministically named from the final destination.
    #[must_use]
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self {
            out_path: suffixed_path(&self.out_path, suffix),
            err_path: suffixed_path(&self.err_path, suffix),
        }
    }

    /// Append bytes to the stdout capture, creating the file on first write
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or written
    pub fn write_out(&self, bytes: &[u8]) -> io::Result<()> {
        append(&self.out_path, bytes)
    }

    /// Append bytes to the stderr capture, creating the file on first write
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or written
    pub fn write_err(&self, bytes: &[u8]) -> io::Result<()> {
        append(&self.err_path, bytes)
    }

    /// Check whether either capture file exists
    #[must_use]
    pub fn has_output(&self) -> bool {
        self.out_path.exists() || self.err_path.exists()
    }

    /// Move whichever capture files exist over the destination paths
    ///
    /// A no-op for files that were never written.
    ///
    /// # Errors
    ///
    /// Returns error if a rename fails
    pub fn move_into(&self, dest: &OutErr) -> io::Result<()> {
        if self.out_path.exists() {
            fs::rename(&self.out_path, &dest.out_path)?;
        }
        if self.err_path.exists() {
            fs::rename(&self.err_path, &dest.err_path)?;
        }
        Ok(())
    }

    /// Remove any capture files that exist
    ///
    /// # Errors
    ///
    /// Returns error if a removal fails for a reason other than the file
    /// being absent
    pub fn discard(&self) -> io::Result<()> {
        remove_if_present(&self.out_path)?;
        remove_if_present(&self.err_path)?;
        Ok(())
    }
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn append(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(bytes)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_out_err(dir: &TempDir) -> OutErr {
        OutErr::new(dir.path().join("action.out"), dir.path().join("action.err"))
    }

    #[test]
    fn test_suffixed_naming() {
        let out_err = OutErr::new("/tmp/a/action.out", "/tmp/a/action.err");
        let scratch = out_err.suffixed(".remote");
        assert_eq!(scratch.out_path(), Path::new("/tmp/a/action.out.remote"));
        assert_eq!(scratch.err_path(), Path::new("/tmp/a/action.err.remote"));
    }

    #[test]
    fn test_lazy_creation() {
        let dir = TempDir::new().unwrap();
        let out_err = make_out_err(&dir);
        assert!(!out_err.has_output());

        out_err.write_out(b"hello").unwrap();
        assert!(out_err.has_output());
        assert!(!out_err.err_path().exists());
    }

    #[test]
    fn test_write_appends() {
        let dir = TempDir::new().unwrap();
        let out_err = make_out_err(&dir);

        out_err.write_err(b"one ").unwrap();
        out_err.write_err(b"two").unwrap();
        assert_eq!(fs::read(out_err.err_path()).unwrap(), b"one two");
    }

    #[test]
    fn test_move_into() {
        let dir = TempDir::new().unwrap();
        let dest = make_out_err(&dir);
        let scratch = dest.suffixed(".local");

        scratch.write_out(b"winner").unwrap();
        scratch.move_into(&dest).unwrap();

        assert_eq!(fs::read(dest.out_path()).unwrap(), b"winner");
        assert!(!scratch.has_output());
    }

    #[test]
    fn test_move_into_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let dest = make_out_err(&dir);
        let scratch = dest.suffixed(".remote");

        scratch.move_into(&dest).unwrap();
        assert!(!dest.has_output());
    }

    #[test]
    fn test_discard() {
        let dir = TempDir::new().unwrap();
        let out_err = make_out_err(&dir);

        out_err.write_out(b"scrap").unwrap();
        out_err.discard().unwrap();
        assert!(!out_err.has_output());

        // Discarding again is fine
        out_err.discard().unwrap();
    }
}

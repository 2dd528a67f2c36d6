//! Scratch directories for intermediate products.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Create a uniquely named working directory under the system temp dir.
pub fn create_scratch_dir() -> io::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("spectool-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Remove a scratch directory and everything in it.
pub fn remove_scratch_dir(path: &Path) -> io::Result<()> {
    std::fs::remove_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_destroy_directory() {
        let path = create_scratch_dir().unwrap();
        assert!(path.exists());
        remove_scratch_dir(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_directories_are_unique() {
        let a = create_scratch_dir().unwrap();
        let b = create_scratch_dir().unwrap();
        assert_ne!(a, b);
        remove_scratch_dir(&a).unwrap();
        remove_scratch_dir(&b).unwrap();
    }
}

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use eyre::Result;
use tracing::debug;

/// Write contents to a file on the disc, creating parent directories as needed
///
/// ```no_run
/// use jobscope_common::utils::io::file::write_file;
///
/// let path = "/tmp/test.txt";
/// let contents = "Hello, World!";
/// let result = write_file(path, contents);
/// ```
pub fn write_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();

    // Create the directory if it doesn't exist
    std::fs::create_dir_all(
        path.parent().ok_or_else(|| eyre::eyre!("unable to create directory"))?,
    )?;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    debug!("wrote {} bytes to '{}'", contents.len(), path.display());

    Ok(())
}

/// Read contents from a file on the disc
///
/// ```no_run
/// use jobscope_common::utils::io::file::read_file;
///
/// let path = "/tmp/test.txt";
/// let contents = read_file(path);
/// ```
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Read the raw bytes of a file on the disc, e.g. a dumped account snapshot
///
/// ```no_run
/// use jobscope_common::utils::io::file::read_bytes;
///
/// let bytes = read_bytes("/tmp/account.bin");
/// ```
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    debug!("read {} bytes from '{}'", contents.len(), path.as_ref().display());
    Ok(contents)
}

/// Delete a file or directory from the disc. Missing paths are not an error.
///
/// ```no_run
/// use jobscope_common::utils::io::file::delete_path;
///
/// let path = "/tmp/test.txt";
/// let result = delete_path(path);
/// ```
pub fn delete_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_successful() {
        let dir = tempfile::tempdir().expect("unable to create tempdir");
        let path = dir.path().join("nested/test.txt");
        let result = write_file(&path, "Hello, World!");
        assert!(result.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_read_file_successful() {
        let dir = tempfile::tempdir().expect("unable to create tempdir");
        let path = dir.path().join("test.txt");
        write_file(&path, "Hello, World!").expect("unable to write file");

        let result = read_file(&path).expect("unable to read file");
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_read_file_failure() {
        let result = read_file("/nonexistent/test2.txt");
        assert!(result.is_err());
    }

    #[test]
    fn test_read_bytes_successful() {
        let dir = tempfile::tempdir().expect("unable to create tempdir");
        let path = dir.path().join("account.bin");
        std::fs::write(&path, [0u8, 1, 2, 255]).expect("unable to write file");

        let result = read_bytes(&path).expect("unable to read file");
        assert_eq!(result, vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_delete_path_successful() {
        let dir = tempfile::tempdir().expect("unable to create tempdir");
        let path = dir.path().join("test_dir");
        std::fs::create_dir(&path).expect("unable to create directory");

        delete_path(&path).expect("unable to delete directory");
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_path_missing() {
        assert!(delete_path("/nonexistent/test_dir2").is_ok());
    }
}

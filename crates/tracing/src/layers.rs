use std::path::{Path, PathBuf};

use rolling_file::{RollingConditionBasic, RollingFileAppender};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

use crate::{
    build_env_filter,
    formatter::{LayerWriter, LogFormat},
};

/// A worker guard returned by the file layer. Logs are flushed when it is dropped.
pub type FileWorkerGuard = WorkerGuard;

pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Default size of a log file before it is rotated.
const DEFAULT_MAX_SIZE_BYTES: u64 = 200 * 1024 * 1024;

/// Default number of rotated log files kept on disk.
const DEFAULT_MAX_FILES: usize = 5;

/// Where and how to write the rolling log file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
    max_size_bytes: u64,
    max_files: usize,
}

impl FileInfo {
    /// Creates a file configuration writing `jobscope.log` into `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            file_name: "jobscope.log".to_string(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    /// Sets the size at which the log file is rotated.
    pub fn with_max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Sets how many rotated files are kept.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// The full path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn create_log_dir(&self) -> eyre::Result<&Path> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(&self.dir)
    }
}

/// The layers that make up the global subscriber.
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self { inner: vec![] }
    }

    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    pub(crate) fn journald(&mut self, filter: &str) -> eyre::Result<()> {
        let journald_filter = build_env_filter(None, filter)?;
        let layer = tracing_journald::layer()?.with_filter(journald_filter).boxed();
        self.inner.push(layer);
        Ok(())
    }

    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
        stderr: bool,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        let writer = if stderr { LayerWriter::Stderr } else { LayerWriter::Stdout };
        let layer = format.apply(filter, color, writer);
        self.inner.push(layer);
        Ok(())
    }

    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filter: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        file_info.create_log_dir()?;
        let appender = RollingFileAppender::new(
            file_info.path(),
            RollingConditionBasic::new().max_size(file_info.max_size_bytes),
            file_info.max_files,
        )?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let file_filter = build_env_filter(None, filter)?;
        let layer = format.apply(file_filter, None, LayerWriter::File(writer));
        self.inner.push(layer);
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_path() {
        let info = FileInfo::new(PathBuf::from("/var/log/jobscope")).with_max_files(2);
        assert_eq!(info.path(), PathBuf::from("/var/log/jobscope/jobscope.log"));
        assert_eq!(info.max_files, 2);
    }

    #[test]
    fn test_console_layer_on_stderr() {
        let mut layers = Layers::new();
        for format in [LogFormat::Json, LogFormat::LogFmt, LogFormat::Terminal] {
            layers
                .stdout(format, "info".parse().expect("valid directive"), "", None, true)
                .expect("stderr layer");
        }
        assert_eq!(layers.into_inner().len(), 3);
    }

    #[test]
    fn test_file_layer_creates_directory() {
        let dir = tempfile::tempdir().expect("unable to create tempdir");
        let info = FileInfo::new(dir.path().join("logs")).with_max_size_bytes(1024);

        let mut layers = Layers::new();
        let _guard = layers.file(LogFormat::Json, "debug", info).expect("file layer");
        assert!(dir.path().join("logs").is_dir());
        assert_eq!(layers.into_inner().len(), 1);
    }
}

//! Tracing setup for jobscope.
//!
//! Layers are assembled with [`JobscopeTracer`]: stdout is always present, journald and a
//! size-rotated log file are optional. Each layer has its own [`LogFormat`] and filter.
// Mostly taken from [reth](https://github.com/paradigmxyz/reth)

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

mod formatter;
mod layers;

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

use layers::Layers;
use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Tracer for application logging.
#[derive(Debug, Clone)]
pub struct JobscopeTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl JobscopeTracer {
    /// Creates a tracer that logs warnings and errors to stdout in the terminal format.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), journald: None, file: None }
    }

    /// Sets the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Enables the journald layer with the given filter.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Enables the rolling file layer.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for JobscopeTracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of a single logging layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
    stderr: bool,
}

impl LayerInfo {
    /// Creates a new layer configuration.
    ///
    /// `default_directive` applies when `filters` doesn't match a target, e.g. `warn`.
    /// `filters` uses the `RUST_LOG` syntax. `color` is `always`, `auto` or `never`; `None`
    /// disables ANSI codes.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color, stderr: false }
    }

    /// Writes the console layer to stderr instead of stdout, leaving stdout to command output.
    /// Ignored by the file layer.
    pub fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: "warn".to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
            stderr: false,
        }
    }
}

/// Installs a global subscriber.
pub trait Tracer {
    /// Initializes the global subscriber. The returned guard must be kept alive for file logs
    /// to be flushed.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for JobscopeTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
            self.stdout.stderr,
        )?;

        if let Some(filter) = self.journald {
            layers.journald(&filter)?;
        }

        let file_guard = match self.file {
            Some((config, file_info)) => Some(layers.file(config.format, &config.filters, file_info)?),
            None => None,
        };

        // the global subscriber can only be set once, e.g. tests may have set one already
        let _ = tracing_subscriber::registry().with(layers.into_inner()).try_init();
        Ok(file_guard)
    }
}

/// Builds an [`EnvFilter`] from a default directive and a comma separated list of directives.
pub(crate) fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = if let Some(default_directive) = default_directive {
        EnvFilter::builder().with_default_directive(default_directive).from_env_lossy()
    } else {
        EnvFilter::builder().from_env_lossy()
    };

    directives
        .split(',')
        .filter(|directive| !directive.is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter() {
        let filter = build_env_filter(Some("warn".parse().unwrap()), "jobscope_decoder=trace,")
            .expect("valid directives");
        assert!(filter.to_string().contains("jobscope_decoder=trace"));
    }

    #[test]
    fn test_build_env_filter_invalid() {
        assert!(build_env_filter(None, "jobscope=loud").is_err());
    }

    #[test]
    fn test_tracer_builder() {
        let tracer = JobscopeTracer::new().with_journald("error".to_string());
        assert_eq!(tracer.journald.as_deref(), Some("error"));
        assert!(tracer.file.is_none());
        assert!(!tracer.stdout.stderr);

        let tracer = tracer.with_stdout(LayerInfo::default().with_stderr(true));
        assert!(tracer.stdout.stderr);
    }
}

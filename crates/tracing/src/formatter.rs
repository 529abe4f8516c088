use std::{
    fmt::{self, Display},
    str::FromStr,
};

use clap::ValueEnum;
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{
    fmt::{FormatEvent, FormatFields},
    EnvFilter, Layer, Registry,
};

use crate::layers::BoxedLayer;

/// The output format of a log layer.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// `key=value` pairs, suited to log aggregators.
    LogFmt,
    /// Human readable output.
    Terminal,
}

/// Where a layer writes its events.
pub(crate) enum LayerWriter {
    Stdout,
    Stderr,
    File(NonBlocking),
}

fn finish<N, E>(
    layer: tracing_subscriber::fmt::Layer<Registry, N, E>,
    writer: LayerWriter,
    filter: EnvFilter,
) -> BoxedLayer<Registry>
where
    N: for<'w> FormatFields<'w> + Send + Sync + 'static,
    E: FormatEvent<Registry, N> + Send + Sync + 'static,
{
    match writer {
        LayerWriter::Stdout => layer.with_filter(filter).boxed(),
        LayerWriter::Stderr => layer.with_writer(std::io::stderr).with_filter(filter).boxed(),
        LayerWriter::File(file) => layer.with_writer(file).with_filter(filter).boxed(),
    }
}

impl LogFormat {
    /// Builds a layer in this format writing to `writer`.
    pub(crate) fn apply(
        &self,
        filter: EnvFilter,
        color: Option<String>,
        writer: LayerWriter,
    ) -> BoxedLayer<Registry> {
        let ansi = match color.as_deref() {
            Some("never") | None => false,
            Some("auto") => std::env::var_os("NO_COLOR").is_none(),
            Some(_) => true,
        };
        let target = std::env::var("RUST_LOG_TARGET").map(|val| val != "0").unwrap_or(false);

        match self {
            LogFormat::Json => finish(
                tracing_subscriber::fmt::layer().json().with_ansi(ansi).with_target(target),
                writer,
                filter,
            ),
            LogFormat::LogFmt => finish(tracing_logfmt::builder().layer(), writer, filter),
            LogFormat::Terminal => finish(
                tracing_subscriber::fmt::layer().with_ansi(ansi).with_target(target),
                writer,
                filter,
            ),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::LogFmt => write!(f, "log-fmt"),
            LogFormat::Terminal => write!(f, "terminal"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "log-fmt" | "logfmt" => Ok(LogFormat::LogFmt),
            "terminal" => Ok(LogFormat::Terminal),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_roundtrip() {
        for format in [LogFormat::Json, LogFormat::LogFmt, LogFormat::Terminal] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
        assert!("xml".parse::<LogFormat>().is_err());
    }
}

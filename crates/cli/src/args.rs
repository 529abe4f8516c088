use clap::{Args, Parser, Subcommand};

use jobscope_config::{ConfigArgs, Configuration};
use jobscope_decoder::DecodeArgs;

use crate::log_args::LogArgs;

#[derive(Debug, Parser)]
#[clap(name = "jobscope", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    pub(crate) logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(about = "jobscope decodes JobRequest account snapshots into readable fields.")]
pub(crate) enum Subcommands {
    #[clap(name = "decode", about = "Decode JobRequest account data")]
    Decode(DecodeArgs),

    #[clap(name = "layout", about = "Print the byte layout of the JobRequest account")]
    Layout(LayoutArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

impl Subcommands {
    /// Whether the command prints JSON to stdout, falling back to `configuration` for the
    /// decode output.
    pub(crate) fn writes_json(&self, configuration: &Configuration) -> bool {
        match self {
            Subcommands::Decode(cmd) => {
                cmd.output.as_deref().unwrap_or(&configuration.output) == "json"
            }
            Subcommands::Layout(cmd) => cmd.json,
            Subcommands::Config(_) => false,
        }
    }
}

/// Arguments for the layout command.
#[derive(Debug, Clone, Args)]
pub(crate) struct LayoutArgs {
    /// The number of verifiers assigned per job. Falls back to the configuration when unset.
    #[clap(long = "verifiers", value_name = "COUNT")]
    pub(crate) verifiers: Option<usize>,

    /// Print the offset table as JSON.
    #[clap(long)]
    pub(crate) json: bool,
}

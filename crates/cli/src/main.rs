pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use args::{Arguments, LayoutArgs, Subcommands};
use clap::Parser;
use colored::Colorize;
use error::Error;
use output::{write_json, OutputTarget};
use tracing::debug;

use jobscope_config::{config, Configuration};
use jobscope_decoder::{decode, layouts::job_request_shape};

fn layout(args: LayoutArgs, verifiers: usize) -> Result<(), Error> {
    let shape = job_request_shape(verifiers).map_err(jobscope_decoder::Error::from)?;
    let table = shape.offset_table();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let width = table.iter().map(|entry| entry.path.len()).max().unwrap_or_default();
    println!("{} ({} bytes)", shape.name().bold(), shape.size());
    for entry in table {
        println!(
            "{:>6} {:>4}  {:<width$}  {}",
            entry.offset,
            entry.len,
            entry.path,
            entry.tag.dimmed(),
        );
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;

    // setup logging, the guard flushes file logs on drop
    let _guard = args
        .logs
        .init_tracing(args.sub.writes_json(&configuration))
        .map_err(|e| Error::Generic(format!("failed to initialize logging: {}", e)))?;
    debug!("loaded configuration: {:?}", configuration);

    match args.sub {
        Subcommands::Decode(mut cmd) => {
            // if the user has not specified a verifier count, use the configured one
            if cmd.verifiers.is_none() {
                cmd.verifiers = Some(configuration.verifiers_per_auction);
            }

            let output = cmd.output.take().unwrap_or(configuration.output);
            let result = decode(cmd)?;

            match OutputTarget::parse(&output) {
                OutputTarget::Print => result.display(),
                OutputTarget::Json => println!("{}", result.to_json()?),
                OutputTarget::File(path) => write_json(&path, &result.to_json()?)?,
            }
        }

        Subcommands::Layout(cmd) => {
            let verifiers = cmd.verifiers.unwrap_or(configuration.verifiers_per_auction);
            layout(cmd, verifiers)?;
        }

        Subcommands::Config(cmd) => {
            config(cmd)?;
        }
    }

    Ok(())
}

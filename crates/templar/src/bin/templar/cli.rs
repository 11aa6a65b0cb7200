//! templar cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times, each one relative to the previous.
    /// Relative template, input and output paths are resolved against the result.
    ///
    /// This is equivalent to running { cd <directory>; templar ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    /// Log what is loaded and written (overridden by TEMPLAR_LOG)
    #[clap(short = 'v', long, global(true))]
    pub verbose: bool,

    /// Log everything including variable overrides (overridden by TEMPLAR_LOG)
    #[clap(long, global(true))]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template
    ///
    /// Reads the template (or the batch manifest) from stdin unless a path is given
    /// and writes to stdout unless an output path is given.
    Build(BuildCommand),
}

#[derive(Parser, Debug)]
pub struct BuildCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(flatten)]
    pub dump: DumpArgs,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Variables file, or batch manifest with --format batch/jsonl
    #[clap(short = 'i', long = "input", default_value = "")]
    pub input: String,

    #[arg(short = 'f', long = "format", default_value_t)]
    pub format: InputFormat,

    /// Template file
    #[clap(short = 't', long = "template", default_value = "")]
    pub template: String,

    /// Do not read variables from the environment
    #[clap(long)]
    pub clear: bool,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    /// Output file
    #[clap(short = 'o', long = "output", default_value = "")]
    pub output: String,

    /// Keep output files that already exist
    #[clap(long)]
    pub skip: bool,
}

#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Print variables instead of rendering
    ///
    /// Shows names only, --verbose adds value types, --debug shows values.
    #[arg(long, num_args = 0..=1, default_missing_value = "text")]
    pub dump: Option<DumpFormat>,

    /// Single line json dump
    #[clap(long, requires("dump"))]
    pub compact: bool,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum InputFormat {
    /// KEY=VALUE lines
    #[default]
    Env,
    /// json object
    Json,
    /// json batch manifest
    Batch,
    /// one batch item per line
    Jsonl,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Env => f.write_str("env"),
            InputFormat::Json => f.write_str("json"),
            InputFormat::Batch => f.write_str("batch"),
            InputFormat::Jsonl => f.write_str("jsonl"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum DumpFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DumpFormat::Text => f.write_str("text"),
            DumpFormat::Json => f.write_str("json"),
            DumpFormat::Yaml => f.write_str("yaml"),
        }
    }
}

mod cli;

use std::path::PathBuf;
use templar::dump::{Detail, DumpOptions};
use templar::pipeline::{Job, ManifestEncoding, Pipeline, Settings};
use templar::provider::{EnvPolicy, Format};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    let default_directive = if cli.debug {
        "templar=trace"
    } else if cli.verbose {
        "templar=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TEMPLAR_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let workdir = match workdir(&cli.directory) {
        Ok(workdir) => workdir,
        Err(e) => {
            for error in e.chain() {
                eprintln!("{error}")
            }
            std::process::exit(1);
        }
    };

    let command_result = match cli.command {
        cli::Command::Build(ref build_cli) => build(&cli, build_cli, workdir),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

/// Apply every -C/--directory in order, like successive `cd`s
fn workdir(directories: &[PathBuf]) -> anyhow::Result<PathBuf> {
    let mut workdir = std::env::current_dir()?;

    for new_path in directories {
        let candidate = workdir.join(new_path);
        workdir = candidate.canonicalize().map_err(|e| {
            anyhow::Error::new(e).context(format!(
                "Failed to resolve path for -C/--directory {}",
                new_path.display()
            ))
        })?;
        tracing::info!(directory=%workdir.display(), "Changed working directory");
    }

    Ok(workdir)
}

pub fn build(cli: &cli::Cli, build: &cli::BuildCommand, workdir: PathBuf) -> anyhow::Result<()> {
    let settings = Settings {
        workdir,
        policy: if build.input.clear {
            EnvPolicy::Clear
        } else {
            EnvPolicy::Layered
        },
        dump: build.dump.dump.map(|format| DumpOptions {
            format: match format {
                cli::DumpFormat::Text => templar::dump::DumpFormat::Text,
                cli::DumpFormat::Json => templar::dump::DumpFormat::Json,
                cli::DumpFormat::Yaml => templar::dump::DumpFormat::Yaml,
            },
            detail: detail(cli),
            compact: build.dump.compact,
        }),
        skip_existing: build.output.skip,
    };
    tracing::debug!(?settings, "build settings");

    let mut stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    let mut pipeline = Pipeline::new(settings, &mut stdin, &mut stdout);

    let format = match build.input.format {
        cli::InputFormat::Env => Format::Env,
        cli::InputFormat::Json => Format::Json,
        cli::InputFormat::Batch => {
            return batch(&mut pipeline, &build.input.input, ManifestEncoding::Document)
        }
        cli::InputFormat::Jsonl => {
            return batch(&mut pipeline, &build.input.input, ManifestEncoding::Lines)
        }
    };

    pipeline.run(&Job {
        template: build.input.template.clone(),
        input: build.input.input.clone(),
        format,
        output: build.output.output.clone(),
    })?;

    Ok(())
}

fn batch(
    pipeline: &mut Pipeline<'_>,
    manifest: &str,
    encoding: ManifestEncoding,
) -> anyhow::Result<()> {
    let manifest = pipeline.read_manifest(manifest, encoding)?;
    pipeline.run_batch(&manifest)?;
    Ok(())
}

fn detail(cli: &cli::Cli) -> Detail {
    if cli.debug {
        Detail::Debug
    } else if cli.verbose {
        Detail::Verbose
    } else {
        Detail::Basic
    }
}

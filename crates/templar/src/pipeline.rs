//! render pipeline
//!
//! Ties the components together for a single job or a whole batch:
//!
//! 1. resolve variables (literal batch variables or the provider [Chain])
//! 2. when a dump was requested: write the variables and stop
//! 3. read the template
//! 4. open the target and render
//!
//! Batch items run one after another in manifest order. The first failing item aborts the batch,
//! outputs written by earlier items are left in place.
use crate::batch::{EffectiveItem, Manifest, ManifestError, VariableSource};
use crate::build::{BuildError, TemplateBuilder};
use crate::dump::{dump, DumpError, DumpOptions};
use crate::provider::{Chain, EnvPolicy, Format, RawInputs, ResolveError};
use crate::stream::{open_output, read_source, resolve_path, TemplateInput};
use crate::value::Variables;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything the pipeline needs to know besides the job itself
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// base for relative paths
    pub workdir: PathBuf,
    pub policy: EnvPolicy,
    /// dump variables instead of rendering
    pub dump: Option<DumpOptions>,
    /// leave existing target files untouched
    pub skip_existing: bool,
}

/// A single render. Empty references select the caller's streams.
#[derive(Debug, Clone, Default)]
pub struct Job {
    pub template: String,
    pub input: String,
    pub format: Format,
    pub output: String,
}

/// How a batch manifest is encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestEncoding {
    /// one json document with `items` and `defaults`
    #[default]
    Document,
    /// one item per line, no defaults
    Lines,
}

pub struct Pipeline<'io> {
    settings: Settings,
    input: &'io mut dyn TemplateInput,
    output: &'io mut dyn Write,
}

impl<'io> Pipeline<'io> {
    /// `input` is read for templates (or manifests) without a path, `output` receives everything
    /// without a target path. Neither is closed.
    pub fn new(
        settings: Settings,
        input: &'io mut dyn TemplateInput,
        output: &'io mut dyn Write,
    ) -> Self {
        Self {
            settings,
            input,
            output,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run(&mut self, job: &Job) -> Result<(), Error> {
        let variables = self.resolve_variables(&job.input, job.format)?;
        self.finish(&job.template, &job.output, &variables)
    }

    /// Read a manifest from a file, or from the input stream when `reference` is empty
    pub fn read_manifest(
        &mut self,
        reference: &str,
        encoding: ManifestEncoding,
    ) -> Result<Manifest, Error> {
        let text = read_source(&self.settings.workdir, reference, &mut *self.input)
            .map_err(|source| self.io_error(reference, "<stdin>", source))?;

        let manifest = match encoding {
            ManifestEncoding::Document => Manifest::from_json(&text)?,
            ManifestEncoding::Lines => Manifest::from_json_lines(&text)?,
        };
        Ok(manifest)
    }

    pub fn run_batch(&mut self, manifest: &Manifest) -> Result<(), Error> {
        for (index, item) in manifest.effective_items().enumerate() {
            let number = index + 1;
            tracing::info!(item = number, info = %item.info, "processing batch item");

            self.run_item(&item).map_err(|source| Error::Item {
                number,
                info: item.info.clone(),
                source: Box::new(source),
            })?;
        }
        Ok(())
    }

    fn run_item(&mut self, item: &EffectiveItem) -> Result<(), Error> {
        let variables = match &item.variables {
            VariableSource::Literal(variables) => variables.clone(),
            VariableSource::Input { path, format } => self.resolve_variables(path, *format)?,
        };
        self.finish(&item.template, &item.output, &variables)
    }

    /// Resolve variables from an optional input file according to the environment policy
    ///
    /// An empty input file counts as "no input", a missing one is an error. Without input and
    /// without the environment there is nothing to resolve and the result is empty.
    pub fn resolve_variables(&self, input: &str, format: Format) -> Result<Variables, Error> {
        let contents = if input.is_empty() {
            String::new()
        } else {
            let path = resolve_path(&self.settings.workdir, input);
            tracing::info!(path = %path.display(), %format, "reading variables");
            std::fs::read_to_string(&path).map_err(|source| Error::Io { path, source })?
        };

        let chain = Chain::for_input(format, !contents.is_empty(), self.settings.policy);
        if chain.is_empty() {
            tracing::debug!("no variable sources");
            return Ok(Variables::new());
        }

        let raws = RawInputs::from([(format.provider().kind(), contents)]);
        Ok(chain.resolve(&raws)?)
    }

    fn finish(&mut self, template: &str, output: &str, variables: &Variables) -> Result<(), Error> {
        let workdir = self.settings.workdir.as_path();

        if let Some(options) = self.settings.dump {
            let text = dump(variables, options)?;
            return self
                .output
                .write_all(text.as_bytes())
                .and_then(|_| self.output.flush())
                .map_err(|source| Error::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                });
        }

        if self.settings.skip_existing && !output.is_empty() {
            let path = resolve_path(workdir, output);
            if path.exists() {
                tracing::info!(path = %path.display(), "target exists, skipping");
                return Ok(());
            }
        }

        let source = read_source(workdir, template, &mut *self.input).map_err(|source| {
            Error::Io {
                path: display_path(workdir, template, "<stdin>"),
                source,
            }
        })?;

        if source.is_empty() {
            return Err(Error::NoTemplateContent {
                template: display_path(workdir, template, "<stdin>"),
            });
        }

        let mut target = open_output(workdir, output, &mut *self.output).map_err(|source| {
            Error::Io {
                path: display_path(workdir, output, "<stdout>"),
                source,
            }
        })?;

        TemplateBuilder::new(template, &source, variables).build(&mut target)?;

        if let Some(path) = target.path() {
            tracing::info!(path = %path.display(), "rendered");
        }
        Ok(())
    }

    fn io_error(&self, reference: &str, stream: &str, source: std::io::Error) -> Error {
        Error::Io {
            path: display_path(&self.settings.workdir, reference, stream),
            source,
        }
    }
}

fn display_path(workdir: &Path, reference: &str, stream: &str) -> PathBuf {
    if reference.is_empty() {
        PathBuf::from(stream)
    } else {
        resolve_path(workdir, reference)
    }
}

fn item_message(number: &usize, info: &str) -> String {
    if info.is_empty() {
        format!("batch item {number} failed")
    } else {
        format!("batch item {number} ({info}) failed")
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to resolve variables")]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Dump(#[from] DumpError),
    #[error("no template content found in {}", .template.display())]
    NoTemplateContent { template: PathBuf },
    #[error("unable to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}", item_message(.number, .info))]
    Item {
        number: usize,
        info: String,
        #[source]
        source: Box<Error>,
    },
}

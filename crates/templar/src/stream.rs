//! input and output selection
//!
//! An empty reference means "use the caller's stream" (e.g. stdin / stdout), anything else is a
//! file path relative to the working directory unless absolute.
//!
//! Caller streams are only borrowed: they are flushed but never closed. Files opened here are closed
//! when the returned [Output] is dropped.
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Readable stream that knows whether it is attached to an interactive terminal
pub trait TemplateInput: Read {
    fn is_interactive(&self) -> bool {
        false
    }
}

impl TemplateInput for std::io::Stdin {
    fn is_interactive(&self) -> bool {
        use std::io::IsTerminal;
        self.is_terminal()
    }
}

impl TemplateInput for &[u8] {}

impl<T: AsRef<[u8]>> TemplateInput for std::io::Cursor<T> {}

impl TemplateInput for std::io::Empty {}

impl TemplateInput for File {}

/// Absolute paths are kept, relative paths are joined onto `workdir`
pub fn resolve_path(workdir: &Path, reference: &str) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    }
}

/// Read a file by reference, or everything from `input` when the reference is empty
///
/// An interactive terminal with nothing piped yields empty content instead of waiting for input.
pub fn read_source(
    workdir: &Path,
    reference: &str,
    input: &mut dyn TemplateInput,
) -> std::io::Result<String> {
    if reference.is_empty() {
        if input.is_interactive() {
            tracing::debug!("input is a terminal, not reading");
            return Ok(String::new());
        }
        return std::io::read_to_string(input);
    }

    let path = resolve_path(workdir, reference);
    tracing::info!(path = %path.display(), "reading file");
    std::fs::read_to_string(path)
}

/// Render target
pub enum Output<'w> {
    /// borrowed caller stream
    Shared(&'w mut dyn Write),
    /// file created (or truncated) by [open_output]
    File { path: PathBuf, file: BufWriter<File> },
}

impl<'w> Output<'w> {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Output::Shared(_) => None,
            Output::File { path, .. } => Some(path),
        }
    }
}

impl std::fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Shared(_) => f.write_str("Output::Shared"),
            Output::File { path, .. } => write!(f, "Output::File({})", path.display()),
        }
    }
}

impl Write for Output<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Output::Shared(writer) => writer.write(buf),
            Output::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Output::Shared(writer) => writer.flush(),
            Output::File { file, .. } => file.flush(),
        }
    }
}

/// Select the render target for a reference
pub fn open_output<'w>(
    workdir: &Path,
    reference: &str,
    shared: &'w mut dyn Write,
) -> std::io::Result<Output<'w>> {
    if reference.is_empty() {
        return Ok(Output::Shared(shared));
    }

    let path = resolve_path(workdir, reference);
    tracing::info!(path = %path.display(), "writing file");
    let file = File::create(&path)?;

    Ok(Output::File {
        path,
        file: BufWriter::new(file),
    })
}

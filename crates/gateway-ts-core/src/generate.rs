//! Orchestration: registry → analysis → selection → rendering.
//!
//! Rendering is a capability ([`Renderer`]) and the "does the fetch module
//! already exist" check is another ([`OutputProbe`]); both are injected so the
//! pipeline can run against stubs.

use std::io;
use std::path::PathBuf;

use serde::Serialize;

use crate::analyse::analyse_files;
use crate::error::{GenerateError, RenderError, Result};
use crate::ir::FileIr;
use crate::model::ProtoFile;
use crate::options::GeneratorOptions;
use crate::registry::Registry;
use crate::select::select;

/// Content emitted for files with nothing to generate.
pub const EMPTY_MODULE: &str = "export default {}";

pub trait Renderer {
    fn render_file(&self, file: &FileIr) -> Result<String, RenderError>;

    /// The shared fetch helper. Independent of any file.
    fn render_fetch_module(&self, enable_styling_check: bool) -> Result<String, RenderError>;
}

pub trait OutputProbe {
    /// Current content at `path`, or `None` if nothing is there.
    fn read_existing(&self, path: &str) -> io::Result<Option<Vec<u8>>>;
}

impl<T: Renderer + ?Sized> Renderer for &T {
    fn render_file(&self, file: &FileIr) -> Result<String, RenderError> {
        (**self).render_file(file)
    }

    fn render_fetch_module(&self, enable_styling_check: bool) -> Result<String, RenderError> {
        (**self).render_fetch_module(enable_styling_check)
    }
}

impl<T: OutputProbe + ?Sized> OutputProbe for &T {
    fn read_existing(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        (**self).read_existing(path)
    }
}

/// Reads from the filesystem, relative to `root` (or the working directory).
#[derive(Debug, Clone, Default)]
pub struct FsProbe {
    root: Option<PathBuf>,
}

impl FsProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl OutputProbe for FsProbe {
    fn read_existing(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        let full = match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        };
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Decoded protoc request.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Every file protoc loaded, dependencies first.
    pub files: Vec<ProtoFile>,
    pub file_to_generate: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Build the registry over all files and analyse each of them.
pub fn analyse_request(
    request: &GenerationRequest,
    options: &GeneratorOptions,
) -> Result<Vec<FileIr>> {
    let registry = Registry::build(&request.files)?;
    analyse_files(&request.files, &registry, options)
}

pub struct Generator<R, P> {
    options: GeneratorOptions,
    renderer: R,
    probe: P,
}

impl<R: Renderer, P: OutputProbe> Generator<R, P> {
    pub fn new(options: GeneratorOptions, renderer: R, probe: P) -> Self {
        Self {
            options,
            renderer,
            probe,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        let files = analyse_request(request, &self.options)?;
        tracing::debug!(files = ?request.file_to_generate, "files to generate");

        let selection = select(&files, &request.file_to_generate)?;
        for file in &files {
            if !selection.files.iter().any(|f| f.name == file.name) {
                tracing::debug!(file = %file.name, "not a file to generate, skipping");
            }
        }

        let mut generated = Vec::with_capacity(selection.files.len() + 1);
        for file in &selection.files {
            tracing::debug!(file = %file.name, output = %file.ts_file_name, "generating file");
            generated.push(self.generate_file(file)?);
        }

        if selection.needs_fetch_helper {
            if let Some(fetch) = self.generate_fetch_module()? {
                generated.push(fetch);
            }
        }
        Ok(generated)
    }

    fn generate_file(&self, file: &FileIr) -> Result<GeneratedFile> {
        let content = if file.is_empty() {
            EMPTY_MODULE.to_string()
        } else {
            let rendered =
                self.renderer
                    .render_file(file)
                    .map_err(|source| GenerateError::Render {
                        file: file.name.clone(),
                        source,
                    })?;
            rendered.trim().to_string()
        };
        Ok(GeneratedFile {
            name: file.ts_file_name.clone(),
            content,
        })
    }

    /// `None` when the file on disk already has exactly this content.
    fn generate_fetch_module(&self) -> Result<Option<GeneratedFile>> {
        let path = self.options.fetch_module_path();
        let content = self
            .renderer
            .render_fetch_module(self.options.enable_styling_check)
            .map_err(|source| GenerateError::RenderFetchModule {
                path: path.clone(),
                source,
            })?
            .trim()
            .to_string();

        let existing = self
            .probe
            .read_existing(&path)
            .map_err(|source| GenerateError::HelperWriteProbe {
                path: path.clone(),
                source,
            })?;
        if existing.as_deref() == Some(content.as_bytes()) {
            tracing::debug!(path = %path, "fetch module is up to date, skipping");
            return Ok(None);
        }

        tracing::debug!(path = %path, "generating fetch module");
        Ok(Some(GeneratedFile {
            name: path,
            content,
        }))
    }
}

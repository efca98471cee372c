//! TypeScript output for `protoc-gen-gateway-ts`.
//!
//! [`TypeScriptRenderer`] is the production [`Renderer`]: it turns a resolved
//! [`FileIr`] into one `.pb.ts` module (enums, message types, one client
//! class per service) and writes the shared fetch module those classes call
//! into. Nothing is looked up here; every identifier and import specifier
//! comes from the IR.

mod client;
mod fetch;
mod file;
mod types;

use gateway_ts_core::{FileIr, RenderError, Renderer};

pub use fetch::FETCH_MODULE_BODY;

/// Comment emitted at the top of every generated module.
pub const GENERATED_HEADER: &str =
    "/*\n* This file is a generated Typescript file for GRPC Gateway, DO NOT MODIFY\n*/";

/// Lines that silence type checking and linting when styling checks are off.
pub const LINT_SUPPRESSION: &str = "/* eslint-disable */\n// @ts-nocheck";

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptRenderer;

impl TypeScriptRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TypeScriptRenderer {
    fn render_file(&self, file: &FileIr) -> Result<String, RenderError> {
        let out = file::render(file)?;
        tracing::trace!(file = %file.name, bytes = out.len(), "rendered typescript module");
        Ok(out)
    }

    fn render_fetch_module(&self, enable_styling_check: bool) -> Result<String, RenderError> {
        fetch::render(enable_styling_check)
    }
}

/// Preamble shared by generated modules and the fetch module.
fn write_preamble(out: &mut String, enable_styling_check: bool) -> std::fmt::Result {
    use std::fmt::Write;

    writeln!(out, "{GENERATED_HEADER}")?;
    if !enable_styling_check {
        writeln!(out, "{LINT_SUPPRESSION}")?;
    }
    writeln!(out)
}

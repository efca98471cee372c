//! Analysis core of `protoc-gen-gateway-ts`.
//!
//! Pipeline (one protoc invocation):
//!
//! 1. [`registry::Registry::build`] indexes every message/enum of every file in
//!    the request under its fully-qualified proto name.
//! 2. [`analyse::analyse_file`] turns each file into an [`ir::FileIr`],
//!    resolving every reference through the registry.
//! 3. [`select::select`] keeps the files protoc asked for and decides whether
//!    the shared fetch module is needed.
//! 4. [`generate::Generator`] renders the selected files through an injected
//!    [`generate::Renderer`] and applies write-avoidance to the fetch module.
//!
//! The registry is complete before the first lookup and never changes after,
//! so resolution does not depend on the order files are visited in.

pub mod analyse;
pub mod error;
pub mod generate;
pub mod ir;
pub mod model;
pub mod naming;
pub mod options;
pub mod registry;
pub mod select;
pub mod well_known;

pub use error::{GenerateError, RenderError, Result, UnknownType};
pub use generate::{
    analyse_request, FsProbe, GeneratedFile, GenerationRequest, Generator, OutputProbe, Renderer,
    EMPTY_MODULE,
};
pub use ir::{FileIr, TypeRef};
pub use options::GeneratorOptions;
pub use registry::Registry;

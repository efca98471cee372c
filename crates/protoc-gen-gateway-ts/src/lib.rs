//! `protoc-gen-gateway-ts`: protoc plugin that emits TypeScript clients for
//! services exposed through grpc-gateway.
//!
//! protoc writes a `CodeGeneratorRequest` to stdin and reads a
//! `CodeGeneratorResponse` from stdout. [`plugin::PluginRequest::decode`]
//! handles the first half (including the `google.api.http` method option,
//! see [`wire`]), [`plugin::generate`] the second.

pub mod convert;
pub mod plugin;
pub mod wire;

pub use plugin::{dump_ir, encode_response, generate, PluginRequest, FEATURE_PROTO3_OPTIONAL};

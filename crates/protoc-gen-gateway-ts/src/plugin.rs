//! One protoc invocation: request bytes in, response out.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use gateway_ts_core::options::{parse_parameter, DEFAULT_LOG_LEVEL, LOG_LEVEL};
use gateway_ts_core::select::select;
use gateway_ts_core::{
    analyse_request, GeneratedFile, GenerationRequest, Generator, GeneratorOptions, OutputProbe,
    Renderer,
};
use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};

use crate::convert::generation_request;
use crate::wire::RawCodeGeneratorRequest;

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`
pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// A decoded request plus its parsed plugin parameters.
#[derive(Debug, Clone)]
pub struct PluginRequest {
    pub request: GenerationRequest,
    pub params: BTreeMap<String, String>,
}

impl PluginRequest {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = RawCodeGeneratorRequest::decode(bytes)
            .context("failed to decode CodeGeneratorRequest")?;
        let params = parse_parameter(raw.parameter.as_deref().unwrap_or_default());
        let request = generation_request(&raw).context("failed to convert proto descriptors")?;
        tracing::debug!(
            files = request.files.len(),
            to_generate = request.file_to_generate.len(),
            "decoded plugin request"
        );
        Ok(Self { request, params })
    }

    /// The `loglevel` parameter, read before options are built so the
    /// subscriber is up when unknown options get reported.
    pub fn log_level(&self) -> &str {
        self.params
            .get(LOG_LEVEL)
            .map(|level| level.trim())
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions::from_params(&self.params)
    }
}

/// Run the generator. Generation failures are reported in the response's
/// `error` field, which is how protoc expects plugins to fail.
pub fn generate<R: Renderer, P: OutputProbe>(
    request: &PluginRequest,
    renderer: R,
    probe: P,
) -> CodeGeneratorResponse {
    let generator = Generator::new(request.options(), renderer, probe);
    match generator.generate(&request.request) {
        Ok(files) => success(files),
        Err(err) => {
            let message = format!("{:#}", anyhow::Error::new(err));
            tracing::error!(error = %message, "generation failed");
            CodeGeneratorResponse {
                error: Some(message),
                supported_features: Some(FEATURE_PROTO3_OPTIONAL),
                ..Default::default()
            }
        }
    }
}

fn success(files: Vec<GeneratedFile>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        file: files
            .into_iter()
            .map(|f| code_generator_response::File {
                name: Some(f.name),
                insertion_point: None,
                content: Some(f.content),
                generated_code_info: None,
            })
            .collect(),
        supported_features: Some(FEATURE_PROTO3_OPTIONAL),
        ..Default::default()
    }
}

pub fn encode_response(response: &CodeGeneratorResponse) -> Vec<u8> {
    response.encode_to_vec()
}

/// Pretty JSON of the File IRs protoc asked for.
pub fn dump_ir(request: &PluginRequest) -> Result<String> {
    let options = request.options();
    let files = analyse_request(&request.request, &options)?;
    let selection = select(&files, &request.request.file_to_generate)?;
    serde_json::to_string_pretty(&selection.files).context("failed to serialize file IR")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::RawFileDescriptor;
    use gateway_ts_core::{FileIr, RenderError};
    use std::io;

    struct Fixed;

    impl Renderer for Fixed {
        fn render_file(&self, file: &FileIr) -> Result<String, RenderError> {
            Ok(format!("// {}", file.name))
        }

        fn render_fetch_module(&self, _enable_styling_check: bool) -> Result<String, RenderError> {
            Ok("// fetch".to_string())
        }
    }

    struct Empty;

    impl OutputProbe for Empty {
        fn read_existing(&self, _path: &str) -> io::Result<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    fn encoded(parameter: Option<&str>, files: &[&str], to_generate: &[&str]) -> Vec<u8> {
        RawCodeGeneratorRequest {
            file_to_generate: to_generate.iter().map(|s| s.to_string()).collect(),
            parameter: parameter.map(str::to_string),
            proto_file: files
                .iter()
                .map(|name| RawFileDescriptor {
                    name: Some(name.to_string()),
                    package: Some("pkg".to_string()),
                    ..Default::default()
                })
                .collect(),
        }
        .encode_to_vec()
    }

    #[test]
    fn parameters_are_parsed_and_log_level_defaults() -> Result<()> {
        let request = PluginRequest::decode(&encoded(
            Some("enable_styling_check=true,loglevel=debug"),
            &["a.proto"],
            &["a.proto"],
        ))?;
        assert!(request.options().enable_styling_check);
        assert_eq!(request.log_level(), "debug");

        let request = PluginRequest::decode(&encoded(None, &["a.proto"], &["a.proto"]))?;
        assert_eq!(request.log_level(), "warn");
        Ok(())
    }

    #[test]
    fn garbage_input_fails_to_decode() {
        let err = PluginRequest::decode(&[0xff, 0xff, 0xff]).expect_err("not a request");
        assert!(err.to_string().contains("CodeGeneratorRequest"));
    }

    #[test]
    fn generation_error_goes_into_the_response() -> Result<()> {
        let request = PluginRequest::decode(&encoded(None, &["a.proto"], &["missing.proto"]))?;
        let response = generate(&request, Fixed, Empty);
        assert!(response.file.is_empty());
        let error = response.error.unwrap_or_default();
        assert!(error.contains("missing.proto"), "{error}");
        assert_eq!(response.supported_features, Some(FEATURE_PROTO3_OPTIONAL));
        Ok(())
    }

    #[test]
    fn successful_response_carries_files_and_features() -> Result<()> {
        let request = PluginRequest::decode(&encoded(None, &["a.proto"], &["a.proto"]))?;
        let response = generate(&request, Fixed, Empty);
        assert_eq!(response.error, None);
        assert_eq!(response.file.len(), 1);
        assert_eq!(response.file[0].name.as_deref(), Some("a.pb.ts"));
        assert_eq!(
            response.file[0].content.as_deref(),
            Some(gateway_ts_core::EMPTY_MODULE)
        );
        assert_eq!(response.supported_features, Some(FEATURE_PROTO3_OPTIONAL));

        let decoded = CodeGeneratorResponse::decode(encode_response(&response).as_slice())?;
        assert_eq!(decoded, response);
        Ok(())
    }

    #[test]
    fn dump_ir_lists_selected_files_only() -> Result<()> {
        let request =
            PluginRequest::decode(&encoded(None, &["dep.proto", "a.proto"], &["a.proto"]))?;
        let json: serde_json::Value = serde_json::from_str(&dump_ir(&request)?)?;
        let files = json.as_array().map(Vec::len);
        assert_eq!(files, Some(1));
        assert_eq!(json[0]["ts_file_name"], "a.pb.ts");
        Ok(())
    }
}

//! Wire subset of `plugin.proto`, `descriptor.proto` and `google/api/http.proto`.
//!
//! `prost_types::FileDescriptorProto` drops unknown extensions, which is where
//! `google.api.http` lives, so the request is decoded through these structs
//! instead. Only the fields the generator reads are declared; everything else
//! is skipped by prost as unknown. Field tags match the upstream protos.

/// Extension number of `google.api.http` on `MethodOptions`.
pub const HTTP_RULE_EXTENSION: u32 = 72_295_728;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<RawFileDescriptor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFileDescriptor {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    #[prost(string, repeated, tag = "3")]
    pub dependency: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<RawMessage>,
    #[prost(message, repeated, tag = "5")]
    pub enum_type: Vec<RawEnum>,
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<RawService>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMessage {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub field: Vec<RawField>,
    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<RawMessage>,
    #[prost(message, repeated, tag = "4")]
    pub enum_type: Vec<RawEnum>,
    #[prost(message, optional, tag = "7")]
    pub options: Option<RawMessageOptions>,
    #[prost(message, repeated, tag = "8")]
    pub oneof_decl: Vec<RawOneof>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMessageOptions {
    #[prost(bool, optional, tag = "7")]
    pub map_entry: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawField {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub number: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub label: Option<i32>,
    #[prost(int32, optional, tag = "5")]
    pub r#type: Option<i32>,
    #[prost(string, optional, tag = "6")]
    pub type_name: Option<String>,
    #[prost(int32, optional, tag = "9")]
    pub oneof_index: Option<i32>,
    #[prost(string, optional, tag = "10")]
    pub json_name: Option<String>,
    #[prost(bool, optional, tag = "17")]
    pub proto3_optional: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawOneof {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawEnum {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub value: Vec<RawEnumValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawEnumValue {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(int32, optional, tag = "2")]
    pub number: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawService {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<RawMethod>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMethod {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub input_type: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub output_type: Option<String>,
    #[prost(message, optional, tag = "4")]
    pub options: Option<RawMethodOptions>,
    #[prost(bool, optional, tag = "5")]
    pub client_streaming: Option<bool>,
    #[prost(bool, optional, tag = "6")]
    pub server_streaming: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMethodOptions {
    #[prost(message, optional, tag = "72295728")]
    pub http: Option<RawHttpRule>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawHttpRule {
    #[prost(oneof = "RawPattern", tags = "2, 3, 4, 5, 6, 8")]
    pub pattern: Option<RawPattern>,
    #[prost(string, tag = "7")]
    pub body: String,
    #[prost(message, repeated, tag = "11")]
    pub additional_bindings: Vec<RawHttpRule>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum RawPattern {
    #[prost(string, tag = "2")]
    Get(String),
    #[prost(string, tag = "3")]
    Put(String),
    #[prost(string, tag = "4")]
    Post(String),
    #[prost(string, tag = "5")]
    Delete(String),
    #[prost(string, tag = "6")]
    Patch(String),
    #[prost(message, tag = "8")]
    Custom(RawCustomPattern),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCustomPattern {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn http_rule_survives_method_options_round_trip() -> Result<(), prost::DecodeError> {
        let options = RawMethodOptions {
            http: Some(RawHttpRule {
                pattern: Some(RawPattern::Get("/v1/{name}".to_string())),
                ..Default::default()
            }),
        };
        let bytes = options.encode_to_vec();
        // field 72295728, wire type 2
        let key = (u64::from(HTTP_RULE_EXTENSION) << 3) | 2;
        let mut expected_key = Vec::new();
        prost::encoding::encode_varint(key, &mut expected_key);
        assert!(bytes.starts_with(&expected_key));

        let decoded = RawMethodOptions::decode(bytes.as_slice())?;
        assert_eq!(decoded, options);
        Ok(())
    }

    #[test]
    fn unknown_descriptor_fields_are_skipped() -> Result<(), prost::DecodeError> {
        // FileDescriptorProto.options (tag 8) is not declared here
        let mut bytes = RawFileDescriptor {
            name: Some("a.proto".to_string()),
            ..Default::default()
        }
        .encode_to_vec();
        bytes.extend_from_slice(&[0x42, 0x02, 0x08, 0x01]);
        let decoded = RawFileDescriptor::decode(bytes.as_slice())?;
        assert_eq!(decoded.name.as_deref(), Some("a.proto"));
        Ok(())
    }

    #[test]
    fn undeclared_http_rule_fields_are_skipped() -> Result<(), prost::DecodeError> {
        // selector (1) = "a.B", response_body (12) = "r", body (7) = "*"
        let bytes = [0x0a, 0x03, b'a', b'.', b'B', 0x62, 0x01, b'r', 0x3a, 0x01, b'*'];
        let decoded = RawHttpRule::decode(bytes.as_slice())?;
        assert_eq!(decoded.body, "*");
        assert_eq!(decoded.pattern, None);
        Ok(())
    }
}

//! Wire descriptors → core data model.

use anyhow::{anyhow, bail, Context, Result};
use gateway_ts_core::model::{
    Enum, EnumValue, Field, FieldType, HttpBinding, HttpVerb, Label, Message, Method, ProtoFile,
    ScalarType, Service,
};
use gateway_ts_core::GenerationRequest;

use crate::wire::{
    RawCodeGeneratorRequest, RawEnum, RawField, RawFileDescriptor, RawHttpRule, RawMessage,
    RawMethod, RawPattern, RawService,
};

/// Convert every file of the request. Dependencies come first, as protoc
/// sends them.
pub fn generation_request(raw: &RawCodeGeneratorRequest) -> Result<GenerationRequest> {
    let files = raw
        .proto_file
        .iter()
        .map(proto_file)
        .collect::<Result<Vec<_>>>()?;
    Ok(GenerationRequest {
        files,
        file_to_generate: raw.file_to_generate.clone(),
    })
}

pub fn proto_file(raw: &RawFileDescriptor) -> Result<ProtoFile> {
    let name = raw.name.clone().unwrap_or_default();
    let messages = raw
        .message_type
        .iter()
        .map(message)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("converting messages of {name}"))?;

    Ok(ProtoFile {
        package: raw.package.clone().unwrap_or_default(),
        dependencies: raw.dependency.clone(),
        messages,
        enums: raw.enum_type.iter().map(enumeration).collect(),
        services: raw.service.iter().map(service).collect(),
        name,
    })
}

fn message(raw: &RawMessage) -> Result<Message> {
    let name = raw.name.clone().unwrap_or_default();
    let fields = raw
        .field
        .iter()
        .map(field)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("in message {name}"))?;
    let nested_messages = raw
        .nested_type
        .iter()
        .map(message)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("in message {name}"))?;

    Ok(Message {
        fields,
        nested_messages,
        nested_enums: raw.enum_type.iter().map(enumeration).collect(),
        oneofs: raw
            .oneof_decl
            .iter()
            .map(|o| o.name.clone().unwrap_or_default())
            .collect(),
        map_entry: raw
            .options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false),
        name,
    })
}

fn field(raw: &RawField) -> Result<Field> {
    let name = raw.name.clone().unwrap_or_default();
    let type_number = raw
        .r#type
        .ok_or_else(|| anyhow!("field {name} has no type"))?;
    let field_type = match type_number {
        // group, message, enum
        10 | 11 | 14 => FieldType::Named(
            raw.type_name
                .clone()
                .ok_or_else(|| anyhow!("field {name} references a type without a name"))?,
        ),
        n => FieldType::Scalar(
            scalar_type(n).ok_or_else(|| anyhow!("field {name} has unknown type {n}"))?,
        ),
    };
    let label = match raw.label.unwrap_or(1) {
        1 => Label::Optional,
        2 => Label::Required,
        3 => Label::Repeated,
        other => bail!("field {name} has unknown label {other}"),
    };

    Ok(Field {
        number: raw.number.unwrap_or_default(),
        json_name: raw.json_name.clone(),
        label,
        field_type,
        oneof_index: raw
            .oneof_index
            .map(|i| usize::try_from(i).with_context(|| format!("field {name} oneof index {i}")))
            .transpose()?,
        proto3_optional: raw.proto3_optional.unwrap_or(false),
        name,
    })
}

/// `FieldDescriptorProto.Type` numbers of the scalar types.
fn scalar_type(number: i32) -> Option<ScalarType> {
    let scalar = match number {
        1 => ScalarType::Double,
        2 => ScalarType::Float,
        3 => ScalarType::Int64,
        4 => ScalarType::Uint64,
        5 => ScalarType::Int32,
        6 => ScalarType::Fixed64,
        7 => ScalarType::Fixed32,
        8 => ScalarType::Bool,
        9 => ScalarType::String,
        12 => ScalarType::Bytes,
        13 => ScalarType::Uint32,
        15 => ScalarType::Sfixed32,
        16 => ScalarType::Sfixed64,
        17 => ScalarType::Sint32,
        18 => ScalarType::Sint64,
        _ => return None,
    };
    Some(scalar)
}

fn enumeration(raw: &RawEnum) -> Enum {
    Enum {
        name: raw.name.clone().unwrap_or_default(),
        values: raw
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name.clone().unwrap_or_default(),
                number: v.number.unwrap_or_default(),
            })
            .collect(),
    }
}

fn service(raw: &RawService) -> Service {
    Service {
        name: raw.name.clone().unwrap_or_default(),
        methods: raw.method.iter().map(method).collect(),
    }
}

fn method(raw: &RawMethod) -> Method {
    let http = raw
        .options
        .as_ref()
        .and_then(|o| o.http.as_ref())
        .and_then(http_binding);
    Method {
        name: raw.name.clone().unwrap_or_default(),
        input_type: raw.input_type.clone().unwrap_or_default(),
        output_type: raw.output_type.clone().unwrap_or_default(),
        client_streaming: raw.client_streaming.unwrap_or(false),
        server_streaming: raw.server_streaming.unwrap_or(false),
        http,
    }
}

/// Primary binding only; `additional_bindings` and `response_body` are not
/// rendered.
fn http_binding(rule: &RawHttpRule) -> Option<HttpBinding> {
    let (verb, path) = match rule.pattern.as_ref()? {
        RawPattern::Get(path) => (HttpVerb::Get, path.clone()),
        RawPattern::Put(path) => (HttpVerb::Put, path.clone()),
        RawPattern::Post(path) => (HttpVerb::Post, path.clone()),
        RawPattern::Delete(path) => (HttpVerb::Delete, path.clone()),
        RawPattern::Patch(path) => (HttpVerb::Patch, path.clone()),
        RawPattern::Custom(custom) => (HttpVerb::Custom(custom.kind.clone()), custom.path.clone()),
    };
    if !rule.additional_bindings.is_empty() {
        tracing::debug!(
            path = %path,
            count = rule.additional_bindings.len(),
            "ignoring additional http bindings"
        );
    }
    Some(HttpBinding {
        verb,
        path,
        body: (!rule.body.is_empty()).then(|| rule.body.clone()),
    })
}

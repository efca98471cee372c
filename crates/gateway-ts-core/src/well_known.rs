//! Proto3 JSON mapping for scalars and `google.protobuf` well-known types.

use crate::model::{normalize_type_name, ScalarType};

pub fn scalar_ts_type(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::Double
        | ScalarType::Float
        | ScalarType::Int32
        | ScalarType::Uint32
        | ScalarType::Sint32
        | ScalarType::Fixed32
        | ScalarType::Sfixed32 => "number",
        // 64-bit integers are strings on the wire in proto3 JSON
        ScalarType::Int64
        | ScalarType::Uint64
        | ScalarType::Sint64
        | ScalarType::Fixed64
        | ScalarType::Sfixed64 => "string",
        ScalarType::Bool => "boolean",
        ScalarType::String | ScalarType::Bytes => "string",
    }
}

/// Builtin TypeScript type for a well-known type, if `proto_name` is one.
pub fn well_known_ts_type(proto_name: &str) -> Option<&'static str> {
    let ts = match normalize_type_name(proto_name) {
        "google.protobuf.Timestamp" | "google.protobuf.Duration" | "google.protobuf.FieldMask" => {
            "string"
        }
        "google.protobuf.Struct" => "{[key: string]: unknown}",
        "google.protobuf.Value" => "unknown",
        "google.protobuf.ListValue" => "unknown[]",
        "google.protobuf.NullValue" => "null",
        "google.protobuf.Empty" => "{}",
        "google.protobuf.Any" => "{\"@type\"?: string; [key: string]: unknown}",
        "google.protobuf.DoubleValue"
        | "google.protobuf.FloatValue"
        | "google.protobuf.Int32Value"
        | "google.protobuf.UInt32Value" => "number",
        "google.protobuf.Int64Value" | "google.protobuf.UInt64Value" => "string",
        "google.protobuf.BoolValue" => "boolean",
        "google.protobuf.StringValue" | "google.protobuf.BytesValue" => "string",
        _ => return None,
    };
    Some(ts)
}

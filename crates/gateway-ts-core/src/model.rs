//! Decoded `.proto` declarations, as handed over by the plugin front-end.
//!
//! These mirror the shape of `google.protobuf.FileDescriptorProto` closely
//! (simple names + nesting, type references as fully-qualified names) but only
//! keep what TypeScript generation needs. They are immutable inputs for a run.

use serde::{Deserialize, Serialize};

/// One compiled `.proto` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Path as given by protoc, e.g. `acme/payments/v1/payments.proto`.
    pub name: String,
    /// Proto package (may be empty).
    pub package: String,
    /// Imported file names.
    pub dependencies: Vec<String>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Simple name (no package, no parent).
    pub name: String,
    pub fields: Vec<Field>,
    pub nested_messages: Vec<Message>,
    pub nested_enums: Vec<Enum>,
    /// Oneof declarations, indexed by `Field::oneof_index`.
    pub oneofs: Vec<String>,
    /// Set on the synthetic `XxxEntry` messages protoc emits for `map<K, V>`.
    pub map_entry: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub number: i32,
    /// protoc fills this in for every field; `None` falls back to the lowerCamel rule.
    pub json_name: Option<String>,
    pub label: Label,
    pub field_type: FieldType,
    pub oneof_index: Option<usize>,
    /// proto3 `optional` (the field sits in a synthetic oneof).
    pub proto3_optional: bool,
}

impl Field {
    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[default]
    Optional,
    Required,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Scalar(ScalarType),
    /// Message, enum or group reference by fully-qualified name
    /// (`.pkg.Outer.Inner`; the leading dot is optional).
    Named(String),
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Scalar(ScalarType::String)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Fully-qualified request message name.
    pub input_type: String,
    /// Fully-qualified response message name.
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    /// `(google.api.http)` binding. `None` means the method is not reachable
    /// through the gateway and gets no client method.
    pub http: Option<HttpBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBinding {
    pub verb: HttpVerb,
    /// Path template, e.g. `/v1/{name=projects/*/items/*}`.
    pub path: String,
    /// `*`, a request field name, or `None` for no body.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpVerb {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    /// `custom { kind: "HEAD" }` and friends.
    Custom(String),
}

impl HttpVerb {
    pub fn as_str(&self) -> &str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Put => "PUT",
            HttpVerb::Post => "POST",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Custom(kind) => kind,
        }
    }
}

/// `pkg` + `Name` → `pkg.Name` (no leading dot).
pub fn qualify_type_name(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Strip the leading `.` protoc puts on resolved type names.
pub fn normalize_type_name(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

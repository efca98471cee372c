//! Template-ready intermediate representation, one [`FileIr`] per proto file.
//!
//! Everything a renderer needs is resolved here: identifiers, import
//! specifiers, JSON property names, HTTP path parameters. A renderer never
//! looks anything up.

use serde::Serialize;

/// A resolved reference to a message or enum: the TypeScript identifier plus
/// the proto file that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeRef {
    pub identifier: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeIr {
    /// Scalar or well-known type rendered as a TypeScript builtin.
    Builtin { ts_type: String },
    Message { type_ref: TypeRef },
    Enum { type_ref: TypeRef },
    Map { key: Box<TypeIr>, value: Box<TypeIr> },
}

impl TypeIr {
    pub fn builtin(ts_type: impl Into<String>) -> Self {
        TypeIr::Builtin {
            ts_type: ts_type.into(),
        }
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            TypeIr::Message { type_ref } | TypeIr::Enum { type_ref } => Some(type_ref),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIr {
    pub proto_name: String,
    /// Property name in the generated type (JSON name or proto name).
    pub name: String,
    pub number: i32,
    pub field_type: TypeIr,
    pub repeated: bool,
    pub optional: bool,
    /// Name of the (real) oneof this field belongs to.
    pub oneof: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneofIr {
    pub name: String,
    /// Property names of the member fields, in declaration order.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageIr {
    pub proto_name: String,
    pub identifier: String,
    pub fields: Vec<FieldIr>,
    pub oneofs: Vec<OneofIr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValueIr {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumIr {
    pub proto_name: String,
    pub identifier: String,
    pub values: Vec<EnumValueIr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathParamIr {
    /// Template text as written, braces included (`{name=projects/*}`).
    pub template: String,
    /// Property path on the request object (`["item", "id"]`).
    pub field_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpIr {
    pub verb: String,
    pub path: String,
    /// `*`, a request property name, or `None`.
    pub body: Option<String>,
    pub path_params: Vec<PathParamIr>,
}

impl HttpIr {
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodIr {
    pub name: String,
    pub request: TypeIr,
    pub response: TypeIr,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub http: HttpIr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIr {
    pub proto_name: String,
    pub identifier: String,
    /// HTTP-bound methods only.
    pub methods: Vec<MethodIr>,
    /// Methods without a gateway binding: no client method, but the name is taken.
    pub unbound_methods: Vec<String>,
}

impl ServiceIr {
    pub fn needs_fetch_module(&self) -> bool {
        !self.methods.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIr {
    /// Declaring proto file.
    pub proto_file: String,
    /// Its generated output path.
    pub output_file: String,
    /// Specifier relative to the importing file.
    pub module_specifier: String,
    /// Sorted, de-duplicated identifiers used from that module.
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIr {
    /// Proto path, as listed in the request.
    pub name: String,
    pub package: String,
    /// Generated output path.
    pub ts_file_name: String,
    pub messages: Vec<MessageIr>,
    pub enums: Vec<EnumIr>,
    pub services: Vec<ServiceIr>,
    /// Ordered by proto file name; never contains this file.
    pub imports: Vec<ImportIr>,
    /// Specifier of the shared fetch module, set iff a service needs it.
    pub fetch_module: Option<String>,
    pub enable_styling_check: bool,
}

impl FileIr {
    /// No messages, no enums, and no service with an HTTP-bound method.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.enums.is_empty()
            && !self.services.iter().any(ServiceIr::needs_fetch_module)
    }

    pub fn needs_fetch_module(&self) -> bool {
        self.services.iter().any(ServiceIr::needs_fetch_module)
    }

    pub fn import_files(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.output_file.as_str())
    }
}

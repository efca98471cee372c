//! File analysis: one [`ProtoFile`] + the registry → one [`FileIr`].
//!
//! Every message/enum reference goes through the registry. References that
//! land in another file are collected into the file's import set; well-known
//! types and scalars become TypeScript builtins and import nothing.
//!
//! Policy is fail-fast: the first unresolved reference aborts the file, and
//! [`analyse_files`] aborts the run on the first failing file (in request
//! order), since a partially generated tree would not type-check anyway.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{GenerateError, Result};
use crate::ir::{
    EnumIr, EnumValueIr, FieldIr, FileIr, HttpIr, ImportIr, MessageIr, MethodIr, OneofIr,
    PathParamIr, ServiceIr, TypeIr, TypeRef,
};
use crate::model::{
    qualify_type_name, Enum, Field, FieldType, HttpBinding, Message, Method, ProtoFile, Service,
};
use crate::naming::{json_name, module_specifier, output_file_name, ts_identifier};
use crate::options::GeneratorOptions;
use crate::registry::{Registry, TypeKind};
use crate::well_known::{scalar_ts_type, well_known_ts_type};

/// Analyse every file of the request, in order.
pub fn analyse_files(
    files: &[ProtoFile],
    registry: &Registry,
    options: &GeneratorOptions,
) -> Result<Vec<FileIr>> {
    files
        .iter()
        .map(|file| analyse_file(file, registry, options))
        .collect()
}

pub fn analyse_file(
    file: &ProtoFile,
    registry: &Registry,
    options: &GeneratorOptions,
) -> Result<FileIr> {
    let mut analyser = FileAnalyser::new(file, registry, options);

    let mut messages = Vec::new();
    let mut enums = Vec::new();
    for message in &file.messages {
        analyser.message(&file.package, message, &mut messages, &mut enums)?;
    }
    for en in &file.enums {
        enums.push(enum_ir(&file.package, en));
    }

    let services = file
        .services
        .iter()
        .map(|service| analyser.service(service))
        .collect::<Result<Vec<_>>>()?;

    let ts_file_name = output_file_name(&file.name);
    let imports = analyser.imports(&ts_file_name);
    let fetch_module = services
        .iter()
        .any(ServiceIr::needs_fetch_module)
        .then(|| module_specifier(&ts_file_name, &options.fetch_module_path()));

    tracing::debug!(
        file = %file.name,
        messages = messages.len(),
        enums = enums.len(),
        services = services.len(),
        imports = imports.len(),
        "analysed proto file"
    );

    Ok(FileIr {
        name: file.name.clone(),
        package: file.package.clone(),
        ts_file_name,
        messages,
        enums,
        services,
        imports,
        fetch_module,
        enable_styling_check: options.enable_styling_check,
    })
}

struct FileAnalyser<'a> {
    file: &'a ProtoFile,
    registry: &'a Registry,
    options: &'a GeneratorOptions,
    /// Declaring file → identifiers used from it.
    used: BTreeMap<String, BTreeSet<String>>,
}

impl<'a> FileAnalyser<'a> {
    fn new(file: &'a ProtoFile, registry: &'a Registry, options: &'a GeneratorOptions) -> Self {
        Self {
            file,
            registry,
            options,
            used: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Messages
    // -------------------------------------------------------------------------

    fn message(
        &mut self,
        scope: &str,
        message: &Message,
        messages: &mut Vec<MessageIr>,
        enums: &mut Vec<EnumIr>,
    ) -> Result<()> {
        // map<K, V> entries are inlined at the use site
        if message.map_entry {
            return Ok(());
        }

        let proto_name = qualify_type_name(scope, &message.name);
        let fields = message
            .fields
            .iter()
            .map(|field| self.field(message, field))
            .collect::<Result<Vec<_>>>()?;
        let oneofs = oneofs(message, &fields);

        messages.push(MessageIr {
            identifier: ts_identifier(&proto_name),
            proto_name: proto_name.clone(),
            fields,
            oneofs,
        });

        for nested in &message.nested_messages {
            self.message(&proto_name, nested, messages, enums)?;
        }
        for en in &message.nested_enums {
            enums.push(enum_ir(&proto_name, en));
        }
        Ok(())
    }

    fn field(&mut self, message: &Message, field: &Field) -> Result<FieldIr> {
        let field_type = self.field_type(&field.field_type)?;
        let is_map = matches!(field_type, TypeIr::Map { .. });
        let oneof = match field.oneof_index {
            Some(index) if !field.proto3_optional => Some(oneof_name(message, index)),
            _ => None,
        };

        Ok(FieldIr {
            proto_name: field.name.clone(),
            name: self.property_name(field),
            number: field.number,
            field_type,
            repeated: field.is_repeated() && !is_map,
            optional: field.proto3_optional,
            oneof,
        })
    }

    fn property_name(&self, field: &Field) -> String {
        property_name(field, self.options.use_proto_names)
    }

    fn field_type(&mut self, field_type: &FieldType) -> Result<TypeIr> {
        match field_type {
            FieldType::Scalar(scalar) => Ok(TypeIr::builtin(scalar_ts_type(*scalar))),
            FieldType::Named(name) => self.named_type(name),
        }
    }

    fn named_type(&mut self, name: &str) -> Result<TypeIr> {
        if let Some(ts_type) = well_known_ts_type(name) {
            return Ok(TypeIr::builtin(ts_type));
        }

        let registered = self
            .registry
            .lookup(name)
            .map_err(|missing| GenerateError::UnknownType {
                file: self.file.name.clone(),
                type_name: missing.0,
            })?;

        match &registered.kind {
            TypeKind::Message {
                map_entry: Some(entry),
            } => {
                let key = self.field_type(&entry.key)?;
                let value = self.field_type(&entry.value)?;
                Ok(TypeIr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TypeKind::Message { map_entry: None } => {
                let type_ref = registered.type_ref();
                self.use_type(&type_ref);
                Ok(TypeIr::Message { type_ref })
            }
            TypeKind::Enum => {
                let type_ref = registered.type_ref();
                self.use_type(&type_ref);
                Ok(TypeIr::Enum { type_ref })
            }
        }
    }

    fn use_type(&mut self, type_ref: &TypeRef) {
        if type_ref.file != self.file.name {
            self.used
                .entry(type_ref.file.clone())
                .or_default()
                .insert(type_ref.identifier.clone());
        }
    }

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    fn service(&mut self, service: &Service) -> Result<ServiceIr> {
        let proto_name = qualify_type_name(&self.file.package, &service.name);
        let mut methods = Vec::new();
        let mut unbound_methods = Vec::new();

        for method in &service.methods {
            match &method.http {
                Some(binding) => methods.push(self.method(method, binding)?),
                None => {
                    tracing::debug!(
                        service = %proto_name,
                        method = %method.name,
                        "method has no google.api.http binding, skipping client method"
                    );
                    unbound_methods.push(method.name.clone());
                }
            }
        }

        Ok(ServiceIr {
            identifier: ts_identifier(&proto_name),
            proto_name,
            methods,
            unbound_methods,
        })
    }

    fn method(&mut self, method: &Method, binding: &HttpBinding) -> Result<MethodIr> {
        let request = self.named_type(&method.input_type)?;
        let response = self.named_type(&method.output_type)?;
        let path_params = path_params(&binding.path)
            .map_err(|reason| GenerateError::InvalidPathTemplate {
                file: self.file.name.clone(),
                method: method.name.clone(),
                path: binding.path.clone(),
                reason,
            })?
            .into_iter()
            .map(|param| PathParamIr {
                field_path: self.field_path(&method.input_type, &param.field_path),
                template: param.template,
            })
            .collect();
        let body = binding
            .body
            .as_deref()
            .filter(|body| !body.is_empty())
            .map(|body| match body {
                "*" => "*".to_string(),
                field => self
                    .field_path(&method.input_type, &[field.to_string()])
                    .concat(),
            });

        Ok(MethodIr {
            name: method.name.clone(),
            request,
            response,
            client_streaming: method.client_streaming,
            server_streaming: method.server_streaming,
            http: HttpIr {
                verb: binding.verb.as_str().to_string(),
                path: binding.path.clone(),
                body,
                path_params,
            },
        })
    }

    /// Property names along a dotted field path, starting at `message`.
    /// Segments are looked up among the declared fields so a custom
    /// `json_name` wins; a segment that cannot be found is camel-cased.
    fn field_path(&self, message: &str, segments: &[String]) -> Vec<String> {
        let mut current = self.registry.get(message);
        segments
            .iter()
            .map(|segment| {
                let declared = current.and_then(|registered| registered.field(segment));
                current = declared.and_then(|field| match &field.field_type {
                    FieldType::Named(name) => self.registry.get(name),
                    FieldType::Scalar(_) => None,
                });
                match declared {
                    Some(field) => self.property_name(field),
                    None if self.options.use_proto_names => segment.clone(),
                    None => json_name(segment),
                }
            })
            .collect()
    }

    fn imports(&self, ts_file_name: &str) -> Vec<ImportIr> {
        self.used
            .iter()
            .filter_map(|(proto_file, identifiers)| {
                let output_file = output_file_name(proto_file);
                if output_file == ts_file_name {
                    return None;
                }
                Some(ImportIr {
                    module_specifier: module_specifier(ts_file_name, &output_file),
                    proto_file: proto_file.clone(),
                    output_file,
                    identifiers: identifiers.iter().cloned().collect(),
                })
            })
            .collect()
    }
}

fn enum_ir(scope: &str, en: &Enum) -> EnumIr {
    let proto_name = qualify_type_name(scope, &en.name);
    EnumIr {
        identifier: ts_identifier(&proto_name),
        proto_name,
        values: en
            .values
            .iter()
            .map(|v| EnumValueIr {
                name: v.name.clone(),
                number: v.number,
            })
            .collect(),
    }
}

fn oneof_name(message: &Message, index: usize) -> String {
    message
        .oneofs
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("oneof_{index}"))
}

/// Real oneofs, in declaration order, with their member property names.
fn oneofs(message: &Message, fields: &[FieldIr]) -> Vec<OneofIr> {
    let mut groups: Vec<OneofIr> = Vec::new();
    for field in fields {
        let Some(name) = &field.oneof else {
            continue;
        };
        match groups.iter_mut().find(|g| &g.name == name) {
            Some(group) => group.fields.push(field.name.clone()),
            None => groups.push(OneofIr {
                name: name.clone(),
                fields: vec![field.name.clone()],
            }),
        }
    }
    let declared = |name: &str| message.oneofs.iter().position(|o| o == name);
    groups.sort_by_key(|g| declared(&g.name));
    groups
}

/// TypeScript property name of a field.
fn property_name(field: &Field, use_proto_names: bool) -> String {
    if use_proto_names {
        return field.name.clone();
    }
    field
        .json_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| json_name(&field.name))
}

fn path_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([^{}=]*)(?:=[^{}]*)?\}").expect("valid path parameter regex")
    })
}

/// `{field.path}` / `{field.path=pattern}` occurrences of an HTTP path
/// template, with the proto field names as written.
fn path_params(path: &str) -> Result<Vec<PathParamIr>, String> {
    let re = path_param_regex();
    let mut params = Vec::new();
    for caps in re.captures_iter(path) {
        let raw = caps[1].trim();
        if raw.is_empty() {
            return Err("empty path parameter".to_string());
        }
        let field_path = raw.split('.').map(str::to_string).collect();
        params.push(PathParamIr {
            template: caps[0].to_string(),
            field_path,
        });
    }

    let rest = re.replace_all(path, "");
    if rest.contains('{') || rest.contains('}') {
        return Err("unbalanced braces".to_string());
    }
    Ok(params)
}

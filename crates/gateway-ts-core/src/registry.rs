//! Global type registry.
//!
//! Built once from *every* file in the request (dependency-only files
//! included), then read-only: [`Registry`] exposes no mutating methods, so a
//! handle can be shared across analyses in any order or on any thread and
//! every lookup returns the same [`TypeRef`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::{GenerateError, Result, UnknownType};
use crate::ir::TypeRef;
use crate::model::{
    normalize_type_name, qualify_type_name, Enum, Field, FieldType, Message, ProtoFile,
};
use crate::naming::ts_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredType {
    /// Fully-qualified proto name, no leading dot.
    pub proto_name: String,
    /// Declaring proto file.
    pub file: String,
    pub identifier: String,
    pub kind: TypeKind,
    /// Declared fields; empty for enums.
    pub fields: Vec<Field>,
}

impl RegisteredType {
    pub fn type_ref(&self) -> TypeRef {
        TypeRef {
            identifier: self.identifier.clone(),
            file: self.file.clone(),
        }
    }

    /// Declared field by proto name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Message { map_entry: Option<MapEntry> },
    Enum,
}

/// Key/value types of a synthetic `map<K, V>` entry message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub key: FieldType,
    pub value: FieldType,
}

#[derive(Debug, Default)]
pub struct Registry {
    types: BTreeMap<String, RegisteredType>,
}

impl Registry {
    /// Index every message and enum (nested ones included) of `files`.
    pub fn build<'a, I>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ProtoFile>,
    {
        let mut builder = RegistryBuilder::default();
        for file in files {
            builder.add_file(file)?;
        }
        let registry = builder.finish();
        tracing::debug!(types = registry.len(), "type registry built");
        Ok(registry)
    }

    pub fn get(&self, proto_name: &str) -> Option<&RegisteredType> {
        self.types.get(normalize_type_name(proto_name))
    }

    pub fn lookup(&self, proto_name: &str) -> Result<&RegisteredType, UnknownType> {
        self.get(proto_name)
            .ok_or_else(|| UnknownType(normalize_type_name(proto_name).to_string()))
    }

    pub fn resolve(&self, proto_name: &str) -> Result<TypeRef, UnknownType> {
        self.lookup(proto_name).map(RegisteredType::type_ref)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered types ordered by proto name.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.types.values()
    }
}

#[derive(Default)]
struct RegistryBuilder {
    types: BTreeMap<String, RegisteredType>,
}

impl RegistryBuilder {
    fn add_file(&mut self, file: &ProtoFile) -> Result<()> {
        for message in &file.messages {
            self.add_message(file, &file.package, message)?;
        }
        for en in &file.enums {
            self.add_enum(file, &file.package, en)?;
        }
        Ok(())
    }

    fn add_message(&mut self, file: &ProtoFile, scope: &str, message: &Message) -> Result<()> {
        let proto_name = qualify_type_name(scope, &message.name);
        let map_entry = message.map_entry.then(|| map_entry_types(message)).flatten();
        self.insert(
            file,
            proto_name.clone(),
            TypeKind::Message { map_entry },
            message.fields.clone(),
        )?;

        for nested in &message.nested_messages {
            self.add_message(file, &proto_name, nested)?;
        }
        for en in &message.nested_enums {
            self.add_enum(file, &proto_name, en)?;
        }
        Ok(())
    }

    fn add_enum(&mut self, file: &ProtoFile, scope: &str, en: &Enum) -> Result<()> {
        self.insert(
            file,
            qualify_type_name(scope, &en.name),
            TypeKind::Enum,
            Vec::new(),
        )
    }

    fn insert(
        &mut self,
        file: &ProtoFile,
        proto_name: String,
        kind: TypeKind,
        fields: Vec<Field>,
    ) -> Result<()> {
        match self.types.entry(proto_name) {
            Entry::Occupied(existing) => Err(GenerateError::DuplicateType {
                type_name: existing.key().clone(),
                first_file: existing.get().file.clone(),
                second_file: file.name.clone(),
            }),
            Entry::Vacant(slot) => {
                let proto_name = slot.key().clone();
                slot.insert(RegisteredType {
                    identifier: ts_identifier(&proto_name),
                    proto_name,
                    file: file.name.clone(),
                    kind,
                    fields,
                });
                Ok(())
            }
        }
    }

    fn finish(self) -> Registry {
        Registry { types: self.types }
    }
}

/// protoc always numbers map entry fields `key = 1`, `value = 2`.
fn map_entry_types(message: &Message) -> Option<MapEntry> {
    let key = message.fields.iter().find(|f| f.number == 1)?;
    let value = message.fields.iter().find(|f| f.number == 2)?;
    Some(MapEntry {
        key: key.field_type.clone(),
        value: value.field_type.clone(),
    })
}

//! Enums and message types.
//!
//! Enums become string enums (proto3 JSON encodes enum values by name).
//! Every message field is optional on the TypeScript side since proto3 JSON
//! omits default values. Oneof members are split out of the base type and
//! re-attached through `OneOf<...>` so at most one of them can be set.

use std::fmt::Write;

use gateway_ts_core::ir::{EnumIr, FieldIr, MessageIr, TypeIr};

/// Emitted once per module that declares a message with a oneof.
pub(crate) const ONE_OF_HELPER: &str = "\
type Absent<T, K extends keyof T> = { [k in Exclude<keyof T, K>]?: undefined };
type OneOf<T> =
  | { [k in keyof T]?: undefined }
  | (
    keyof T extends infer K ?
      (K extends string & keyof T ? { [k in K]: T[K] } & Absent<T, K>
        : never)
    : never);";

/// Suffix for the non-exported base of a message with oneofs. `$$` cannot
/// come out of an identifier join, so the name never collides.
const BASE_SUFFIX: &str = "$$Base";

pub(crate) fn ts_type(field_type: &TypeIr) -> String {
    match field_type {
        TypeIr::Builtin { ts_type } => ts_type.clone(),
        TypeIr::Message { type_ref } | TypeIr::Enum { type_ref } => type_ref.identifier.clone(),
        // JSON object keys are always strings, whatever the proto key type
        TypeIr::Map { value, .. } => format!("{{[key: string]: {}}}", ts_type(value)),
    }
}

fn field_ts_type(field: &FieldIr) -> String {
    let base = ts_type(&field.field_type);
    if field.repeated {
        if base.contains(|c: char| c == ' ' || c == '|') {
            format!("({base})[]")
        } else {
            format!("{base}[]")
        }
    } else {
        base
    }
}

/// Property key, quoted unless it is a plain identifier.
pub(crate) fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("{name:?}")
    }
}

pub(crate) fn write_enum(out: &mut String, en: &EnumIr) -> std::fmt::Result {
    writeln!(out, "export enum {} {{", en.identifier)?;
    for value in &en.values {
        writeln!(out, "  {} = \"{}\",", value.name, value.name)?;
    }
    writeln!(out, "}}")
}

fn write_fields<'a>(
    out: &mut String,
    fields: impl Iterator<Item = &'a FieldIr>,
    indent: &str,
) -> std::fmt::Result {
    for field in fields {
        writeln!(
            out,
            "{indent}{}?: {}",
            property_key(&field.name),
            field_ts_type(field)
        )?;
    }
    Ok(())
}

pub(crate) fn write_message(out: &mut String, message: &MessageIr) -> std::fmt::Result {
    if message.oneofs.is_empty() {
        writeln!(out, "export type {} = {{", message.identifier)?;
        write_fields(out, message.fields.iter(), "  ")?;
        return writeln!(out, "}}");
    }

    let base = format!("{}{BASE_SUFFIX}", message.identifier);
    writeln!(out, "type {base} = {{")?;
    write_fields(out, message.fields.iter().filter(|f| f.oneof.is_none()), "  ")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    write!(out, "export type {} = {base}", message.identifier)?;
    for oneof in &message.oneofs {
        let members = message
            .fields
            .iter()
            .filter(|f| f.oneof.as_deref() == Some(oneof.name.as_str()))
            .map(|f| format!("{}: {}", property_key(&f.name), field_ts_type(f)))
            .collect::<Vec<_>>();
        write!(out, "\n  & OneOf<{{ {} }}>", members.join("; "))?;
    }
    writeln!(out)
}

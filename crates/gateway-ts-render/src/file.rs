//! Whole-module layout: preamble, imports, enums, messages, services.

use std::fmt::Write;

use gateway_ts_core::ir::ImportIr;
use gateway_ts_core::{FileIr, RenderError};

use crate::{client, types, write_preamble};

pub(crate) fn render(file: &FileIr) -> Result<String, RenderError> {
    let mut out = String::new();
    write_preamble(&mut out, file.enable_styling_check)?;

    if let Some(fetch_module) = &file.fetch_module {
        writeln!(out, "import * as fm from \"{fetch_module}\"")?;
    }
    for import in &file.imports {
        write_import(&mut out, import)?;
    }
    if file.fetch_module.is_some() || !file.imports.is_empty() {
        writeln!(out)?;
    }

    if file.messages.iter().any(|m| !m.oneofs.is_empty()) {
        writeln!(out, "{}", types::ONE_OF_HELPER)?;
        writeln!(out)?;
    }

    for en in &file.enums {
        types::write_enum(&mut out, en)?;
        writeln!(out)?;
    }
    for message in &file.messages {
        types::write_message(&mut out, message)?;
        writeln!(out)?;
    }
    for service in &file.services {
        client::write_service(&mut out, service)?;
        writeln!(out)?;
    }
    Ok(out)
}

fn write_import(out: &mut String, import: &ImportIr) -> std::fmt::Result {
    writeln!(
        out,
        "import {{ {} }} from \"{}\"",
        import.identifiers.join(", "),
        import.module_specifier
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_ts_core::ir::{EnumIr, EnumValueIr};

    fn file_ir() -> FileIr {
        FileIr {
            name: "b/b.proto".to_string(),
            package: "b".to_string(),
            ts_file_name: "b/b.pb.ts".to_string(),
            messages: Vec::new(),
            enums: vec![EnumIr {
                proto_name: "b.Kind".to_string(),
                identifier: "b$Kind".to_string(),
                values: vec![EnumValueIr {
                    name: "KIND_UNSPECIFIED".to_string(),
                    number: 0,
                }],
            }],
            services: Vec::new(),
            imports: vec![ImportIr {
                proto_file: "a.proto".to_string(),
                output_file: "a.pb.ts".to_string(),
                module_specifier: "../a.pb".to_string(),
                identifiers: vec!["a$Bar".to_string(), "a$Foo".to_string()],
            }],
            fetch_module: None,
            enable_styling_check: false,
        }
    }

    #[test]
    fn lint_suppression_follows_header_unless_styling_check() -> Result<(), RenderError> {
        let mut file = file_ir();
        let out = render(&file)?;
        assert!(out.starts_with(crate::GENERATED_HEADER));
        assert!(out.contains("// @ts-nocheck"));
        assert!(out.contains("/* eslint-disable */"));

        file.enable_styling_check = true;
        let out = render(&file)?;
        assert!(!out.contains("@ts-nocheck"));
        assert!(!out.contains("eslint-disable"));
        Ok(())
    }

    #[test]
    fn one_named_import_line_per_module() -> Result<(), RenderError> {
        let out = render(&file_ir())?;
        assert!(out.contains("import { a$Bar, a$Foo } from \"../a.pb\"\n"));
        assert!(!out.contains("import * as fm"));
        Ok(())
    }
}

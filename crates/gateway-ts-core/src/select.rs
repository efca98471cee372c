//! Narrow the analysed files down to what protoc asked for.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GenerateError, Result};
use crate::ir::FileIr;

#[derive(Debug)]
pub struct Selection<'a> {
    /// In `file_to_generate` order.
    pub files: Vec<&'a FileIr>,
    /// Some selected file has a service with an HTTP-bound method.
    pub needs_fetch_helper: bool,
}

/// Pick one [`FileIr`] per name in `file_to_generate`, keeping protoc's order.
/// Files that were only loaded as dependencies are dropped even though they
/// took part in type resolution.
pub fn select<'a>(all: &'a [FileIr], file_to_generate: &[String]) -> Result<Selection<'a>> {
    let by_name: BTreeMap<&str, &FileIr> = all.iter().map(|f| (f.name.as_str(), f)).collect();

    let mut seen = BTreeSet::new();
    let mut files = Vec::with_capacity(file_to_generate.len());
    for name in file_to_generate {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let file = by_name
            .get(name.as_str())
            .copied()
            .ok_or_else(|| GenerateError::MissingFileToGenerate { file: name.clone() })?;
        files.push(file);
    }

    let needs_fetch_helper = files.iter().any(|f| f.needs_fetch_module());
    Ok(Selection {
        files,
        needs_fetch_helper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{HttpIr, MethodIr, ServiceIr, TypeIr};

    fn file_ir(name: &str) -> FileIr {
        FileIr {
            name: name.to_string(),
            package: String::new(),
            ts_file_name: crate::naming::output_file_name(name),
            messages: Vec::new(),
            enums: Vec::new(),
            services: Vec::new(),
            imports: Vec::new(),
            fetch_module: None,
            enable_styling_check: false,
        }
    }

    fn with_bound_service(mut file: FileIr) -> FileIr {
        file.services.push(ServiceIr {
            proto_name: "Svc".to_string(),
            identifier: "Svc".to_string(),
            methods: vec![MethodIr {
                name: "Call".to_string(),
                request: TypeIr::builtin("{}"),
                response: TypeIr::builtin("{}"),
                client_streaming: false,
                server_streaming: false,
                http: HttpIr {
                    verb: "POST".to_string(),
                    path: "/call".to_string(),
                    body: Some("*".to_string()),
                    path_params: Vec::new(),
                },
            }],
            unbound_methods: Vec::new(),
        });
        file
    }

    fn names(selection: &Selection<'_>) -> Vec<String> {
        selection.files.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn keeps_request_order_and_drops_dependencies() -> Result<()> {
        let all = vec![file_ir("dep.proto"), file_ir("a.proto"), file_ir("b.proto")];
        let wanted = vec!["b.proto".to_string(), "a.proto".to_string()];
        let selection = select(&all, &wanted)?;
        assert_eq!(names(&selection), vec!["b.proto", "a.proto"]);
        assert!(!selection.needs_fetch_helper);
        Ok(())
    }

    #[test]
    fn fetch_helper_only_counts_selected_files() -> Result<()> {
        let all = vec![with_bound_service(file_ir("dep.proto")), file_ir("a.proto")];
        let selection = select(&all, &["a.proto".to_string()])?;
        assert!(!selection.needs_fetch_helper);

        let selection = select(&all, &["dep.proto".to_string(), "a.proto".to_string()])?;
        assert!(selection.needs_fetch_helper);
        Ok(())
    }

    #[test]
    fn duplicate_names_select_once() -> Result<()> {
        let all = vec![file_ir("a.proto")];
        let selection = select(&all, &["a.proto".to_string(), "a.proto".to_string()])?;
        assert_eq!(selection.files.len(), 1);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let all = vec![file_ir("a.proto")];
        let err = select(&all, &["nope.proto".to_string()]).expect_err("missing");
        assert!(matches!(
            err,
            GenerateError::MissingFileToGenerate { file } if file == "nope.proto"
        ));
    }
}

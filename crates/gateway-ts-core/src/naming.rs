//! Deterministic name derivations.
//!
//! Rules:
//! - TypeScript identifiers: fully-qualified proto name, segments joined with
//!   `$` (`acme.v1.Outer.Inner` → `acme$v1$Outer$Inner`). Proto identifiers are
//!   `[A-Za-z_][A-Za-z0-9_]*`, so `$` can never come from a segment and the
//!   transform is injective. Segments keep their casing.
//! - Output files: `foo/bar.proto` → `foo/bar.pb.ts`.
//! - Import specifiers are relative between output files, without `.ts`.

use crate::model::normalize_type_name;

pub const IDENTIFIER_SEPARATOR: char = '$';
pub const OUTPUT_SUFFIX: &str = ".pb.ts";

/// Fully-qualified proto name → TypeScript identifier.
pub fn ts_identifier(proto_name: &str) -> String {
    normalize_type_name(proto_name)
        .split('.')
        .collect::<Vec<_>>()
        .join(&IDENTIFIER_SEPARATOR.to_string())
}

/// Proto path → generated TypeScript path.
pub fn output_file_name(proto_path: &str) -> String {
    let path = to_slash(proto_path);
    match path.strip_suffix(".proto") {
        Some(stem) => format!("{stem}{OUTPUT_SUFFIX}"),
        None => format!("{path}{OUTPUT_SUFFIX}"),
    }
}

pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexical `join` + `clean` on slash paths (`./a/../b//c` → `b/c`).
pub fn join_clean(dir: &str, file: &str) -> String {
    let joined = format!("{}/{}", to_slash(dir), to_slash(file));
    let absolute = joined.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Module specifier for `import ... from "<here>"`, written in `from_file`,
/// pointing at `to_file`. Both are output paths relative to the same root;
/// an absolute `to_file` is imported by its absolute path.
pub fn module_specifier(from_file: &str, to_file: &str) -> String {
    if to_slash(to_file).starts_with('/') {
        let to = join_clean("/", to_file);
        return to.strip_suffix(".ts").map(str::to_string).unwrap_or(to);
    }
    let from = join_clean(".", from_file);
    let to = join_clean(".", to_file);

    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let (to_dir, to_name) = to_parts.split_at(to_parts.len() - 1);

    let common = from_dir
        .iter()
        .zip(to_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = Vec::new();
    segments.extend(std::iter::repeat("..").take(from_dir.len() - common));
    segments.extend(&to_dir[common..]);
    let name = to_name[0].strip_suffix(".ts").unwrap_or(to_name[0]);
    segments.push(name);

    let spec = segments.join("/");
    if spec.starts_with("../") {
        spec
    } else {
        format!("./{spec}")
    }
}

/// protoc's default `json_name`: drop underscores, upper-case what follows.
pub fn json_name(field_name: &str) -> String {
    let mut out = String::with_capacity(field_name.len());
    let mut upper_next = false;
    for c in field_name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

//! Service client classes.

use std::fmt::Write;

use gateway_ts_core::ir::{HttpIr, MethodIr, ServiceIr};

use crate::types::ts_type;

pub(crate) fn write_service(out: &mut String, service: &ServiceIr) -> std::fmt::Result {
    writeln!(out, "export class {} {{", service.identifier)?;
    for method in &service.methods {
        write_method(out, method)?;
    }
    writeln!(out, "}}")
}

fn write_method(out: &mut String, method: &MethodIr) -> std::fmt::Result {
    let request = ts_type(&method.request);
    let response = ts_type(&method.response);
    let url = request_url(&method.http);
    let init = request_init(&method.http);

    if method.server_streaming {
        writeln!(
            out,
            "  static {}(req: {request}, entityNotifier?: fm.NotifyStreamEntityArrival<{response}>, initReq?: fm.InitReq): Promise<void> {{",
            method.name
        )?;
        writeln!(
            out,
            "    return fm.fetchStreamingRequest<{request}, {response}>(`{url}`, entityNotifier, {init})"
        )?;
    } else {
        writeln!(
            out,
            "  static {}(req: {request}, initReq?: fm.InitReq): Promise<{response}> {{",
            method.name
        )?;
        writeln!(
            out,
            "    return fm.fetchReq<{request}, {response}>(`{url}`, {init})"
        )?;
    }
    writeln!(out, "  }}")
}

/// Template-literal body of the request URL: path parameters substituted
/// from `req`, plus the query string for body-less GET/DELETE.
fn request_url(http: &HttpIr) -> String {
    let mut url = escape_template_literal(&http.path);
    for param in &http.path_params {
        let escaped = escape_template_literal(&param.template);
        url = url.replacen(&escaped, &format!("${{{}}}", property_access(&param.field_path)), 1);
    }

    if sends_query(http) {
        let mut bound: Vec<String> = Vec::new();
        for param in &http.path_params {
            let key = param.field_path.join(".");
            if !bound.contains(&key) {
                bound.push(key);
            }
        }
        let excluded = bound
            .iter()
            .map(|name| format!("{name:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        url.push_str(&format!("?${{fm.renderURLSearchParams(req, [{excluded}])}}"));
    }
    url
}

fn sends_query(http: &HttpIr) -> bool {
    !http.has_body() && matches!(http.verb.as_str(), "GET" | "DELETE")
}

fn request_init(http: &HttpIr) -> String {
    match http.body.as_deref() {
        Some("*") => format!(
            "{{...initReq, method: {:?}, body: JSON.stringify(req, fm.replacer)}}",
            http.verb
        ),
        Some(field) => format!(
            "{{...initReq, method: {:?}, body: JSON.stringify(req[{field:?}], fm.replacer)}}",
            http.verb
        ),
        None => format!("{{...initReq, method: {:?}}}", http.verb),
    }
}

/// `req["a"]?.["b"]` for the path `a.b`.
fn property_access(path: &[String]) -> String {
    let mut access = "req".to_string();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            access.push_str("?.");
        }
        access.push_str(&format!("[{segment:?}]"));
    }
    access
}

fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

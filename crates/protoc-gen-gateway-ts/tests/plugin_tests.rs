//! End-to-end: encoded `CodeGeneratorRequest` → `CodeGeneratorResponse`.

use anyhow::Result;
use gateway_ts_core::FsProbe;
use gateway_ts_render::TypeScriptRenderer;
use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use protoc_gen_gateway_ts::wire::{
    RawCodeGeneratorRequest, RawEnum, RawEnumValue, RawField, RawFileDescriptor, RawHttpRule,
    RawMessage, RawMessageOptions, RawMethod, RawMethodOptions, RawOneof, RawPattern, RawService,
};
use protoc_gen_gateway_ts::{encode_response, generate, PluginRequest, FEATURE_PROTO3_OPTIONAL};

const TYPE_STRING: i32 = 9;
const TYPE_MESSAGE: i32 = 11;
const TYPE_ENUM: i32 = 14;
const TYPE_INT32: i32 = 5;
const LABEL_OPTIONAL: i32 = 1;
const LABEL_REPEATED: i32 = 3;

fn field(name: &str, number: i32, type_number: i32, type_name: Option<&str>) -> RawField {
    RawField {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(LABEL_OPTIONAL),
        r#type: Some(type_number),
        type_name: type_name.map(str::to_string),
        ..Default::default()
    }
}

fn common_file() -> RawFileDescriptor {
    RawFileDescriptor {
        name: Some("common/status.proto".to_string()),
        package: Some("common".to_string()),
        enum_type: vec![RawEnum {
            name: Some("Status".to_string()),
            value: vec![
                RawEnumValue {
                    name: Some("STATUS_UNKNOWN".to_string()),
                    number: Some(0),
                },
                RawEnumValue {
                    name: Some("STATUS_ACTIVE".to_string()),
                    number: Some(1),
                },
            ],
        }],
        ..Default::default()
    }
}

fn todo_file() -> RawFileDescriptor {
    let mut labels = field("labels", 3, TYPE_MESSAGE, Some(".todo.v1.Item.LabelsEntry"));
    labels.label = Some(LABEL_REPEATED);

    let mut note = field("note", 4, TYPE_STRING, None);
    note.oneof_index = Some(1);
    note.proto3_optional = Some(true);

    let mut due_date = field("due_date", 5, TYPE_STRING, None);
    due_date.oneof_index = Some(0);
    let mut due_days = field("due_in_days", 6, TYPE_INT32, None);
    due_days.oneof_index = Some(0);

    let item = RawMessage {
        name: Some("Item".to_string()),
        field: vec![
            field("item_id", 1, TYPE_STRING, None),
            field("status", 2, TYPE_ENUM, Some(".common.Status")),
            labels,
            note,
            due_date,
            due_days,
        ],
        nested_type: vec![RawMessage {
            name: Some("LabelsEntry".to_string()),
            field: vec![
                field("key", 1, TYPE_STRING, None),
                field("value", 2, TYPE_STRING, None),
            ],
            options: Some(RawMessageOptions {
                map_entry: Some(true),
            }),
            ..Default::default()
        }],
        oneof_decl: vec![
            RawOneof {
                name: Some("due".to_string()),
            },
            RawOneof {
                name: Some("_note".to_string()),
            },
        ],
        ..Default::default()
    };

    let bound = |name: &str, pattern: RawPattern, body: &str| RawMethod {
        name: Some(name.to_string()),
        input_type: Some(".todo.v1.Item".to_string()),
        output_type: Some(".todo.v1.Item".to_string()),
        options: Some(RawMethodOptions {
            http: Some(RawHttpRule {
                pattern: Some(pattern),
                body: body.to_string(),
                ..Default::default()
            }),
        }),
        ..Default::default()
    };

    RawFileDescriptor {
        name: Some("todo/v1/todo.proto".to_string()),
        package: Some("todo.v1".to_string()),
        dependency: vec!["common/status.proto".to_string()],
        message_type: vec![item],
        service: vec![RawService {
            name: Some("TodoService".to_string()),
            method: vec![
                bound("CreateItem", RawPattern::Post("/v1/items".to_string()), "*"),
                bound(
                    "GetItem",
                    RawPattern::Get("/v1/items/{item_id}".to_string()),
                    "",
                ),
                RawMethod {
                    name: Some("Compact".to_string()),
                    input_type: Some(".todo.v1.Item".to_string()),
                    output_type: Some(".todo.v1.Item".to_string()),
                    ..Default::default()
                },
            ],
        }],
        ..Default::default()
    }
}

fn request_bytes(parameter: &str, to_generate: &[&str]) -> Vec<u8> {
    RawCodeGeneratorRequest {
        file_to_generate: to_generate.iter().map(|s| s.to_string()).collect(),
        parameter: Some(parameter.to_string()),
        proto_file: vec![common_file(), todo_file()],
    }
    .encode_to_vec()
}

fn run(
    parameter: &str,
    to_generate: &[&str],
    root: &std::path::Path,
) -> Result<CodeGeneratorResponse> {
    let request = PluginRequest::decode(&request_bytes(parameter, to_generate))?;
    let response = generate(&request, TypeScriptRenderer::new(), FsProbe::rooted(root));
    Ok(CodeGeneratorResponse::decode(
        encode_response(&response).as_slice(),
    )?)
}

fn content<'a>(response: &'a CodeGeneratorResponse, name: &str) -> Option<&'a str> {
    response
        .file
        .iter()
        .find(|f| f.name.as_deref() == Some(name))
        .and_then(|f| f.content.as_deref())
}

#[test]
fn generates_module_and_fetch_helper() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let response = run("", &["todo/v1/todo.proto"], dir.path())?;
    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(FEATURE_PROTO3_OPTIONAL));

    let names: Vec<_> = response.file.iter().filter_map(|f| f.name.as_deref()).collect();
    assert_eq!(names, vec!["todo/v1/todo.pb.ts", "fetch.pb.ts"]);

    let ts = content(&response, "todo/v1/todo.pb.ts").unwrap_or_default();
    assert!(ts.contains("import * as fm from \"../../fetch.pb\""));
    assert!(ts.contains("import { common$Status } from \"../../common/status.pb\""));
    assert!(ts.contains("type todo$v1$Item$$Base = {"));
    assert!(ts.contains("  itemId?: string\n"));
    assert!(ts.contains("  status?: common$Status\n"));
    assert!(ts.contains("  labels?: {[key: string]: string}\n"));
    // proto3 optional stays a plain field
    assert!(ts.contains("  note?: string\n"));
    assert!(ts.contains("& OneOf<{ dueDate: string; dueInDays: number }>"));
    assert!(!ts.contains("LabelsEntry"));
    assert!(ts.contains("export class todo$v1$TodoService {"));
    assert!(ts.contains("static CreateItem(req: todo$v1$Item, initReq?: fm.InitReq): Promise<todo$v1$Item>"));
    assert!(ts.contains("`/v1/items/${req[\"itemId\"]}?${fm.renderURLSearchParams(req, [\"itemId\"])}`"));
    assert!(!ts.contains("Compact"));
    Ok(())
}

#[test]
fn dependency_without_services_renders_alone() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let response = run("", &["common/status.proto"], dir.path())?;
    assert_eq!(response.file.len(), 1);
    let ts = content(&response, "common/status.pb.ts").unwrap_or_default();
    assert!(ts.contains("export enum common$Status {"));
    assert!(ts.contains("  STATUS_ACTIVE = \"STATUS_ACTIVE\","));
    Ok(())
}

#[test]
fn second_run_skips_unchanged_fetch_helper() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let params = "fetch_module_directory=lib,enable_styling_check=true";

    let first = run(params, &["todo/v1/todo.proto"], dir.path())?;
    let helper = content(&first, "lib/fetch.pb.ts").unwrap_or_default();
    assert!(!helper.is_empty());
    assert!(!helper.contains("@ts-nocheck"));

    std::fs::create_dir_all(dir.path().join("lib"))?;
    std::fs::write(dir.path().join("lib/fetch.pb.ts"), helper)?;

    let second = run(params, &["todo/v1/todo.proto"], dir.path())?;
    assert_eq!(second.file.len(), 1);
    assert_eq!(content(&second, "lib/fetch.pb.ts"), None);
    Ok(())
}

#[test]
fn unknown_reference_is_reported_in_response() -> Result<()> {
    let mut todo = todo_file();
    todo.dependency.clear();
    let bytes = RawCodeGeneratorRequest {
        file_to_generate: vec!["todo/v1/todo.proto".to_string()],
        parameter: None,
        proto_file: vec![todo],
    }
    .encode_to_vec();

    let dir = tempfile::tempdir()?;
    let request = PluginRequest::decode(&bytes)?;
    let response = generate(&request, TypeScriptRenderer::new(), FsProbe::rooted(dir.path()));
    assert!(response.file.is_empty());
    let error = response.error.unwrap_or_default();
    assert!(error.contains("common.Status"), "{error}");
    assert!(error.contains("todo/v1/todo.proto"), "{error}");
    Ok(())
}

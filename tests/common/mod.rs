#![allow(dead_code)]

use onready_gen::prelude::*;
use serde_json::{json, Value};

/// 宿主类型层级：Node / Resource 以及各自的几个子类
pub fn host_types() -> Vec<Value> {
    vec![
        json!({ "name": "Object", "namespace": "Godot" }),
        json!({ "name": "Node", "namespace": "Godot", "base": "Godot.Object" }),
        json!({ "name": "Resource", "namespace": "Godot", "base": "Godot.Object" }),
        json!({ "name": "Spatial", "namespace": "Godot", "base": "Godot.Node" }),
        json!({ "name": "Label", "namespace": "Godot", "base": "Godot.Node" }),
        json!({ "name": "Texture", "namespace": "Godot", "base": "Godot.Resource" }),
        json!({ "name": "PackedScene", "namespace": "Godot", "base": "Godot.Resource" }),
    ]
}

pub fn snapshot(types: Vec<Value>, classes: &[&str]) -> Value {
    let mut all = host_types();
    all.extend(types);
    let classes: Vec<Value> = classes
        .iter()
        .map(|c| json!({ "name": c, "location": { "file": "Game.cs", "line": 1, "column": 1 } }))
        .collect();
    json!({ "types": all, "classes": classes })
}

pub fn run(types: Vec<Value>, classes: &[&str]) -> GenerationOutput {
    init_tracing();
    onready_gen::generate_from_json(&snapshot(types, classes).to_string())
        .expect("generation aborted")
}

/// 一个 Game 命名空间下、继承 Godot.Node 的类
pub fn node_class(name: &str, fields: Value) -> Value {
    json!({
        "name": name,
        "namespace": "Game",
        "base": "Godot.Node",
        "fields": fields,
    })
}

pub fn source<'a>(out: &'a GenerationOutput, hint: &str) -> &'a str {
    out.sources
        .iter()
        .find(|s| s.hint_name == hint)
        .map(|s| s.text.as_str())
        .unwrap_or_else(|| panic!("no generated source {hint}"))
}

pub fn codes(out: &GenerationOutput) -> Vec<&'static str> {
    out.diagnostics.iter().map(|d| d.code).collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

mod common;

use common::*;
use serde_json::{json, Value};

/// 注入源：一个 int 属性、两个 string 字段、一个节点字段
fn provider() -> Value {
    json!({
        "name": "Provider",
        "namespace": "Game",
        "base": "Godot.Node",
        "properties": [
            { "name": "Provided2", "type": "int" },
            { "name": "<Provided2>k__BackingField", "type": "int", "implicit": true }
        ],
        "fields": [
            { "name": "Provided3", "type": "string" },
            { "name": "Provided4", "type": "string" },
            { "name": "Camera", "type": "Godot.Spatial" }
        ]
    })
}

fn consumer(member: &str, ty: &str, args: Value) -> Value {
    node_class(
        "Consumer",
        json!([{
            "name": member,
            "type": ty,
            "attributes": [{ "name": "InjectAncestorValue", "args": args }]
        }]),
    )
}

#[test]
fn unique_member_of_ancestor_is_projected() {
    let out = run(
        vec![
            provider(),
            consumer("_count", "int", json!([{ "type": "Game.Provider" }])),
        ],
        &["Game.Consumer"],
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let text = source(&out, "Partial_Game_Consumer");
    let expected = "\
\t\t\t{
\t\t\t\tvar ancestor = (FindParent(\"Provider\") ?? throw new Exception(\"FindParent(\\\"Provider\\\") found no parent.\"))
\t\t\t\t\tas global::Game.Provider ?? throw new Exception(\"FindParent(\\\"Provider\\\") is not of type \\\"global::Game.Provider\\\".\");
\t\t\t\t_count = ancestor.Provided2;
\t\t\t}
";
    assert!(text.contains(expected), "{text}");
}

#[test]
fn subtype_members_count_as_matches() {
    let out = run(
        vec![
            provider(),
            consumer("_view", "Godot.Node", json!([{ "type": "Game.Provider" }, "Root"])),
        ],
        &["Game.Consumer"],
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let text = source(&out, "Partial_Game_Consumer");
    assert!(text.contains("FindParent(\"Root\")"));
    assert!(text.contains("_view = ancestor.Camera;"));
}

#[test]
fn ancestor_of_member_type_is_assigned_directly() {
    let out = run(
        vec![provider(), consumer("_provider", "Game.Provider", json!([]))],
        &["Game.Consumer"],
    );
    assert!(out.diagnostics.is_empty());
    let text = source(&out, "Partial_Game_Consumer");
    assert!(text.contains("_provider = ancestor;"));
    assert!(text.contains("as global::Game.Provider ??"));
}

#[test]
fn no_matching_member_is_an_error() {
    let out = run(
        vec![
            provider(),
            consumer("_tex", "Godot.Texture", json!([{ "type": "Game.Provider" }])),
        ],
        &["Game.Consumer"],
    );
    assert_eq!(codes(&out), vec!["ORG0004"]);
    assert!(out.sources.is_empty());
}

#[test]
fn several_matching_members_are_listed() {
    let out = run(
        vec![
            provider(),
            consumer("_name", "string", json!([{ "type": "Game.Provider" }])),
        ],
        &["Game.Consumer"],
    );
    assert_eq!(codes(&out), vec!["ORG0005"]);
    let msg = &out.diagnostics.iter().next().unwrap().message;
    assert!(msg.ends_with("Found: Provided3, Provided4"), "{msg}");
    assert!(out.sources.is_empty());
}

#[test]
fn unknown_ancestor_type_is_an_error() {
    let out = run(
        vec![consumer("_x", "int", json!([{ "type": "Game.Nowhere" }]))],
        &["Game.Consumer"],
    );
    assert_eq!(codes(&out), vec!["ORG0009"]);
}

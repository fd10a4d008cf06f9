mod common;

use common::*;
use onready_gen::prelude::*;
use serde_json::json;

#[test]
fn nullable_node_fetch_with_default_pattern() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "_sprite",
                "type": "Godot.Spatial",
                "attributes": [{ "name": "OnReadyGet", "args": ["Example"], "named": { "OrNull": true } }]
            }]),
        )],
        &["Game.Player"],
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);

    let expected = "\
// <auto-generated />
using Godot;
using System;

namespace Game
{
\tpublic partial class Player
\t{
\t\t[Export] public NodePath SpritePath { get; set; }
\t\t\t= \"Example\";

\t\tpublic override void _Ready()
\t\t{
\t\t\tbase._Ready();

\t\t\tif (SpritePath != null)
\t\t\t{
\t\t\t\t_sprite = GetNodeOrNull<global::Godot.Spatial>(SpritePath);
\t\t\t}
\t\t}
\t}
}
";
    assert_eq!(source(&out, "Partial_Game_Player"), expected);
}

#[test]
fn node_fetch_without_or_null_gets_null_check() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "_label",
                "type": "Godot.Label",
                "attributes": [{ "name": "OnReadyGetAttribute" }]
            }]),
        )],
        &["Game.Player"],
    );
    let text = source(&out, "Partial_Game_Player");
    assert!(text.contains("[Export] public NodePath LabelPath { get; set; }\n"));
    assert!(!text.contains("= \""), "no default expected:\n{text}");
    assert!(text.contains("if (_label == null)"));
    assert!(text.contains("Member '_label' is null in '{Name}' '{this}'. Ensure 'LabelPath' is set correctly"));
    assert!(text.contains("OrNull = true"));
}

#[test]
fn resource_without_default_only_null_checks() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "_tex",
                "type": "Godot.Texture",
                "attributes": [{ "name": "OnReadyGet" }]
            }]),
        )],
        &["Game.Player"],
    );
    assert!(out.diagnostics.is_empty());
    let text = source(&out, "Partial_Game_Player");
    assert!(text.contains("[Export] public global::Godot.Texture TexResource"));
    assert!(text.contains("set { _hasBeenSet_tex = true; _tex = value; }"));
    assert!(text.contains("private bool _hasBeenSet_tex;"));
    assert!(!text.contains("GD.Load"));
    assert!(!text.contains("public Player()"));
    assert!(text.contains("if (_tex == null)"));
    assert!(text.contains("Ensure 'TexResource' is set correctly"));
}

#[test]
fn resource_with_default_loads_in_editor_and_on_ready() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "_scene",
                "type": "Godot.PackedScene",
                "attributes": [{ "name": "OnReadyGet", "named": { "Default": "res://enemy.tscn", "OrNull": true } }]
            }]),
        )],
        &["Game.Player"],
    );
    let text = source(&out, "Partial_Game_Player");
    let ctor = "\
\t\tpublic Player()
\t\t{
\t\t\tif (Engine.EditorHint)
\t\t\t{
\t\t\t\t_scene = GD.Load<global::Godot.PackedScene>(\"res://enemy.tscn\");
\t\t\t}
\t\t\tConstructor();
\t\t}

\t\tpartial void Constructor();
";
    assert!(text.contains(ctor), "{text}");
    assert!(text.contains("if (!_hasBeenSet_scene)"));
    assert!(!text.contains("== null"));
}

#[test]
fn resource_with_default_and_no_or_null_loads_then_checks() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "_tex",
                "type": "Godot.Texture",
                "attributes": [{ "name": "OnReadyGet", "args": ["res://icon.png"] }]
            }]),
        )],
        &["Game.Player"],
    );
    assert!(out.diagnostics.is_empty());
    let text = source(&out, "Partial_Game_Player");
    let lifecycle = "\
\t\t\tif (!_hasBeenSet_tex)
\t\t\t{
\t\t\t\t_tex = GD.Load<global::Godot.Texture>(\"res://icon.png\");
\t\t\t}
\t\t\tif (_tex == null)
\t\t\t{
\t\t\t\tthrow new NullReferenceException(";
    assert!(text.contains(lifecycle), "{text}");
    assert!(text.contains("Ensure 'TexResource' is set correctly"));
}

#[test]
fn constructor_loads_follow_discovery_order() {
    // 属性先于字段被发现
    let out = run(
        vec![json!({
            "name": "Player",
            "namespace": "Game",
            "base": "Godot.Node",
            "fields": [{
                "name": "_icon",
                "type": "Godot.Texture",
                "attributes": [{ "name": "OnReadyGet", "args": ["res://icon.png"] }]
            }],
            "properties": [{
                "name": "Scene",
                "type": "Godot.PackedScene",
                "attributes": [{ "name": "OnReadyGet", "args": ["res://level.tscn"] }]
            }]
        })],
        &["Game.Player"],
    );
    let text = source(&out, "Partial_Game_Player");
    let ctor_start = text.find("public Player()").expect("no constructor");
    let ctor_end = text.find("Constructor();").expect("no hook call");
    let ctor = &text[ctor_start..ctor_end];
    let scene = ctor.find("Scene = GD.Load<global::Godot.PackedScene>(\"res://level.tscn\");");
    let icon = ctor.find("_icon = GD.Load<global::Godot.Texture>(\"res://icon.png\");");
    assert!(matches!((scene, icon), (Some(s), Some(i)) if s < i), "{text}");
    assert_eq!(ctor.matches("if (Engine.EditorHint)").count(), 2);
}

#[test]
fn resource_or_null_without_default_has_no_lifecycle() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "_tex",
                "type": "Godot.Texture",
                "attributes": [{ "name": "OnReadyGet", "named": { "OrNull": true } }]
            }]),
        )],
        &["Game.Player"],
    );
    let text = source(&out, "Partial_Game_Player");
    assert!(text.contains("TexResource"));
    assert!(!text.contains("_Ready"));
}

#[test]
fn private_suppresses_export_marker() {
    let out = run(
        vec![node_class(
            "Player",
            json!([{
                "name": "Camera",
                "type": "Godot.Spatial",
                "attributes": [{ "name": "OnReadyGet", "args": ["Cam"], "named": { "Private": true } }]
            }]),
        )],
        &["Game.Player"],
    );
    let text = source(&out, "Partial_Game_Player");
    assert!(text.contains("\t\tpublic NodePath CameraPath { get; set; }"));
    assert!(!text.contains("[Export]"));
}

#[test]
fn property_drilling_ignores_member_category() {
    let out = run(
        vec![node_class(
            "Hud",
            json!([{
                "name": "_title",
                "type": "string",
                "attributes": [{ "name": "OnReadyGet", "args": ["Title"], "named": { "Property": "text" } }]
            }]),
        )],
        &["Game.Hud"],
    );
    assert!(out.diagnostics.is_empty());
    let text = source(&out, "Partial_Game_Hud");
    assert!(text.contains("_title = (string)GetNodeOrNull(TitlePath)?.Get(\"text\");"));
}

#[test]
fn find_honours_flags() {
    let out = run(
        vec![node_class(
            "Menu",
            json!([
                {
                    "name": "_start",
                    "type": "Godot.Label",
                    "attributes": [{ "name": "OnReadyFind", "args": ["Start*"], "named": { "Recursive": false } }]
                },
                {
                    "name": "_quit",
                    "type": "Godot.Label",
                    "attributes": [{ "name": "OnReadyFind", "named": { "Owned": false, "OrNull": true } }]
                }
            ]),
        )],
        &["Game.Menu"],
    );
    assert!(out.diagnostics.is_empty());
    let text = source(&out, "Partial_Game_Menu");
    assert!(text.contains("[Export] public string StartMask { get; set; }\n\t\t\t= \"Start*\";"));
    assert!(text.contains("_start = FindNode(StartMask, recursive: false) as global::Godot.Label;"));
    assert!(text.contains("_quit = FindNode(QuitMask, owned: false) as global::Godot.Label;"));
    // 无默认值的 mask 初始化为空串
    assert!(text.contains("[Export] public string QuitMask { get; set; }\n\t\t\t= \"\";"));
    assert!(text.contains("Ensure 'StartMask' is set correctly"));
    assert!(!text.contains("if (_quit == null)"));
}

#[test]
fn find_on_resource_is_rejected() {
    let out = run(
        vec![node_class(
            "Menu",
            json!([{
                "name": "_tex",
                "type": "Godot.Texture",
                "attributes": [{ "name": "OnReadyFind" }]
            }]),
        )],
        &["Game.Menu"],
    );
    assert_eq!(codes(&out), vec!["ORG0008"]);
    assert!(out.sources.is_empty());
}

#[test]
fn nullable_annotation_and_properties_are_supported() {
    let out = run(
        vec![json!({
            "name": "Player",
            "namespace": "Game",
            "base": "Godot.Spatial",
            "properties": [{
                "name": "Target",
                "type": "Godot.Label?",
                "attributes": [{ "name": "OnReadyGet", "named": { "OrNull": true } }]
            }]
        })],
        &["Game.Player"],
    );
    let text = source(&out, "Partial_Game_Player");
    assert!(text.contains("Target = GetNodeOrNull<global::Godot.Label>(TargetPath);"));
}

#[test]
fn generic_member_resolves_through_constraint() {
    let out = run(
        vec![json!({
            "name": "Holder",
            "namespace": "Game",
            "base": "Godot.Node",
            "type_params": [{ "name": "T", "constraints": ["Godot.Spatial"] }],
            "fields": [{
                "name": "_item",
                "type": "T",
                "attributes": [{ "name": "OnReadyGet", "args": ["Item"] }]
            }]
        })],
        &["Game.Holder"],
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let text = source(&out, "Partial_Game_Holder`1");
    assert!(text.contains("public partial class Holder<T>"));
    assert!(text.contains("_item = GetNodeOrNull<T>(ItemPath);"));
}

#[test]
fn default_config_names_the_well_known_types() {
    let cfg = GenConfig::default();
    assert_eq!(cfg.node_type, "Godot.Node");
    assert_eq!(cfg.resource_type, "Godot.Resource");
    let partial = GenConfig::from_json(r#"{ "lifecycle_method": "_EnterTree" }"#).unwrap();
    assert_eq!(partial.lifecycle_method, "_EnterTree");
    assert_eq!(partial.usings, cfg.usings);
}

#[test]
fn config_overlay_keeps_keys_it_does_not_name() {
    let base = GenConfig::from_json(r#"{ "node_type": "Engine.Node", "usings": ["Engine"] }"#).unwrap();
    let merged = base
        .overlay_json(r#"{ "lifecycle_method": "_EnterTree" }"#)
        .unwrap();
    assert_eq!(merged.node_type, "Engine.Node");
    assert_eq!(merged.usings, vec!["Engine".to_string()]);
    assert_eq!(merged.lifecycle_method, "_EnterTree");
    assert_eq!(merged.resource_type, "Godot.Resource");

    assert!(base.overlay_json("[1, 2]").is_err());
}

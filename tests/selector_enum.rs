mod common;

use common::*;
use serde_json::json;

#[test]
fn enum_lists_static_readonly_fields_in_order() {
    let out = run(
        vec![json!({
            "name": "Items",
            "attributes": [{ "name": "GenerateDataSelectorEnum", "args": ["ItemKind"] }],
            "fields": [
                { "name": "A", "type": "Items", "static": true, "readonly": true },
                { "name": "count", "type": "int" },
                { "name": "B", "type": "Items", "static": true, "readonly": true },
                { "name": "<B>k__BackingField", "type": "Items", "static": true, "readonly": true, "implicit": true }
            ]
        })],
        &["Items"],
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let expected = "\
// <auto-generated />
using Godot;
using System;

public partial class Items
{
\tpublic static Items Get(ItemKind key)
\t{
\t\tswitch (key)
\t\t{
\t\t\tcase ItemKind.A: return A;
\t\t\tcase ItemKind.B: return B;
\t\t}
\t\tthrow new ArgumentOutOfRangeException(\"key\");
\t}
}

public enum ItemKind
{
\tA,
\tB,
}

public static class ItemKindExtensions
{
\tpublic static Items GetData(this ItemKind v) => Items.Get(v);
}
";
    assert_eq!(source(&out, "Partial__Items"), expected);
}

#[test]
fn enum_needs_a_name() {
    let out = run(
        vec![json!({
            "name": "Items",
            "attributes": [{ "name": "GenerateDataSelectorEnum", "args": [""] }]
        })],
        &["Items"],
    );
    assert_eq!(codes(&out), vec!["ORG0010"]);
    assert!(out.sources.is_empty());
}

#[test]
fn enum_on_generic_class_is_refused() {
    let out = run(
        vec![json!({
            "name": "Table",
            "namespace": "Game",
            "type_params": [{ "name": "T" }],
            "attributes": [{ "name": "GenerateDataSelectorEnum", "args": ["Row"] }]
        })],
        &["Game.Table"],
    );
    assert_eq!(codes(&out), vec!["ORG0012"]);
}

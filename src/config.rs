use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_NODE_TYPE: &str = "Godot.Node";
pub const DEFAULT_RESOURCE_TYPE: &str = "Godot.Resource";
pub const DEFAULT_LIFECYCLE_METHOD: &str = "_Ready";
pub const DEFAULT_EDITOR_HINT: &str = "Engine.EditorHint";
pub const DEFAULT_HEADER: &str = "// <auto-generated />";
pub const DEFAULT_USINGS: &[&str] = &["Godot", "System"];

/// Generation settings. Every field falls back to its default when absent,
/// so a snapshot may carry a partial `config` object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenConfig {
    /// Full name of the path-addressable root type.
    pub node_type: String,
    /// Full name of the resource-loadable root type.
    pub resource_type: String,
    pub usings: Vec<String>,
    pub lifecycle_method: String,
    /// Boolean expression that is true while running inside the editor.
    pub editor_hint: String,
    /// First line of every generated unit; empty disables it.
    pub header: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            node_type: DEFAULT_NODE_TYPE.to_string(),
            resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            usings: DEFAULT_USINGS.iter().map(|s| s.to_string()).collect(),
            lifecycle_method: DEFAULT_LIFECYCLE_METHOD.to_string(),
            editor_hint: DEFAULT_EDITOR_HINT.to_string(),
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl GenConfig {
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Layers a partial JSON object over `self`: keys present in `text`
    /// win, absent keys keep their current value.
    pub fn overlay_json(&self, text: &str) -> crate::error::Result<Self> {
        let mut merged = serde_json::to_value(self)?;
        let overlay: Value = serde_json::from_str(text)?;
        match (&mut merged, overlay) {
            (Value::Object(base), Value::Object(over)) => base.extend(over),
            // 非对象：交给反序列化报错
            (_, other) => return Ok(serde_json::from_value(other)?),
        }
        Ok(serde_json::from_value(merged)?)
    }
}

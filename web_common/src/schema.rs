//! Server-declared type schemas for devices and teleop groups.
//!
//! Each node reports its installed device and teleop-group classes along
//! with the config fields they need; the client renders forms from these
//! descriptors without knowing any concrete type up front. `IndexMap`
//! keeps the server's declaration order, which is also the render order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /api/device/types?node_id=`: category, then type, then descriptor.
pub type DeviceTypeCatalog = IndexMap<String, IndexMap<String, DeviceTypeInfo>>;

/// `GET /api/teleop-groups/types?node_id=`: type name to descriptor.
pub type TeleopTypeCatalog = IndexMap<String, TeleopTypeInfo>;

/// Descriptor for one device type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeInfo {
    /// Human-readable name, shown in the type selector.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Config fields this type needs, in declaration order.
    #[serde(default)]
    pub need_config: IndexMap<String, DeviceField>,
}

/// One configurable field of a device type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceField {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
}

/// Widget kind chosen from a field's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Text,
    Checkbox,
}

impl InputKind {
    /// Value for the HTML `type` attribute.
    pub fn html_type(self) -> &'static str {
        match self {
            InputKind::Number => "number",
            InputKind::Text => "text",
            InputKind::Checkbox => "checkbox",
        }
    }
}

impl DeviceField {
    /// `integer`/`number` render numeric inputs, `boolean` a checkbox,
    /// `string` and anything unrecognized a plain text input.
    pub fn input_kind(&self) -> InputKind {
        match self.field_type.as_str() {
            "integer" | "number" => InputKind::Number,
            "boolean" => InputKind::Checkbox,
            _ => InputKind::Text,
        }
    }

    /// Initial input value from the declared default, if any.
    ///
    /// String defaults render verbatim; other JSON values use their
    /// canonical text (`30`, `true`, ...).
    pub fn default_text(&self) -> Option<String> {
        match self.default.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Descriptor for one teleop-group type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleopTypeInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Device roles this group type binds, in declaration order.
    #[serde(default)]
    pub need_config: Vec<RoleField>,
}

/// One device role of a teleop-group type. Only devices whose type equals
/// `device_type` are eligible for the role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub device_type: String,
}

/// Human label for a device category; unrecognized categories display as-is.
pub fn category_label(category: &str) -> &str {
    match category {
        "Camera" => "Camera",
        "Robot" => "Robotic arm",
        "VR" => "VR rig",
        "Hand" => "Robotic hand",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(field_type: &str, default: Option<Value>) -> DeviceField {
        DeviceField {
            field_type: field_type.to_string(),
            description: String::new(),
            default,
            required: false,
        }
    }

    #[test]
    fn input_kind_mapping() {
        assert_eq!(field("integer", None).input_kind(), InputKind::Number);
        assert_eq!(field("number", None).input_kind(), InputKind::Number);
        assert_eq!(field("string", None).input_kind(), InputKind::Text);
        assert_eq!(field("boolean", None).input_kind(), InputKind::Checkbox);
        // Unknown declared types fall back to text.
        assert_eq!(field("enum", None).input_kind(), InputKind::Text);
    }

    #[test]
    fn default_text_uses_canonical_json_text() {
        assert_eq!(field("integer", Some(json!(30))).default_text(), Some("30".into()));
        assert_eq!(field("boolean", Some(json!(true))).default_text(), Some("true".into()));
        assert_eq!(
            field("string", Some(json!("0123-serial"))).default_text(),
            Some("0123-serial".into())
        );
        assert_eq!(field("string", Some(json!(null))).default_text(), None);
        assert_eq!(field("string", None).default_text(), None);
    }

    #[test]
    fn unknown_category_labels_pass_through() {
        assert_eq!(category_label("Robot"), "Robotic arm");
        assert_eq!(category_label("Lidar"), "Lidar");
    }
}

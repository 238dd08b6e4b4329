//! Schema-driven config form plumbing shared by the device and teleop
//! modals.
//!
//! Config inputs live in a single value map under the reserved `config_`
//! namespace; `collect_config` strips the prefix on submit, so a default
//! seeded by the renderer round-trips untouched. `FetchToken` guards every
//! dependent-selector refetch: a response rendered late, after the user
//! already changed the selection again, is discarded instead of
//! overwriting the newer state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use web_common::{Device, DeviceField, DeviceTypeCatalog, InputKind, RoleField};

pub const CONFIG_PREFIX: &str = "config_";

/// Namespace a schema field name for the form value map.
pub fn prefixed(field: &str) -> String {
    format!("{CONFIG_PREFIX}{field}")
}

/// Extract the config mapping from submitted values.
///
/// Left-inverse of [`prefixed`]: `config_x -> x`; keys outside the
/// namespace are excluded.
pub fn collect_config<I, K, V>(values: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    values
        .into_iter()
        .filter_map(|(key, value)| {
            key.as_ref()
                .strip_prefix(CONFIG_PREFIX)
                .map(|field| (field.to_string(), value.into()))
        })
        .collect()
}

/// Request-generation guard for superseded in-flight fetches.
///
/// Issue a token before dispatching; apply the response only while the
/// token is still current. There is no cancellation: stale responses
/// simply never touch state.
#[derive(Clone, Default)]
pub struct FetchToken {
    current: Arc<AtomicU64>,
}

impl FetchToken {
    pub fn issue(&self) -> u64 {
        self.current.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current.load(Ordering::Relaxed) == token
    }
}

/// Config section state for the modals.
///
/// `Empty` is a confirmed zero-field schema and renders an explicit
/// "no configuration needed" placeholder; `Loading` and `NotSelected`
/// are the states that must stay distinguishable from it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigFields {
    /// No type selected yet; nothing to show.
    NotSelected,
    /// Selection made, descriptors still in flight.
    Loading,
    /// Type confirmed to need no configuration.
    Empty,
    /// Device-type fields in declaration order.
    Fields(Vec<(String, DeviceField)>),
    /// Teleop roles with their eligible devices.
    Roles(Vec<RoleOptions>),
}

/// A teleop role plus the currently eligible devices for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleOptions {
    pub role: RoleField,
    pub devices: Vec<Device>,
}

/// Devices a role can bind. Type equality is the only criterion; which
/// node owns the device does not matter.
pub fn eligible_devices(devices: &[Device], role: &RoleField) -> Vec<Device> {
    devices
        .iter()
        .filter(|device| device.device_type == role.device_type)
        .cloned()
        .collect()
}

impl ConfigFields {
    pub fn from_device_fields(fields: Vec<(String, DeviceField)>) -> Self {
        if fields.is_empty() {
            ConfigFields::Empty
        } else {
            ConfigFields::Fields(fields)
        }
    }

    pub fn from_roles(roles: Vec<RoleOptions>) -> Self {
        if roles.is_empty() {
            ConfigFields::Empty
        } else {
            ConfigFields::Roles(roles)
        }
    }
}

/// Outcome of resolving the category/type selection against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResolution {
    /// Selection made, catalog still in flight.
    Loading,
    /// No complete selection; the config section and its values clear.
    NotSelected,
    /// Selected type is gone from the catalog; the selection must drop.
    UnknownType,
    /// Declared fields plus the seeded value map.
    Resolved {
        fields: ConfigFields,
        values: BTreeMap<String, String>,
    },
}

/// Rebuild the config section for the current selection.
///
/// Every upstream change funnels through this resolution and downstream
/// state is replaced wholesale, so a value from the previous type can
/// never leak into the next one. `prefill` is consumed on the first
/// resolved selection and ignored afterwards.
pub fn resolve_device_config(
    catalog: Option<&DeviceTypeCatalog>,
    category: &str,
    device_type: &str,
    prefill: &mut Option<BTreeMap<String, String>>,
) -> ConfigResolution {
    let Some(catalog) = catalog else {
        return if device_type.is_empty() {
            ConfigResolution::NotSelected
        } else {
            ConfigResolution::Loading
        };
    };
    if category.is_empty() || device_type.is_empty() {
        return ConfigResolution::NotSelected;
    }
    let Some(info) = catalog.get(category).and_then(|types| types.get(device_type)) else {
        return ConfigResolution::UnknownType;
    };
    let declared: Vec<(String, DeviceField)> = info
        .need_config
        .iter()
        .map(|(field, descriptor)| (field.clone(), descriptor.clone()))
        .collect();
    let mut values = seed_defaults(&declared);
    if let Some(existing) = prefill.take() {
        for (field, value) in existing {
            values.insert(prefixed(&field), value);
        }
    }
    ConfigResolution::Resolved {
        fields: ConfigFields::from_device_fields(declared),
        values,
    }
}

/// Whether the config section is settled enough to submit. A confirmed
/// empty schema is submittable; descriptors still in flight are not.
pub fn config_ready(fields: &ConfigFields) -> bool {
    !matches!(fields, ConfigFields::Loading)
}

/// Seed the prefixed value map from declared defaults.
///
/// Checkboxes always get a value so an untouched form still submits
/// `false` rather than omitting the field.
pub fn seed_defaults(fields: &[(String, DeviceField)]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|(name, field)| {
            let value = match field.input_kind() {
                InputKind::Checkbox => {
                    Some(field.default_text().unwrap_or_else(|| "false".to_string()))
                }
                _ => field.default_text(),
            };
            value.map(|v| (prefixed(name), v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(field_type: &str, default: Option<serde_json::Value>, required: bool) -> DeviceField {
        DeviceField {
            field_type: field_type.to_string(),
            description: String::new(),
            default,
            required,
        }
    }

    #[test]
    fn collect_config_strips_namespace_and_drops_the_rest() {
        let collected = collect_config(vec![
            ("config_x", "v"),
            ("name", "cam"),
            ("node_id", "1"),
            ("config_serial", "0123"),
        ]);

        assert_eq!(collected.len(), 2);
        assert_eq!(collected["x"], "v");
        assert_eq!(collected["serial"], "0123");
    }

    #[test]
    fn seeded_defaults_round_trip_unedited() {
        let fields = vec![
            ("target_fps".to_string(), field("integer", Some(json!(30)), false)),
            ("serial".to_string(), field("string", None, true)),
            ("flip".to_string(), field("boolean", None, false)),
        ];

        let values = seed_defaults(&fields);
        assert_eq!(values.get("config_target_fps"), Some(&"30".to_string()));
        // No default, no seeded value; checkboxes still submit false.
        assert_eq!(values.get("config_serial"), None);
        assert_eq!(values.get("config_flip"), Some(&"false".to_string()));

        let config = collect_config(values);
        assert_eq!(config["target_fps"], "30");
        assert_eq!(config["flip"], "false");
    }

    #[test]
    fn zero_field_schema_is_confirmed_empty() {
        assert!(matches!(ConfigFields::from_device_fields(Vec::new()), ConfigFields::Empty));
        assert!(matches!(ConfigFields::from_roles(Vec::new()), ConfigFields::Empty));
        let one = vec![("serial".to_string(), field("string", None, false))];
        assert!(matches!(ConfigFields::from_device_fields(one), ConfigFields::Fields(_)));
        // Empty is not the same state as a pending load.
        assert!(ConfigFields::Empty != ConfigFields::Loading);
        assert!(ConfigFields::Empty != ConfigFields::NotSelected);
    }

    fn catalog() -> DeviceTypeCatalog {
        serde_json::from_value(json!({
            "Camera": {
                "usb_cam": {
                    "name": "USB Camera",
                    "need_config": {
                        "serial": {"type": "string", "required": true},
                        "target_fps": {"type": "integer", "default": 30}
                    }
                }
            },
            "VR": {
                "quest": {
                    "name": "Quest Headset",
                    "need_config": {
                        "profile": {"type": "string"}
                    }
                }
            }
        }))
        .unwrap()
    }

    fn device(id: i64, node_id: i64, device_type: &str) -> Device {
        serde_json::from_value(json!({
            "id": id,
            "node_id": node_id,
            "name": format!("dev-{id}"),
            "category": "Camera",
            "type": device_type,
            "config": {}
        }))
        .unwrap()
    }

    #[test]
    fn category_switch_clears_downstream_before_a_new_type_shows() {
        let catalog = catalog();
        let mut prefill = None;

        let ConfigResolution::Resolved { values, .. } =
            resolve_device_config(Some(&catalog), "Camera", "usb_cam", &mut prefill)
        else {
            panic!("expected a resolved selection")
        };
        assert_eq!(values.get("config_target_fps"), Some(&"30".to_string()));

        // The change handler clears the type before a new one is picked;
        // that alone must clear the whole config section.
        let cleared = resolve_device_config(Some(&catalog), "VR", "", &mut prefill);
        assert_eq!(cleared, ConfigResolution::NotSelected);

        // Picking in the new category seeds only that type's fields.
        let ConfigResolution::Resolved { values, .. } =
            resolve_device_config(Some(&catalog), "VR", "quest", &mut prefill)
        else {
            panic!("expected a resolved selection")
        };
        assert!(!values.contains_key("config_target_fps"));
        assert!(!values.contains_key("config_serial"));
    }

    #[test]
    fn config_resolution_pending_and_unknown_states() {
        let catalog = catalog();
        let mut prefill = None;

        // Catalog in flight with a type already chosen (edit mode).
        assert_eq!(
            resolve_device_config(None, "Camera", "usb_cam", &mut prefill),
            ConfigResolution::Loading
        );
        assert_eq!(
            resolve_device_config(None, "", "", &mut prefill),
            ConfigResolution::NotSelected
        );
        // A type the new node's catalog no longer declares.
        assert_eq!(
            resolve_device_config(Some(&catalog), "Camera", "thermal_cam", &mut prefill),
            ConfigResolution::UnknownType
        );
    }

    #[test]
    fn prefill_overlays_defaults_once() {
        let catalog = catalog();
        let mut prefill = Some(BTreeMap::from([("serial".to_string(), "0123".to_string())]));

        let ConfigResolution::Resolved { values, .. } =
            resolve_device_config(Some(&catalog), "Camera", "usb_cam", &mut prefill)
        else {
            panic!("expected a resolved selection")
        };
        assert_eq!(values.get("config_serial"), Some(&"0123".to_string()));
        assert_eq!(values.get("config_target_fps"), Some(&"30".to_string()));
        assert!(prefill.is_none());

        // Reselecting reseeds from defaults only.
        let ConfigResolution::Resolved { values, .. } =
            resolve_device_config(Some(&catalog), "Camera", "usb_cam", &mut prefill)
        else {
            panic!("expected a resolved selection")
        };
        assert_eq!(values.get("config_serial"), None);
    }

    #[test]
    fn roles_offer_matching_devices_from_any_node() {
        let role = RoleField {
            name: "vr".to_string(),
            description: None,
            device_type: "QuestHeadset".to_string(),
        };
        let devices = vec![
            device(1, 1, "GenericArm"),
            device(2, 2, "QuestHeadset"),
            device(3, 1, "QuestHeadset"),
        ];

        let eligible = eligible_devices(&devices, &role);
        let ids: Vec<i64> = eligible.iter().map(|device| device.id).collect();
        // The headset owned by another node is still a candidate.
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn in_flight_config_is_not_submittable() {
        assert!(!config_ready(&ConfigFields::Loading));
        assert!(config_ready(&ConfigFields::NotSelected));
        assert!(config_ready(&ConfigFields::Empty));
        let one = vec![("serial".to_string(), field("string", None, true))];
        assert!(config_ready(&ConfigFields::Fields(one)));
    }

    #[test]
    fn stale_tokens_are_rejected() {
        let tokens = FetchToken::default();
        let first = tokens.issue();
        assert!(tokens.is_current(first));

        // A newer request supersedes the one in flight.
        let second = tokens.issue();
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));

        // Clones share the generation counter.
        let shared = tokens.clone();
        let third = shared.issue();
        assert!(!tokens.is_current(second));
        assert!(tokens.is_current(third));
    }
}

/// Validate decoding of the backend's actual JSON wire shapes.
use web_common::{
    ApiMessage, Device, DevicesPayload, DeviceTypeCatalog, EntityStatus, Node, TeleopGroup,
    TeleopTypeCatalog,
};

#[test]
fn device_type_catalog_decodes_node_report() {
    // Shape reported by a node for `/api/device/types`.
    let json = r#"{
        "Camera": {
            "RealSenseCamera": {
                "name": "RealSense camera",
                "description": "Wired RealSense camera device",
                "need_config": {
                    "serial": {
                        "type": "string",
                        "description": "RealSense device serial number",
                        "required": true
                    },
                    "target_fps": {
                        "type": "integer",
                        "description": "Target frame rate, 0 to disable pacing",
                        "default": 30
                    }
                }
            }
        },
        "Robot": {
            "GenericArm": {
                "name": "Generic arm",
                "need_config": {}
            }
        }
    }"#;

    let catalog: DeviceTypeCatalog = serde_json::from_str(json).unwrap();
    assert_eq!(catalog.len(), 2);

    let camera = &catalog["Camera"]["RealSenseCamera"];
    assert_eq!(camera.name, "RealSense camera");
    // Declaration order survives the round trip.
    let fields: Vec<&String> = camera.need_config.keys().collect();
    assert_eq!(fields, ["serial", "target_fps"]);
    assert!(camera.need_config["serial"].required);
    assert!(!camera.need_config["target_fps"].required);
    assert_eq!(camera.need_config["target_fps"].default_text(), Some("30".into()));

    assert!(catalog["Robot"]["GenericArm"].need_config.is_empty());
}

#[test]
fn teleop_type_catalog_decodes_role_list() {
    let json = r#"{
        "DefaultTeleopGroup": {
            "name": "Default teleop group",
            "description": "Dual arm plus VR plus camera layout",
            "need_config": [
                {"name": "left_arm", "description": "Left arm device", "device_type": "GenericArm"},
                {"name": "right_arm", "description": "Right arm device", "device_type": "GenericArm"},
                {"name": "vr", "device_type": "QuestHeadset"}
            ]
        },
        "CameraOnly": {"need_config": []}
    }"#;

    let catalog: TeleopTypeCatalog = serde_json::from_str(json).unwrap();
    let default = &catalog["DefaultTeleopGroup"];
    assert_eq!(default.need_config.len(), 3);
    assert_eq!(default.need_config[0].name, "left_arm");
    assert_eq!(default.need_config[2].description, None);
    assert_eq!(default.need_config[2].device_type, "QuestHeadset");
    assert!(catalog["CameraOnly"].need_config.is_empty());
}

#[test]
fn devices_payload_accepts_flat_list() {
    let json = r#"[
        {"id": 1, "node_id": 1, "name": "cam", "category": "Camera",
         "type": "RealSenseCamera", "status": "running",
         "config": {"serial": "0123", "target_fps": 30}},
        {"id": 2, "node_id": 1, "name": "arm", "category": "Robot",
         "type": "GenericArm", "status": "stopped"},
        {"id": 3, "node_id": 2, "name": "vr", "category": "VR",
         "type": "QuestHeadset"}
    ]"#;

    let payload: DevicesPayload = serde_json::from_str(json).unwrap();
    assert_eq!(payload.total(), 3);
    let devices = payload.into_devices();
    assert_eq!(devices[0].status, EntityStatus::Running);
    // Omitted status and description default instead of failing the decode.
    assert_eq!(devices[2].status, EntityStatus::Stopped);
    assert_eq!(devices[2].description, "");
}

#[test]
fn devices_payload_accepts_node_mapping() {
    let json = r#"{
        "1": [{"id": 1, "node_id": 1, "name": "cam", "category": "Camera", "type": "RealSenseCamera"},
              {"id": 2, "node_id": 1, "name": "arm", "category": "Robot", "type": "GenericArm"}],
        "2": [{"id": 3, "node_id": 2, "name": "vr", "category": "VR", "type": "QuestHeadset"}]
    }"#;

    let payload: DevicesPayload = serde_json::from_str(json).unwrap();
    assert_eq!(payload.total(), 3);
    assert_eq!(payload.into_devices().len(), 3);
}

#[test]
fn unknown_status_maps_to_unknown() {
    let json = r#"{"id": 1, "node_id": 1, "name": "cam", "category": "Camera",
                   "type": "RealSenseCamera", "status": "starting"}"#;
    let device: Device = serde_json::from_str(json).unwrap();
    assert_eq!(device.status, EntityStatus::Unknown);
    assert!(!device.status.is_stopped());
}

#[test]
fn teleop_group_config_keeps_raw_values() {
    let json = r#"{"id": 5, "node_id": 1, "name": "rig", "type": "DefaultTeleopGroup",
                   "status": "stopped",
                   "config": {"left_arm": "2", "right_arm": 3}}"#;
    let group: TeleopGroup = serde_json::from_str(json).unwrap();
    assert_eq!(web_common::config_device_id(&group.config["left_arm"]), Some(2));
    assert_eq!(web_common::config_device_id(&group.config["right_arm"]), Some(3));
}

#[test]
fn error_body_and_nodes_decode() {
    let error: ApiMessage = serde_json::from_str(r#"{"message": "type not installed"}"#).unwrap();
    assert_eq!(error.message, "type not installed");

    let nodes: Vec<Node> =
        serde_json::from_str(r#"[{"id": 1, "uuid": "ab12"}]"#).unwrap();
    assert_eq!(nodes[0].label(), "Node #1 - ab12");
}

//! Create/edit teleop-group modal. Instead of free-form config fields the
//! group type declares device roles; each role offers the node's devices
//! whose type matches, and the submitted config maps role names to device
//! ids.

use std::collections::BTreeMap;

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use web_common::{Node, RoleField, TeleopTypeCatalog};

use super::modal::ModalSlot;
use super::toast::Toasts;
use crate::api::{ApiClient, NewTeleopGroup};
use crate::events::ListChanges;
use crate::form::{
    collect_config, config_ready, eligible_devices, prefixed, ConfigFields, FetchToken,
    RoleOptions,
};

fn binding_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[component]
pub fn TeleopModal(initial_node: Option<i64>, group_id: Option<i64>) -> impl IntoView {
    let slot = use_context::<ModalSlot>().expect("ModalSlot not provided");
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let events = use_context::<ListChanges>().expect("ListChanges not provided");

    let title = if group_id.is_some() { "Edit teleop group" } else { "New teleop group" };

    let nodes = RwSignal::new(Vec::<Node>::new());
    let node_id = RwSignal::new(initial_node);
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let group_type = RwSignal::new(String::new());
    let catalog = RwSignal::new(None::<TeleopTypeCatalog>);
    let fields = RwSignal::new(ConfigFields::NotSelected);
    let values = RwSignal::new(BTreeMap::<String, String>::new());
    let submitting = RwSignal::new(false);
    let tokens = FetchToken::default();

    // Existing role bindings, restored once on the first roles load.
    let prefill = RwSignal::new(None::<BTreeMap<String, String>>);

    spawn_local(async move {
        match ApiClient.nodes().await {
            Ok(list) if list.is_empty() => {
                toasts.error("Connect a node before creating teleop groups");
                slot.close();
            }
            Ok(list) => nodes.set(list),
            Err(err) => {
                log::error!("failed to load nodes: {err}");
                toasts.error("Failed to load nodes");
                slot.close();
            }
        }
    });

    if let Some(id) = group_id {
        spawn_local(async move {
            match ApiClient.teleop_group(id).await {
                Ok(group) => {
                    name.set(group.name);
                    description.set(group.description);
                    group_type.set(group.group_type);
                    prefill.set(Some(
                        group
                            .config
                            .iter()
                            .map(|(role, value)| (role.clone(), binding_text(value)))
                            .collect(),
                    ));
                    node_id.set(Some(group.node_id));
                }
                Err(err) => {
                    log::error!("failed to load teleop group {id}: {err}");
                    toasts.error("Failed to load teleop group");
                    slot.close();
                }
            }
        });
    }

    // Catalog follows the selected node. The type selector has no blank
    // entry, so the first declared type is selected as soon as the catalog
    // arrives unless an existing selection is still valid.
    Effect::new({
        let tokens = tokens.clone();
        move |_| {
            catalog.set(None);
            let Some(node) = node_id.get() else { return };
            let token = tokens.issue();
            let tokens = tokens.clone();
            spawn_local(async move {
                match ApiClient.teleop_group_types(node).await {
                    Ok(types) => {
                        if !tokens.is_current(token) {
                            return;
                        }
                        let current = group_type.get_untracked();
                        if !types.contains_key(&current) {
                            group_type
                                .set(types.keys().next().cloned().unwrap_or_default());
                        }
                        catalog.set(Some(types));
                    }
                    Err(err) => {
                        log::error!("failed to load teleop group types for node {node}: {err}");
                        if tokens.is_current(token) {
                            toasts.error("Failed to load teleop group types");
                        }
                    }
                }
            });
        }
    });

    // Roles need a fresh device list every time the type (or node) changes;
    // a device added moments ago must show up as a candidate.
    Effect::new({
        let tokens = tokens.clone();
        move |_| {
            let selected_type = group_type.get();
            let Some(types) = catalog.get() else {
                fields.set(ConfigFields::NotSelected);
                return;
            };
            let Some(info) = types.get(&selected_type) else {
                fields.set(ConfigFields::NotSelected);
                return;
            };
            let roles: Vec<RoleField> = info.need_config.clone();

            fields.set(ConfigFields::Loading);
            let token = tokens.issue();
            let tokens = tokens.clone();
            spawn_local(async move {
                let devices = match ApiClient.device_list().await {
                    Ok(devices) => devices,
                    Err(err) => {
                        log::error!("failed to load devices for role bindings: {err}");
                        if tokens.is_current(token) {
                            toasts.error("Failed to load devices");
                            fields.set(ConfigFields::NotSelected);
                        }
                        return;
                    }
                };
                if !tokens.is_current(token) {
                    return;
                }

                // Type equality alone decides eligibility; a device owned
                // by another node can still fill a role.
                let options: Vec<RoleOptions> = roles
                    .into_iter()
                    .map(|role| {
                        let eligible = eligible_devices(&devices, &role);
                        RoleOptions { role, devices: eligible }
                    })
                    .collect();

                let mut seeded = BTreeMap::new();
                if let Some(existing) = prefill.try_update(|p| p.take()).flatten() {
                    for options in &options {
                        if let Some(value) = existing.get(&options.role.name) {
                            seeded.insert(prefixed(&options.role.name), value.clone());
                        }
                    }
                }
                fields.set(ConfigFields::from_roles(options));
                values.set(seeded);
            });
        }
    });

    let submit = move |_| {
        if submitting.get_untracked() {
            return;
        }
        let Some(node) = node_id.get_untracked() else {
            toasts.error("Select a node");
            return;
        };
        let group_name = name.get_untracked().trim().to_string();
        if group_name.is_empty() {
            toasts.error("Name is required");
            return;
        }
        let selected_type = group_type.get_untracked();
        if selected_type.is_empty() {
            toasts.error("Select a group type");
            return;
        }
        let current_fields = fields.get_untracked();
        // Roles still loading; submitting now would skip their binding
        // checks.
        if !config_ready(&current_fields) {
            return;
        }
        if let ConfigFields::Roles(options) = current_fields {
            let current = values.get_untracked();
            for options in &options {
                let bound = current
                    .get(&prefixed(&options.role.name))
                    .is_some_and(|value| !value.is_empty());
                if !bound {
                    toasts.error(format!("Assign a device for {}", options.role.name));
                    return;
                }
            }
        }

        let payload = NewTeleopGroup {
            node_id: node,
            name: group_name,
            description: description.get_untracked().trim().to_string(),
            group_type: selected_type,
            config: collect_config(values.get_untracked()),
        };
        submitting.set(true);
        spawn_local(async move {
            let result = match group_id {
                Some(id) => ApiClient.update_teleop_group(id, &payload).await,
                None => ApiClient.create_teleop_group(&payload).await,
            };
            match result {
                Ok(()) => {
                    toasts.success(if group_id.is_some() {
                        "Teleop group updated"
                    } else {
                        "Teleop group created"
                    });
                    events.teleop_group_list_changed();
                    slot.close();
                }
                Err(err) => {
                    log::error!("failed to save teleop group: {err}");
                    toasts.error(err.to_string());
                    submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="fixed inset-0 bg-black/70 flex items-center justify-center z-50">
            <div class="bg-[#0d0d0d] border border-[#ffffff15] rounded-lg p-6 max-w-md w-full mx-4 max-h-[85vh] overflow-y-auto">
                <h3 class="text-sm font-semibold text-white mb-4">{title}</h3>

                <div class="space-y-3">
                    <label class="block">
                        <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Node"</span>
                        <select
                            class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white"
                            on:change=move |ev| {
                                node_id.set(event_target_value(&ev).parse().ok());
                                group_type.set(String::new());
                                prefill.set(None);
                            }
                        >
                            <option value="" prop:selected=move || node_id.get().is_none()>
                                "Select node"
                            </option>
                            <For
                                each=move || nodes.get()
                                key=|node| node.id
                                children=move |node| {
                                    let id = node.id;
                                    view! {
                                        <option
                                            value=id.to_string()
                                            prop:selected=move || node_id.get() == Some(id)
                                        >
                                            {node.label()}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </label>

                    <label class="block">
                        <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Name"</span>
                        <input
                            type="text"
                            class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </label>

                    <label class="block">
                        <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Description"</span>
                        <input
                            type="text"
                            class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white"
                            prop:value=move || description.get()
                            on:input=move |ev| description.set(event_target_value(&ev))
                        />
                    </label>

                    <label class="block">
                        <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Type"</span>
                        <select
                            class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white disabled:opacity-50"
                            prop:disabled=move || catalog.get().is_none()
                            on:change=move |ev| group_type.set(event_target_value(&ev))
                        >
                            <For
                                each=move || {
                                    catalog.get()
                                        .map(|types| {
                                            types.into_iter()
                                                .map(|(key, info)| {
                                                    let label = info.name.unwrap_or_else(|| key.clone());
                                                    (key, label)
                                                })
                                                .collect::<Vec<_>>()
                                        })
                                        .unwrap_or_default()
                                }
                                key=|(key, _)| key.clone()
                                children=move |(key, label)| {
                                    let value = key.clone();
                                    view! {
                                        <option
                                            value=key
                                            prop:selected=move || group_type.get() == value
                                        >
                                            {label}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </label>

                    <RoleSection fields=fields values=values/>
                </div>

                <div class="flex justify-end gap-2 mt-6">
                    <button
                        class="px-3 py-1.5 bg-[#1a1a1a] border border-[#ffffff08] rounded text-xs text-[#888888] hover:bg-[#222222] transition-colors"
                        on:click=move |_| slot.close()
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-3 py-1.5 bg-[#00d9ff20] rounded text-xs text-[#00d9ff] hover:bg-[#00d9ff30] transition-colors disabled:opacity-50"
                        prop:disabled=move || submitting.get() || !config_ready(&fields.get())
                        on:click=submit
                    >
                        {move || if submitting.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

/// One device selector per declared role.
#[component]
fn RoleSection(fields: RwSignal<ConfigFields>, values: RwSignal<BTreeMap<String, String>>) -> impl IntoView {
    view! {
        {move || match fields.get() {
            ConfigFields::NotSelected => ().into_any(),
            ConfigFields::Loading => view! {
                <p class="text-[10px] text-[#666666]">"Loading roles..."</p>
            }.into_any(),
            ConfigFields::Empty => view! {
                <p class="text-[10px] text-[#666666]">"This type needs no device bindings"</p>
            }.into_any(),
            ConfigFields::Roles(options) => view! {
                <div class="space-y-3 border-t border-[#ffffff08] pt-3">
                    <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Device bindings"</span>
                    <For
                        each=move || options.clone()
                        key=|options| options.role.name.clone()
                        children=move |options| view! {
                            <RoleSelect options=options values=values/>
                        }
                    />
                </div>
            }.into_any(),
            // Free-form fields only occur in the device modal.
            ConfigFields::Fields(_) => ().into_any(),
        }}
    }
}

#[component]
fn RoleSelect(options: RoleOptions, values: RwSignal<BTreeMap<String, String>>) -> impl IntoView {
    let key = prefixed(&options.role.name);
    let label = options.role.name.clone();
    let hint = options
        .role
        .description
        .clone()
        .unwrap_or_else(|| format!("Device type: {}", options.role.device_type));
    let devices = options.devices;
    let empty = devices.is_empty();

    let current = {
        let key = key.clone();
        move || values.get().get(&key).cloned().unwrap_or_default()
    };

    view! {
        <label class="block">
            <span class="text-[10px] text-[#888888]">{label}</span>
            <select
                class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    values.update(|map| {
                        map.insert(key.clone(), value);
                    });
                }
            >
                <option
                    value=""
                    prop:selected={
                        let current = current.clone();
                        move || current().is_empty()
                    }
                >
                    {if empty { "No matching devices" } else { "Select device" }}
                </option>
                <For
                    each=move || devices.clone()
                    key=|device| device.id
                    children={
                        let current = current.clone();
                        move |device| {
                            let id = device.id.to_string();
                            let value = id.clone();
                            let current = current.clone();
                            view! {
                                <option
                                    value=id
                                    prop:selected=move || current() == value
                                >
                                    {device.name.clone()}
                                </option>
                            }
                        }
                    }
                />
            </select>
            <span class="text-[10px] text-[#666666]">{hint}</span>
        </label>
    }
}

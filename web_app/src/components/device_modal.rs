//! Create/edit device modal with the cascading node > category > type >
//! config selection.
//!
//! Changing an upstream selector resets everything downstream of it
//! synchronously; only the catalog fetch is async and it is guarded by a
//! generation token, so a catalog that arrives after the node changed
//! again never populates the selectors.

use std::collections::BTreeMap;

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use web_common::{category_label, Device, DeviceField, DeviceTypeCatalog, InputKind, Node};

use super::modal::ModalSlot;
use super::toast::Toasts;
use crate::api::{ApiClient, NewDevice};
use crate::events::ListChanges;
use crate::form::{
    collect_config, config_ready, prefixed, resolve_device_config, ConfigFields, ConfigResolution,
    FetchToken,
};

fn config_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[component]
pub fn DeviceModal(initial_node: Option<i64>, device: Option<Device>) -> impl IntoView {
    let slot = use_context::<ModalSlot>().expect("ModalSlot not provided");
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let events = use_context::<ListChanges>().expect("ListChanges not provided");

    let editing = device.as_ref().map(|d| d.id);
    let title = if editing.is_some() { "Edit device" } else { "Add device" };

    let nodes = RwSignal::new(Vec::<Node>::new());
    let node_id = RwSignal::new(device.as_ref().map(|d| d.node_id).or(initial_node));
    let name = RwSignal::new(device.as_ref().map(|d| d.name.clone()).unwrap_or_default());
    let description =
        RwSignal::new(device.as_ref().map(|d| d.description.clone()).unwrap_or_default());
    let category = RwSignal::new(device.as_ref().map(|d| d.category.clone()).unwrap_or_default());
    let device_type =
        RwSignal::new(device.as_ref().map(|d| d.device_type.clone()).unwrap_or_default());
    let catalog = RwSignal::new(None::<DeviceTypeCatalog>);
    let fields = RwSignal::new(ConfigFields::NotSelected);
    let values = RwSignal::new(BTreeMap::<String, String>::new());
    let submitting = RwSignal::new(false);
    let tokens = FetchToken::default();

    // Saved config to restore once the catalog resolves the existing type.
    // Consumed on first use; any manual reselection reseeds from defaults.
    let prefill = RwSignal::new(device.map(|d| {
        d.config
            .iter()
            .map(|(field, value)| (field.clone(), config_text(value)))
            .collect::<BTreeMap<String, String>>()
    }));

    spawn_local(async move {
        match ApiClient.nodes().await {
            Ok(list) if list.is_empty() => {
                toasts.error("Connect a node before adding devices");
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

    // Catalog follows the selected node.
    Effect::new({
        let tokens = tokens.clone();
        move |_| {
            catalog.set(None);
            let Some(node) = node_id.get() else { return };
            let token = tokens.issue();
            let tokens = tokens.clone();
            spawn_local(async move {
                match ApiClient.device_types(node).await {
                    Ok(types) => {
                        if tokens.is_current(token) {
                            catalog.set(Some(types));
                        }
                    }
                    Err(err) => {
                        log::error!("failed to load device types for node {node}: {err}");
                        if tokens.is_current(token) {
                            toasts.error("Failed to load device types");
                        }
                    }
                }
            });
        }
    });

    // Resolve the config section from the current selection.
    Effect::new(move |_| {
        let selected_category = category.get();
        let selected_type = device_type.get();
        let types = catalog.get();
        let resolution = prefill
            .try_update(|existing| {
                resolve_device_config(types.as_ref(), &selected_category, &selected_type, existing)
            })
            .unwrap_or(ConfigResolution::NotSelected);
        match resolution {
            ConfigResolution::Loading => fields.set(ConfigFields::Loading),
            ConfigResolution::NotSelected => {
                fields.set(ConfigFields::NotSelected);
                values.set(BTreeMap::new());
            }
            ConfigResolution::UnknownType => {
                // The type no longer exists on this node's catalog.
                device_type.set(String::new());
                fields.set(ConfigFields::NotSelected);
                values.set(BTreeMap::new());
            }
            ConfigResolution::Resolved { fields: declared, values: seeded } => {
                fields.set(declared);
                values.set(seeded);
            }
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
        let device_name = name.get_untracked().trim().to_string();
        if device_name.is_empty() {
            toasts.error("Name is required");
            return;
        }
        let selected_category = category.get_untracked();
        let selected_type = device_type.get_untracked();
        if selected_category.is_empty() || selected_type.is_empty() {
            toasts.error("Select a device type");
            return;
        }
        let current_fields = fields.get_untracked();
        // Descriptors still in flight; submitting now would skip their
        // required-field checks.
        if !config_ready(&current_fields) {
            return;
        }
        if let ConfigFields::Fields(declared) = current_fields {
            let current = values.get_untracked();
            for (field, descriptor) in &declared {
                let filled = current
                    .get(&prefixed(field))
                    .is_some_and(|value| !value.trim().is_empty());
                if descriptor.required && !filled {
                    toasts.error(format!("{field} is required"));
                    return;
                }
            }
        }

        let payload = NewDevice {
            node_id: node,
            name: device_name,
            description: description.get_untracked().trim().to_string(),
            category: selected_category,
            device_type: selected_type,
            config: collect_config(values.get_untracked()),
        };
        submitting.set(true);
        spawn_local(async move {
            let result = match editing {
                Some(id) => ApiClient.update_device(id, &payload).await,
                None => ApiClient.create_device(&payload).await,
            };
            match result {
                Ok(()) => {
                    toasts.success(if editing.is_some() { "Device updated" } else { "Device created" });
                    events.device_list_changed();
                    slot.close();
                }
                Err(err) => {
                    log::error!("failed to save device: {err}");
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
                                category.set(String::new());
                                device_type.set(String::new());
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
                        <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Category"</span>
                        <select
                            class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white disabled:opacity-50"
                            prop:disabled=move || catalog.get().is_none()
                            on:change=move |ev| {
                                category.set(event_target_value(&ev));
                                device_type.set(String::new());
                            }
                        >
                            <option value="" prop:selected=move || category.get().is_empty()>
                                "Select category"
                            </option>
                            <For
                                each=move || {
                                    catalog.get()
                                        .map(|types| types.keys().cloned().collect::<Vec<_>>())
                                        .unwrap_or_default()
                                }
                                key=|key| key.clone()
                                children=move |key| {
                                    let label = category_label(&key).to_string();
                                    let value = key.clone();
                                    view! {
                                        <option
                                            value=key
                                            prop:selected=move || category.get() == value
                                        >
                                            {label}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </label>

                    <label class="block">
                        <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Type"</span>
                        <select
                            class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white disabled:opacity-50"
                            prop:disabled=move || category.get().is_empty()
                            on:change=move |ev| device_type.set(event_target_value(&ev))
                        >
                            <option value="" prop:selected=move || device_type.get().is_empty()>
                                "Select type"
                            </option>
                            <For
                                each=move || {
                                    catalog.get()
                                        .and_then(|types| types.get(&category.get()).cloned())
                                        .map(|types| {
                                            types.into_iter()
                                                .map(|(key, info)| (key, info.name))
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
                                            prop:selected=move || device_type.get() == value
                                        >
                                            {label}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </label>

                    <ConfigSection fields=fields values=values/>
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

/// Schema-driven config inputs. Values live in the shared prefixed map so
/// submit can collect them uniformly.
#[component]
fn ConfigSection(fields: RwSignal<ConfigFields>, values: RwSignal<BTreeMap<String, String>>) -> impl IntoView {
    view! {
        {move || match fields.get() {
            ConfigFields::NotSelected => ().into_any(),
            ConfigFields::Loading => view! {
                <p class="text-[10px] text-[#666666]">"Loading configuration..."</p>
            }.into_any(),
            ConfigFields::Empty => view! {
                <p class="text-[10px] text-[#666666]">"This type needs no configuration"</p>
            }.into_any(),
            ConfigFields::Fields(declared) => view! {
                <div class="space-y-3 border-t border-[#ffffff08] pt-3">
                    <span class="text-[10px] text-[#888888] uppercase tracking-wide">"Configuration"</span>
                    <For
                        each=move || declared.clone()
                        key=|(field, _)| field.clone()
                        children=move |(field, descriptor)| view! {
                            <ConfigInput field=field descriptor=descriptor values=values/>
                        }
                    />
                </div>
            }.into_any(),
            // Role bindings only occur in the teleop modal.
            ConfigFields::Roles(_) => ().into_any(),
        }}
    }
}

#[component]
fn ConfigInput(
    field: String,
    descriptor: DeviceField,
    values: RwSignal<BTreeMap<String, String>>,
) -> impl IntoView {
    let key = prefixed(&field);
    let label = if descriptor.required { format!("{field} *") } else { field.clone() };
    let kind = descriptor.input_kind();
    let description = descriptor.description.clone();

    let current = {
        let key = key.clone();
        move || values.get().get(&key).cloned().unwrap_or_default()
    };

    match kind {
        InputKind::Checkbox => {
            let checked = {
                let current = current.clone();
                move || current() == "true"
            };
            view! {
                <label class="flex items-center gap-2">
                    <input
                        type="checkbox"
                        class="accent-[#00d9ff]"
                        prop:checked=checked
                        on:change=move |ev| {
                            let value = if event_target_checked(&ev) { "true" } else { "false" };
                            values.update(|map| {
                                map.insert(key.clone(), value.to_string());
                            });
                        }
                    />
                    <span class="text-xs text-white">{label}</span>
                    <span class="text-[10px] text-[#666666]">{description}</span>
                </label>
            }
            .into_any()
        }
        kind => view! {
            <label class="block">
                <span class="text-[10px] text-[#888888]">{label}</span>
                <input
                    type=kind.html_type()
                    class="mt-1 w-full bg-[#1a1a1a] border border-[#ffffff08] rounded px-2 py-1.5 text-xs text-white"
                    placeholder=description
                    prop:value=current
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        values.update(|map| {
                            map.insert(key.clone(), value);
                        });
                    }
                />
            </label>
        }
        .into_any(),
    }
}

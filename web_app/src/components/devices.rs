//! Device list page: per-node sections of device cards.

use futures_util::join;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_common::{category_label, partition_by_node, Device, Node};

use super::modal::{DeleteTarget, ModalRequest, ModalSlot};
use super::toast::Toasts;
use crate::api::ApiClient;
use crate::events::ListChanges;
use crate::form::FetchToken;

#[derive(Clone, PartialEq)]
enum DevicesView {
    Loading,
    Failed,
    /// No nodes connected; nothing else is rendered.
    NoNodes,
    Ready(Vec<(Node, Vec<Device>)>),
}

/// Devices grouped by owning node, re-fetched in full after every
/// mutation. No optimistic local patches.
#[component]
pub fn DevicesPage() -> impl IntoView {
    let events = use_context::<ListChanges>().expect("ListChanges not provided");
    let modal = use_context::<ModalSlot>().expect("ModalSlot not provided");

    let (state, set_state) = signal(DevicesView::Loading);
    // Bumped by start/stop, which re-render this page without a broadcast.
    let refresh = RwSignal::new(0u64);
    let tokens = FetchToken::default();

    Effect::new(move |_| {
        events.track_devices();
        refresh.track();

        let tokens = tokens.clone();
        let token = tokens.issue();
        set_state.set(DevicesView::Loading);
        spawn_local(async move {
            let api = ApiClient;
            let (nodes, devices) = join!(api.nodes(), api.device_list());
            if !tokens.is_current(token) {
                return;
            }
            match (nodes, devices) {
                (Ok(nodes), _) if nodes.is_empty() => set_state.set(DevicesView::NoNodes),
                (Ok(nodes), Ok(devices)) => {
                    set_state.set(DevicesView::Ready(partition_by_node(
                        &nodes,
                        devices,
                        |device| device.node_id,
                    )));
                }
                (nodes, devices) => {
                    for err in [nodes.err(), devices.err()].into_iter().flatten() {
                        log::error!("failed to load devices: {err}");
                    }
                    set_state.set(DevicesView::Failed);
                }
            }
        });
    });

    let reload = move || refresh.update(|v| *v += 1);

    view! {
        <div>
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-lg font-semibold text-white">"Devices"</h2>
                <button
                    class="px-3 py-1.5 bg-[#00d9ff] rounded text-xs text-black font-semibold hover:bg-[#00c4e6] transition-colors"
                    on:click=move |_| modal.open(ModalRequest::CreateDevice { node_id: None })
                >
                    "+ Add device"
                </button>
            </div>

            {move || match state.get() {
                DevicesView::Loading => view! {
                    <p class="text-sm text-[#666666]">"Loading..."</p>
                }.into_any(),
                DevicesView::Failed => view! {
                    <p class="text-sm text-[#ff4444]">"Failed to load device data"</p>
                }.into_any(),
                DevicesView::NoNodes => view! {
                    <div class="text-center py-12 border border-dashed border-[#ffffff15] rounded-lg">
                        <p class="text-sm text-white">"No nodes connected"</p>
                        <p class="text-xs text-[#666666] mt-1">"Connect a node before adding devices"</p>
                    </div>
                }.into_any(),
                DevicesView::Ready(sections) => view! {
                    <div class="space-y-8">
                        <For
                            each=move || sections.clone()
                            key=|(node, devices)| (node.id, devices.len())
                            children=move |(node, devices)| view! {
                                <NodeSection node=node devices=devices on_action=reload/>
                            }
                        />
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn NodeSection<F>(node: Node, devices: Vec<Device>, on_action: F) -> impl IntoView
where
    F: Fn() + Clone + Copy + Send + Sync + 'static,
{
    let modal = use_context::<ModalSlot>().expect("ModalSlot not provided");
    let node_id = node.id;

    view! {
        <section>
            <div class="flex items-center justify-between mb-3">
                <h3 class="text-sm font-semibold text-white">{node.label()}</h3>
                <button
                    class="px-2 py-1 bg-[#1a1a1a] border border-[#ffffff08] rounded text-[10px] text-[#00d9ff] hover:bg-[#222222] transition-colors"
                    on:click=move |_| modal.open(ModalRequest::CreateDevice { node_id: Some(node_id) })
                >
                    "+ Add device"
                </button>
            </div>

            {if devices.is_empty() {
                view! {
                    <p class="text-xs text-[#666666] text-center py-6 border border-dashed border-[#ffffff08] rounded">
                        "No devices on this node"
                    </p>
                }.into_any()
            } else {
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                        <For
                            each=move || devices.clone()
                            key=|device| (device.id, device.status)
                            children=move |device| view! { <DeviceCard device=device on_action=on_action/> }
                        />
                    </div>
                }.into_any()
            }}
        </section>
    }
}

#[component]
fn DeviceCard<F>(device: Device, on_action: F) -> impl IntoView
where
    F: Fn() + Clone + Copy + Send + Sync + 'static,
{
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let modal = use_context::<ModalSlot>().expect("ModalSlot not provided");

    let id = device.id;
    let stopped = device.status.is_stopped();
    let status = device.status;
    let description = if device.description.is_empty() {
        "No description".to_string()
    } else {
        device.description.clone()
    };
    let edit_device = device.clone();
    let delete_name = device.name.clone();

    // One REST call per action; success re-fetches the whole list.
    let toggle = move |_| {
        spawn_local(async move {
            let result = if stopped {
                ApiClient.start_device(id).await
            } else {
                ApiClient.stop_device(id).await
            };
            match result {
                Ok(()) => on_action(),
                Err(err) => {
                    log::error!("device {id} start/stop failed: {err}");
                    toasts.error(if stopped {
                        "Failed to start device"
                    } else {
                        "Failed to stop device"
                    });
                }
            }
        });
    };

    view! {
        <div class="bg-[#0d0d0d] border border-[#ffffff08] rounded-lg p-4 flex flex-col">
            <div class="flex items-start justify-between mb-2">
                <h4 class="text-sm font-medium text-white">{device.name.clone()}</h4>
                <StatusBadge status=status/>
            </div>
            <p class="text-xs text-[#888888] mb-3">{description}</p>
            <div class="text-[10px] text-[#666666] space-y-0.5 mb-4">
                <p>"Type: " {device.device_type.clone()}</p>
                <p>"Category: " {category_label(&device.category).to_string()}</p>
            </div>
            <div class="flex justify-end gap-2 mt-auto">
                <button
                    class=move || if stopped {
                        "px-2 py-1 bg-[#22c55e20] text-[#22c55e] rounded text-[10px] hover:bg-[#22c55e30]"
                    } else {
                        "px-2 py-1 bg-[#eab30820] text-[#eab308] rounded text-[10px] hover:bg-[#eab30830]"
                    }
                    on:click=toggle
                >
                    {if stopped { "Start" } else { "Stop" }}
                </button>
                <button
                    class="px-2 py-1 bg-[#00d9ff20] text-[#00d9ff] rounded text-[10px] hover:bg-[#00d9ff30]"
                    on:click=move |_| modal.open(ModalRequest::EditDevice { device: edit_device.clone() })
                >
                    "Edit"
                </button>
                <button
                    class="px-2 py-1 bg-[#ff444420] text-[#ff4444] rounded text-[10px] hover:bg-[#ff444430]"
                    on:click=move |_| modal.open(ModalRequest::ConfirmDelete(DeleteTarget::Device {
                        id,
                        name: delete_name.clone(),
                    }))
                >
                    "Delete"
                </button>
            </div>
        </div>
    }
}

/// Run-state badge shared by device and teleop cards.
#[component]
pub fn StatusBadge(status: web_common::EntityStatus) -> impl IntoView {
    let class = match status {
        web_common::EntityStatus::Running => {
            "px-1.5 py-0.5 rounded text-[9px] bg-[#22c55e20] text-[#22c55e]"
        }
        web_common::EntityStatus::Stopped => {
            "px-1.5 py-0.5 rounded text-[9px] bg-[#ffffff10] text-[#888888]"
        }
        web_common::EntityStatus::Unknown => {
            "px-1.5 py-0.5 rounded text-[9px] bg-[#eab30820] text-[#eab308]"
        }
    };
    view! { <span class=class>{status.label()}</span> }
}

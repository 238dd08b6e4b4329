//! Teleop-group list page: per-node sections of group cards.

use std::collections::BTreeMap;

use futures_util::future::join_all;
use futures_util::join;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_common::{config_device_id, Node, TeleopGroup};

use super::devices::StatusBadge;
use super::modal::{DeleteTarget, ModalRequest, ModalSlot};
use super::toast::Toasts;
use crate::api::ApiClient;
use crate::events::ListChanges;
use crate::form::FetchToken;

#[derive(Clone, PartialEq)]
enum TeleopView {
    Loading,
    Failed,
    NoNodes,
    Ready {
        sections: Vec<(Node, Vec<TeleopGroup>)>,
        /// Device id to display name, for resolving role bindings.
        device_names: BTreeMap<i64, String>,
    },
}

/// Teleop groups grouped by owning node. Nodes and devices are fetched
/// concurrently; per-node group fetches fan out only when nodes exist.
#[component]
pub fn TeleopPage() -> impl IntoView {
    let events = use_context::<ListChanges>().expect("ListChanges not provided");

    let (state, set_state) = signal(TeleopView::Loading);
    let refresh = RwSignal::new(0u64);
    let tokens = FetchToken::default();

    Effect::new(move |_| {
        events.track_teleop_groups();
        events.track_devices();
        refresh.track();

        let tokens = tokens.clone();
        let token = tokens.issue();
        set_state.set(TeleopView::Loading);
        spawn_local(async move {
            let api = ApiClient;
            let (nodes, devices) = join!(api.nodes(), api.device_list());
            let (nodes, devices) = match (nodes, devices) {
                (Ok(nodes), Ok(devices)) => (nodes, devices),
                (nodes, devices) => {
                    for err in [nodes.err(), devices.err()].into_iter().flatten() {
                        log::error!("failed to load teleop groups: {err}");
                    }
                    if tokens.is_current(token) {
                        set_state.set(TeleopView::Failed);
                    }
                    return;
                }
            };
            if nodes.is_empty() {
                if tokens.is_current(token) {
                    set_state.set(TeleopView::NoNodes);
                }
                return;
            }

            // A node whose group fetch fails renders as empty rather than
            // taking the whole page down.
            let groups = join_all(nodes.iter().map(|node| api.node_teleop_groups(node.id))).await;
            if !tokens.is_current(token) {
                return;
            }
            let sections = nodes
                .into_iter()
                .zip(groups)
                .map(|(node, groups)| {
                    let groups = groups.unwrap_or_else(|err| {
                        log::error!("failed to load groups for node {}: {err}", node.id);
                        Vec::new()
                    });
                    (node, groups)
                })
                .collect();
            let device_names = devices
                .into_iter()
                .map(|device| (device.id, device.name))
                .collect();
            set_state.set(TeleopView::Ready { sections, device_names });
        });
    });

    let reload = move || refresh.update(|v| *v += 1);

    view! {
        <div>
            <h2 class="text-lg font-semibold text-white mb-4">"Teleop Groups"</h2>

            {move || match state.get() {
                TeleopView::Loading => view! {
                    <p class="text-sm text-[#666666]">"Loading..."</p>
                }.into_any(),
                TeleopView::Failed => view! {
                    <p class="text-sm text-[#ff4444]">"Failed to load teleop group data"</p>
                }.into_any(),
                TeleopView::NoNodes => view! {
                    <div class="text-center py-12 border border-dashed border-[#ffffff15] rounded-lg">
                        <p class="text-sm text-white">"No nodes connected"</p>
                        <p class="text-xs text-[#666666] mt-1">"Connect a node before creating teleop groups"</p>
                    </div>
                }.into_any(),
                TeleopView::Ready { sections, device_names } => view! {
                    <div class="space-y-8">
                        <For
                            each=move || sections.clone()
                            key=|(node, groups)| (node.id, groups.len())
                            children={
                                let device_names = device_names.clone();
                                move |(node, groups)| view! {
                                    <NodeGroupSection
                                        node=node
                                        groups=groups
                                        device_names=device_names.clone()
                                        on_action=reload
                                    />
                                }
                            }
                        />
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn NodeGroupSection<F>(
    node: Node,
    groups: Vec<TeleopGroup>,
    device_names: BTreeMap<i64, String>,
    on_action: F,
) -> impl IntoView
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
                    on:click=move |_| modal.open(ModalRequest::CreateTeleopGroup { node_id: Some(node_id) })
                >
                    "+ New teleop group"
                </button>
            </div>

            {if groups.is_empty() {
                view! {
                    <p class="text-xs text-[#666666] text-center py-6 border border-dashed border-[#ffffff08] rounded">
                        "No teleop groups on this node"
                    </p>
                }.into_any()
            } else {
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <For
                            each=move || groups.clone()
                            key=|group| (group.id, group.status)
                            children={
                                let device_names = device_names.clone();
                                move |group| view! {
                                    <TeleopCard group=group device_names=device_names.clone() on_action=on_action/>
                                }
                            }
                        />
                    </div>
                }.into_any()
            }}
        </section>
    }
}

#[component]
fn TeleopCard<F>(
    group: TeleopGroup,
    device_names: BTreeMap<i64, String>,
    on_action: F,
) -> impl IntoView
where
    F: Fn() + Clone + Copy + Send + Sync + 'static,
{
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let modal = use_context::<ModalSlot>().expect("ModalSlot not provided");

    let id = group.id;
    let stopped = group.status.is_stopped();
    let status = group.status;
    let description = if group.description.is_empty() {
        "No description".to_string()
    } else {
        group.description.clone()
    };
    let delete_name = group.name.clone();

    // Role bindings whose device id no longer resolves are skipped.
    let bindings: Vec<(String, String)> = group
        .config
        .iter()
        .filter_map(|(role, value)| {
            let device_id = config_device_id(value)?;
            let name = device_names.get(&device_id)?;
            Some((role.clone(), name.clone()))
        })
        .collect();

    let toggle = move |_| {
        spawn_local(async move {
            let result = if stopped {
                ApiClient.start_teleop_group(id).await
            } else {
                ApiClient.stop_teleop_group(id).await
            };
            match result {
                Ok(()) => {
                    toasts.success(if stopped {
                        "Teleop group started"
                    } else {
                        "Teleop group stopped"
                    });
                    on_action();
                }
                Err(err) => {
                    log::error!("teleop group {id} start/stop failed: {err}");
                    toasts.error(if stopped {
                        "Failed to start teleop group"
                    } else {
                        "Failed to stop teleop group"
                    });
                }
            }
        });
    };

    view! {
        <div class="bg-[#0d0d0d] border border-[#ffffff08] rounded-lg p-4 flex flex-col">
            <div class="flex items-start justify-between mb-2">
                <div>
                    <h4 class="text-sm font-medium text-white">{group.name.clone()}</h4>
                    <p class="text-xs text-[#888888]">{description}</p>
                </div>
                <StatusBadge status=status/>
            </div>
            <div class="text-[10px] text-[#666666] mb-4">
                <p>"Type: " {group.group_type.clone()}</p>
                <p class="mt-1">"Device bindings:"</p>
                <ul class="list-disc list-inside ml-2">
                    <For
                        each=move || bindings.clone()
                        key=|(role, _)| role.clone()
                        children=move |(role, name)| view! {
                            <li>{role} ": " {name}</li>
                        }
                    />
                </ul>
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
                    on:click=move |_| modal.open(ModalRequest::EditTeleopGroup { group_id: id })
                >
                    "Edit"
                </button>
                <button
                    class="px-2 py-1 bg-[#ff444420] text-[#ff4444] rounded text-[10px] hover:bg-[#ff444430]"
                    on:click=move |_| modal.open(ModalRequest::ConfirmDelete(DeleteTarget::TeleopGroup {
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

//! Single-slot modal host. Pages request a modal through [`ModalSlot`];
//! opening a new request replaces whatever is currently shown.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_common::Device;

use super::device_modal::DeviceModal;
use super::teleop_modal::TeleopModal;
use super::toast::Toasts;
use crate::api::ApiClient;
use crate::events::ListChanges;

#[derive(Clone, PartialEq)]
pub enum ModalRequest {
    CreateDevice { node_id: Option<i64> },
    EditDevice { device: Device },
    CreateTeleopGroup { node_id: Option<i64> },
    EditTeleopGroup { group_id: i64 },
    ConfirmDelete(DeleteTarget),
}

#[derive(Clone, PartialEq)]
pub enum DeleteTarget {
    Device { id: i64, name: String },
    TeleopGroup { id: i64, name: String },
}

impl DeleteTarget {
    fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Device { .. } => "device",
            DeleteTarget::TeleopGroup { .. } => "teleop group",
        }
    }

    fn name(&self) -> &str {
        match self {
            DeleteTarget::Device { name, .. } => name,
            DeleteTarget::TeleopGroup { name, .. } => name,
        }
    }
}

#[derive(Clone, Copy)]
pub struct ModalSlot {
    current: RwSignal<Option<ModalRequest>>,
}

impl ModalSlot {
    pub fn new() -> Self {
        Self { current: RwSignal::new(None) }
    }

    pub fn open(&self, request: ModalRequest) {
        self.current.set(Some(request));
    }

    pub fn close(&self) {
        self.current.set(None);
    }

    fn get(&self) -> Option<ModalRequest> {
        self.current.get()
    }
}

impl Default for ModalSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders whichever modal is currently requested, if any.
#[component]
pub fn ModalHost() -> impl IntoView {
    let slot = use_context::<ModalSlot>().expect("ModalSlot not provided");

    view! {
        {move || match slot.get() {
            None => ().into_any(),
            Some(ModalRequest::CreateDevice { node_id }) => view! {
                <DeviceModal initial_node=node_id device=None/>
            }.into_any(),
            Some(ModalRequest::EditDevice { device }) => {
                let node_id = device.node_id;
                view! {
                    <DeviceModal initial_node=Some(node_id) device=Some(device)/>
                }.into_any()
            }
            Some(ModalRequest::CreateTeleopGroup { node_id }) => view! {
                <TeleopModal initial_node=node_id group_id=None/>
            }.into_any(),
            Some(ModalRequest::EditTeleopGroup { group_id }) => view! {
                <TeleopModal initial_node=None group_id=Some(group_id)/>
            }.into_any(),
            Some(ModalRequest::ConfirmDelete(target)) => view! {
                <ConfirmDeleteModal target=target/>
            }.into_any(),
        }}
    }
}

#[component]
fn ConfirmDeleteModal(target: DeleteTarget) -> impl IntoView {
    let slot = use_context::<ModalSlot>().expect("ModalSlot not provided");
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let events = use_context::<ListChanges>().expect("ListChanges not provided");

    let kind = target.kind();
    let name = target.name().to_string();
    let confirm_target = target.clone();

    let confirm = move |_| {
        let target = confirm_target.clone();
        slot.close();
        spawn_local(async move {
            let result = match target {
                DeleteTarget::Device { id, .. } => ApiClient.delete_device(id).await,
                DeleteTarget::TeleopGroup { id, .. } => ApiClient.delete_teleop_group(id).await,
            };
            match result {
                Ok(()) => {
                    match target {
                        DeleteTarget::Device { .. } => {
                            toasts.success("Device deleted");
                            events.device_list_changed();
                        }
                        DeleteTarget::TeleopGroup { .. } => {
                            toasts.success("Teleop group deleted");
                            events.teleop_group_list_changed();
                        }
                    }
                }
                Err(err) => {
                    log::error!("delete failed: {err}");
                    toasts.error(format!("Failed to delete {}", target.kind()));
                }
            }
        });
    };

    view! {
        <div class="fixed inset-0 bg-black/70 flex items-center justify-center z-50">
            <div class="bg-[#0d0d0d] border border-[#ffffff15] rounded-lg p-6 max-w-sm w-full mx-4">
                <h3 class="text-sm font-semibold text-white mb-2">
                    "Delete " {kind} "?"
                </h3>
                <p class="text-xs text-[#888888] mb-6">
                    "\"" {name} "\" will be removed. This cannot be undone."
                </p>
                <div class="flex justify-end gap-2">
                    <button
                        class="px-3 py-1.5 bg-[#1a1a1a] border border-[#ffffff08] rounded text-xs text-[#888888] hover:bg-[#222222] transition-colors"
                        on:click=move |_| slot.close()
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-3 py-1.5 bg-[#ff444420] rounded text-xs text-[#ff4444] hover:bg-[#ff444430] transition-colors"
                        on:click=confirm
                    >
                        "Delete"
                    </button>
                </div>
            </div>
        </div>
    }
}

//! Dashboard page: nodes / devices / teleop-groups stat cards.

use futures_util::join;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::events::ListChanges;
use crate::form::FetchToken;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Stats {
    nodes: usize,
    devices: usize,
    teleop_groups: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum StatsView {
    Loading,
    Failed,
    Ready(Stats),
}

/// Three scalar counts, refreshed on load and on list-change broadcasts.
/// Never polls.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let events = use_context::<ListChanges>().expect("ListChanges not provided");
    let (stats, set_stats) = signal(StatsView::Loading);
    let tokens = FetchToken::default();

    Effect::new(move |_| {
        events.track_devices();
        events.track_teleop_groups();

        let tokens = tokens.clone();
        let token = tokens.issue();
        spawn_local(async move {
            let api = ApiClient;
            let (nodes, devices, groups) = join!(api.nodes(), api.devices(), api.teleop_groups());
            if !tokens.is_current(token) {
                return;
            }
            match (nodes, devices, groups) {
                (Ok(nodes), Ok(devices), Ok(groups)) => {
                    set_stats.set(StatsView::Ready(Stats {
                        nodes: nodes.len(),
                        devices: devices.total(),
                        teleop_groups: groups.len(),
                    }));
                }
                (nodes, devices, groups) => {
                    let errors = [
                        nodes.err(),
                        devices.err(),
                        groups.err(),
                    ];
                    for err in errors.into_iter().flatten() {
                        log::error!("dashboard refresh failed: {err}");
                    }
                    set_stats.set(StatsView::Failed);
                }
            }
        });
    });

    view! {
        <div>
            <h2 class="text-lg font-semibold text-white mb-4">"Overview"</h2>
            {move || match stats.get() {
                StatsView::Loading => view! {
                    <p class="text-sm text-[#666666]">"Loading..."</p>
                }.into_any(),
                StatsView::Failed => view! {
                    <p class="text-sm text-[#ff4444]">"Failed to load dashboard data"</p>
                }.into_any(),
                StatsView::Ready(stats) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <StatCard label="Online nodes" value=stats.nodes/>
                        <StatCard label="Devices" value=stats.devices/>
                        <StatCard label="Teleop groups" value=stats.teleop_groups/>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn StatCard(label: &'static str, value: usize) -> impl IntoView {
    view! {
        <div class="bg-[#0d0d0d] border border-[#ffffff08] rounded-lg p-4">
            <p class="text-[10px] text-[#666666] uppercase tracking-wide">{label}</p>
            <p class="text-2xl font-semibold text-[#00d9ff] mt-1">{value}</p>
        </div>
    }
}

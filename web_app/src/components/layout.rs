//! Application shell: top bar, sidebar navigation, page sections.

use leptos::ev::hashchange;
use leptos::prelude::*;
use leptos_use::{use_event_listener, use_window};

use super::dashboard::DashboardPage;
use super::devices::DevicesPage;
use super::teleop::TeleopPage;
use crate::nav::{self, Page};

/// Root layout. Exactly one page section is visible at a time.
#[component]
pub fn AppLayout() -> impl IntoView {
    let (page, set_page) = signal(nav::current_page());

    // Back/forward and manual fragment edits drive the same transition
    // as sidebar clicks.
    _ = use_event_listener(use_window(), hashchange, move |_| {
        set_page.set(nav::current_page());
    });

    Effect::new(move |_| nav::sync_fragment(page.get()));

    view! {
        <div class="h-screen w-screen flex flex-col bg-[#0a0a0a] overflow-hidden">
            <TopBar page=page/>

            <div class="flex-1 flex overflow-hidden">
                <Sidebar page=page set_page=set_page/>

                <main class="flex-1 overflow-y-auto p-6">
                    <Show when=move || page.get() == Page::Dashboard>
                        <DashboardPage/>
                    </Show>
                    <Show when=move || page.get() == Page::Devices>
                        <DevicesPage/>
                    </Show>
                    <Show when=move || page.get() == Page::TeleopGroups>
                        <TeleopPage/>
                    </Show>
                </main>
            </div>
        </div>
    }
}

/// Top bar with the product name and the active page title.
#[component]
fn TopBar(page: ReadSignal<Page>) -> impl IntoView {
    view! {
        <header class="h-9 bg-[#111111] border-b border-[#ffffff10] flex items-center px-3 shrink-0">
            <div class="flex items-center space-x-2">
                <div class="w-6 h-6 bg-[#00d9ff] rounded flex items-center justify-center">
                    <svg class="w-3.5 h-3.5 text-black" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 3v2m6-2v2M9 19v2m6-2v2M5 9H3m2 6H3m18-6h-2m2 6h-2M7 19h10a2 2 0 002-2V7a2 2 0 00-2-2H7a2 2 0 00-2 2v10a2 2 0 002 2zM9 9h6v6H9V9z"/>
                    </svg>
                </div>
                <h1 class="text-xs font-semibold text-white">"Teleop Console"</h1>
            </div>

            <div class="flex-1"></div>

            <span class="text-[10px] text-[#888888]">{move || page.get().title()}</span>
        </header>
    }
}

/// Sidebar navigation; exactly one link is active.
#[component]
fn Sidebar(page: ReadSignal<Page>, set_page: WriteSignal<Page>) -> impl IntoView {
    view! {
        <nav class="w-44 bg-[#0d0d0d] border-r border-[#ffffff08] p-2 flex flex-col gap-1 shrink-0">
            <For
                each=move || Page::ALL
                key=|target| *target
                children=move |target| {
                    let is_active = move || page.get() == target;
                    view! {
                        <button
                            class=move || format!(
                                "text-left px-3 py-2 rounded text-xs transition-colors {}",
                                if is_active() {
                                    "bg-[#00d9ff20] text-[#00d9ff] font-semibold"
                                } else {
                                    "text-[#888888] hover:bg-[#ffffff08] hover:text-white"
                                }
                            )
                            on:click=move |_| set_page.set(target)
                        >
                            {target.title()}
                        </button>
                    }
                }
            />
        </nav>
    }
}

//! Toast notifications for API outcomes.

use leptos::prelude::*;

/// App-scoped toast store, provided via context.
#[derive(Clone, Copy)]
pub struct Toasts {
    pub message: ReadSignal<Option<String>>,
    set_message: WriteSignal<Option<String>>,
    pub error: ReadSignal<Option<String>>,
    set_error: WriteSignal<Option<String>>,
}

impl Toasts {
    pub fn new() -> Self {
        let (message, set_message) = signal(None);
        let (error, set_error) = signal(None);
        Self { message, set_message, error, set_error }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.set_message.set(Some(text.into()));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.set_error.set(Some(text.into()));
    }

    pub fn clear_message(&self) {
        self.set_message.set(None);
    }

    pub fn clear_error(&self) {
        self.set_error.set(None);
    }
}

/// Toast container - displays success and error notifications.
#[component]
pub fn ToastContainer() -> impl IntoView {
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let message = toasts.message;
    let error = toasts.error;

    view! {
        <div class="fixed bottom-4 left-4 z-50 flex flex-col gap-2 max-w-sm">
            <Show when=move || message.get().is_some()>
                <SuccessToast message=Signal::derive(move || message.get().unwrap_or_default()) />
            </Show>

            <Show when=move || error.get().is_some()>
                <ErrorToast message=Signal::derive(move || error.get().unwrap_or_default()) />
            </Show>
        </div>
    }
}

/// Success toast notification
#[component]
fn SuccessToast(message: Signal<String>) -> impl IntoView {
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let (visible, set_visible) = signal(true);

    // Auto-dismiss after 5 seconds
    Effect::new(move |_| {
        if visible.get() {
            set_timeout(
                move || {
                    set_visible.set(false);
                    toasts.clear_message();
                },
                std::time::Duration::from_secs(5),
            );
        }
    });

    view! {
        <Show when=move || visible.get()>
            <div class="flex items-start gap-2 p-3 rounded-lg border shadow-lg bg-[#0d0d0d] border-[#22c55e40]">
                <div class="text-[#22c55e]">
                    <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M5 13l4 4L19 7"/>
                    </svg>
                </div>
                <p class="flex-1 text-[11px] text-white">{move || message.get()}</p>
                <button
                    class="text-[#666666] hover:text-white transition-colors"
                    on:click=move |_| {
                        set_visible.set(false);
                        toasts.clear_message();
                    }
                >
                    <svg class="w-3 h-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                    </svg>
                </button>
            </div>
        </Show>
    }
}

/// Error toast notification
#[component]
fn ErrorToast(message: Signal<String>) -> impl IntoView {
    let toasts = use_context::<Toasts>().expect("Toasts not provided");
    let (visible, set_visible) = signal(true);

    // Auto-dismiss after 8 seconds (longer for errors)
    Effect::new(move |_| {
        if visible.get() {
            set_timeout(
                move || {
                    set_visible.set(false);
                    toasts.clear_error();
                },
                std::time::Duration::from_secs(8),
            );
        }
    });

    view! {
        <Show when=move || visible.get()>
            <div class="flex items-start gap-2 p-3 rounded-lg border shadow-lg bg-[#0d0d0d] border-[#ff444440]">
                <div class="text-[#ff4444]">
                    <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 8v4m0 4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z"/>
                    </svg>
                </div>
                <p class="flex-1 text-[11px] text-white">{move || message.get()}</p>
                <button
                    class="text-[#666666] hover:text-white transition-colors"
                    on:click=move |_| {
                        set_visible.set(false);
                        toasts.clear_error();
                    }
                >
                    <svg class="w-3 h-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                    </svg>
                </button>
            </div>
        </Show>
    }
}

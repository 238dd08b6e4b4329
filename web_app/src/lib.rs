use leptos::mount::mount_to_body;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod api;
mod components;
mod events;
mod form;
mod nav;

use components::{AppLayout, ModalHost, ModalSlot, ToastContainer, Toasts};
use events::ListChanges;

#[wasm_bindgen(start)]
pub fn main() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    // App-scoped stores; components receive them via context instead of
    // publishing themselves into global scope.
    provide_context(Toasts::new());
    provide_context(ListChanges::new());
    provide_context(ModalSlot::new());

    view! {
        <AppLayout/>
        <ModalHost/>
        <ToastContainer/>
    }
}

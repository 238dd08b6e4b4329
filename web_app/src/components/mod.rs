//! Dashboard UI components.

mod dashboard;
mod device_modal;
mod devices;
mod layout;
mod modal;
mod teleop;
mod teleop_modal;
mod toast;

pub use layout::AppLayout;
pub use modal::{DeleteTarget, ModalHost, ModalRequest, ModalSlot};
pub use toast::{ToastContainer, Toasts};

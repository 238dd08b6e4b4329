//! Fragment-keyed page switching.
//!
//! One page section is visible at a time; the URL fragment is the only
//! persisted navigation state. Unknown or empty fragments fall back to
//! the dashboard.

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Devices,
    TeleopGroups,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::Devices, Page::TeleopGroups];

    pub fn from_fragment(fragment: &str) -> Page {
        match fragment.trim_start_matches('#') {
            "devices" => Page::Devices,
            "teleop" => Page::TeleopGroups,
            _ => Page::Dashboard,
        }
    }

    pub fn fragment(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Devices => "devices",
            Page::TeleopGroups => "teleop",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Devices => "Devices",
            Page::TeleopGroups => "Teleop Groups",
        }
    }
}

/// Page for the current `location.hash`.
pub fn current_page() -> Page {
    web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .map(|hash| Page::from_fragment(&hash))
        .unwrap_or_default()
}

/// Push the page's fragment onto the history without reloading.
pub fn sync_fragment(page: Page) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let target = format!("#{}", page.fragment());
    if window.location().hash().ok().as_deref() == Some(target.as_str()) {
        return;
    }
    if let Ok(history) = window.history() {
        _ = history.push_state_with_url(&JsValue::NULL, "", Some(&target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fragments_map_to_their_page() {
        assert_eq!(Page::from_fragment("#devices"), Page::Devices);
        assert_eq!(Page::from_fragment("devices"), Page::Devices);
        assert_eq!(Page::from_fragment("#teleop"), Page::TeleopGroups);
        assert_eq!(Page::from_fragment("#dashboard"), Page::Dashboard);
    }

    #[test]
    fn unknown_or_empty_fragments_fall_back_to_dashboard() {
        assert_eq!(Page::from_fragment(""), Page::Dashboard);
        assert_eq!(Page::from_fragment("#"), Page::Dashboard);
        assert_eq!(Page::from_fragment("#settings"), Page::Dashboard);
    }

    #[test]
    fn fragments_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_fragment(page.fragment()), page);
        }
    }
}

//! Browser history for fragment navigation.
//!
//! Content swapped in by AJAX gets a real history entry, but the state it records is
//! not enough to rebuild the page, so going back or forward reloads.

use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NavState {
    pub from: String,
    pub to: String,
}

impl NavState {
    fn to_js(&self) -> wasm_bindgen::JsValue {
        serde_json::to_string(self)
            .ok()
            .and_then(|s| js_sys::JSON::parse(&s).ok())
            .unwrap_or(wasm_bindgen::JsValue::NULL)
    }
}

/// Record a navigation to `to` (an absolute or page-relative URL).
pub(crate) fn push(to: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let from = window.location().href().unwrap_or_default();
    let state = NavState {
        from,
        to: to.to_string(),
    };

    let Ok(history) = window.history() else {
        log::warn!("history unavailable, not recording {to}");
        return;
    };
    if let Err(e) = history.push_state_with_url(&state.to_js(), "", Some(to)) {
        log::warn!("pushState to {to} failed: {e:?}");
    }
}

pub(crate) fn on_popstate() {
    log::debug!("popstate, reloading");
    crate::dom::reload();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_state_shape() {
        let state = NavState {
            from: "/dataset/3/annotate/t?sample=1".to_string(),
            to: "/dataset/3/annotate/t?sample=2".to_string(),
        };
        let v = serde_json::to_value(&state).expect("serializes");
        assert_eq!(v["from"], "/dataset/3/annotate/t?sample=1");
        assert_eq!(v["to"], "/dataset/3/annotate/t?sample=2");
    }
}

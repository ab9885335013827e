use serde::{Deserialize, Serialize};

pub(crate) const SIDEBAR_COLLAPSED_KEY: &str = "omen_sidebar_collapsed";
pub(crate) const CHART_MODE_KEY: &str = "omen_chart_mode";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_flag(key: &str) -> Option<bool> {
    let v = local_storage()?.get_item(key).ok().flatten()?;
    Some(v == "1" || v == "true")
}

pub(crate) fn save_flag(key: &str, value: bool) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(key, if value { "1" } else { "0" });
    }
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_flag_roundtrip() {
        save_flag("omen_test_flag", true);
        assert_eq!(load_flag("omen_test_flag"), Some(true));
        save_flag("omen_test_flag", false);
        assert_eq!(load_flag("omen_test_flag"), Some(false));
    }

    #[wasm_bindgen_test]
    fn test_json_roundtrip() {
        save_json_to_storage("omen_test_json", &vec!["a".to_string(), "b".to_string()]);
        let loaded: Vec<String> = load_json_from_storage("omen_test_json").expect("stored list");
        assert_eq!(loaded, vec!["a", "b"]);
    }
}

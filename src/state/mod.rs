use crate::api::FragmentClient;
use crate::chart::ChartMode;
use crate::config::PageConfig;
use crate::models::OverviewData;
use crate::storage::{load_json_from_storage, CHART_MODE_KEY};
use leptos::prelude::*;
use leptos_dom::helpers::WindowListenerHandle;
use std::rc::Rc;

/// Per-page context handed to every handler.
///
/// Built once at start; cheap to clone (signals are `Copy`, the rest is shared).
#[derive(Clone)]
pub(crate) struct UiSession {
    pub config: Rc<PageConfig>,
    pub client: FragmentClient,

    /// A text input has focus; global hotkeys stay quiet while set.
    pub kbd_in_input: RwSignal<bool>,

    /// Last `overview.json` and the colors assigned to its tags.
    pub overview: RwSignal<Option<OverviewData>>,
    pub chart_colors: RwSignal<Vec<String>>,
    pub chart_mode: RwSignal<ChartMode>,

    /// Global listeners (keep handles alive).
    listeners: StoredValue<Vec<WindowListenerHandle>>,
}

impl UiSession {
    pub fn new(config: PageConfig) -> Self {
        let chart_mode = load_json_from_storage::<ChartMode>(CHART_MODE_KEY).unwrap_or_default();

        Self {
            config: Rc::new(config),
            client: FragmentClient::new(),
            kbd_in_input: RwSignal::new(false),
            overview: RwSignal::new(None),
            chart_colors: RwSignal::new(vec![]),
            chart_mode: RwSignal::new(chart_mode),
            listeners: StoredValue::new(vec![]),
        }
    }

    pub fn keep_listener(&self, handle: WindowListenerHandle) {
        self.listeners.update_value(|v| v.push(handle));
    }

    pub fn in_text_input(&self) -> bool {
        self.kbd_in_input.get_untracked()
    }
}

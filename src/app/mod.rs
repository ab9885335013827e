use crate::config::PageConfig;
use crate::state::UiSession;
use crate::{chart, delegate, mount, sidebar};
use leptos::prelude::*;

/// Wire the page up: global listeners, per-node behaviors, persisted UI state, chart.
///
/// Runs once per document load. The reactive owner lives as long as the page.
pub(crate) fn start(config: PageConfig) {
    let owner = Owner::new();
    owner.with(|| {
        let session = UiSession::new(config);

        // IMPORTANT:
        // - handlers are delegated from `window`, so swapped fragments need no rebinding.
        // - behaviors (timers, rendering) are re-applied by `mount::remount` after a swap.
        delegate::install(&session);
        let attached = mount::remount_document(&session);
        sidebar::restore();
        chart::mount_chart(&session);

        log::info!(
            "omen ui ready (dataset={:?}, task={:?}, {attached} behaviors)",
            session.config.dataset_id,
            session.config.task_id
        );
    });
    std::mem::forget(owner);
}

//! Component re-mount.
//!
//! Click/input handling is delegated from the window (see `delegate`), so swapped
//! fragments need no rebinding for those. What is left are behaviors that must touch
//! each node once: timers, rendering, hint titles. They live in a registry and are
//! re-applied to every patched subtree; a `data-mounted` marker keeps that idempotent.

use crate::dom;
use crate::state::UiSession;
use web_sys::Element;

const MARKER_ATTR: &str = "data-mounted";

pub(crate) struct Behavior {
    pub name: &'static str,
    pub selector: &'static str,
    pub attach: fn(&UiSession, &Element),
}

pub(crate) const BEHAVIORS: &[Behavior] = &[
    Behavior {
        name: "alert-timer",
        selector: ".alert",
        attach: crate::alerts::mount_alert,
    },
    Behavior {
        name: "tristate",
        selector: ".cb_show_tag_elem",
        attach: crate::filters::mount_tristate,
    },
    Behavior {
        name: "markdown",
        selector: ".description_modal_text",
        attach: crate::markdown::mount_markdown,
    },
    Behavior {
        name: "hotkey-hint",
        selector: "#anno_nav_next, #anno_nav_prev, #anno_nav_random, .sample_content_tagbtns a.btn[data-tagidx]",
        attach: crate::annotate::mount_hotkey_hint,
    },
    Behavior {
        name: "copy-indicator",
        selector: "#sample_metadata_id_copied",
        attach: crate::annotate::mount_copy_indicator,
    },
    Behavior {
        name: "tdwrap",
        selector: "#previewdftable tbody td",
        attach: crate::dataset::mount_preview_cell,
    },
    Behavior {
        name: "editor-state",
        selector: "#tageditor_add_tag_action, #spliteditor_add_split_action, button.tageditor_action_rename, button.spliteditor_action_rename",
        attach: crate::editors::mount_editor_button,
    },
];

pub(crate) fn is_marked(marker: &str, name: &str) -> bool {
    marker.split_whitespace().any(|n| n == name)
}

pub(crate) fn with_mark(marker: &str, name: &str) -> String {
    if is_marked(marker, name) {
        return marker.trim().to_string();
    }
    let marker = marker.trim();
    if marker.is_empty() {
        name.to_string()
    } else {
        format!("{marker} {name}")
    }
}

/// Attach `behavior` to `el` unless the marker says it is already there.
fn mount_one(session: &UiSession, behavior: &Behavior, el: &Element) -> bool {
    let marker = el.get_attribute(MARKER_ATTR).unwrap_or_default();
    if is_marked(&marker, behavior.name) {
        return false;
    }
    let _ = el.set_attribute(MARKER_ATTR, &with_mark(&marker, behavior.name));
    (behavior.attach)(session, el);
    true
}

/// Walk `scope` (itself included) and attach every registered behavior once.
pub(crate) fn remount(session: &UiSession, scope: &Element) -> usize {
    remount_with(session, scope, BEHAVIORS)
}

pub(crate) fn remount_with(session: &UiSession, scope: &Element, behaviors: &[Behavior]) -> usize {
    let mut attached = 0;
    for behavior in behaviors {
        if dom::matches(scope, behavior.selector) && mount_one(session, behavior, scope) {
            attached += 1;
        }
        for el in dom::query_all(scope, behavior.selector) {
            if mount_one(session, behavior, &el) {
                attached += 1;
            }
        }
    }
    if attached > 0 {
        log::debug!("remount: {attached} behaviors attached");
    }
    attached
}

pub(crate) fn remount_document(session: &UiSession) -> usize {
    match dom::document().ok().and_then(|d| d.document_element()) {
        Some(root) => remount(session, &root),
        None => 0,
    }
}

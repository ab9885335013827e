use crate::dom;
use crate::state::UiSession;
use crate::storage::{load_flag, save_flag, SIDEBAR_COLLAPSED_KEY};
use web_sys::{Element, Event};

const MENU_ID: &str = "sidebar-menu";

fn apply(menu: &Element, collapsed: bool) {
    if collapsed {
        dom::remove_class(menu, "d-sm-block");
        dom::add_class(menu, "d-none");
    } else {
        dom::add_class(menu, "d-sm-block");
        dom::remove_class(menu, "d-none");
    }
}

pub(crate) fn on_toggle(_session: &UiSession, _el: &Element, _ev: &Event) {
    let Some(menu) = dom::by_id(MENU_ID) else {
        return;
    };
    let collapsed = !dom::has_class(&menu, "d-none");
    apply(&menu, collapsed);
    save_flag(SIDEBAR_COLLAPSED_KEY, collapsed);
    log::debug!("toggled sidebar, collapsed={collapsed}");
}

/// Re-apply the collapsed state saved by an earlier page.
pub(crate) fn restore() {
    if let (Some(menu), Some(collapsed)) = (dom::by_id(MENU_ID), load_flag(SIDEBAR_COLLAPSED_KEY)) {
        apply(&menu, collapsed);
    }
}

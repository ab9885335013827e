//! Dataset edit and inspect pages: access control, options, members, deletion, bulk
//! actions, the per-row tag editor and field statistics.

use crate::api::{FetchResult, Method};
use crate::components::dialogs::{alert_dialog, confirm_dialog};
use crate::dom;
use crate::models::{
    AclResponse, BulkActionRequest, BulkActionResponse, FieldInfo, PageAction, RoleChange,
    RowTagRequest,
};
use crate::mount;
use crate::state::UiSession;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};

/// How an ACL toggle looks for a role the user does or does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AclLook {
    pub text: String,
    pub icon: &'static str,
    pub add_class: &'static str,
    pub remove_class: &'static str,
}

pub(crate) fn acl_look(role: &str, granted: bool) -> AclLook {
    if granted {
        AclLook {
            text: format!("{role} "),
            icon: "far fa-check-square",
            add_class: "btn-outline-success",
            remove_class: "btn-outline-primary",
        }
    } else {
        AclLook {
            text: format!("make {role} "),
            icon: "far fa-square",
            add_class: "btn-outline-primary",
            remove_class: "btn-outline-success",
        }
    }
}

fn acl_granted(toggle: &Element) -> bool {
    !dom::query_all(toggle, ".fa-check-square").is_empty()
}

fn render_acl(toggle: &Element, look: &AclLook) {
    toggle.set_text_content(Some(&look.text));
    if let Ok(doc) = dom::document() {
        if let Ok(icon) = doc.create_element("i") {
            icon.set_class_name(look.icon);
            let _ = toggle.append_child(&icon);
        }
    }
    dom::remove_class(toggle, look.remove_class);
    dom::add_class(toggle, look.add_class);
}

pub(crate) fn on_toggle_acl(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let (Some(user), Some(role)) = (dom::data_nonblank(el, "userid"), dom::data_nonblank(el, "roleid"))
    else {
        log::warn!("acl toggle without user or role");
        return;
    };

    let change = RoleChange {
        grant: !acl_granted(el),
        annouser: user.clone(),
        annorole: role,
    };

    let session = session.clone();
    spawn_local(async move {
        let res: FetchResult<AclResponse> =
            session.client.send_form("", &change.form_fields()).await;
        match res {
            Ok(acl) => {
                let selector = format!("a.toggleacl[data-userid='{user}']");
                for toggle in dom::query_document(&selector) {
                    let role = dom::data(&toggle, "roleid").unwrap_or_default();
                    render_acl(&toggle, &acl_look(&role, acl.new_roles.contains(&role)));
                }
                log::info!("user {user} now has roles {:?}", acl.new_roles);
            }
            Err(e) => {
                log::error!("acl update for {user} failed: {e}");
                alert_dialog(format!("Could not update access rights: {e}"), || ());
            }
        }
    });
}

/// The option checkbox's `<label for=..>` if there is one, else the checkbox.
fn option_indicator(input: &Element) -> Element {
    let id = input.id();
    if !id.is_empty() {
        if let Some(label) = dom::query_document(&format!("label[for='{id}']")).into_iter().next() {
            return label;
        }
    }
    input.clone()
}

pub(crate) fn on_option_change(session: &UiSession, el: &Element, _ev: &Event) {
    let Some(input) = el.dyn_ref::<HtmlInputElement>() else {
        return;
    };
    let Some(url) = session.config.option_update_url() else {
        log::warn!("option changed outside a dataset page");
        return;
    };
    let action = PageAction::UpdateOption {
        option_key: input.value(),
        option_value: input.checked(),
    };
    let indicator = option_indicator(el);
    dom::remove_class(&indicator, "option_update_failed");
    dom::add_class(&indicator, "option_update_active");

    let session = session.clone();
    spawn_local(async move {
        let res: FetchResult<serde_json::Value> = session.client.send_json(&url, Some(&action)).await;
        dom::remove_class(&indicator, "option_update_active");
        if let Err(e) = res {
            log::error!("option update failed: {e}");
            dom::add_class(&indicator, "option_update_failed");
        }
    });
}

pub(crate) fn on_add_user(_session: &UiSession, el: &Element, _ev: &Event) {
    let Some(uid) = dom::data_nonblank(el, "userid") else {
        return;
    };

    let mut found = false;
    for row in dom::query_document(".userlist_row") {
        if dom::data(&row, "userid").as_deref() != Some(uid.as_str()) {
            continue;
        }
        // Right above the last row (the owner).
        if let Some(parent) = row.parent_element() {
            let last: Option<web_sys::Node> = parent.last_element_child().map(Into::into);
            let _ = parent.insert_before(&row, last.as_ref());
        }
        dom::remove_class(&row, "d-none");
        found = true;
    }
    if found {
        dom::add_class(el, "d-none");
    }

    let hidden = dom::query_document(".userlist_row")
        .iter()
        .filter(|r| dom::has_class(r, "d-none"))
        .count();
    if hidden == 0 {
        if let Some(add) = dom::by_id("adduser_to_dataset") {
            dom::set_disabled(&add, true);
        }
    }
}

pub(crate) fn on_delete_dataset(_session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    confirm_dialog(
        "Delete dataset",
        "Warning: You are about to delete a dataset. Are you sure?",
        "Continue",
        || {
            confirm_dialog(
                "Delete dataset",
                "Are you really sure? Deleting a dataset cannot be undone.",
                "Delete",
                || {
                    if let Some(field) = dom::by_id_as::<HtmlInputElement>("confirmation") {
                        field.set_value("delete_dataset_confirmed");
                    }
                    match dom::by_id_as::<web_sys::HtmlFormElement>("form_delete_dataset") {
                        Some(form) => {
                            log::warn!("deleting dataset");
                            if let Err(e) = form.submit() {
                                log::error!("delete form submit failed: {e:?}");
                            }
                        }
                        None => log::error!("delete form missing"),
                    }
                },
            )
        },
    );
}

pub(crate) fn on_bulk_action(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(action) = dom::data_nonblank(el, "action") else {
        log::error!("bulk action button without data-action");
        return;
    };
    let target = dom::data(el, "targethref").unwrap_or_default();
    let description = dom::data_nonblank(el, "description").unwrap_or_else(|| action.clone());

    let session = session.clone();
    confirm_dialog(
        "Confirm bulk action?",
        format!("Are you sure you want to continue? This action will {description}"),
        "Confirm",
        move || {
            log::info!("bulk action {action}");
            spawn_local(async move {
                let req = BulkActionRequest { bulk_action: action };
                let res: FetchResult<BulkActionResponse> =
                    session.client.send_json(&target, Some(&req)).await;
                let message = match res {
                    Ok(summary) => summary.summary(),
                    Err(e) => {
                        log::error!("bulk action failed: {e}");
                        format!("The bulk action failed: {e}")
                    }
                };
                alert_dialog(message, dom::reload);
            });
        },
    );
}

pub(crate) fn on_row_tag(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let (Some(sample), Some(tag)) = (dom::data(el, "sample"), dom::data(el, "tag")) else {
        return;
    };
    let Some(row) = dom::closest(el, ".df_inspect_table_row") else {
        log::warn!("row action outside a table row");
        return;
    };
    dom::set_style(&row, "opacity", "0.5");
    log::debug!("set sample {sample} -> {tag}");

    let req = RowTagRequest {
        single_row: sample,
        set_tag: tag,
    };
    let session = session.clone();
    spawn_local(async move {
        let res = session.client.send_html("", Method::Post, Some(&req)).await;
        let swapped = match res {
            Ok(html) => dom::replace_outer(&row, &html).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match swapped {
            Ok(parent) => {
                mount::remount(&session, &parent);
            }
            Err(e) => {
                dom::set_style(&row, "opacity", "1");
                log::error!("row update failed: {e}");
                alert_dialog(format!("Could not update the row: {e}"), || ());
            }
        }
    });
}

pub(crate) fn on_field_info(session: &UiSession, el: &Element, _ev: &Event) {
    let Some(field) = dom::input_value(el).filter(|f| !f.is_empty()) else {
        return;
    };
    let Some(group) = dom::closest(el, ".field_info_group") else {
        return;
    };

    let session = session.clone();
    spawn_local(async move {
        let action = PageAction::FieldInfo { field };
        let res: FetchResult<FieldInfo> = session.client.send_json("", Some(&action)).await;
        let info = match res {
            Ok(info) => info,
            Err(e) => {
                log::warn!("field info failed: {e}");
                return;
            }
        };
        for (slot, value) in [("min", &info.min), ("max", &info.max)] {
            let selector = format!("[data-fieldinfo='{slot}']");
            for input in dom::query_all(&group, &selector) {
                let _ = input.set_attribute("placeholder", &FieldInfo::display(value));
            }
        }
    });
}

pub(crate) fn mount_preview_cell(_session: &UiSession, el: &Element) {
    let Ok(doc) = dom::document() else {
        return;
    };
    let Ok(wrap) = doc.create_element("div") else {
        return;
    };
    wrap.set_class_name("tdwrap");
    while let Some(child) = el.first_child() {
        if wrap.append_child(&child).is_err() {
            break;
        }
    }
    let _ = el.append_child(&wrap);
}

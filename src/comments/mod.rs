//! Comment threads on samples: posting and deleting, each answered by a fresh thread
//! fragment for the form's container.

use crate::components::dialogs::{alert_dialog, confirm_dialog};
use crate::dom;
use crate::fragment::{self, SwapRequest};
use crate::models::PageAction;
use crate::state::UiSession;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlTextAreaElement};

/// Comment text to send, `None` when there is nothing but whitespace.
pub(crate) fn comment_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub(crate) fn on_submit(session: &UiSession, form: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(container) = dom::data_nonblank(form, "container") else {
        log::warn!("comment form without data-container");
        return;
    };
    let Some(area) = dom::query_all(form, "textarea[name='comment']")
        .into_iter()
        .next()
        .and_then(|a| a.dyn_into::<HtmlTextAreaElement>().ok())
    else {
        return;
    };
    let Some(comment) = comment_text(&area.value()) else {
        log::debug!("blank comment not sent");
        return;
    };
    let url = form.get_attribute("action").unwrap_or_default();

    let session = session.clone();
    spawn_local(async move {
        let posted = async {
            let req = SwapRequest::post(url, &PageAction::AddComment { comment }, container.clone())?
                .dimming(container);
            fragment::swap(&session, req).await
        };
        match posted.await {
            Ok(_) => area.set_value(""),
            Err(e) => {
                log::error!("comment failed: {e}");
                alert_dialog(format!("Could not post the comment: {e}"), || ());
            }
        }
    });
}

pub(crate) fn on_delete(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let (Some(comment_id), Some(container)) = (
        dom::data_nonblank(el, "commentid"),
        dom::data_nonblank(el, "container"),
    ) else {
        log::warn!("comment delete without id or container");
        return;
    };

    let session = session.clone();
    confirm_dialog(
        "Delete comment?",
        "The comment will be removed for everyone.",
        "Delete",
        move || {
            let action = PageAction::DeleteComment { comment_id };
            match SwapRequest::post("", &action, container.clone()) {
                Ok(req) => fragment::spawn_swap(&session, req.dimming(container)),
                Err(e) => log::error!("comment delete not sent: {e}"),
            }
        },
    );
}

//! User account pages: invite links and API tokens.

use crate::api::FetchResult;
use crate::components::dialogs::{alert_dialog, token_dialog};
use crate::dom;
use crate::models::{InviteResponse, PageAction, TokenResponse};
use crate::state::UiSession;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};

const INVITE_FIELD: &str = "inviteLink";
const COPY_INVITE: &str = "copyInvite";
const TOKEN_DESCRIPTION: &str = "api_token_generate_description";
const TOKEN_GENERATE: &str = "api_token_generate";
const ACTION_FAILED: &str = "Action failed. Please see log for details.";

/// Full invite link for the current origin, `by` and `token` URI-encoded.
pub(crate) fn invite_uri(protocol: &str, host: &str, invite: &InviteResponse) -> String {
    format!(
        "{protocol}//{host}{}?by={}&token={}",
        invite.uri,
        urlencoding::encode(&invite.by),
        urlencoding::encode(&invite.token)
    )
}

fn invite_field() -> Option<HtmlInputElement> {
    dom::by_id_as::<HtmlInputElement>(INVITE_FIELD)
}

fn select_all(input: &HtmlInputElement) {
    let len = input.value().encode_utf16().count() as u32;
    let _ = input.set_selection_range(0, len);
}

pub(crate) fn on_generate_invite(session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(field) = invite_field() else {
        return;
    };
    field.set_value("Generating...");
    dom::remove_class(&field, "update_failed");
    dom::add_class(&field, "update_active");

    let url = session.config.url("user/create");
    let session = session.clone();
    spawn_local(async move {
        let res: FetchResult<InviteResponse> = session
            .client
            .send_json(&url, Some(&PageAction::GenerateInvite))
            .await;
        dom::remove_class(&field, "update_active");
        match res {
            Ok(invite) => {
                let location = web_sys::window().map(|w| w.location());
                let protocol = location.as_ref().and_then(|l| l.protocol().ok()).unwrap_or_default();
                let host = location.as_ref().and_then(|l| l.host().ok()).unwrap_or_default();
                field.set_value(&invite_uri(&protocol, &host, &invite));
                dom::add_class(&field, "generated");
                if let Some(copy) = dom::by_id(COPY_INVITE) {
                    dom::set_disabled(&copy, false);
                }
                log::info!("invite generated by {}", invite.by);
            }
            Err(e) => {
                log::error!("invite generation failed: {e}");
                field.set_value(&format!("Invite generation failed ({e})."));
                dom::add_class(&field, "update_failed");
            }
        }
    });
}

pub(crate) fn on_copy_invite(_session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(field) = invite_field() else {
        return;
    };
    let _ = field.focus();
    select_all(&field);
    let copied = dom::document().map(|d| dom::exec_copy(&d)).unwrap_or(false);
    if !copied {
        log::warn!("could not copy invite link");
    }
    let _ = field.blur();
    dom::remove_class(&field, "generated");
}

pub(crate) fn on_select_invite(_session: &UiSession, el: &Element, _ev: &Event) {
    if let Some(field) = el.dyn_ref::<HtmlInputElement>() {
        select_all(field);
    }
}

/// The generate button is only usable with a description.
pub(crate) fn on_token_description(_session: &UiSession, el: &Element, _ev: &Event) {
    let blank = dom::input_value(el).is_none_or(|v| v.trim().is_empty());
    if let Some(button) = dom::by_id(TOKEN_GENERATE) {
        dom::set_disabled(&button, blank);
    }
}

pub(crate) fn on_generate_token(session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    let description = dom::by_id(TOKEN_DESCRIPTION)
        .and_then(|d| dom::input_value(&d))
        .unwrap_or_default();
    if description.is_empty() {
        return;
    }

    let session = session.clone();
    spawn_local(async move {
        let action = PageAction::NewApiToken {
            api_token_generate_description: description,
        };
        let res: FetchResult<TokenResponse> = session.client.send_json("", Some(&action)).await;
        match res {
            Ok(created) => token_dialog(created.token, dom::reload),
            Err(e) => {
                log::error!("token generation failed: {e}");
                alert_dialog(ACTION_FAILED, || ());
            }
        }
    });
}

pub(crate) fn on_revoke_token(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(token_id) = dom::data_nonblank(el, "tokenid") else {
        log::warn!("revoke button without data-tokenid");
        return;
    };

    let session = session.clone();
    spawn_local(async move {
        let action = PageAction::RevokeApiToken {
            api_token_id: token_id,
        };
        let res: FetchResult<serde_json::Value> = session.client.send_json("", Some(&action)).await;
        match res {
            Ok(_) => alert_dialog("The token has been revoked", dom::reload),
            Err(e) => {
                log::error!("token revocation failed: {e}");
                alert_dialog(ACTION_FAILED, || ());
            }
        }
    });
}

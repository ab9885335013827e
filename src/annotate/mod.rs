//! Annotation view: tag buttons, keyboard shortcuts, free-text answers and the
//! sample-id copy button.

use crate::components::dialogs::alert_dialog;
use crate::dom;
use crate::fragment::{swap, SwapRequest};
use crate::state::UiSession;
use crate::util::with_query_param;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, KeyboardEvent};

const PAGE_BODY: &str = "pagebody";
const CHANGED_CLASS: &str = "text_input_changed";
const COPY_SELECTION: &str = ".anno_textinput_copyselection";

const NAV_HOTKEYS: &[(&str, &str)] = &[
    ("anno_nav_next", "→"),
    ("anno_nav_prev", "←"),
    ("anno_nav_random", "R"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HotkeyTarget {
    Id(&'static str),
    TagIdx(u8),
}

/// Map a `KeyboardEvent.key` to what it activates.
pub(crate) fn hotkey_target(key: &str) -> Option<HotkeyTarget> {
    match key {
        "ArrowRight" => Some(HotkeyTarget::Id("anno_nav_next")),
        "ArrowLeft" => Some(HotkeyTarget::Id("anno_nav_prev")),
        "r" | "R" => Some(HotkeyTarget::Id("anno_nav_random")),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ '1'..='9'), None) => Some(HotkeyTarget::TagIdx(c as u8 - b'0')),
                _ => None,
            }
        }
    }
}

/// The key shown in a control's hint, if it has one.
pub(crate) fn hotkey_symbol(id: &str, tagidx: Option<&str>) -> Option<String> {
    if let Some((_, sym)) = NAV_HOTKEYS.iter().find(|(nav, _)| *nav == id) {
        return Some((*sym).to_string());
    }
    tagidx
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn mark_button(el: &Element) {
    let _ = el
        .class_list()
        .remove_4("btn-info", "btn-primary", "btn-success", "btn-light");
    let _ = el.class_list().add_2("btn-dark", "tag_current_choice");
}

/// Load the annotation content at `href` into `#pagebody` and record it in history.
pub(crate) fn submit_annotation_change(session: &UiSession, href: &str) {
    let req = SwapRequest::get(with_query_param(href, "contentonly", "1"), PAGE_BODY)
        .with_history(href);
    let session = session.clone();
    spawn_local(async move {
        match swap(&session, req).await {
            Ok(_) => {
                for popover in dom::query_document(".popover") {
                    dom::set_visible(&popover, false);
                }
                session.kbd_in_input.set(false);
            }
            Err(e) => {
                log::error!("annotation change failed: {e}");
                alert_dialog(format!("Could not save the annotation: {e}"), || ());
            }
        }
    });
}

pub(crate) fn on_tag_button(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(href) = el.get_attribute("href").filter(|h| !h.is_empty()) else {
        return;
    };
    mark_button(el);
    submit_annotation_change(session, &href);
}

fn typing_target(ev: &KeyboardEvent) -> bool {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return false;
    };
    dom::matches(&el, "input, textarea, select, [contenteditable]")
}

pub(crate) fn on_keydown(session: &UiSession, ev: &KeyboardEvent) {
    if ev.is_composing() || ev.key_code() == 229 {
        return;
    }
    if session.in_text_input() || typing_target(ev) {
        return;
    }
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }

    let target = match hotkey_target(&ev.key()) {
        Some(HotkeyTarget::Id(id)) => dom::by_id(id),
        Some(HotkeyTarget::TagIdx(idx)) => {
            dom::query_document(&format!("a.btn[data-tagidx='{idx}']")).pop()
        }
        None => None,
    };
    let Some(target) = target else {
        return;
    };

    log::debug!("hotkey {} -> #{}", ev.key(), target.id());
    mark_button(&target);
    if let Some(html) = target.dyn_ref::<HtmlElement>() {
        html.click();
    }
}

pub(crate) fn mount_hotkey_hint(_session: &UiSession, el: &Element) {
    if el.has_attribute("data-original-title") {
        return;
    }
    let tagidx = dom::data(el, "tagidx");
    let Some(symbol) = hotkey_symbol(&el.id(), tagidx.as_deref()) else {
        return;
    };
    let _ = el.set_attribute("title", &format!("hotkey: {symbol}"));
    dom::set_data(el, "content", &format!(r#"hotkey: <span class="kbd">{symbol}</span>"#));
}

fn text_task(el: &Element) -> Option<Element> {
    dom::closest(el, ".annotation_task_text")
}

fn is_changed(el: &Element) -> Option<(Element, String)> {
    let task = text_task(el)?;
    let current = dom::data(&task, "curvalue").unwrap_or_default();
    let value = dom::input_value(el)?;
    (value != current).then_some((task, value))
}

pub(crate) fn on_text_focus(session: &UiSession, _el: &Element, _ev: &Event) {
    session.kbd_in_input.set(true);
}

pub(crate) fn on_text_blur(session: &UiSession, el: &Element, _ev: &Event) {
    session.kbd_in_input.set(false);

    let Some((task, value)) = is_changed(el) else {
        return;
    };
    let Some(target) = dom::data_nonblank(&task, "target") else {
        log::warn!("text task without data-target");
        return;
    };
    submit_annotation_change(session, &with_query_param(&target, "set_value", &value));
}

pub(crate) fn on_text_keyup(_session: &UiSession, el: &Element, _ev: &Event) {
    if is_changed(el).is_some() {
        dom::add_class(el, CHANGED_CLASS);
    } else {
        dom::remove_class(el, CHANGED_CLASS);
    }
}

/// Only selections made inside the sample text feed the copy buttons.
pub(crate) fn on_selection_change() {
    let selection = web_sys::window().and_then(|w| w.get_selection().ok().flatten());
    let text = selection
        .filter(|s| s.type_() == "Range")
        .filter(|s| {
            s.anchor_node()
                .and_then(|n| match n.dyn_ref::<Element>() {
                    Some(el) => Some(el.clone()),
                    None => n.parent_element(),
                })
                .and_then(|el| dom::closest(&el, "blockquote.sampletext"))
                .is_some()
        })
        .map(|s| String::from(s.to_string()))
        .unwrap_or_default();

    for button in dom::query_document(COPY_SELECTION) {
        dom::set_disabled(&button, text.is_empty());
        dom::set_data(&button, "content", &text);
    }
}

pub(crate) fn on_apply_selection(_session: &UiSession, el: &Element, _ev: &Event) {
    let Some(content) = dom::data(el, "content").filter(|c| !c.is_empty()) else {
        return;
    };
    let input = dom::closest(el, ".input-group")
        .and_then(|group| dom::query_all(&group, ".anno_textinput").into_iter().next());
    let Some(input) = input else {
        return;
    };

    if let Some(field) = input.dyn_ref::<web_sys::HtmlInputElement>() {
        field.set_value(&content);
    } else if let Some(area) = input.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        area.set_value(&content);
    }
    // Focus then blur: the blur handler submits the change.
    if let Some(html) = input.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
        let _ = html.blur();
    }
}

pub(crate) fn on_copy_id(_session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let text = el.text_content().unwrap_or_default();
    if !dom::copy_text(text.trim()) {
        log::warn!("copy of sample id failed");
    }
    if let Some(indicator) = dom::by_id("sample_metadata_id_copied") {
        dom::set_style(&indicator, "display", "inline-block");
    }
}

pub(crate) fn mount_copy_indicator(_session: &UiSession, el: &Element) {
    dom::set_style(el, "display", "none");
}

//! Thin helpers over `web_sys` plus the fragment patcher.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum DomError {
    #[error("no document available")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingContainer(String),
    #[error("replaced node had no parent")]
    Detached,
}

pub(crate) fn document() -> Result<web_sys::Document, DomError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(DomError::NoDocument)
}

pub(crate) fn by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

pub(crate) fn by_id_as<T: JsCast>(id: &str) -> Option<T> {
    by_id(id)?.dyn_into::<T>().ok()
}

/// All elements under `scope` matching `selector`, in document order.
pub(crate) fn query_all(scope: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = scope.query_selector_all(selector) else {
        log::warn!("invalid selector {selector:?}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn query_document(selector: &str) -> Vec<Element> {
    match document().ok().and_then(|d| d.document_element()) {
        Some(root) => query_all(&root, selector),
        None => Vec::new(),
    }
}

pub(crate) fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok().flatten()
}

pub(crate) fn matches(el: &Element, selector: &str) -> bool {
    el.matches(selector).unwrap_or(false)
}

pub(crate) fn data(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{name}"))
}

/// Like `data`, but trimmed and with blanks treated as missing.
pub(crate) fn data_nonblank(el: &Element, name: &str) -> Option<String> {
    data(el, name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn set_data(el: &Element, name: &str, value: &str) {
    let _ = el.set_attribute(&format!("data-{name}"), value);
}

pub(crate) fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub(crate) fn remove_class(el: &Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

pub(crate) fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub(crate) fn set_disabled(el: &Element, disabled: bool) {
    if disabled {
        let _ = el.set_attribute("disabled", "disabled");
    } else {
        let _ = el.remove_attribute("disabled");
    }
}

pub(crate) fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

pub(crate) fn set_visible(el: &Element, visible: bool) {
    if visible {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.style().remove_property("display");
        }
    } else {
        set_style(el, "display", "none");
    }
}

pub(crate) fn input_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    el.dyn_ref::<web_sys::HtmlSelectElement>().map(|s| s.value())
}

pub(crate) fn event_element(ev: &web_sys::Event) -> Option<Element> {
    let target = ev.target()?;
    if let Some(el) = target.dyn_ref::<Element>() {
        return Some(el.clone());
    }
    // Text nodes: fall back to their parent element.
    target
        .dyn_into::<web_sys::Node>()
        .ok()?
        .parent_element()
}

pub(crate) fn reload() {
    if let Some(w) = web_sys::window() {
        let _ = w.location().reload();
    }
}

pub(crate) fn navigate(href: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.location().set_href(href);
    }
}

/// Copy via a temporary selection, the only route that works without clipboard permissions.
pub(crate) fn copy_text(text: &str) -> bool {
    let Ok(doc) = document() else {
        return false;
    };
    let Some(body) = doc.body() else {
        return false;
    };
    let Ok(tmp) = doc
        .create_element("input")
        .and_then(|e| e.dyn_into::<web_sys::HtmlInputElement>().map_err(Into::into))
    else {
        return false;
    };
    tmp.set_type("text");
    tmp.set_value(text);
    if body.append_child(&tmp).is_err() {
        return false;
    }
    let _ = tmp.focus();
    let _ = tmp.set_selection_range(0, text.encode_utf16().count() as u32);
    let copied = exec_copy(&doc);
    let _ = tmp.blur();
    tmp.remove();
    copied
}

pub(crate) fn exec_copy(doc: &web_sys::Document) -> bool {
    doc.dyn_ref::<web_sys::HtmlDocument>()
        .and_then(|d| d.exec_command("copy").ok())
        .unwrap_or(false)
}

/// Replace every child of `#container_id` with `html`. No merge, no focus restore.
pub(crate) fn replace(container_id: &str, html: &str) -> Result<Element, DomError> {
    let container = document()?
        .get_element_by_id(container_id)
        .ok_or_else(|| DomError::MissingContainer(container_id.to_string()))?;
    container.set_inner_html(html);
    Ok(container)
}

/// Swap `el` itself for `html`; returns the parent so callers can remount it.
pub(crate) fn replace_outer(el: &Element, html: &str) -> Result<Element, DomError> {
    let parent = el.parent_element().ok_or(DomError::Detached)?;
    el.set_outer_html(html);
    Ok(parent)
}

/// Pending-request look: fade the node and show its `.ajax-loading` spinner.
pub(crate) fn dim(id: &str) {
    let Some(el) = by_id(id) else {
        return;
    };
    set_style(&el, "opacity", "0.5");
    for spinner in query_all(&el, ".ajax-loading") {
        set_visible(&spinner, true);
    }
}

pub(crate) fn undim(id: &str) {
    let Some(el) = by_id(id) else {
        return;
    };
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().remove_property("opacity");
    }
    for spinner in query_all(&el, ".ajax-loading") {
        set_visible(&spinner, false);
    }
}

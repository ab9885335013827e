//! Tag and split list editors.
//!
//! Both editors render the same way server-side (one entry per label, an input to
//! rename it, buttons to reorder or delete, an add row) and only differ in names, so
//! one implementation is parameterised by `EditorKind`.

use crate::dom;
use crate::fragment::{spawn_swap, SwapRequest};
use crate::labels::{rename_pending, Dispatch, ListVerb, OrderedLabelList, PendingAction};
use crate::models::PageAction;
use crate::state::UiSession;
use web_sys::{Element, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditorKind {
    Tags,
    Splits,
}

/// Selectors and attribute names of one editor's markup.
#[derive(Debug)]
pub(crate) struct EditorMarkup {
    pub entry: &'static str,
    pub label_attr: &'static str,
    pub input: &'static str,
    pub action_attr: &'static str,
    pub target_attr: &'static str,
    pub rename_button: &'static str,
    pub add_input: &'static str,
    pub add_button: &'static str,
    pub dim: &'static str,
    pub container: &'static str,
    pub add_verb: &'static str,
}

const TAGS: EditorMarkup = EditorMarkup {
    entry: "div.tageditor_entry",
    label_attr: "tag",
    input: "input.tageditor_taginput",
    action_attr: "action",
    target_attr: "tag",
    rename_button: "button.tageditor_action_rename",
    add_input: "tageditor_add_tag",
    add_button: "tageditor_add_tag_action",
    dim: "tag_editor",
    container: "tag_editor_container",
    add_verb: "update_taglist",
};

const SPLITS: EditorMarkup = EditorMarkup {
    entry: "div.spliteditor_entry",
    label_attr: "split",
    input: "input.spliteditor_splitinput",
    action_attr: "splitaction",
    target_attr: "targetsplit",
    rename_button: "button.spliteditor_action_rename",
    add_input: "spliteditor_add_split",
    add_button: "spliteditor_add_split_action",
    dim: "split_editor",
    container: "split_editor_container",
    add_verb: "update_splitlist",
};

impl EditorKind {
    pub fn markup(self) -> &'static EditorMarkup {
        match self {
            Self::Tags => &TAGS,
            Self::Splits => &SPLITS,
        }
    }

    /// Which editor a control belongs to, judged by the control itself.
    pub fn of(el: &Element) -> Option<Self> {
        [Self::Tags, Self::Splits].into_iter().find(|kind| {
            let m = kind.markup();
            el.id() == m.add_button
                || el.id() == m.add_input
                || dom::matches(el, m.rename_button)
                || dom::matches(el, m.input)
        })
    }

    pub fn payload(self, dispatch: Dispatch) -> PageAction {
        match (self, dispatch) {
            (Self::Tags, Dispatch::List { verb, labels }) => PageAction::TagList {
                tagaction: verb,
                newtags: labels.into_vec(),
            },
            (Self::Tags, Dispatch::Metadata { verb, target, value }) => PageAction::TagMetadata {
                tagaction: verb,
                tag: target,
                value,
            },
            (Self::Splits, Dispatch::List { verb, labels }) => PageAction::SplitList {
                splitaction: verb,
                newsplits: labels.into_vec(),
            },
            (Self::Splits, Dispatch::Metadata { verb, target, value }) => {
                PageAction::SplitMetadata {
                    splitaction: verb,
                    split: target,
                    value,
                }
            }
        }
    }

    /// The editor root a control lives in, or the whole document.
    fn scope(self, el: Option<&Element>) -> Option<Element> {
        let root = format!("#{}", self.markup().dim);
        el.and_then(|e| dom::closest(e, &root))
            .or_else(|| dom::by_id(self.markup().dim))
            .or_else(|| dom::document().ok()?.document_element())
    }

    fn entries(self, scope: &Element) -> Vec<Element> {
        dom::query_all(scope, self.markup().entry)
    }

    pub fn current(self, scope: &Element) -> OrderedLabelList {
        let attr = self.markup().label_attr;
        OrderedLabelList::from_labels(
            self.entries(scope)
                .iter()
                .filter_map(|e| dom::data_nonblank(e, attr)),
        )
    }

    fn entry_input(self, entry: &Element) -> Option<Element> {
        dom::query_all(entry, self.markup().input).into_iter().next()
    }
}

fn on_action(kind: EditorKind, session: &UiSession, el: &Element) {
    let m = kind.markup();
    let Some(verb) = dom::data_nonblank(el, m.action_attr) else {
        log::warn!("{kind:?} control without data-{}", m.action_attr);
        return;
    };
    let target = dom::data(el, m.target_attr).unwrap_or_default();
    let pending = PendingAction::new(verb, target, dom::data(el, "value"));

    let Some(scope) = kind.scope(Some(el)) else {
        return;
    };

    // Renames read the entry's input now, not when the button was rendered.
    let edited = match pending.list_verb() {
        Some(ListVerb::Rename) => dom::closest(el, m.entry)
            .and_then(|entry| kind.entry_input(&entry))
            .and_then(|input| dom::input_value(&input)),
        _ => None,
    };

    submit(kind, session, &scope, &pending, edited.as_deref());
}

fn on_add(kind: EditorKind, session: &UiSession) {
    let m = kind.markup();
    let Some(input) = dom::by_id(m.add_input) else {
        return;
    };
    let Some(scope) = kind.scope(Some(&input)) else {
        return;
    };
    let value = dom::input_value(&input).unwrap_or_default();
    let pending = PendingAction::new(m.add_verb, "", None);
    submit(kind, session, &scope, &pending, Some(&value));
}

fn submit(
    kind: EditorKind,
    session: &UiSession,
    scope: &Element,
    pending: &PendingAction,
    edited: Option<&str>,
) {
    let current = kind.current(scope);
    let dispatch = match pending.resolve(&current, edited) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("{kind:?} {} rejected: {e}", pending.verb);
            return;
        }
    };

    let m = kind.markup();
    log::info!("{kind:?} {} on {:?}", pending.verb, pending.target);
    match SwapRequest::post("", &kind.payload(dispatch), m.container) {
        Ok(req) => spawn_swap(session, req.dimming(m.dim)),
        Err(e) => log::error!("{kind:?} {} not sent: {e}", pending.verb),
    }
}

/// Enable the rename button of an edited entry and lock every other entry's input.
fn refresh_rename_lock(kind: EditorKind, scope: &Element) {
    let m = kind.markup();
    let entries = kind.entries(scope);
    let edited: Vec<bool> = entries
        .iter()
        .map(|entry| {
            let label = dom::data(entry, m.label_attr).unwrap_or_default();
            let value = kind
                .entry_input(entry)
                .and_then(|i| dom::input_value(&i))
                .unwrap_or_default();
            rename_pending(&label, &value)
        })
        .collect();
    let locked_by = edited.iter().position(|e| *e);

    for (i, entry) in entries.iter().enumerate() {
        for button in dom::query_all(entry, m.rename_button) {
            dom::set_disabled(&button, !edited[i]);
        }
        if let Some(input) = kind.entry_input(entry) {
            dom::set_disabled(&input, locked_by.is_some_and(|l| l != i));
        }
    }
}

fn refresh_add_button(kind: EditorKind) {
    let m = kind.markup();
    let Some(button) = dom::by_id(m.add_button) else {
        return;
    };
    let Some(scope) = kind.scope(Some(&button)) else {
        return;
    };
    let value = dom::by_id(m.add_input)
        .and_then(|i| dom::input_value(&i))
        .unwrap_or_default();
    dom::set_disabled(&button, !kind.current(&scope).can_add(&value));
}

pub(crate) fn on_tag_action(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    on_action(EditorKind::Tags, session, el);
}

pub(crate) fn on_split_action(session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    on_action(EditorKind::Splits, session, el);
}

pub(crate) fn on_tag_add(session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    on_add(EditorKind::Tags, session);
}

pub(crate) fn on_split_add(session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    on_add(EditorKind::Splits, session);
}

fn on_entry_input(kind: EditorKind, el: &Element) {
    if let Some(scope) = kind.scope(Some(el)) {
        refresh_rename_lock(kind, &scope);
    }
}

pub(crate) fn on_tag_input(_session: &UiSession, el: &Element, _ev: &Event) {
    on_entry_input(EditorKind::Tags, el);
}

pub(crate) fn on_split_input(_session: &UiSession, el: &Element, _ev: &Event) {
    on_entry_input(EditorKind::Splits, el);
}

pub(crate) fn on_tag_add_input(_session: &UiSession, _el: &Element, _ev: &Event) {
    refresh_add_button(EditorKind::Tags);
}

pub(crate) fn on_split_add_input(_session: &UiSession, _el: &Element, _ev: &Event) {
    refresh_add_button(EditorKind::Splits);
}

/// Freshly rendered editors start with their buttons in the right state.
pub(crate) fn mount_editor_button(_session: &UiSession, el: &Element) {
    let Some(kind) = EditorKind::of(el) else {
        return;
    };
    if el.id() == kind.markup().add_button {
        refresh_add_button(kind);
    } else if let Some(scope) = kind.scope(Some(el)) {
        refresh_rename_lock(kind, &scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_list_payload() {
        let dispatch = Dispatch::List {
            verb: "move_tag_up".to_string(),
            labels: OrderedLabelList::from_labels(["b", "a"]),
        };
        let v = serde_json::to_value(EditorKind::Tags.payload(dispatch)).expect("serializes");
        assert_eq!(
            v,
            serde_json::json!({"action": "tageditor", "tagaction": "move_tag_up", "newtags": ["b", "a"]})
        );
    }

    #[test]
    fn test_split_metadata_payload() {
        let dispatch = Dispatch::Metadata {
            verb: "set_split_color".to_string(),
            target: "train".to_string(),
            value: Some("blue".to_string()),
        };
        let v = serde_json::to_value(EditorKind::Splits.payload(dispatch)).expect("serializes");
        assert_eq!(
            v,
            serde_json::json!({
                "action": "spliteditor",
                "splitaction": "set_split_color",
                "split": "train",
                "value": "blue"
            })
        );
    }

    #[test]
    fn test_add_verbs_are_list_verbs() {
        for kind in [EditorKind::Tags, EditorKind::Splits] {
            let pending = PendingAction::new(kind.markup().add_verb, "", None);
            assert_eq!(pending.list_verb(), Some(ListVerb::Add));
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const FIXTURE: &str = r#"
        <div id="tag_editor">
          <div class="tageditor_entry" data-tag="pos">
            <input class="tageditor_taginput" value="pos">
            <button class="tageditor_action_rename tageditor_action" data-action="rename_tag" data-tag="pos"></button>
          </div>
          <div class="tageditor_entry" data-tag="neg">
            <input class="tageditor_taginput" value="neg">
            <button class="tageditor_action_rename tageditor_action" data-action="rename_tag" data-tag="neg"></button>
          </div>
          <input id="tageditor_add_tag" value="">
          <button id="tageditor_add_tag_action"></button>
        </div>"#;

    fn fixture() -> Element {
        let doc = dom::document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(FIXTURE);
        doc.body().expect("body").append_child(&host).expect("append");
        host
    }

    fn set_input(el: &Element, value: &str) {
        el.dyn_ref::<web_sys::HtmlInputElement>()
            .expect("input")
            .set_value(value);
    }

    #[wasm_bindgen_test]
    fn test_current_reads_entries_in_order() {
        let host = fixture();
        let scope = EditorKind::Tags.scope(Some(&host)).expect("scope");
        assert_eq!(EditorKind::Tags.current(&scope).as_slice(), ["pos", "neg"]);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_rename_lock() {
        let host = fixture();
        let scope = dom::by_id("tag_editor").expect("editor");
        let inputs = dom::query_all(&scope, "input.tageditor_taginput");
        let renames = dom::query_all(&scope, "button.tageditor_action_rename");

        refresh_rename_lock(EditorKind::Tags, &scope);
        assert!(renames.iter().all(|b| b.has_attribute("disabled")));

        set_input(&inputs[0], "positive");
        refresh_rename_lock(EditorKind::Tags, &scope);
        assert!(!renames[0].has_attribute("disabled"));
        assert!(renames[1].has_attribute("disabled"));
        assert!(!inputs[0].has_attribute("disabled"));
        assert!(inputs[1].has_attribute("disabled"));

        set_input(&inputs[0], "pos");
        refresh_rename_lock(EditorKind::Tags, &scope);
        assert!(!inputs[1].has_attribute("disabled"));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_add_button_tracks_input() {
        let host = fixture();
        let input = dom::by_id("tageditor_add_tag").expect("input");
        let button = dom::by_id("tageditor_add_tag_action").expect("button");

        refresh_add_button(EditorKind::Tags);
        assert!(button.has_attribute("disabled"));

        set_input(&input, "neg");
        refresh_add_button(EditorKind::Tags);
        assert!(button.has_attribute("disabled"));

        set_input(&input, "neutral");
        refresh_add_button(EditorKind::Tags);
        assert!(!button.has_attribute("disabled"));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_editor_clicks_cancel_default() {
        use crate::config::PageConfig;

        let host = fixture();
        let session = UiSession::new(PageConfig::default());
        let cancelable_click = || {
            let init = web_sys::EventInit::new();
            init.set_cancelable(true);
            Event::new_with_event_init_dict("click", &init).expect("event")
        };

        // Empty add box: rejected locally, nothing is sent.
        let add = dom::by_id("tageditor_add_tag_action").expect("button");
        let ev = cancelable_click();
        on_tag_add(&session, &add, &ev);
        assert!(ev.default_prevented());

        // Rename to blank: also rejected locally.
        set_input(&dom::query_all(&host, "input.tageditor_taginput")[0], "  ");
        let rename = dom::query_all(&host, "button.tageditor_action_rename").remove(0);
        let ev = cancelable_click();
        on_tag_action(&session, &rename, &ev);
        assert!(ev.default_prevented());
        host.remove();
    }
}

//! Inspect-page filters: tri-state tag checkboxes, split/annotation/view filter buttons
//! and the task switcher.

use crate::dom;
use crate::state::UiSession;
use crate::util::resolve_url;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlFormElement, HtmlInputElement, HtmlSelectElement};

const FORM_ID: &str = "form_doquery";
const INCLUDE_FIELD: &str = "restrict_taglist_include";
const EXCLUDE_FIELD: &str = "restrict_taglist_exclude";

/// Neutral → Include → Exclude → Neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TriState {
    #[default]
    Neutral,
    Include,
    Exclude,
}

impl TriState {
    pub fn from_attr(raw: Option<&str>) -> Self {
        match raw.and_then(|s| s.trim().parse::<u32>().ok()).map(|n| n % 3) {
            Some(1) => Self::Include,
            Some(2) => Self::Exclude,
            _ => Self::Neutral,
        }
    }

    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Neutral => "0",
            Self::Include => "1",
            Self::Exclude => "2",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Neutral => Self::Include,
            Self::Include => Self::Exclude,
            Self::Exclude => Self::Neutral,
        }
    }

    pub fn checked(self) -> bool {
        self == Self::Include
    }

    pub fn indeterminate(self) -> bool {
        self == Self::Exclude
    }

    pub fn label(self, tag: &str) -> String {
        match self {
            Self::Neutral => tag.to_string(),
            Self::Include => format!("include {tag}"),
            Self::Exclude => format!("exclude {tag}"),
        }
    }
}

/// Split tag states into (include, exclude), keeping input order.
pub(crate) fn partition<'a>(
    states: impl IntoIterator<Item = (&'a str, TriState)>,
) -> (Vec<String>, Vec<String>) {
    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for (tag, state) in states {
        match state {
            TriState::Include => include.push(tag.to_string()),
            TriState::Exclude => exclude.push(tag.to_string()),
            TriState::Neutral => {}
        }
    }
    (include, exclude)
}

/// The inspect query as the server reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FilterQuery {
    pub restrict_view: Option<String>,
    pub restrict_split: Option<String>,
    pub viewfilter: Option<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl FilterQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let fields = [
            ("restrict_view", &self.restrict_view),
            ("restrict_split", &self.restrict_split),
            ("viewfilter", &self.viewfilter),
        ];
        for (name, value) in fields {
            if let Some(v) = value.as_ref().filter(|v| !v.is_empty()) {
                out.push((name, v.clone()));
            }
        }
        if !self.include.is_empty() {
            out.push((INCLUDE_FIELD, json_list(&self.include)));
        }
        if !self.exclude.is_empty() {
            out.push((EXCLUDE_FIELD, json_list(&self.exclude)));
        }
        out
    }

    pub fn to_query(&self) -> String {
        self.pairs()
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn from_form() -> Self {
        let field = |id: &str| dom::by_id(id).and_then(|el| dom::input_value(&el));
        let list = |id: &str| {
            field(id)
                .and_then(|v| serde_json::from_str::<Vec<String>>(&v).ok())
                .unwrap_or_default()
        };
        Self {
            restrict_view: field("restrict_view"),
            restrict_split: field("restrict_split"),
            viewfilter: field("viewfilter"),
            include: list(INCLUDE_FIELD),
            exclude: list(EXCLUDE_FIELD),
        }
    }
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Which filter a button sets, read off its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterButton {
    Split,
    Annotation,
    View,
}

impl FilterButton {
    pub fn of(el: &Element) -> Option<Self> {
        if dom::has_class(el, "ds_split_filter") {
            Some(Self::Split)
        } else if dom::has_class(el, "ds_filter") {
            Some(Self::Annotation)
        } else if dom::has_class(el, "ds_view_filter") {
            Some(Self::View)
        } else {
            None
        }
    }

    /// (data attribute carrying the value, form field it goes into)
    pub fn binding(self) -> (&'static str, &'static str) {
        match self {
            Self::Split => ("targetsplit", "restrict_split"),
            Self::Annotation => ("targetviewfilter", "viewfilter"),
            Self::View => ("targetview", "restrict_view"),
        }
    }

    fn apply(self, query: &mut FilterQuery, value: String) {
        match self {
            Self::Split => query.restrict_split = Some(value),
            Self::Annotation => query.viewfilter = Some(value),
            Self::View => query.restrict_view = Some(value),
        }
    }
}

fn render_tristate(el: &Element, state: TriState) {
    if let Some(cb) = el.dyn_ref::<HtmlInputElement>() {
        cb.set_checked(state.checked());
        cb.set_indeterminate(state.indeterminate());
    }
    let tag = dom::data(el, "tag").unwrap_or_default();
    let label = el
        .parent_element()
        .and_then(|p| dom::query_all(&p, "label").into_iter().next());
    if let Some(label) = label {
        label.set_text_content(Some(&state.label(&tag)));
    }
}

fn tristate_of(el: &Element) -> TriState {
    TriState::from_attr(dom::data(el, "tristate").as_deref())
}

fn write_tristate_targets() {
    let boxes = dom::query_document(".cb_show_tag_elem");
    let states: Vec<(String, TriState)> = boxes
        .iter()
        .filter_map(|el| Some((dom::data_nonblank(el, "tag")?, tristate_of(el))))
        .collect();
    let (include, exclude) = partition(states.iter().map(|(t, s)| (t.as_str(), *s)));

    let include_field = dom::by_id_as::<HtmlInputElement>(INCLUDE_FIELD);
    let exclude_field = dom::by_id_as::<HtmlInputElement>(EXCLUDE_FIELD);
    match (include_field, exclude_field) {
        (Some(inc), Some(exc)) => {
            inc.set_value(&json_list(&include));
            exc.set_value(&json_list(&exclude));
            log::debug!("tristate include={include:?} exclude={exclude:?}");
        }
        _ => log::debug!("tristate target fields not on this page"),
    }
}

pub(crate) fn mount_tristate(_session: &UiSession, el: &Element) {
    render_tristate(el, tristate_of(el));
    write_tristate_targets();
}

pub(crate) fn on_tristate_change(_session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let state = tristate_of(el).next();
    dom::set_data(el, "tristate", state.as_attr());
    render_tristate(el, state);
    write_tristate_targets();
}

pub(crate) fn on_filter_button(_session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    let Some(href) = dom::data_nonblank(el, "targethref") else {
        return;
    };
    let Some(kind) = FilterButton::of(el) else {
        return;
    };
    let (attr, field) = kind.binding();
    let value = dom::data(el, attr).unwrap_or_default();
    log::info!("filter {kind:?} = {value:?}");

    let form = dom::by_id_as::<HtmlFormElement>(FORM_ID);
    if let Some(form) = form {
        form.set_action(&href);
        if let Some(input) = dom::by_id_as::<HtmlInputElement>(field) {
            input.set_value(&value);
        }
        if let Err(e) = form.submit() {
            log::error!("filter form submit failed: {e:?}");
        }
        return;
    }

    // No query form on this page: carry the current filters over in the URL.
    let mut query = FilterQuery::from_form();
    kind.apply(&mut query, value);
    let current = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let target = resolve_url(&current, &href);
    let sep = if target.contains('?') { '&' } else { '?' };
    dom::navigate(&format!("{target}{sep}{}", query.to_query()));
}

pub(crate) fn on_task_switch(_session: &UiSession, el: &Element, _ev: &Event) {
    let Some(select) = el.dyn_ref::<HtmlSelectElement>() else {
        return;
    };
    let href = select
        .selected_options()
        .item(0)
        .and_then(|opt| dom::data_nonblank(&opt, "href"));
    if let Some(href) = href {
        dom::navigate(&href);
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::PageConfig;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_change_advances_and_writes_targets() {
        let doc = dom::document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(
            r#"<span><input type="checkbox" id="cb_pos" class="cb_show_tag_elem" data-tag="pos"><label>pos</label></span>
               <span><input type="checkbox" id="cb_neg" class="cb_show_tag_elem" data-tag="neg" data-tristate="1"><label>neg</label></span>
               <input type="hidden" id="restrict_taglist_include">
               <input type="hidden" id="restrict_taglist_exclude">"#,
        );
        doc.body().expect("body").append_child(&host).expect("append");
        let session = UiSession::new(PageConfig::default());
        let ev = Event::new("change").expect("event");

        let pos = dom::by_id("cb_pos").expect("pos");
        let neg = dom::by_id("cb_neg").expect("neg");
        on_tristate_change(&session, &pos, &ev);
        on_tristate_change(&session, &neg, &ev);

        assert_eq!(dom::data(&pos, "tristate").as_deref(), Some("1"));
        assert_eq!(dom::data(&neg, "tristate").as_deref(), Some("2"));
        let neg_input = neg.dyn_ref::<HtmlInputElement>().expect("checkbox");
        assert!(neg_input.indeterminate());

        let inc = dom::by_id_as::<HtmlInputElement>(INCLUDE_FIELD).expect("include");
        let exc = dom::by_id_as::<HtmlInputElement>(EXCLUDE_FIELD).expect("exclude");
        assert_eq!(inc.value(), r#"["pos"]"#);
        assert_eq!(exc.value(), r#"["neg"]"#);
        host.remove();
    }
}

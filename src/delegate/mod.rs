//! Event delegation table.
//!
//! One listener per event type sits on the window; the table below maps a selector to
//! its handler. Handlers receive the nearest ancestor of the event target matching the
//! selector, so nodes arriving in swapped fragments work without any rebinding.

use crate::state::UiSession;
use crate::{account, alerts, annotate, chart, comments, dataset, dom, editors, filters, history, sidebar};
use leptos::ev;
use leptos_dom::helpers::{window_event_listener, window_event_listener_untyped};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

pub(crate) type Handler = fn(&UiSession, &Element, &Event);

pub(crate) struct Route {
    pub event: &'static str,
    pub selector: &'static str,
    pub handler: Handler,
}

const fn route(event: &'static str, selector: &'static str, handler: Handler) -> Route {
    Route {
        event,
        selector,
        handler,
    }
}

pub(crate) const ROUTES: &[Route] = &[
    // list editors
    route("click", ".tageditor_action", editors::on_tag_action),
    route("click", ".spliteditor_action", editors::on_split_action),
    route("click", "#tageditor_add_tag_action", editors::on_tag_add),
    route("click", "#spliteditor_add_split_action", editors::on_split_add),
    route("input", "input.tageditor_taginput", editors::on_tag_input),
    route("change", "input.tageditor_taginput", editors::on_tag_input),
    route("input", "input.spliteditor_splitinput", editors::on_split_input),
    route("change", "input.spliteditor_splitinput", editors::on_split_input),
    route("input", "#tageditor_add_tag", editors::on_tag_add_input),
    route("change", "#tageditor_add_tag", editors::on_tag_add_input),
    route("input", "#spliteditor_add_split", editors::on_split_add_input),
    route("change", "#spliteditor_add_split", editors::on_split_add_input),
    // annotation view
    route("click", ".sample_content_tagbtns a.btn", annotate::on_tag_button),
    route("click", ".anno_textinput_copyselection", annotate::on_apply_selection),
    route("click", "#sample_metadata_id", annotate::on_copy_id),
    route("focusin", ".anno_textinput", annotate::on_text_focus),
    route("focusout", ".anno_textinput", annotate::on_text_blur),
    route("keyup", ".anno_textinput", annotate::on_text_keyup),
    // inspect / edit pages
    route("click", "a.toggleacl", dataset::on_toggle_acl),
    route("click", ".adduser_btn", dataset::on_add_user),
    route("click", "#form_delete_dataset_confirm", dataset::on_delete_dataset),
    route("click", "button.ds_action_btn", dataset::on_bulk_action),
    route("click", ".df_inspect_changeaction", dataset::on_row_tag),
    route("change", ".cb_inspect_option", dataset::on_option_change),
    route("change", "select.field_info_select", dataset::on_field_info),
    route("click", "button.ds_split_filter, button.ds_filter, button.ds_view_filter", filters::on_filter_button),
    route("change", ".cb_show_tag_elem", filters::on_tristate_change),
    route("change", "select.inspect_task_switch", filters::on_task_switch),
    route("click", "#show_all_annotators", chart::on_show_all),
    route("click", "#show_individual_annotators", chart::on_show_single),
    // account
    route("click", "#generateInvite", account::on_generate_invite),
    route("click", "#copyInvite", account::on_copy_invite),
    route("click", "#inviteLink", account::on_select_invite),
    route("input", "#api_token_generate_description", account::on_token_description),
    route("click", "#api_token_generate", account::on_generate_token),
    route("click", ".revoke_token_btn", account::on_revoke_token),
    // shared chrome
    route("submit", "form.comment_form", comments::on_submit),
    route("click", ".comment_delete", comments::on_delete),
    route("click", "#sidebar-brandlink", sidebar::on_toggle),
    route("click", ".alert [data-dismiss='alert']", alerts::on_close),
];

/// Run every route registered for `event_name` whose selector matches an ancestor of the target.
pub(crate) fn dispatch(session: &UiSession, routes: &[Route], event_name: &str, ev: &Event) -> usize {
    let Some(target) = dom::event_element(ev) else {
        return 0;
    };

    let mut handled = 0;
    for r in routes.iter().filter(|r| r.event == event_name) {
        if let Some(el) = dom::closest(&target, r.selector) {
            (r.handler)(session, &el, ev);
            handled += 1;
        }
    }
    handled
}

fn event_names(routes: &[Route]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for r in routes {
        if !names.contains(&r.event) {
            names.push(r.event);
        }
    }
    names
}

/// Install the delegation listeners plus the global keyboard, history and selection hooks.
pub(crate) fn install(session: &UiSession) {
    for name in event_names(ROUTES) {
        let s = session.clone();
        let handle = window_event_listener_untyped(name, move |ev: Event| {
            dispatch(&s, ROUTES, name, &ev);
        });
        session.keep_listener(handle);
    }

    let s = session.clone();
    let keydown = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        annotate::on_keydown(&s, &ev);
    });
    session.keep_listener(keydown);

    let popstate = window_event_listener_untyped("popstate", move |_ev: Event| {
        history::on_popstate();
    });
    session.keep_listener(popstate);

    install_selection_listener();
    log::debug!("delegation installed for {:?}", event_names(ROUTES));
}

fn install_selection_listener() {
    let Ok(doc) = dom::document() else {
        return;
    };
    let cb = Closure::wrap(Box::new(move || {
        annotate::on_selection_change();
    }) as Box<dyn FnMut()>);
    let _ = doc.add_event_listener_with_callback("selectionchange", cb.as_ref().unchecked_ref());

    // Lives for the page lifetime.
    cb.forget();
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::PageConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    static CLICKS: AtomicUsize = AtomicUsize::new(0);

    fn on_probe(_s: &UiSession, el: &Element, _ev: &Event) {
        assert!(el.class_list().contains("probe"));
        CLICKS.fetch_add(1, Ordering::SeqCst);
    }

    const PROBE: &[Route] = &[route("click", ".probe", on_probe)];

    #[wasm_bindgen_test]
    fn test_dispatch_reaches_replaced_nodes() {
        let doc = dom::document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(r#"<button class="probe"><i id="probe_icon"></i></button>"#);
        doc.body().expect("body").append_child(&host).expect("append");

        let session = UiSession::new(PageConfig::default());
        CLICKS.store(0, Ordering::SeqCst);

        let ev = Event::new("click").expect("event");
        let icon = dom::by_id("probe_icon").expect("icon");
        icon.dispatch_event(&ev).expect("dispatch");
        assert_eq!(dispatch(&session, PROBE, "click", &ev), 1);

        // Swap the fragment: the same route still applies.
        host.set_inner_html(r#"<button class="probe" id="probe_new"></button>"#);
        let ev = Event::new("click").expect("event");
        dom::by_id("probe_new").expect("new").dispatch_event(&ev).expect("dispatch");
        assert_eq!(dispatch(&session, PROBE, "click", &ev), 1);
        assert_eq!(CLICKS.load(Ordering::SeqCst), 2);

        host.remove();
    }
}

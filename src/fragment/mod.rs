//! The fetch → patch → remount cycle every AJAX interaction goes through.
//!
//! There is no cancellation and no sequencing: two swaps into the same container
//! resolve in arrival order and the last one wins.

use crate::api::{FetchError, FetchResult, Method};
use crate::components::dialogs::alert_dialog;
use crate::dom::{self, DomError};
use crate::state::UiSession;
use crate::{history, mount};
use leptos::task::spawn_local;
use web_sys::Element;

#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum SwapError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("request body could not be encoded: {0}")]
    Payload(String),
}

#[derive(Debug, Clone)]
pub(crate) struct SwapRequest {
    pub url: String,
    pub method: Method,
    pub payload: Option<serde_json::Value>,
    /// Id of the node whose children are replaced.
    pub container: String,
    /// URL to push onto the history stack once the response arrived.
    pub history: Option<String>,
    /// Id of the node faded while the request is in flight.
    pub dim: Option<String>,
}

impl SwapRequest {
    pub fn get(url: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            payload: None,
            container: container.into(),
            history: None,
            dim: None,
        }
    }

    pub fn post(
        url: impl Into<String>,
        payload: &impl serde::Serialize,
        container: impl Into<String>,
    ) -> Result<Self, SwapError> {
        let payload =
            serde_json::to_value(payload).map_err(|e| SwapError::Payload(e.to_string()))?;
        Ok(Self {
            method: Method::Post,
            payload: Some(payload),
            ..Self::get(url, container)
        })
    }

    pub fn with_history(mut self, url: impl Into<String>) -> Self {
        self.history = Some(url.into());
        self
    }

    pub fn dimming(mut self, id: impl Into<String>) -> Self {
        self.dim = Some(id.into());
        self
    }
}

pub(crate) async fn swap(session: &UiSession, req: SwapRequest) -> Result<Element, SwapError> {
    if let Some(id) = &req.dim {
        dom::dim(id);
    }
    let fetched = session
        .client
        .send_html(&req.url, req.method, req.payload.as_ref())
        .await;
    settle(session, &req, fetched)
}

/// Second half of a swap: splice the fragment in, then record history and remount.
///
/// The dimmed node is restored whatever happened; it may be the container itself, which
/// a successful patch refills but does not restyle. History is only pushed once the
/// content is actually on the page.
pub(crate) fn settle(
    session: &UiSession,
    req: &SwapRequest,
    fetched: FetchResult<String>,
) -> Result<Element, SwapError> {
    let result = fetched
        .map_err(SwapError::from)
        .and_then(|html| dom::replace(&req.container, &html).map_err(SwapError::from));
    if let Some(id) = &req.dim {
        dom::undim(id);
    }

    let container = result?;
    if let Some(to) = &req.history {
        history::push(to);
    }
    mount::remount(session, &container);
    Ok(container)
}

/// Fire-and-forget `swap`; failures end up in an alert dialog.
pub(crate) fn spawn_swap(session: &UiSession, req: SwapRequest) {
    let session = session.clone();
    spawn_local(async move {
        let container = req.container.clone();
        if let Err(e) = swap(&session, req).await {
            log::error!("swap into #{container} failed: {e}");
            alert_dialog(format!("Request failed: {e}"), || ());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageAction;

    #[test]
    fn test_post_request_carries_payload() {
        let req = SwapRequest::post(
            "",
            &PageAction::AddComment {
                comment: "looks fine".to_string(),
            },
            "comments_box",
        )
        .expect("payload encodes")
        .dimming("comments_box");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.container, "comments_box");
        assert_eq!(req.dim.as_deref(), Some("comments_box"));
        let payload = req.payload.expect("payload");
        assert_eq!(payload["action"], "add_comment");
        assert_eq!(payload["comment"], "looks fine");
    }

    #[test]
    fn test_get_request_defaults() {
        let req = SwapRequest::get("/next?contentonly=1", "pagebody").with_history("/next");
        assert_eq!(req.method, Method::Get);
        assert!(req.payload.is_none());
        assert!(req.dim.is_none());
        assert_eq!(req.history.as_deref(), Some("/next"));
    }

    #[test]
    fn test_post_rejects_unencodable_payload() {
        let mut bad = std::collections::BTreeMap::new();
        bad.insert((1, 2), "tuple keys are not JSON object keys");
        let err = SwapRequest::post("", &bad, "pagebody").expect_err("must not send a bodyless POST");
        assert!(matches!(err, SwapError::Payload(_)));
    }

    #[test]
    fn test_swap_error_displays_inner_message() {
        let err: SwapError = DomError::MissingContainer("pagebody".to_string()).into();
        assert_eq!(err.to_string(), "element #pagebody not found");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::api::FetchErrorKind;
    use crate::config::PageConfig;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(html: &str) -> Element {
        let doc = dom::document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(html);
        doc.body().expect("body").append_child(&host).expect("append");
        host
    }

    fn opacity(id: &str) -> String {
        dom::by_id_as::<web_sys::HtmlElement>(id)
            .expect("element")
            .style()
            .get_property_value("opacity")
            .unwrap_or_default()
    }

    fn history_len() -> u32 {
        web_sys::window()
            .expect("window")
            .history()
            .expect("history")
            .length()
            .expect("length")
    }

    #[wasm_bindgen_test]
    fn test_success_restores_dimmed_container() {
        let host = fixture(r#"<div id="swap_box"><p>old</p></div>"#);
        let session = UiSession::new(PageConfig::default());
        let req = SwapRequest::get("", "swap_box")
            .dimming("swap_box")
            .with_history("#swapped");

        dom::dim("swap_box");
        assert_eq!(opacity("swap_box"), "0.5");
        let before = history_len();

        settle(&session, &req, Ok("<p>new</p>".to_string())).expect("patched");
        let container = dom::by_id("swap_box").expect("container");
        assert_eq!(container.inner_html(), "<p>new</p>");
        assert_eq!(opacity("swap_box"), "");
        assert_eq!(history_len(), before + 1);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_fetch_error_undims_and_keeps_content() {
        let host = fixture(r#"<div id="swap_err"><p>old</p></div>"#);
        let session = UiSession::new(PageConfig::default());
        let req = SwapRequest::get("", "swap_err")
            .dimming("swap_err")
            .with_history("#never");

        dom::dim("swap_err");
        let before = history_len();
        let err = FetchError {
            kind: FetchErrorKind::Network,
            message: "offline".to_string(),
        };
        let res = settle(&session, &req, Err(err));

        assert!(matches!(res, Err(SwapError::Fetch(_))));
        assert_eq!(opacity("swap_err"), "");
        assert_eq!(dom::by_id("swap_err").expect("box").inner_html(), "<p>old</p>");
        assert_eq!(history_len(), before);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_missing_container_records_no_history() {
        let session = UiSession::new(PageConfig::default());
        let req = SwapRequest::get("", "no_such_box").with_history("#never");
        let before = history_len();

        let res = settle(&session, &req, Ok("<p>lost</p>".to_string()));
        assert!(matches!(res, Err(SwapError::Dom(DomError::MissingContainer(_)))));
        assert_eq!(history_len(), before);
    }
}

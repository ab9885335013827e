use crate::util::resolve_url;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FetchErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: FetchErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: &str) -> Self {
        // Error pages can be whole HTML documents; keep the dialog readable.
        let body: String = body.trim().chars().take(200).collect();
        let message = if body.is_empty() {
            format!("Request failed ({status})")
        } else {
            format!("Request failed ({status}): {body}")
        };
        Self {
            kind: FetchErrorKind::Http,
            message,
        }
    }
}

pub(crate) type FetchResult<T> = Result<T, FetchError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

/// What the caller wants back: a fragment to splice in, or data to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Expect {
    Html,
    Json,
}

#[derive(Clone, Debug)]
pub(crate) enum Body {
    Html(String),
    Json(serde_json::Value),
}

/// Fragment fetcher.
///
/// One attempt per call; no retry and no timeout beyond the browser's own. It never
/// touches the DOM, callers decide how failures surface.
#[derive(Clone, Debug)]
pub(crate) struct FragmentClient {
    origin_href: Option<String>,
}

impl FragmentClient {
    pub fn new() -> Self {
        Self { origin_href: None }
    }

    #[cfg(test)]
    pub fn with_location(href: &str) -> Self {
        Self {
            origin_href: Some(href.to_string()),
        }
    }

    fn current_href(&self) -> String {
        if let Some(href) = &self.origin_href {
            return href.clone();
        }
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    pub fn absolute(&self, url: &str) -> String {
        resolve_url(&self.current_href(), url)
    }

    fn request(
        &self,
        url: &str,
        method: Method,
        payload: Option<&impl Serialize>,
    ) -> reqwest::RequestBuilder {
        let client = reqwest::Client::new();
        let url = self.absolute(url);
        let req = match method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
        };
        match payload {
            Some(p) => req.json(p),
            None => req,
        }
    }

    /// POST with an `application/x-www-form-urlencoded` body.
    fn form_request(&self, url: &str, fields: &[(&str, String)]) -> reqwest::RequestBuilder {
        reqwest::Client::new().post(self.absolute(url)).form(fields)
    }

    async fn execute(
        req: reqwest::RequestBuilder,
        method: Method,
        url: &str,
        expect: Expect,
    ) -> FetchResult<Body> {
        log::debug!("{method:?} {url}");
        let res = req.send().await.map_err(FetchError::network)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            log::warn!("{method:?} {url} failed with {status}");
            return Err(FetchError::http(status, &body));
        }

        match expect {
            Expect::Html => res.text().await.map(Body::Html).map_err(FetchError::network),
            Expect::Json => {
                let text = res.text().await.map_err(FetchError::network)?;
                parse_json_body(&text).map(Body::Json)
            }
        }
    }

    pub async fn send(
        &self,
        url: &str,
        method: Method,
        payload: Option<&impl Serialize>,
        expect: Expect,
    ) -> FetchResult<Body> {
        let req = self.request(url, method, payload);
        Self::execute(req, method, &self.absolute(url), expect).await
    }

    pub async fn send_html(
        &self,
        url: &str,
        method: Method,
        payload: Option<&impl Serialize>,
    ) -> FetchResult<String> {
        match self.send(url, method, payload, Expect::Html).await? {
            Body::Html(html) => Ok(html),
            Body::Json(v) => Ok(v.to_string()),
        }
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: Option<&impl Serialize>,
    ) -> FetchResult<T> {
        match self.send(url, Method::Post, payload, Expect::Json).await? {
            Body::Json(v) => serde_json::from_value(v).map_err(FetchError::parse),
            Body::Html(text) => serde_json::from_str(&text).map_err(FetchError::parse),
        }
    }

    /// Form POST expecting JSON back; for the handlers that read `request.form`.
    pub async fn send_form<T: DeserializeOwned>(
        &self,
        url: &str,
        fields: &[(&str, String)],
    ) -> FetchResult<T> {
        let req = self.form_request(url, fields);
        match Self::execute(req, Method::Post, &self.absolute(url), Expect::Json).await? {
            Body::Json(v) => serde_json::from_value(v).map_err(FetchError::parse),
            Body::Html(text) => serde_json::from_str(&text).map_err(FetchError::parse),
        }
    }
}

impl Default for FragmentClient {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn parse_json_body(text: &str) -> FetchResult<serde_json::Value> {
    // Some endpoints answer a bare 200 with no body.
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(text).map_err(FetchError::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_is_truncated() {
        let body = "x".repeat(1000);
        let err = FetchError::http(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert_eq!(err.kind, FetchErrorKind::Http);
        assert!(err.message.starts_with("Request failed (500 Internal Server Error): "));
        assert!(err.message.len() < 300);
    }

    #[test]
    fn test_http_error_without_body() {
        let err = FetchError::http(reqwest::StatusCode::FORBIDDEN, "   ");
        assert_eq!(err.to_string(), "Request failed (403 Forbidden)");
    }

    #[test]
    fn test_parse_json_body_accepts_empty() {
        assert_eq!(parse_json_body("").expect("empty ok"), serde_json::Value::Null);
        let v = parse_json_body(r#"{"applied": 2}"#).expect("valid json");
        assert_eq!(v["applied"], 2);
    }

    #[test]
    fn test_form_request_is_url_encoded() {
        let client = FragmentClient::with_location("https://omen.test/dataset/3/edit");
        let fields = [
            ("action", "add_role".to_string()),
            ("annouser", "7".to_string()),
            ("annorole", "curator & co".to_string()),
        ];
        let req = client.form_request("", &fields).build().expect("request builds");
        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "https://omen.test/dataset/3/edit");
        assert_eq!(
            req.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/x-www-form-urlencoded")
        );
        let body = req.body().and_then(|b| b.as_bytes()).expect("buffered body");
        assert_eq!(body, b"action=add_role&annouser=7&annorole=curator+%26+co");
    }

    #[test]
    fn test_parse_json_body_rejects_html() {
        let err = parse_json_body("<div>oops</div>").expect_err("html is not json");
        assert_eq!(err.kind, FetchErrorKind::Parse);
    }

    #[test]
    fn test_absolute_uses_page_location() {
        let client = FragmentClient::with_location("https://omen.test/dataset/4/edit");
        assert_eq!(
            client.absolute("?contentonly=1"),
            "https://omen.test/dataset/4/edit?contentonly=1"
        );
        assert_eq!(client.absolute(""), "https://omen.test/dataset/4/edit");
    }
}

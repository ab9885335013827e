pub(crate) fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Resolve `target` the way the browser would resolve an `href` on the page at `current`.
///
/// reqwest needs absolute URLs, while the markup carries root-relative links,
/// query-only links (`?page=2`) and the occasional path-relative one.
pub(crate) fn resolve_url(current: &str, target: &str) -> String {
    let target = target.trim();
    if target.is_empty() {
        return current.to_string();
    }
    if target.contains("://") {
        return target.to_string();
    }

    let (origin, path_and_query) = split_origin(current);
    let path = path_and_query
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    if let Some(rest) = target.strip_prefix("//") {
        let scheme = origin.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    if target.starts_with('/') {
        return format!("{origin}{target}");
    }
    if target.starts_with('?') {
        return format!("{origin}{path}{target}");
    }
    if target.starts_with('#') {
        let without_fragment = path_and_query.split('#').next().unwrap_or_default();
        return format!("{origin}{without_fragment}{target}");
    }

    let dir = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "/",
    };
    format!("{origin}{dir}{target}")
}

fn split_origin(url: &str) -> (&str, &str) {
    let Some(scheme_end) = url.find("://") else {
        return ("", url);
    };
    let after_scheme = scheme_end + 3;
    match url[after_scheme..].find('/') {
        Some(idx) => url.split_at(after_scheme + idx),
        None => (url, "/"),
    }
}

/// Append `key=value` to a URL, percent-encoding the value.
pub(crate) fn with_query_param(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (url, None),
    };
    let sep = if !base.contains('?') {
        '?'
    } else if base.ends_with('?') || base.ends_with('&') {
        // already has a dangling separator
        '\0'
    } else {
        '&'
    };

    let mut out = String::with_capacity(base.len() + key.len() + value.len() + 2);
    out.push_str(base);
    if sep != '\0' {
        out.push(sep);
    }
    out.push_str(key);
    out.push('=');
    out.push_str(&urlencoding::encode(value));
    if let Some(f) = fragment {
        out.push('#');
        out.push_str(f);
    }
    out
}

use std::str::FromStr;

const DEFAULT_BASE_URL: &str = "/";
const DEFAULT_ALERT_BASE_MS: u32 = 5_000;

/// Values the server template leaves on `window` for us.
///
/// `OMEN_BASE`, `ACTIVE_DATASET_ID` and `ACTIVE_TASK_ID` are plain globals; optional
/// tuning lives under `window.ENV` (`LOG_LEVEL`, `ALERT_DURATION_MS`).
#[derive(Default, Clone, Debug)]
pub(crate) struct RawPageConfig {
    pub base_url: Option<String>,
    pub dataset_id: Option<String>,
    pub task_id: Option<String>,
    pub log_level: Option<String>,
    pub alert_base_ms: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PageConfig {
    pub base_url: String,
    pub dataset_id: Option<String>,
    pub task_id: Option<String>,
    pub alert_base_ms: u32,
    pub log_level: log::Level,
}

impl PageConfig {
    pub fn load() -> Self {
        Self::resolve(read_globals())
    }

    pub fn resolve(raw: RawPageConfig) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut base_url = clean(raw.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let log_level = clean(raw.log_level)
            .and_then(|s| log::Level::from_str(&s).ok())
            .unwrap_or(log::Level::Info);

        let alert_base_ms = raw
            .alert_base_ms
            .filter(|v| v.is_finite() && *v >= 1.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_ALERT_BASE_MS);

        Self {
            base_url,
            dataset_id: clean(raw.dataset_id),
            task_id: clean(raw.task_id),
            alert_base_ms,
            log_level,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn option_update_url(&self) -> Option<String> {
        let ds = self.dataset_id.as_ref()?;
        Some(self.url(&format!("dataset/{ds}/edit")))
    }

    pub fn overview_url(&self) -> Option<String> {
        let ds = self.dataset_id.as_ref()?;
        let task = self.task_id.as_ref()?;
        Some(self.url(&format!("dataset/{ds}/{task}/overview.json")))
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::resolve(RawPageConfig::default())
    }
}

fn read_globals() -> RawPageConfig {
    let Some(window) = web_sys::window() else {
        return RawPageConfig::default();
    };

    let global_str = |name: &str| -> Option<String> {
        let v = window.get(name)?;
        // Ids are sometimes rendered as bare numbers.
        v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
    };

    let mut raw = RawPageConfig {
        base_url: global_str("OMEN_BASE"),
        dataset_id: global_str("ACTIVE_DATASET_ID"),
        task_id: global_str("ACTIVE_TASK_ID"),
        ..Default::default()
    };

    if let Some(env) = window.get("ENV") {
        if !env.is_undefined() && env.is_object() {
            if let Ok(level) = js_sys::Reflect::get(&env, &"LOG_LEVEL".into()) {
                raw.log_level = level.as_string();
            }
            if let Ok(ms) = js_sys::Reflect::get(&env, &"ALERT_DURATION_MS".into()) {
                raw.alert_base_ms = ms.as_f64();
            }
        }
    }

    raw
}

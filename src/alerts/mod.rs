//! Flash alerts that dismiss themselves.
//!
//! Each alert runs one countdown. Hovering pauses it, leaving resumes it with whatever
//! time was left, and reaching zero (or the close button) removes the node.

use crate::dom;
use crate::state::UiSession;
use crate::util::now_ms;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

const TICK_MS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub(crate) enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Danger,
}

impl Severity {
    pub fn duration_ms(self, base: u32) -> u32 {
        match self {
            Self::Warning | Self::Error | Self::Danger => base.saturating_mul(2),
            Self::Info | Self::Success => base,
        }
    }

    /// From `data-category`, else the first `alert-<severity>` class; unknown means info.
    pub fn of(category: Option<&str>, class_name: &str) -> Self {
        category
            .and_then(|c| Self::from_str(c.trim()).ok())
            .or_else(|| {
                class_name
                    .split_whitespace()
                    .filter_map(|c| c.strip_prefix("alert-"))
                    .find_map(|c| Self::from_str(c).ok())
            })
            .unwrap_or(Self::Info)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlertState {
    Running,
    Paused,
    Dismissed,
}

/// Countdown bookkeeping, in milliseconds of wall clock passed in by the caller.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlertTimer {
    duration: f64,
    consumed: f64,
    running_since: Option<f64>,
    dismissed: bool,
}

impl AlertTimer {
    pub fn start(duration_ms: u32, now: f64) -> Self {
        Self {
            duration: f64::from(duration_ms),
            consumed: 0.0,
            running_since: Some(now),
            dismissed: false,
        }
    }

    pub fn state(&self) -> AlertState {
        match (self.dismissed, self.running_since) {
            (true, _) => AlertState::Dismissed,
            (false, Some(_)) => AlertState::Running,
            (false, None) => AlertState::Paused,
        }
    }

    pub fn pause(&mut self, now: f64) {
        if let Some(since) = self.running_since.take() {
            self.consumed += (now - since).max(0.0);
        }
    }

    pub fn resume(&mut self, now: f64) {
        if !self.dismissed && self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.running_since = None;
    }

    fn elapsed(&self, now: f64) -> f64 {
        self.consumed + self.running_since.map_or(0.0, |since| (now - since).max(0.0))
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.duration - self.elapsed(now)).max(0.0)
    }

    /// Share of the countdown used up, 0.0 to 1.0.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed(now) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_due(&self, now: f64) -> bool {
        !self.dismissed && self.remaining(now) <= 0.0
    }
}

struct AlertRuntime {
    timer: AlertTimer,
    /// The single pending dismissal callback.
    timeout: Option<i32>,
    tick: Option<i32>,
}

type Shared = Rc<RefCell<AlertRuntime>>;

fn set_timeout(ms: f64, f: impl FnOnce() + 'static) -> Option<i32> {
    let window = web_sys::window()?;
    let cb = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms.ceil() as i32)
        .ok()
}

fn clear_timeout(id: Option<i32>) {
    if let (Some(window), Some(id)) = (web_sys::window(), id) {
        window.clear_timeout_with_handle(id);
    }
}

fn schedule_dismissal(state: &Shared, el: &Element) {
    let remaining = state.borrow().timer.remaining(now_ms());
    let (s, e) = (state.clone(), el.clone());
    let id = set_timeout(remaining, move || expire(&s, &e));

    let mut rt = state.borrow_mut();
    clear_timeout(rt.timeout.take());
    rt.timeout = id;
}

fn expire(state: &Shared, el: &Element) {
    let now = now_ms();
    let (due, running) = {
        let mut rt = state.borrow_mut();
        rt.timeout = None;
        (rt.timer.is_due(now), rt.timer.state() == AlertState::Running)
    };
    if due {
        dismiss(state, el);
    } else if running {
        // Timers may fire a little early.
        schedule_dismissal(state, el);
    }
}

fn dismiss(state: &Shared, el: &Element) {
    {
        let mut rt = state.borrow_mut();
        rt.timer.dismiss();
        clear_timeout(rt.timeout.take());
        clear_timeout(rt.tick.take());
    }
    el.remove();
}

fn schedule_tick(state: &Shared, el: &Element, bar: &Element) {
    let (s, e, b) = (state.clone(), el.clone(), bar.clone());
    let id = set_timeout(TICK_MS, move || tick(&s, &e, &b));
    let mut rt = state.borrow_mut();
    clear_timeout(rt.tick.take());
    rt.tick = id;
}

fn tick(state: &Shared, el: &Element, bar: &Element) {
    state.borrow_mut().tick = None;
    if !el.is_connected() {
        // Closed by hand; let the pending timeout find nothing to do.
        state.borrow_mut().timer.dismiss();
        return;
    }
    let (progress, running) = {
        let rt = state.borrow();
        (rt.timer.progress(now_ms()), rt.timer.state() == AlertState::Running)
    };
    dom::set_style(bar, "width", &format!("{:.1}%", (1.0 - progress) * 100.0));
    if running {
        schedule_tick(state, el, bar);
    }
}

fn progress_bar(el: &Element) -> Option<Element> {
    dom::query_all(el, ".alert-progress").into_iter().next()
}

fn on_hover(state: &Shared, el: &Element, entering: bool) {
    let now = now_ms();
    {
        let mut rt = state.borrow_mut();
        if rt.timer.state() == AlertState::Dismissed {
            return;
        }
        if entering {
            rt.timer.pause(now);
            clear_timeout(rt.timeout.take());
            clear_timeout(rt.tick.take());
        } else {
            rt.timer.resume(now);
        }
    }
    if !entering {
        schedule_dismissal(state, el);
        if let Some(bar) = progress_bar(el) {
            schedule_tick(state, el, &bar);
        }
    }
}

fn listen(el: &Element, event: &str, f: impl FnMut() + 'static) {
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
    let _ = el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
    // Owned by the node from here on.
    cb.forget();
}

pub(crate) fn mount_alert(session: &UiSession, el: &Element) {
    let category = dom::data(el, "category");
    let severity = Severity::of(category.as_deref(), &el.class_name());
    let duration = severity.duration_ms(session.config.alert_base_ms);
    log::debug!("alert ({severity}) dismisses in {duration}ms");

    let state: Shared = Rc::new(RefCell::new(AlertRuntime {
        timer: AlertTimer::start(duration, now_ms()),
        timeout: None,
        tick: None,
    }));

    schedule_dismissal(&state, el);
    if let Some(bar) = progress_bar(el) {
        schedule_tick(&state, el, &bar);
    }

    let (s, e) = (state.clone(), el.clone());
    listen(el, "mouseenter", move || on_hover(&s, &e, true));
    let (s, e) = (state, el.clone());
    listen(el, "mouseleave", move || on_hover(&s, &e, false));
}

pub(crate) fn on_close(_session: &UiSession, el: &Element, ev: &Event) {
    ev.prevent_default();
    if let Some(alert) = dom::closest(el, ".alert") {
        alert.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations_by_severity() {
        assert_eq!(Severity::Info.duration_ms(5_000), 5_000);
        assert_eq!(Severity::Success.duration_ms(5_000), 5_000);
        assert_eq!(Severity::Warning.duration_ms(5_000), 10_000);
        assert_eq!(Severity::Danger.duration_ms(5_000), 10_000);
        assert_eq!(Severity::Error.duration_ms(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_severity_detection() {
        assert_eq!(Severity::of(Some("danger"), ""), Severity::Danger);
        assert_eq!(Severity::of(Some("Warning"), ""), Severity::Warning);
        assert_eq!(Severity::of(None, "alert alert-dismissible alert-error"), Severity::Error);
        assert_eq!(Severity::of(Some("message"), "alert alert-success"), Severity::Success);
        assert_eq!(Severity::of(None, "alert"), Severity::Info);
    }

    #[test]
    fn test_danger_fires_after_ten_seconds_of_unhovered_time() {
        let duration = Severity::Danger.duration_ms(5_000);
        let mut t = AlertTimer::start(duration, 0.0);
        assert!(!t.is_due(9_999.0));

        t.pause(4_000.0);
        assert_eq!(t.state(), AlertState::Paused);
        assert!(!t.is_due(60_000.0), "paused alerts never fire");

        t.resume(9_000.0);
        assert_eq!(t.remaining(9_000.0), 6_000.0);
        assert!(!t.is_due(14_999.0));
        assert!(t.is_due(15_000.0));
    }

    #[test]
    fn test_progress_is_derived() {
        let mut t = AlertTimer::start(1_000, 100.0);
        assert_eq!(t.progress(100.0), 0.0);
        assert_eq!(t.progress(600.0), 0.5);
        t.pause(600.0);
        assert_eq!(t.progress(5_000.0), 0.5);
        t.resume(5_000.0);
        assert_eq!(t.progress(7_000.0), 1.0);
    }

    #[test]
    fn test_pause_resume_are_idempotent() {
        let mut t = AlertTimer::start(1_000, 0.0);
        t.pause(100.0);
        t.pause(500.0);
        t.resume(600.0);
        t.resume(900.0);
        assert_eq!(t.remaining(600.0), 900.0);
    }

    #[test]
    fn test_dismissed_is_terminal() {
        let mut t = AlertTimer::start(1_000, 0.0);
        t.dismiss();
        t.resume(10.0);
        assert_eq!(t.state(), AlertState::Dismissed);
        assert!(!t.is_due(5_000.0));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::PageConfig;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_close_button_removes_alert() {
        let doc = dom::document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(
            r#"<div class="alert alert-info" id="flash1"><button id="flash1_close" data-dismiss="alert">x</button></div>"#,
        );
        doc.body().expect("body").append_child(&host).expect("append");

        let session = UiSession::new(PageConfig::default());
        let alert = dom::by_id("flash1").expect("alert");
        mount_alert(&session, &alert);

        let close = dom::by_id("flash1_close").expect("close");
        on_close(&session, &close, &Event::new("click").expect("event"));
        assert!(dom::by_id("flash1").is_none());
        host.remove();
    }
}

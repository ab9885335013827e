use super::{
    arc_path, assign_colors, datasets, half_circle_slices, kappa_background, random_index,
    ring_radii, ChartMode, Palette,
};
use crate::api::{Body, Expect, Method};
use crate::dom;
use crate::models::{Fleiss, OverviewData};
use crate::state::UiSession;
use crate::storage::{save_json_to_storage, CHART_MODE_KEY};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

const CHART_TARGET: &str = "overview-chart";

#[component]
fn OverviewChart(
    overview: RwSignal<Option<OverviewData>>,
    colors: RwSignal<Vec<String>>,
    mode: RwSignal<ChartMode>,
) -> impl IntoView {
    let rings = move || {
        let Some(data) = overview.get() else {
            return Vec::new();
        };
        colors.with(|c| datasets(&data, mode.get(), c))
    };

    let legend = move || {
        let tags = overview.with(|o| o.as_ref().map(|d| d.tags.clone()).unwrap_or_default());
        let colors = colors.get();
        tags.into_iter()
            .enumerate()
            .map(|(i, tag)| {
                let swatch = format!(
                    "background-color: {}",
                    colors.get(i).map(String::as_str).unwrap_or(super::FALLBACK_COLOR)
                );
                view! {
                    <li class="list-inline-item small">
                        <span class="d-inline-block border me-1" style=swatch>"\u{00a0}\u{00a0}\u{00a0}"</span>
                        {tag}
                    </li>
                }
            })
            .collect_view()
    };

    let paths = move || {
        let rings = rings();
        let count = rings.len();
        rings
            .into_iter()
            .enumerate()
            .flat_map(|(ring, ds)| {
                let (outer, inner) = ring_radii(ring, count);
                half_circle_slices(&ds.data)
                    .into_iter()
                    .enumerate()
                    .filter(|(_, (start, end))| end > start)
                    .map(|(i, (start, end))| {
                        let label = format!("{}: {}", ds.label, ds.data[i]);
                        view! {
                            <path
                                d=arc_path(outer, inner, start, end)
                                fill=ds.colors[i].clone()
                                stroke="#fff"
                                stroke-width="1"
                                aria-label=label
                            />
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect_view()
    };

    view! {
        <div class="omen-chart" data-name="OverviewChart">
            <svg viewBox="0 0 220 125" class="w-100" role="img">
                <text x="110" y="12" text-anchor="middle" font-size="9">
                    "Annotations"
                </text>
                {paths}
            </svg>
            <ul class="list-inline text-center mb-0">{legend}</ul>
        </div>
    }
}

fn css_palette() -> Palette {
    let Some(root) = dom::document().ok().and_then(|d| d.document_element()) else {
        return Palette::builtin();
    };
    let Some(style) = web_sys::window().and_then(|w| w.get_computed_style(&root).ok().flatten())
    else {
        return Palette::builtin();
    };

    let vars: Vec<(String, String)> = (0..style.length())
        .map(|i| style.item(i))
        .filter(|k| k.starts_with("--tag_color_") || k.starts_with("--palette_"))
        .map(|k| {
            let v = style.get_property_value(&k).unwrap_or_default();
            (k, v)
        })
        .collect();
    Palette::from_css_vars(vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

/// `#overview-chart` may be the legacy `<canvas>`; the SVG then goes right after it.
fn chart_host(target: &Element) -> Option<web_sys::HtmlElement> {
    if target.tag_name().eq_ignore_ascii_case("canvas") {
        let doc = dom::document().ok()?;
        let host = doc.create_element("div").ok()?;
        target.after_with_node_1(&host).ok()?;
        dom::set_visible(target, false);
        return host.dyn_into().ok();
    }
    target.clone().dyn_into().ok()
}

fn show_agreement(fleiss: &Fleiss) {
    if let Some(value) = dom::by_id("anno_fleiss_value") {
        value.set_text_content(Some(&fleiss.kappa.to_string()));
        if let (Some(bg), Some(parent)) = (kappa_background(fleiss.kappa), value.parent_element()) {
            dom::set_style(&parent, "background-color", &bg);
        }
    }
    if let Some(text) = dom::by_id("anno_fleiss_text") {
        text.set_text_content(Some(&format!("({})", fleiss.interpretation)));
    }
}

async fn load_overview(session: UiSession, url: String) {
    let body = session
        .client
        .send(&url, Method::Get, None::<&()>, Expect::Json)
        .await;
    let data = match body.map(|b| match b {
        Body::Json(v) => serde_json::from_value::<OverviewData>(v).map_err(|e| e.to_string()),
        Body::Html(_) => Err("unexpected html".to_string()),
    }) {
        Ok(Ok(data)) => data,
        Ok(Err(e)) => {
            log::error!("overview.json did not parse: {e}");
            return;
        }
        Err(e) => {
            log::error!("overview.json failed: {e}");
            return;
        }
    };

    // Colors are picked once per load so switching modes keeps them.
    let colors = assign_colors(&data, &css_palette(), random_index);
    if let Some(fleiss) = &data.fleiss {
        show_agreement(fleiss);
    }
    log::info!("overview: {} tags, {} annotators", data.tags.len(), data.annotations.len());
    session.chart_colors.set(colors);
    session.overview.set(Some(data));
}

/// Mount the chart into `#overview-chart` and load its data, when both exist on the page.
pub(crate) fn mount_chart(session: &UiSession) {
    let Some(target) = dom::by_id(CHART_TARGET) else {
        log::debug!("no chart target on this page");
        return;
    };
    let Some(host) = chart_host(&target) else {
        return;
    };

    let (overview, colors, mode) = (session.overview, session.chart_colors, session.chart_mode);
    leptos::mount::mount_to(host, move || {
        view! { <OverviewChart overview=overview colors=colors mode=mode /> }
    })
    .forget();

    if let Some(url) = session.config.overview_url() {
        spawn_local(load_overview(session.clone(), url));
    }
}

fn set_mode(session: &UiSession, mode: ChartMode) {
    session.chart_mode.set(mode);
    save_json_to_storage(CHART_MODE_KEY, &mode);
}

pub(crate) fn on_show_all(session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    set_mode(session, ChartMode::All);
}

pub(crate) fn on_show_single(session: &UiSession, _el: &Element, ev: &Event) {
    ev.prevent_default();
    set_mode(session, ChartMode::Single);
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_agreement_badge() {
        let doc = dom::document().expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(
            r#"<div id="fleiss_box"><span id="anno_fleiss_value"></span></div><span id="anno_fleiss_text"></span>"#,
        );
        doc.body().expect("body").append_child(&host).expect("append");

        show_agreement(&Fleiss {
            kappa: 0.5,
            interpretation: "moderate agreement".to_string(),
        });
        let value = dom::by_id("anno_fleiss_value").expect("value");
        assert_eq!(value.text_content().as_deref(), Some("0.5"));
        let text = dom::by_id("anno_fleiss_text").expect("text");
        assert_eq!(text.text_content().as_deref(), Some("(moderate agreement)"));
        let boxed = dom::by_id_as::<web_sys::HtmlElement>("fleiss_box").expect("box");
        assert!(!boxed
            .style()
            .get_property_value("background-color")
            .unwrap_or_default()
            .is_empty());
        host.remove();
    }
}

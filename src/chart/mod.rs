//! Annotation distribution chart and inter-annotator agreement.
//!
//! Everything here is pure: palette parsing, color assignment, dataset building and
//! the half-doughnut geometry. `view` renders it and owns the DOM side.

mod view;

pub(crate) use view::{mount_chart, on_show_all, on_show_single};

use crate::models::OverviewData;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub(crate) const FALLBACK_COLOR: &str = "white";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ChartMode {
    /// One ring with every annotation.
    All,
    /// One ring per annotator.
    #[default]
    Single,
}

const BUILTIN_COLORS: &[(&str, &str)] = &[
    ("white", "rgb(255, 255, 255)"),
    ("red", "rgb(255, 99, 132)"),
    ("orange", "rgb(255, 159, 64)"),
    ("yellow", "rgb(255, 205, 86)"),
    ("green", "rgb(75, 192, 192)"),
    ("blue", "rgb(54, 162, 235)"),
    ("purple", "rgb(153, 102, 255)"),
    ("gray", "rgb(201, 203, 207)"),
];

/// Named colors tags may ask for (`user`) and the pool random picks come from (`palette`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Palette {
    pub user: Vec<(String, String)>,
    pub palette: Vec<(String, String)>,
}

impl Palette {
    pub fn builtin() -> Self {
        Self {
            user: BUILTIN_COLORS
                .iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
            palette: Vec::new(),
        }
    }

    /// Extend the built-ins with `--tag_color_<name>: r, g, b` and `--palette_<name>: <css color>`
    /// custom properties. Palette entries shadowed by a user color are skipped.
    pub fn from_css_vars<'a>(vars: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut out = Self::builtin();
        let mut palette = Vec::new();
        for (key, value) in vars {
            let value = value.trim();
            if let Some(name) = key.strip_prefix("--tag_color_") {
                let color = format!("rgb({value})");
                match out.user.iter_mut().find(|(n, _)| n == name) {
                    Some(entry) => entry.1 = color,
                    None => out.user.push((name.to_string(), color)),
                }
            } else if let Some(name) = key.strip_prefix("--palette_") {
                palette.push((name.to_string(), value.to_string()));
            }
        }
        out.palette = palette
            .into_iter()
            .filter(|(name, _)| out.user_color(name).is_none())
            .collect();
        out
    }

    pub fn user_color(&self, name: &str) -> Option<&str> {
        self.user
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }
}

/// Uniform index below `n` from the browser's CSPRNG.
pub(crate) fn random_index(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut buf = [0u8; 4];
    if getrandom::getrandom(&mut buf).is_err() {
        return 0;
    }
    u32::from_le_bytes(buf) as usize % n
}

/// One color per tag, in tag order.
///
/// A tag whose metadata names a user color gets it; the rest draw distinct palette
/// colors via `pick(candidates)` and fall back to white once the palette is used up.
pub(crate) fn assign_colors(
    data: &OverviewData,
    palette: &Palette,
    mut pick: impl FnMut(usize) -> usize,
) -> Vec<String> {
    let user_values: Vec<&str> = palette.user.iter().map(|(_, c)| c.as_str()).collect();
    let mut used: Vec<String> = Vec::new();

    data.tags
        .iter()
        .map(|tag| {
            let wanted = data.tag_metadata.get(tag).and_then(|m| m.color.as_deref());
            if let Some(color) = wanted.and_then(|name| palette.user_color(name)) {
                return color.to_string();
            }

            let candidates: Vec<&str> = palette
                .palette
                .iter()
                .map(|(_, c)| c.as_str())
                .filter(|c| !user_values.contains(c) && !used.iter().any(|u| u == c))
                .collect();
            if candidates.is_empty() {
                return FALLBACK_COLOR.to_string();
            }
            let color = candidates[pick(candidates.len()).min(candidates.len() - 1)].to_string();
            used.push(color.clone());
            color
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub colors: Vec<String>,
}

pub(crate) fn datasets(data: &OverviewData, mode: ChartMode, colors: &[String]) -> Vec<ChartDataset> {
    let color_at = |i: usize| {
        colors
            .get(i)
            .cloned()
            .unwrap_or_else(|| FALLBACK_COLOR.to_string())
    };
    let colors: Vec<String> = (0..data.tags.len()).map(color_at).collect();
    let row = |counts: &std::collections::BTreeMap<String, f64>| -> Vec<f64> {
        data.tags
            .iter()
            .map(|t| counts.get(t).copied().unwrap_or(0.0))
            .collect()
    };

    match mode {
        ChartMode::All => vec![ChartDataset {
            label: "All Annotations".to_string(),
            data: row(&data.all_annotations),
            colors,
        }],
        ChartMode::Single => data
            .annotations
            .iter()
            .map(|(annotator, counts)| ChartDataset {
                label: annotator.clone(),
                data: row(counts),
                colors: colors.clone(),
            })
            .collect(),
    }
}

pub(crate) const CENTER_X: f64 = 110.0;
pub(crate) const CENTER_Y: f64 = 105.0;
pub(crate) const OUTER_RADIUS: f64 = 100.0;
pub(crate) const INNER_RADIUS: f64 = 40.0;

/// (outer, inner) radius of ring `index` out of `count`, outermost first.
pub(crate) fn ring_radii(index: usize, count: usize) -> (f64, f64) {
    let count = count.max(1) as f64;
    let width = (OUTER_RADIUS - INNER_RADIUS) / count;
    let outer = OUTER_RADIUS - width * index as f64;
    (outer, outer - width)
}

/// Start/end angles of each value's slice on the upper half circle (π to 2π).
pub(crate) fn half_circle_slices(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = PI;
    values
        .iter()
        .map(|v| {
            let sweep = v.max(0.0) / total * PI;
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

fn point(radius: f64, angle: f64) -> (f64, f64) {
    (CENTER_X + radius * angle.cos(), CENTER_Y + radius * angle.sin())
}

/// SVG path of a ring segment.
pub(crate) fn arc_path(outer: f64, inner: f64, start: f64, end: f64) -> String {
    let (x0, y0) = point(outer, start);
    let (x1, y1) = point(outer, end);
    let (x2, y2) = point(inner, end);
    let (x3, y3) = point(inner, start);
    let large = if end - start > PI { 1 } else { 0 };
    format!(
        "M {x0:.2} {y0:.2} A {outer:.2} {outer:.2} 0 {large} 1 {x1:.2} {y1:.2} \
         L {x2:.2} {y2:.2} A {inner:.2} {inner:.2} 0 {large} 0 {x3:.2} {y3:.2} Z"
    )
}

/// Background for the kappa badge: red (0) through green (1); nothing outside that range.
pub(crate) fn kappa_background(kappa: f64) -> Option<String> {
    (0.0..=1.0)
        .contains(&kappa)
        .then(|| format!("hsl({}, 100%, 50%)", kappa * 120.0))
}

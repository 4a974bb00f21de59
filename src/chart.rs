use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use resvg::{tiny_skia, usvg};

use crate::errors::FnbenchError;

/// Canvas size of the rendered chart, in pixels.
const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const BAR_COLOR: &str = "#1f77b4";
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#dddddd";
const FONT_FAMILY: &str = "sans-serif";

/// One labelled bar.
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// A single bar chart of average latencies, rendered to SVG and rasterized
/// to PNG.
#[derive(Debug, Clone)]
pub struct BarChart {
    title: String,
    x_label: String,
    y_label: String,
    bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            bars: Vec::new(),
        }
    }

    pub fn add_bar(&mut self, label: impl Into<String>, value: f64) {
        self.bars.push(Bar {
            label: label.into(),
            value,
        });
    }

    /// Build the SVG document: white background, y axis with tick labels,
    /// one bar per entry scaled against the largest value, labels under the
    /// bars, title on top.
    pub fn render_svg(&self) -> String {
        let plot_w = WIDTH as f64 - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT as f64 - MARGIN_TOP - MARGIN_BOTTOM;

        // Scale against the largest value; all-zero charts still render
        // with a unit axis.
        let max_value = self
            .bars
            .iter()
            .map(|b| b.value)
            .fold(0.0_f64, f64::max);
        let y_max = if max_value > 0.0 {
            max_value * 1.05
        } else {
            1.0
        };

        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
        );
        let _ = writeln!(
            svg,
            r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
        );

        // Title and axis labels.
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="28" font-family="{FONT_FAMILY}" font-size="18" text-anchor="middle">{title}</text>"#,
            x = WIDTH as f64 / 2.0,
            title = escape_text(&self.title),
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" font-family="{FONT_FAMILY}" font-size="13" text-anchor="middle">{label}</text>"#,
            x = MARGIN_LEFT + plot_w / 2.0,
            y = HEIGHT as f64 - 14.0,
            label = escape_text(&self.x_label),
        );
        let _ = writeln!(
            svg,
            r#"<text x="18" y="{y}" font-family="{FONT_FAMILY}" font-size="13" text-anchor="middle" transform="rotate(-90 18 {y})">{label}</text>"#,
            y = MARGIN_TOP + plot_h / 2.0,
            label = escape_text(&self.y_label),
        );

        // Y axis ticks with gridlines.
        for i in 0..=4 {
            let value = y_max * f64::from(i) / 4.0;
            let y = MARGIN_TOP + plot_h - (value / y_max) * plot_h;
            let _ = writeln!(
                svg,
                r#"<line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="{GRID_COLOR}" stroke-width="1"/>"#,
                x1 = MARGIN_LEFT,
                x2 = MARGIN_LEFT + plot_w,
            );
            let _ = writeln!(
                svg,
                r#"<text x="{x}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="11" text-anchor="end">{value}</text>"#,
                x = MARGIN_LEFT - 8.0,
                ty = y + 4.0,
                value = format_secs(value),
            );
        }

        // Bars with their labels.
        if !self.bars.is_empty() {
            let slot = plot_w / self.bars.len() as f64;
            let bar_w = slot * 0.6;

            for (i, bar) in self.bars.iter().enumerate() {
                let height = (bar.value.max(0.0) / y_max) * plot_h;
                let x = MARGIN_LEFT + i as f64 * slot + slot * 0.2;
                let y = MARGIN_TOP + plot_h - height;

                let _ = writeln!(
                    svg,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{height:.1}" fill="{BAR_COLOR}"/>"#
                );
                let _ = writeln!(
                    svg,
                    r#"<text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="12" text-anchor="middle">{label}</text>"#,
                    cx = x + bar_w / 2.0,
                    ty = MARGIN_TOP + plot_h + 20.0,
                    label = escape_text(&bar.label),
                );
            }
        }

        // Axis lines drawn last so bars do not overlap them.
        let _ = writeln!(
            svg,
            r#"<line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="{AXIS_COLOR}" stroke-width="1.5"/>"#,
            x = MARGIN_LEFT,
            y1 = MARGIN_TOP,
            y2 = MARGIN_TOP + plot_h,
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="{AXIS_COLOR}" stroke-width="1.5"/>"#,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            y = MARGIN_TOP + plot_h,
        );

        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize the chart and write it as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let svg = self.render_svg();

        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();

        let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| {
            FnbenchError::ChartRender {
                detail: e.to_string(),
            }
        })?;

        let mut pixmap =
            tiny_skia::Pixmap::new(WIDTH, HEIGHT).ok_or_else(|| FnbenchError::ChartRender {
                detail: format!("failed to allocate {}x{} pixmap", WIDTH, HEIGHT),
            })?;

        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        pixmap.save_png(path).map_err(|e| FnbenchError::ChartWrite {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        Ok(())
    }
}

/// Format a tick value in seconds for the y axis.
fn format_secs(value: f64) -> String {
    format!("{:.3}", value)
}

/// Escape the characters SVG text content cannot contain literally.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

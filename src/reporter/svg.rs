//! SVG reporter: novelty x quality chart
//!
//! Draws the three reference curves, one point per feature and the
//! origin-anchored rectangle whose area is the feature's area metric. All
//! styling comes from the [`ChartConfig`] the reporter is built with.

use crate::assessment::curves::reference_curve;
use crate::config::ChartConfig;
use crate::{AssessmentResult, Category, QUALITY_MAX, QUALITY_MIN};
use anyhow::{Context, Result};
use std::fmt::Write;
use std::fs;
use std::path::Path;
use tracing::debug;

const MARGIN: f64 = 56.0;
const LEGEND_WIDTH: f64 = 260.0;

/// Escape text for XML content and attribute values
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Reporter that renders an assessment as a standalone SVG document
pub struct SvgReporter {
    config: ChartConfig,
}

impl SvgReporter {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render and write the chart to `path`
    pub fn write(&self, result: &AssessmentResult, path: &Path) -> Result<()> {
        let svg = self.render(result);
        fs::write(path, svg)
            .with_context(|| format!("Failed to write chart: {}", path.display()))?;
        debug!(path = %path.display(), "wrote chart");
        Ok(())
    }

    /// Generate the SVG document
    pub fn render(&self, result: &AssessmentResult) -> String {
        let plot = self.plot_size();
        let width = plot + 2.0 * MARGIN + if self.config.legend { LEGEND_WIDTH } else { 0.0 };
        let height = plot + 2.0 * MARGIN;

        let mut svg = String::with_capacity(16_384);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = width,
            h = height
        );
        self.write_defs(&mut svg);
        let _ = writeln!(
            svg,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
            width, height
        );
        if let Some(ref title) = self.config.title {
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
                MARGIN + plot / 2.0,
                MARGIN / 2.0,
                escape_xml(title)
            );
        }
        self.write_grid(&mut svg);
        self.write_curves(&mut svg);
        self.write_features(&mut svg, result);
        if self.config.legend {
            self.write_legend(&mut svg, result);
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn plot_size(&self) -> f64 {
        (self.config.size as f64 - 2.0 * MARGIN).max(120.0)
    }

    /// Map novelty (x) to pixels, clamped to the plot frame
    fn px(&self, novelty: f64) -> f64 {
        let x = novelty.clamp(QUALITY_MIN, QUALITY_MAX);
        MARGIN + (x - QUALITY_MIN) / (QUALITY_MAX - QUALITY_MIN) * self.plot_size()
    }

    /// Map quality (y) to pixels, clamped to the plot frame
    fn py(&self, quality: f64) -> f64 {
        let y = quality.clamp(QUALITY_MIN, QUALITY_MAX);
        MARGIN + (QUALITY_MAX - y) / (QUALITY_MAX - QUALITY_MIN) * self.plot_size()
    }

    fn hatch_id(category: Category) -> &'static str {
        match category {
            Category::LinearQuality => "hatch-lq",
            Category::MustBe => "hatch-mb",
            Category::Attractiveness => "hatch-a",
        }
    }

    fn write_defs(&self, svg: &mut String) {
        svg.push_str("<defs>\n");
        for category in Category::ALL {
            let color = escape_xml(self.config.colors.for_category(category));
            // LQ gets a cross hatch, the curved categories a diagonal one
            let path = match category {
                Category::LinearQuality => "M4 0 V8 M0 4 H8",
                _ => "M0 0 L8 8",
            };
            let _ = writeln!(
                svg,
                r#"<pattern id="{}" width="8" height="8" patternUnits="userSpaceOnUse"><path d="{}" stroke="{}" stroke-width="0.5"/></pattern>"#,
                Self::hatch_id(category),
                path,
                color
            );
        }
        svg.push_str("</defs>\n");
    }

    fn write_grid(&self, svg: &mut String) {
        let plot = self.plot_size();
        let (lo, hi) = (QUALITY_MIN as i32, QUALITY_MAX as i32);
        for tick in lo..=hi {
            let t = tick as f64;
            let (x, y) = (self.px(t), self.py(t));
            let _ = writeln!(
                svg,
                r#"<line x1="{x}" y1="{top}" x2="{x}" y2="{bottom}" stroke="lightgray" stroke-width="0.5"/>"#,
                x = x,
                top = MARGIN,
                bottom = MARGIN + plot
            );
            let _ = writeln!(
                svg,
                r#"<line x1="{left}" y1="{y}" x2="{right}" y2="{y}" stroke="lightgray" stroke-width="0.5"/>"#,
                y = y,
                left = MARGIN,
                right = MARGIN + plot
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                x,
                MARGIN + plot + 16.0,
                tick
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
                MARGIN - 6.0,
                y + 4.0,
                tick
            );
        }

        // Zero axes and frame
        let _ = writeln!(
            svg,
            r#"<line x1="{x}" y1="{top}" x2="{x}" y2="{bottom}" stroke="black"/>"#,
            x = self.px(0.0),
            top = MARGIN,
            bottom = MARGIN + plot
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{left}" y1="{y}" x2="{right}" y2="{y}" stroke="black"/>"#,
            y = self.py(0.0),
            left = MARGIN,
            right = MARGIN + plot
        );
        let _ = writeln!(
            svg,
            r#"<rect x="{m}" y="{m}" width="{p}" height="{p}" fill="none" stroke="black" stroke-width="2"/>"#,
            m = MARGIN,
            p = plot
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle">Novelty</text>"#,
            MARGIN + plot / 2.0,
            MARGIN + plot + 36.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90 {x} {y})">Quality</text>"#,
            x = MARGIN - 36.0,
            y = MARGIN + plot / 2.0
        );
    }

    fn write_curves(&self, svg: &mut String) {
        let n = self.config.curve_points.max(2);
        for category in Category::ALL {
            let points: Vec<String> = (0..n)
                .filter_map(|i| {
                    let x = QUALITY_MIN + (QUALITY_MAX - QUALITY_MIN) * i as f64 / (n - 1) as f64;
                    let y = reference_curve(x, category)?;
                    (QUALITY_MIN..=QUALITY_MAX)
                        .contains(&y)
                        .then(|| format!("{:.2},{:.2}", self.px(x), self.py(y)))
                })
                .collect();
            if points.len() < 2 {
                continue;
            }
            let _ = writeln!(
                svg,
                r#"<polyline class="curve-{}" points="{}" fill="none" stroke="{}" stroke-width="1.5"><title>{}</title></polyline>"#,
                category.code(),
                points.join(" "),
                escape_xml(self.config.colors.for_category(category)),
                category.name()
            );
        }
    }

    fn write_features(&self, svg: &mut String, result: &AssessmentResult) {
        let (ox, oy) = (self.px(0.0), self.py(0.0));
        for record in &result.records {
            let color = escape_xml(self.config.colors.for_category(record.category));
            let (x, y) = (self.px(record.novelty), self.py(record.quality));
            let _ = writeln!(
                svg,
                r#"<rect class="area" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="url(#{})" stroke="{}" stroke-width="0.5"/>"#,
                ox.min(x),
                oy.min(y),
                (x - ox).abs(),
                (y - oy).abs(),
                Self::hatch_id(record.category),
                color
            );
            let _ = writeln!(
                svg,
                r#"<circle class="feature" cx="{:.2}" cy="{:.2}" r="4" fill="{}"><title>{}: N={:.2}, Q={:.2}, A={:.2}</title></circle>"#,
                x,
                y,
                color,
                escape_xml(&record.feature_name),
                record.novelty,
                record.quality,
                record.area
            );
        }
    }

    fn write_legend(&self, svg: &mut String, result: &AssessmentResult) {
        let left = 2.0 * MARGIN + self.plot_size();
        for (i, record) in result.records.iter().enumerate() {
            let y = MARGIN + 8.0 + i as f64 * 18.0;
            let color = escape_xml(self.config.colors.for_category(record.category));
            let _ = writeln!(
                svg,
                r#"<circle cx="{}" cy="{}" r="4" fill="{}"/>"#,
                left,
                y - 4.0,
                color
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}">{}: N={:.2}, Q={:.2}, A={:.2}</text>"#,
                left + 10.0,
                y,
                escape_xml(&record.feature_name),
                record.novelty,
                record.quality,
                record.area
            );
        }
    }
}

impl Default for SvgReporter {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

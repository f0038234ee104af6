//! SVG reporter for the distribution check of one feature
//!
//! Left panel: density histogram with the fitted normal pdf. Right panel:
//! the Q-Q probability plot with its least-squares line.

use super::svg::escape_xml;
use crate::config::ChartConfig;
use crate::distribution::DistributionReport;
use anyhow::{Context, Result};
use std::fmt::Write;
use std::fs;
use std::path::Path;
use tracing::debug;

const MARGIN: f64 = 48.0;

/// Maps data coordinates into one square panel
struct Frame {
    left: f64,
    top: f64,
    size: f64,
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn new(left: f64, size: f64, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            left,
            top: MARGIN,
            size,
            x: widen(x),
            y: widen(y),
        }
    }

    fn px(&self, x: f64) -> f64 {
        self.left + (x - self.x.0) / (self.x.1 - self.x.0) * self.size
    }

    fn py(&self, y: f64) -> f64 {
        self.top + (self.y.1 - y) / (self.y.1 - self.y.0) * self.size
    }

    fn bottom(&self) -> f64 {
        self.top + self.size
    }
}

/// Give a degenerate range some width so the mapping stays finite
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Reporter that renders a [`DistributionReport`] as a standalone SVG document
pub struct DistributionSvgReporter {
    config: ChartConfig,
}

impl DistributionSvgReporter {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render and write the chart to `path`
    pub fn write(&self, report: &DistributionReport, path: &Path) -> Result<()> {
        fs::write(path, self.render(report))
            .with_context(|| format!("Failed to write chart: {}", path.display()))?;
        debug!(path = %path.display(), feature = %report.feature, "wrote distribution chart");
        Ok(())
    }

    pub fn render(&self, report: &DistributionReport) -> String {
        let panel = (self.config.size as f64 - 2.0 * MARGIN).max(120.0);
        let width = 2.0 * panel + 3.0 * MARGIN;
        let height = panel + 2.0 * MARGIN;

        let mut svg = String::with_capacity(8_192);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = width,
            h = height
        );
        let _ = writeln!(
            svg,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
            width, height
        );
        let title = self
            .config
            .title
            .clone()
            .unwrap_or_else(|| format!("{} ({})", report.feature, report.dataset));
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
            width / 2.0,
            MARGIN / 2.0,
            escape_xml(&title)
        );

        let left = Frame::new(
            MARGIN,
            panel,
            histogram_x(report),
            (0.0, peak_density(report)),
        );
        self.write_histogram(&mut svg, report, left);
        let right = Frame::new(2.0 * MARGIN + panel, panel, qq_x(report), qq_y(report));
        self.write_probability_plot(&mut svg, report, right);

        svg.push_str("</svg>\n");
        svg
    }

    fn write_panel(&self, svg: &mut String, frame: &Frame, title: &str, x_label: &str, y_label: &str) {
        let _ = writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{s}" height="{s}" fill="none" stroke="black" stroke-width="2"/>"#,
            frame.left,
            frame.top,
            s = frame.size
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
            frame.left + frame.size / 2.0,
            frame.top - 8.0,
            title
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
            frame.left + frame.size / 2.0,
            frame.bottom() + 32.0,
            x_label
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90 {x} {y})">{}</text>"#,
            y_label,
            x = frame.left - 32.0,
            y = frame.top + frame.size / 2.0
        );
        for (value, anchor) in [(frame.x.0, "start"), (frame.x.1, "end")] {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="{}">{:.3}</text>"#,
                frame.px(value),
                frame.bottom() + 16.0,
                anchor,
                value
            );
        }
        for value in [frame.y.0, frame.y.1] {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{:.3}</text>"#,
                frame.left - 6.0,
                frame.py(value) + 4.0,
                value
            );
        }
    }

    fn write_histogram(&self, svg: &mut String, report: &DistributionReport, frame: Frame) {
        self.write_panel(svg, &frame, "Data distribution with normal fit", "Value", "Density");
        for bin in &report.histogram {
            let (x0, x1) = (frame.px(bin.start), frame.px(bin.end));
            let y = frame.py(bin.density);
            let _ = writeln!(
                svg,
                r#"<rect class="bin" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="steelblue" fill-opacity="0.5" stroke="white"><title>{:.3}..{:.3}: {}</title></rect>"#,
                x0,
                y,
                (x1 - x0).max(0.0),
                (frame.bottom() - y).max(0.0),
                bin.start,
                bin.end,
                bin.count
            );
        }
        let points: Vec<String> = report
            .density_curve
            .iter()
            .map(|p| format!("{:.2},{:.2}", frame.px(p.x), frame.py(p.density)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline class="pdf" points="{}" fill="none" stroke="black" stroke-width="2"><title>N(mu={:.3}, sigma={:.3})</title></polyline>"#,
            points.join(" "),
            report.fit.mean,
            report.fit.std_dev
        );
    }

    fn write_probability_plot(&self, svg: &mut String, report: &DistributionReport, frame: Frame) {
        self.write_panel(svg, &frame, "Probability Plot", "Theoretical quantiles", "Ordered values");
        let plot = &report.probability_plot;
        let (x0, x1) = frame.x;
        let _ = writeln!(
            svg,
            r#"<line class="fit" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="red" stroke-width="1.5"/>"#,
            frame.px(x0),
            frame.py(plot.intercept + plot.slope * x0),
            frame.px(x1),
            frame.py(plot.intercept + plot.slope * x1)
        );
        for pair in &plot.pairs {
            let _ = writeln!(
                svg,
                r#"<circle class="quantile" cx="{:.2}" cy="{:.2}" r="3" fill="steelblue"/>"#,
                frame.px(pair.theoretical),
                frame.py(pair.ordered)
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}">R² = {:.4}</text>"#,
            frame.left + 8.0,
            frame.top + 16.0,
            plot.r * plot.r
        );
    }
}

impl Default for DistributionSvgReporter {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

fn histogram_x(report: &DistributionReport) -> (f64, f64) {
    match (report.histogram.first(), report.histogram.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    }
}

fn peak_density(report: &DistributionReport) -> f64 {
    let bars = report.histogram.iter().map(|b| b.density);
    let curve = report.density_curve.iter().map(|p| p.density);
    bars.chain(curve).fold(0.0, f64::max) * 1.1
}

fn qq_x(report: &DistributionReport) -> (f64, f64) {
    let pairs = &report.probability_plot.pairs;
    match (pairs.first(), pairs.last()) {
        (Some(first), Some(last)) => (first.theoretical, last.theoretical),
        _ => (-1.0, 1.0),
    }
}

fn qq_y(report: &DistributionReport) -> (f64, f64) {
    let pairs = &report.probability_plot.pairs;
    match (pairs.first(), pairs.last()) {
        (Some(first), Some(last)) => (first.ordered, last.ordered),
        _ => (-1.0, 1.0),
    }
}

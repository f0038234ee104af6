//! Console reporter with colored output

use crate::distribution::DistributionReport;
use crate::{AssessmentResult, Category, FeatureRecord, Quadrant, QuadrantBreakdown};
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single assessment
    pub fn report(&self, result: &AssessmentResult) {
        print!("{}", self.render(result));
    }

    /// Report several assessments, separated by rules
    pub fn report_many(&self, results: &[AssessmentResult]) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(80));
        }
    }

    /// Report in quiet mode (one line per product: Q1 leader)
    pub fn report_quiet(&self, result: &AssessmentResult) {
        let leader = result
            .quadrant(Quadrant::Q1)
            .and_then(|q| q.leader.as_ref())
            .map(|r| r.feature_name.as_str())
            .unwrap_or("-");
        println!(
            "{} ({}): effective innovation = {}",
            result.product.name, result.dataset, leader
        );
    }

    /// Full report as a string
    pub fn render(&self, result: &AssessmentResult) -> String {
        let mut out = String::new();
        self.write_header(&mut out, result);
        self.write_table(&mut out, result);
        for breakdown in &result.quadrants {
            self.write_quadrant(&mut out, breakdown, result.precision);
        }
        out.push('\n');
        out
    }

    /// Report a distribution check
    pub fn report_distribution(&self, report: &DistributionReport) {
        print!("{}", self.render_distribution(report));
    }

    /// Fit summary, text histogram and Q-Q line of one column
    pub fn render_distribution(&self, report: &DistributionReport) -> String {
        let mut out = String::new();
        let title = format!(
            "Distribution: {} in {} ({} values)",
            report.feature, report.dataset, report.count
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.bold(&title));
        let _ = writeln!(
            out,
            "   Normal fit: mu = {:.3}, sigma = {:.3}",
            report.fit.mean, report.fit.std_dev
        );
        let _ = writeln!(out, "{}", "-".repeat(80));

        let widest = report.histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        for bin in &report.histogram {
            let bar = "#".repeat(bin.count * 40 / widest);
            let _ = writeln!(
                out,
                "   [{:>10.3}, {:>10.3}] {:>5}  {}",
                bin.start, bin.end, bin.count, bar
            );
        }
        let _ = writeln!(out, "{}", "-".repeat(80));

        let plot = &report.probability_plot;
        let r_squared = format!("R^2 = {:.4}", plot.r * plot.r);
        let _ = writeln!(
            out,
            "   Q-Q line: slope = {:.3}, intercept = {:.3}, {}",
            plot.slope,
            plot.intercept,
            if plot.r * plot.r >= 0.95 {
                r_squared
            } else {
                self.dim(&r_squared)
            }
        );
        if self.verbose {
            for pair in &plot.pairs {
                let _ = writeln!(out, "   {:>8.3} -> {:.3}", pair.theoretical, pair.ordered);
            }
        }
        out
    }

    fn write_header(&self, out: &mut String, result: &AssessmentResult) {
        let title = format!(
            "Innovation Assessment: {} (#{}) in {}",
            result.product.name, result.product.id, result.dataset
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.bold(&title));
        let _ = writeln!(
            out,
            "   Features: {} | Precision: {} decimals",
            result.records.len(),
            result.precision
        );
        let _ = writeln!(out, "{}", "-".repeat(80));
    }

    fn write_table(&self, out: &mut String, result: &AssessmentResult) {
        let header = format!(
            "   {:<18} {:>4} {:>9} {:>9} {:>9}  {}",
            "Feature", "Cat", "Quality", "Novelty", "Area", "Quadrant"
        );
        let _ = writeln!(out, "{}", self.bold(&header));
        for record in &result.records {
            self.write_record(out, record, result.precision);
        }
        let _ = writeln!(out, "{}", "-".repeat(80));
    }

    fn write_record(&self, out: &mut String, record: &FeatureRecord, precision: u32) {
        let p = precision as usize;
        let category = format!("{:>4}", record.category.code());
        let _ = writeln!(
            out,
            "   {:<18} {} {:>9.p$} {:>9.p$} {:>9.p$}  {}",
            record.feature_name,
            self.paint_category(&category, record.category),
            record.quality,
            record.novelty,
            record.area,
            self.paint_quadrant(&record.quadrant.to_string(), record.quadrant),
        );
    }

    fn write_quadrant(&self, out: &mut String, breakdown: &QuadrantBreakdown, precision: u32) {
        let p = precision as usize;
        let heading = format!("{} ({}):", breakdown.label, breakdown.quadrant);
        let _ = writeln!(
            out,
            "{}",
            self.paint_quadrant(&heading, breakdown.quadrant)
        );

        match &breakdown.leader {
            Some(leader) => {
                let _ = writeln!(
                    out,
                    "   Feature Name = {}, Quality = {:.p$}, Area = {:.p$}",
                    leader.feature_name, leader.quality, leader.area
                );
            }
            None => {
                let _ = writeln!(out, "   {}", self.dim("no features in this quadrant"));
            }
        }

        if self.verbose || !breakdown.members.is_empty() {
            let _ = writeln!(
                out,
                "   Features in {}: [{}]",
                breakdown.quadrant,
                breakdown.members.join(", ")
            );
        }
        let _ = writeln!(out, "{}", "*".repeat(80));
    }

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_category(&self, s: &str, category: Category) -> String {
        if !self.use_colors {
            return s.to_string();
        }
        match category {
            Category::LinearQuality => s.yellow().to_string(),
            Category::MustBe => s.red().to_string(),
            Category::Attractiveness => s.green().to_string(),
        }
    }

    fn paint_quadrant(&self, s: &str, quadrant: Quadrant) -> String {
        if !self.use_colors {
            return s.to_string();
        }
        match quadrant {
            Quadrant::Q1 => s.green().bold().to_string(),
            Quadrant::Q2 => s.cyan().to_string(),
            Quadrant::Q3 => s.red().to_string(),
            Quadrant::Q4 => s.yellow().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{quadrant_breakdown, AssessmentEngine};
    use crate::ProductRef;

    fn result(features: &[&str], qualities: &[f64], categories: &[Category]) -> AssessmentResult {
        let records = AssessmentEngine::new()
            .evaluate_batch(features, qualities, categories)
            .unwrap();
        AssessmentResult {
            dataset: "bicycle".to_string(),
            product: ProductRef {
                id: 3,
                name: "Bicycle 3".to_string(),
            },
            precision: 3,
            quadrants: quadrant_breakdown(&records),
            records,
        }
    }

    #[test]
    fn renders_leaders_and_members() {
        let r = result(
            &["Weight", "Comfort"],
            &[3.0, -2.0],
            &[Category::LinearQuality, Category::MustBe],
        );
        let text = ConsoleReporter::new().without_colors().render(&r);
        assert!(text.contains("Innovation Assessment: Bicycle 3 (#3) in bicycle"));
        assert!(text.contains("Effective innovation (Q1):"));
        assert!(text.contains("Feature Name = Weight, Quality = 3.000, Area = 9.000"));
        assert!(text.contains("Features in Q3: [Comfort]"));
        assert!(text.contains("-2.414"));
    }

    #[test]
    fn empty_quadrants_do_not_crash() {
        let r = result(&["Only"], &[2.0], &[Category::Attractiveness]);
        let text = ConsoleReporter::new().without_colors().render(&r);
        assert_eq!(text.matches("no features in this quadrant").count(), 3);
    }

    #[test]
    fn verbose_lists_empty_member_sets() {
        let r = result(&["Only"], &[2.0], &[Category::Attractiveness]);
        let text = ConsoleReporter::new().without_colors().verbose().render(&r);
        assert!(text.contains("Features in Q4: []"));
    }

    #[test]
    fn distribution_summary_lists_fit_and_bins() {
        let report = DistributionReport::analyze(
            "bicycle",
            "Weight",
            &[14.0, 16.0, 14.0, 16.0],
            Some(2),
        )
        .unwrap();
        let out = ConsoleReporter::new().without_colors().render_distribution(&report);
        assert!(out.contains("Distribution: Weight in bicycle (4 values)"));
        assert!(out.contains("Normal fit: mu = 15.000, sigma = 1.000"));
        assert_eq!(out.matches(&"#".repeat(40)).count(), 2);
        assert!(out.contains("Q-Q line:"));
    }
}

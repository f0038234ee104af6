//! JSON reporter for machine-readable output

use crate::assessment::Evaluation;
use crate::distribution::DistributionReport;
use crate::{AssessmentResult, Category};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_string<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    /// Report a single assessment with metadata
    pub fn report(&self, result: &AssessmentResult) -> serde_json::Result<String> {
        self.to_string(&JsonOutput {
            meta: JsonMeta::now(),
            results: std::slice::from_ref(result),
        })
    }

    /// Report several assessments with metadata
    pub fn report_many(&self, results: &[AssessmentResult]) -> serde_json::Result<String> {
        self.to_string(&JsonOutput {
            meta: JsonMeta::now(),
            results,
        })
    }

    /// Report a single-feature evaluation
    pub fn report_evaluation(
        &self,
        quality: f64,
        category: Category,
        evaluation: &Evaluation,
    ) -> serde_json::Result<String> {
        self.to_string(&JsonEvaluation {
            quality,
            category,
            novelty: evaluation.novelty,
            area: evaluation.area,
        })
    }

    /// Report a distribution check
    pub fn report_distribution(&self, report: &DistributionReport) -> serde_json::Result<String> {
        self.to_string(report)
    }

    /// Report a rescaled sequence
    pub fn report_rescaled(&self, qualities: &[f64]) -> serde_json::Result<String> {
        self.to_string(&qualities)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMeta {
    tool: &'static str,
    version: &'static str,
    generated_at: String,
}

impl JsonMeta {
    fn now() -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    meta: JsonMeta,
    results: &'a [AssessmentResult],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEvaluation {
    quality: f64,
    category: Category,
    novelty: f64,
    area: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{evaluate, quadrant_breakdown, AssessmentEngine};
    use crate::ProductRef;

    #[test]
    fn report_is_valid_json_with_quadrants() {
        let records = AssessmentEngine::new()
            .evaluate_batch(&["f1"], &[3.0], &[Category::LinearQuality])
            .unwrap();
        let result = AssessmentResult {
            dataset: "demo".to_string(),
            product: ProductRef {
                id: 1,
                name: "One".to_string(),
            },
            precision: 3,
            quadrants: quadrant_breakdown(&records),
            records,
        };

        let out = JsonReporter::new().report(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["meta"]["tool"], "kano");
        let first = &value["results"][0];
        assert_eq!(first["records"][0]["featureName"], "f1");
        assert_eq!(first["records"][0]["category"], "LQ");
        assert_eq!(first["records"][0]["quadrant"], "Q1");
        assert!(first["quadrants"][1]["leader"].is_null());
    }

    #[test]
    fn evaluation_report_carries_inputs() {
        let e = evaluate(2.0, Category::Attractiveness, 3).unwrap();
        let out = JsonReporter::new()
            .report_evaluation(2.0, Category::Attractiveness, &e)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["category"], "A");
        assert_eq!(value["novelty"], 2.414);
        assert_eq!(value["area"], 4.828);
    }

    #[test]
    fn distribution_report_uses_camel_case() {
        let report = DistributionReport::analyze("bicycle", "Weight", &[1.0, 2.0, 4.0], None).unwrap();
        let out = JsonReporter::new().report_distribution(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["feature"], "Weight");
        assert_eq!(value["probabilityPlot"]["pairs"].as_array().unwrap().len(), 3);
        assert!(value["densityCurve"].is_array());
        assert!(value["fit"]["stdDev"].is_number());
    }
}

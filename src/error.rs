//! Error taxonomy for the assessment core

use crate::{MAX_PRECISION, QUALITY_MAX, QUALITY_MIN};
use thiserror::Error;

/// Result alias used by the numeric core
pub type Result<T> = std::result::Result<T, AssessmentError>;

/// Errors raised by the rescaler, the assessment engine and the category source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// Rescaler invoked on degenerate input (empty, zero variance, non-finite)
    #[error("cannot rescale: {reason}")]
    Domain { reason: String },

    /// Category label outside LQ / MB / A
    #[error("invalid category '{label}': choose 'LQ', 'MB' or 'A'")]
    InvalidCategory { label: String },

    /// Quality presented to the transform outside the bounded domain
    #[error("quality {quality} out of range [{min}, {max}]", min = QUALITY_MIN, max = QUALITY_MAX)]
    OutOfRange { quality: f64 },

    /// Rounding precision too large to represent
    #[error("precision {precision} exceeds the maximum of {max} decimal places", max = MAX_PRECISION)]
    Precision { precision: u32 },

    /// Batch inputs of different lengths
    #[error(
        "features ({features}), qualities ({qualities}) and categories ({categories}) must have the same length"
    )]
    ArityMismatch {
        features: usize,
        qualities: usize,
        categories: usize,
    },

    /// Feature with no entry in the category source
    #[error("feature '{feature}' has no category entry")]
    UnknownFeature { feature: String },

    /// A per-feature failure inside a batch, tagged with the feature name
    #[error("feature '{feature}': {source}")]
    Feature {
        feature: String,
        #[source]
        source: Box<AssessmentError>,
    },
}

impl AssessmentError {
    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        AssessmentError::Domain {
            reason: reason.into(),
        }
    }

    /// Attach a feature name to this error
    pub fn for_feature(self, feature: impl Into<String>) -> Self {
        AssessmentError::Feature {
            feature: feature.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error with any feature tags stripped
    pub fn root_cause(&self) -> &AssessmentError {
        match self {
            AssessmentError::Feature { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Name of the feature this error was raised for, if tagged
    pub fn feature(&self) -> Option<&str> {
        match self {
            AssessmentError::Feature { feature, .. } => Some(feature),
            AssessmentError::UnknownFeature { feature } => Some(feature),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_unwraps_feature_tags() {
        let err = AssessmentError::OutOfRange { quality: 7.0 }
            .for_feature("Weight")
            .for_feature("outer");
        assert_eq!(err.feature(), Some("outer"));
        assert_eq!(
            err.root_cause(),
            &AssessmentError::OutOfRange { quality: 7.0 }
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = AssessmentError::OutOfRange { quality: 7.5 };
        assert_eq!(err.to_string(), "quality 7.5 out of range [-6, 6]");

        let err = AssessmentError::InvalidCategory {
            label: "XYZ".to_string(),
        }
        .for_feature("Comfort");
        assert!(err.to_string().starts_with("feature 'Comfort': invalid category 'XYZ'"));
    }
}

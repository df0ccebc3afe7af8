use crate::core::{CostSymmetry, SinkhornParams};
use crate::models::domain::Item;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run a matching over a caller-supplied population
///
/// `costs[i][j]` is the cost of pairing `items[i]` with `items[j]`; `null`
/// marks an impossible pair. Diagonal entries are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchingRequest {
    #[validate(length(min = 1))]
    pub items: Vec<Item>,
    pub costs: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub lambda: Option<f64>,
    #[serde(default, alias = "max_iterations", rename = "maxIterations")]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub symmetry: Option<CostSymmetry>,
    #[serde(default, alias = "include_matrix", rename = "includeMatrix")]
    pub include_matrix: bool,
}

impl RunMatchingRequest {
    /// Solver parameters for this request, falling back to `defaults` per field
    pub fn params(&self, defaults: &SinkhornParams) -> SinkhornParams {
        SinkhornParams {
            lambda: self.lambda.unwrap_or(defaults.lambda),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
            parallel_threshold: defaults.parallel_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_fall_back_to_defaults() {
        let req: RunMatchingRequest = serde_json::from_str(
            r#"{"items":[{"id":"a"}],"costs":[[null]],"maxIterations":50}"#,
        )
        .unwrap();
        let params = req.params(&SinkhornParams::default());
        assert_eq!(params.max_iterations, 50);
        assert_eq!(params.lambda, 1.0);
        assert_eq!(params.tolerance, 1e-6);
        assert!(!req.include_matrix);
        assert!(req.symmetry.is_none());
    }

    #[test]
    fn test_empty_items_fail_validation() {
        let req: RunMatchingRequest = serde_json::from_str(r#"{"items":[],"costs":[]}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_item_count_bounded_only_by_settings() {
        let req = RunMatchingRequest {
            items: (0..100_001).map(|i| Item::new(i.to_string())).collect(),
            costs: Vec::new(),
            lambda: None,
            max_iterations: None,
            tolerance: None,
            symmetry: None,
            include_matrix: false,
        };
        assert!(req.validate().is_ok());
    }
}

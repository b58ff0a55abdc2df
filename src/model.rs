//! The pre-trained transit-time model and its feature schema.
//!
//! The model is a frozen collaborator: given a feature matrix built against
//! its schema it returns one estimate per row. Nothing here retrains or
//! introspects it.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Ordered list of column names the trained model expects.
///
/// Immutable for the lifetime of a run; the feature builder aligns every
/// feature vector to this order before inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        FeatureSchema { columns }
    }

    /// Loads the schema from a JSON file holding a plain array of column
    /// names, e.g. `["distance_km", "risk_level", "origin_China"]`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let columns: Vec<String> = serde_json::from_str(&content)?;
        Ok(FeatureSchema { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A pre-trained regression model estimating transit time in hours.
///
/// Deterministic given identical feature vectors; one output per input row.
pub trait TransitTimeModel: Send + Sync {
    fn predict(&self, matrix: &[Vec<f64>]) -> Vec<f64>;
}

/// A linear regression artifact persisted as JSON:
///
/// ```json
/// {
///   "columns": ["distance_km", "customs_delay_h", "..."],
///   "coefficients": [0.0004, 0.85, ...],
///   "intercept": 4.0
/// }
/// ```
///
/// Stands in for the original's pickled regressor; the column list doubles
/// as the model's [`FeatureSchema`].
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    columns: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Loads a model artifact from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&content)?;
        if model.columns.len() != model.coefficients.len() {
            anyhow::bail!(
                "model artifact malformed: {} columns but {} coefficients",
                model.columns.len(),
                model.coefficients.len()
            );
        }
        Ok(model)
    }

    /// A built-in default artifact so `simulate` runs without a model file.
    ///
    /// Coefficients favor base transit time, with penalties for customs
    /// delay and weather risk and a small distance term.
    pub fn builtin() -> Self {
        let (columns, coefficients): (Vec<_>, Vec<_>) = [
            ("distance_km", 0.0004),
            ("customs_delay_h", 0.85),
            ("risk_level", 2.5),
            ("base_transit_time_h", 1.0),
            ("transport_mode_air", -1.5),
            ("transport_mode_land", 0.5),
            ("transport_mode_sea", 6.0),
            ("origin_China", 1.0),
            ("origin_India", 1.2),
            ("origin_Mexico", 0.8),
            ("destination_Canada", 0.9),
            ("destination_Chile", 1.1),
            ("destination_Germany", 0.7),
        ]
        .iter()
        .map(|(name, coef)| (name.to_string(), *coef))
        .unzip();

        LinearModel {
            columns,
            coefficients,
            intercept: 4.0,
        }
    }

    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::new(self.columns.clone())
    }

    /// Verifies that `schema` carries exactly the artifact's trained
    /// columns, in the same order.
    ///
    /// The model is order-sensitive: a vector built against any other
    /// column list would pair features with the wrong coefficients, so an
    /// override schema must be checked here before inference runs.
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<()> {
        if schema.columns() != self.columns.as_slice() {
            anyhow::bail!(
                "feature schema does not match model artifact: model expects {} columns {:?}, schema has {} columns {:?}",
                self.columns.len(),
                self.columns,
                schema.len(),
                schema.columns()
            );
        }
        Ok(())
    }
}

impl TransitTimeModel for LinearModel {
    fn predict(&self, matrix: &[Vec<f64>]) -> Vec<f64> {
        matrix
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, c)| x * c)
                        .sum::<f64>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schema_matches_coefficients() {
        let model = LinearModel::builtin();
        assert_eq!(model.schema().len(), model.coefficients.len());
    }

    #[test]
    fn test_predict_is_linear() {
        let model = LinearModel {
            columns: vec!["a".to_string(), "b".to_string()],
            coefficients: vec![2.0, 3.0],
            intercept: 1.0,
        };
        let out = model.predict(&[vec![1.0, 1.0], vec![0.0, 2.0]]);
        assert_eq!(out, vec![6.0, 7.0]);
    }

    #[test]
    fn test_predict_one_output_per_row() {
        let model = LinearModel::builtin();
        let width = model.schema().len();
        let matrix = vec![vec![0.0; width]; 4];
        assert_eq!(model.predict(&matrix).len(), 4);
    }

    #[test]
    fn test_check_schema_accepts_own_schema() {
        let model = LinearModel::builtin();
        assert!(model.check_schema(&model.schema()).is_ok());
    }

    #[test]
    fn test_check_schema_rejects_narrower_schema() {
        let model = LinearModel::builtin();
        let schema = FeatureSchema::new(vec!["customs_delay_h".to_string()]);
        assert!(model.check_schema(&schema).is_err());
    }

    #[test]
    fn test_check_schema_rejects_reordered_columns() {
        let model = LinearModel::builtin();
        let mut columns: Vec<String> = model.schema().columns().to_vec();
        columns.reverse();
        assert!(model.check_schema(&FeatureSchema::new(columns)).is_err());
    }

    #[test]
    fn test_load_rejects_mismatched_artifact() {
        let path = format!(
            "{}/route_rater_test_bad_model.json",
            std::env::temp_dir().display()
        );
        std::fs::write(
            &path,
            r#"{"columns": ["a", "b"], "coefficients": [1.0], "intercept": 0.0}"#,
        )
        .unwrap();
        assert!(LinearModel::load(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}

//! Prediction pipeline: fitted models applied to tabular track data
//!
//! Supplies the per-segment risk scores the planning core consumes. The
//! pipeline itself has no algorithmic content: load CSV features, apply a
//! fitted standardizing transform, run a fitted linear model, join
//! predictions back onto the input rows.
//!
//! Model and preprocessor artifacts are fitted offline and exported as JSON
//! (feature list + means/scales, coefficients + intercept). They are loaded
//! once at process start into an [`InferenceContext`] — an explicitly
//! constructed, immutable model/transform pair passed by `Arc`, never
//! ambient global state.

mod table;

pub use table::FeatureTable;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::{DataConfig, ModelConfig};

// ============================================================================
// Fitted Artifacts
// ============================================================================

/// Standardizing feature transform fitted offline: `(x - mean) / scale`
/// per feature, in the order of `features`.
#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessor {
    /// Feature column names, in model input order
    pub features: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl Preprocessor {
    /// Validate internal consistency (feature/mean/scale lengths agree,
    /// scales non-zero).
    fn validate(&self) -> Result<()> {
        if self.means.len() != self.features.len() || self.scales.len() != self.features.len() {
            return Err(anyhow!(
                "preprocessor shape mismatch: {} features, {} means, {} scales",
                self.features.len(),
                self.means.len(),
                self.scales.len()
            ));
        }
        if self.scales.iter().any(|s| s.abs() < 1e-12) {
            return Err(anyhow!("preprocessor has a zero scale"));
        }
        Ok(())
    }

    /// Standardize one feature row.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.features.len() {
            return Err(anyhow!(
                "expected {} features, got {}",
                self.features.len(),
                row.len()
            ));
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

/// Fitted linear model: `intercept + coefficients · x`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Predict from a standardized feature row.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(anyhow!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            ));
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

/// A fitted model paired with the preprocessor it was trained against.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub model: LinearModel,
    pub preprocessor: Preprocessor,
}

impl ModelBundle {
    /// Load both artifacts and check they agree on feature count.
    pub fn load(model_path: impl AsRef<Path>, preprocessor_path: impl AsRef<Path>) -> Result<Self> {
        let model: LinearModel = load_json(model_path.as_ref())?;
        let preprocessor: Preprocessor = load_json(preprocessor_path.as_ref())?;
        preprocessor.validate()?;
        if model.coefficients.len() != preprocessor.features.len() {
            return Err(anyhow!(
                "model expects {} features but preprocessor provides {}",
                model.coefficients.len(),
                preprocessor.features.len()
            ));
        }
        Ok(Self {
            model,
            preprocessor,
        })
    }

    /// Transform + predict for one raw feature row.
    pub fn score(&self, raw: &[f64]) -> Result<f64> {
        let standardized = self.preprocessor.transform(raw)?;
        self.model.predict(&standardized)
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

// ============================================================================
// Inference Context
// ============================================================================

/// Immutable model/preprocessor pairs for both prediction tasks.
///
/// Lifecycle: created once at process start (startup fails fast if an
/// artifact is missing or inconsistent), read-only thereafter, shared across
/// request handlers via `Arc`.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    /// Per-segment risk regression
    pub risk: ModelBundle,
    /// Per-sleeper tamping-priority model
    pub tamping: ModelBundle,
}

impl InferenceContext {
    /// Load all four artifacts named by the model configuration.
    pub fn load(models: &ModelConfig) -> Result<Self> {
        let risk = ModelBundle::load(&models.risk_model, &models.risk_preprocessor)
            .context("loading risk model")?;
        let tamping = ModelBundle::load(&models.tamping_model, &models.tamping_preprocessor)
            .context("loading tamping model")?;
        info!(
            risk_features = risk.preprocessor.features.len(),
            tamping_features = tamping.preprocessor.features.len(),
            "inference context ready"
        );
        Ok(Self { risk, tamping })
    }

    /// Construct from already-loaded bundles (tests, embedding).
    pub fn from_bundles(risk: ModelBundle, tamping: ModelBundle) -> Self {
        Self { risk, tamping }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Input rows joined with their predictions, one JSON object per row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InferenceOutput {
    pub tampings: Vec<Map<String, Value>>,
    pub risks: Vec<Map<String, Value>>,
}

impl InferenceOutput {
    /// Adapter to the planning core's input contract: the predicted risk
    /// score of every segment, in row order.
    pub fn risk_scores(&self) -> Vec<f64> {
        self.risks
            .iter()
            .filter_map(|record| record.get("prediction").and_then(Value::as_f64))
            .collect()
    }
}

/// Run the full three-stage pipeline: load → transform+predict → join.
pub fn run_inference(ctx: &InferenceContext, data: &DataConfig) -> Result<InferenceOutput> {
    let sleeper_table =
        FeatureTable::load(&data.sleepers_path).context("loading sleeper data")?;
    let segment_table =
        FeatureTable::load(&data.segments_path).context("loading segment data")?;

    let tampings = score_table(&sleeper_table, &ctx.tamping).context("scoring sleepers")?;
    let risks = score_table(&segment_table, &ctx.risk).context("scoring segments")?;

    Ok(InferenceOutput { tampings, risks })
}

/// Score every row of a table and join the prediction onto its raw columns.
fn score_table(table: &FeatureTable, bundle: &ModelBundle) -> Result<Vec<Map<String, Value>>> {
    let feature_rows = table.numeric_features(&bundle.preprocessor.features)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (row, features) in table.rows.iter().zip(feature_rows.iter()) {
        let prediction = bundle.score(features)?;

        let mut record = Map::new();
        for (header, cell) in table.headers.iter().zip(row.iter()) {
            // Numeric-looking cells serialize as numbers, the rest as strings
            let value = cell
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))
                .unwrap_or_else(|| Value::String(cell.clone()));
            record.insert(header.clone(), value);
        }
        record.insert("prediction".to_string(), json!(prediction));
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn identity_bundle(features: &[&str]) -> ModelBundle {
        let n = features.len();
        ModelBundle {
            model: LinearModel {
                // Average of standardized features
                coefficients: vec![1.0 / n as f64; n],
                intercept: 0.0,
            },
            preprocessor: Preprocessor {
                features: features.iter().map(|s| (*s).to_string()).collect(),
                means: vec![0.0; n],
                scales: vec![1.0; n],
            },
        }
    }

    #[test]
    fn test_standardize_then_predict() {
        let bundle = ModelBundle {
            model: LinearModel {
                coefficients: vec![0.5, -0.25],
                intercept: 0.1,
            },
            preprocessor: Preprocessor {
                features: vec!["a".to_string(), "b".to_string()],
                means: vec![1.0, 2.0],
                scales: vec![2.0, 4.0],
            },
        };
        // a: (3-1)/2 = 1, b: (6-2)/4 = 1 -> 0.1 + 0.5 - 0.25 = 0.35
        let score = bundle.score(&[3.0, 6.0]).unwrap();
        assert!((score - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_feature_count_mismatch_is_rejected() {
        let bundle = identity_bundle(&["a", "b"]);
        assert!(bundle.score(&[1.0]).is_err());
    }

    #[test]
    fn test_pipeline_joins_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let segments = dir.path().join("segments.csv");
        let sleepers = dir.path().join("sleepers.csv");
        std::fs::File::create(&segments)
            .unwrap()
            .write_all(b"segment_id,avg_beta,max_geom_dev\nS-001,0.4,0.2\nS-002,0.8,0.6\n")
            .unwrap();
        std::fs::File::create(&sleepers)
            .unwrap()
            .write_all(b"sleeper_id,beta_ballast\nT-001,0.5\n")
            .unwrap();

        let ctx = InferenceContext::from_bundles(
            identity_bundle(&["avg_beta", "max_geom_dev"]),
            identity_bundle(&["beta_ballast"]),
        );
        let data = DataConfig {
            segments_path: segments.display().to_string(),
            sleepers_path: sleepers.display().to_string(),
        };

        let output = run_inference(&ctx, &data).unwrap();
        assert_eq!(output.risks.len(), 2);
        assert_eq!(output.tampings.len(), 1);
        assert_eq!(output.risks[0]["segment_id"], json!("S-001"));

        let scores = output.risk_scores();
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 0.3).abs() < 1e-12);
        assert!((scores[1] - 0.7).abs() < 1e-12);
    }
}

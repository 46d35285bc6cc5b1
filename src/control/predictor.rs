//! Regression-model predictor for the model-based stress strategy.
//!
//! Model files are JSON exports of a fitted standard scaler plus either a
//! linear estimator (ordinary or ridge regression) or an RBF-kernel SVR:
//!
//! ```json
//! {
//!   "scaler": { "mean": [m0, m1, m2, m3, m4], "scale": [s0, s1, s2, s3, s4] },
//!   "model":  { "kind": "linear", "coefficients": [c0, c1, c2, c3, c4], "intercept": b }
//! }
//! ```
//!
//! The file is loaded once at startup into a [`PredictorHandle`].  A failed
//! load produces [`PredictorHandle::Unready`]; the orchestrator refuses to
//! start with it.

use core::fmt;
use std::fs;
use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::PredictorError;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 5;

/// `[R, G, B, ambient_c, object_c]`
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Anything that maps a feature vector to a raw (unclamped) stress value.
pub trait Predictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError>;
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owned predictor state.  Built once, never mutated afterwards.
pub enum PredictorHandle {
    Ready(Box<dyn Predictor>),
    /// Load failed; carries the reason for diagnostics.
    Unready(String),
}

impl PredictorHandle {
    /// Load a [`RegressionModel`] from `path`.
    pub fn load(path: &Path) -> Self {
        match RegressionModel::from_file(path) {
            Ok(model) => {
                info!(
                    "Predictor loaded from {} ({})",
                    path.display(),
                    model.model.kind()
                );
                Self::Ready(Box::new(model))
            }
            Err(e) => {
                error!("Predictor load failed: {}", e);
                Self::Unready(e.to_string())
            }
        }
    }

    pub fn ready(predictor: impl Predictor + 'static) -> Self {
        Self::Ready(Box::new(predictor))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError> {
        match self {
            Self::Ready(p) => p.predict(features),
            Self::Unready(reason) => Err(PredictorError::Unready(reason.clone())),
        }
    }
}

impl fmt::Debug for PredictorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("PredictorHandle::Ready"),
            Self::Unready(reason) => write!(f, "PredictorHandle::Unready({reason})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Model file
// ---------------------------------------------------------------------------

/// Standardisation applied before the estimator: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, x) in features.iter().enumerate() {
            // Constant training features export a zero scale; leave them unscaled.
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            out[i] = (x - self.mean[i]) / scale;
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// Ordinary least squares or ridge regression.
    Linear { coefficients: Vec<f64>, intercept: f64 },
    /// Epsilon-SVR with an RBF kernel `exp(-gamma * |x - sv|^2)`.
    RbfSvr {
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
    },
}

impl Estimator {
    fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::RbfSvr { .. } => "rbf_svr",
        }
    }

    fn evaluate(&self, x: &FeatureVector) -> f64 {
        match self {
            Self::Linear {
                coefficients,
                intercept,
            } => {
                coefficients
                    .iter()
                    .zip(x)
                    .map(|(c, v)| c * v)
                    .sum::<f64>()
                    + intercept
            }
            Self::RbfSvr {
                gamma,
                support_vectors,
                dual_coef,
                intercept,
            } => {
                support_vectors
                    .iter()
                    .zip(dual_coef)
                    .map(|(sv, alpha)| {
                        let dist2: f64 = sv.iter().zip(x).map(|(s, v)| (s - v).powi(2)).sum();
                        alpha * (-gamma * dist2).exp()
                    })
                    .sum::<f64>()
                    + intercept
            }
        }
    }
}

/// A fitted scaler + estimator pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub scaler: StandardScaler,
    pub model: Estimator,
}

impl RegressionModel {
    pub fn from_file(path: &Path) -> Result<Self, PredictorError> {
        let text = fs::read_to_string(path).map_err(|source| PredictorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_str(&text).map_err(|source| PredictorError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        model.check()?;
        Ok(model)
    }

    /// Reject parameter sets that cannot be applied to a feature vector.
    pub fn check(&self) -> Result<(), PredictorError> {
        check_len("scaler.mean", &self.scaler.mean, FEATURE_COUNT)?;
        check_len("scaler.scale", &self.scaler.scale, FEATURE_COUNT)?;
        check_finite(&self.scaler.mean)?;
        check_finite(&self.scaler.scale)?;

        match &self.model {
            Estimator::Linear {
                coefficients,
                intercept,
            } => {
                check_len("coefficients", coefficients, FEATURE_COUNT)?;
                check_finite(coefficients)?;
                check_finite(&[*intercept])?;
            }
            Estimator::RbfSvr {
                gamma,
                support_vectors,
                dual_coef,
                intercept,
            } => {
                if support_vectors.is_empty() {
                    return Err(PredictorError::Shape("no support vectors".into()));
                }
                check_len("dual_coef", dual_coef, support_vectors.len())?;
                for sv in support_vectors {
                    check_len("support vector", sv, FEATURE_COUNT)?;
                    check_finite(sv)?;
                }
                check_finite(dual_coef)?;
                check_finite(&[*gamma, *intercept])?;
            }
        }
        Ok(())
    }
}

impl Predictor for RegressionModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError> {
        // Hand-built models never passed through `from_file`.
        self.check()?;
        let scaled = self.scaler.transform(features);
        let y = self.model.evaluate(&scaled);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(PredictorError::NonFinite)
        }
    }
}

fn check_len(name: &str, values: &[f64], expected: usize) -> Result<(), PredictorError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(PredictorError::Shape(format!(
            "{name} has {} entries, expected {expected}",
            values.len()
        )))
    }
}

fn check_finite(values: &[f64]) -> Result<(), PredictorError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PredictorError::NonFinite)
    }
}

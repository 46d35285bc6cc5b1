//! Crop Water Stress Index (CWSI) engine.
//!
//! Two interchangeable strategies behind one [`StressEngine::compute`]:
//!
//! - **Formula**: canopy/air temperature differential normalised between
//!   two calibrated baselines:
//!   `CWSI = ((Tc - Ta) - dT_LL) / (dT_UL - dT_LL)`
//! - **Model**: a pre-trained regression model fed `[R, G, B, Ta, Tc]`.
//!
//! Whatever the strategy, the result is clamped to `[0, 1]` and rounded to
//! three decimals, or replaced by an out-of-range sentinel.

use core::fmt;

use log::{info, warn};

use super::predictor::{FeatureVector, PredictorHandle};
use crate::config::{Baselines, StressStrategy};
use crate::fsm::context::Rgb;

// ---------------------------------------------------------------------------
// StressIndex
// ---------------------------------------------------------------------------

/// A CWSI value in `[0, 1]`, or a sentinel outside that range.
///
/// The only ways to build one are [`StressIndex::from_raw`] (which clamps)
/// and the sentinel constants, so a raw formula or model output can never
/// leak through unclamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressIndex(f64);

impl StressIndex {
    /// Baselines do not span a positive range; the formula is undefined.
    pub const INVALID_BASELINES: Self = Self(-9.99);
    /// The predictor is missing or failed during inference.
    pub const PREDICTION_FAILED: Self = Self(9.99);

    /// Clamp to `[0, 1]` and round to 3 decimals.
    /// Infinities clamp like any other out-of-range value; only NaN is
    /// rejected.
    pub fn from_raw(raw: f64) -> Option<Self> {
        if raw.is_nan() {
            return None;
        }
        let clamped = raw.clamp(0.0, 1.0);
        Some(Self((clamped * 1000.0).round() / 1000.0))
    }

    /// The numeric value as logged, sentinel included.
    pub fn value(self) -> f64 {
        self.0
    }

    /// The value if it is a usable index, `None` for a sentinel.
    pub fn valid(self) -> Option<f64> {
        (0.0..=1.0).contains(&self.0).then_some(self.0)
    }

    pub fn is_sentinel(self) -> bool {
        self.valid().is_none()
    }
}

impl fmt::Display for StressIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Everything either strategy may consume for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressInputs {
    pub moisture_percent: f64,
    pub ambient_c: f64,
    pub object_c: f64,
    /// All-zero when no camera board is fitted.
    pub rgb: Rgb,
}

impl StressInputs {
    /// Model feature order: `[R, G, B, ambient, object]`.
    pub fn features(&self) -> FeatureVector {
        [
            f64::from(self.rgb.r),
            f64::from(self.rgb.g),
            f64::from(self.rgb.b),
            self.ambient_c,
            self.object_c,
        ]
    }
}

// ---------------------------------------------------------------------------
// Formula
// ---------------------------------------------------------------------------

/// Temperature-differential CWSI.
pub fn formula_cwsi(baselines: &Baselines, ambient_c: f64, object_c: f64) -> StressIndex {
    let span = baselines.span();
    if span <= 0.0 || span.is_nan() {
        return StressIndex::INVALID_BASELINES;
    }
    let excess = (object_c - ambient_c) - baselines.dt_ll;
    let mut raw = excess / span;
    if raw.is_nan() && span.is_infinite() {
        // inf / inf: only the sign of the excess is meaningful.
        raw = excess.signum();
    }
    StressIndex::from_raw(raw).unwrap_or(StressIndex::INVALID_BASELINES)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The stress strategy in force for the process lifetime.
#[derive(Debug)]
pub enum StressEngine {
    Formula(Baselines),
    Model(PredictorHandle),
}

impl StressEngine {
    /// Build the engine named by the configuration.  A model strategy
    /// loads its file here, once; a failed load yields an unready engine.
    pub fn from_strategy(strategy: &StressStrategy, baselines: Baselines) -> Self {
        match strategy {
            StressStrategy::Formula => {
                info!(
                    "Stress engine: CWSI formula (dT_LL={}, dT_UL={})",
                    baselines.dt_ll, baselines.dt_ul
                );
                Self::Formula(baselines)
            }
            StressStrategy::Model { model_path } => {
                info!("Stress engine: regression model {}", model_path.display());
                Self::Model(PredictorHandle::load(model_path))
            }
        }
    }

    pub fn compute(&self, inputs: &StressInputs) -> StressIndex {
        match self {
            Self::Formula(baselines) => formula_cwsi(baselines, inputs.ambient_c, inputs.object_c),
            Self::Model(handle) => match handle.predict(&inputs.features()) {
                Ok(raw) => StressIndex::from_raw(raw).unwrap_or(StressIndex::PREDICTION_FAILED),
                Err(e) => {
                    warn!("Prediction failed: {}", e);
                    StressIndex::PREDICTION_FAILED
                }
            },
        }
    }

    /// `false` only for a model engine whose predictor failed to load.
    pub fn is_ready(&self) -> bool {
        match self {
            Self::Formula(_) => true,
            Self::Model(handle) => handle.is_ready(),
        }
    }
}

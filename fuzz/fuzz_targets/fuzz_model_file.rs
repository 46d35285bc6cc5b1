//! Fuzz target: regression model file loading
//!
//! Any JSON that passes `RegressionModel::check` must be safe to run a
//! prediction on: no index panics, and the result is either finite or a
//! `NonFinite` error.
//!
//! cargo fuzz run fuzz_model_file

#![no_main]

use irrigator::control::predictor::{Predictor, RegressionModel};
use irrigator::error::PredictorError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(model) = serde_json::from_slice::<RegressionModel>(data) else {
        return;
    };
    if model.check().is_err() {
        return;
    }
    match model.predict(&[120.0, 180.0, 60.0, 30.0, 28.3]) {
        Ok(y) => assert!(y.is_finite()),
        Err(e) => assert!(matches!(e, PredictorError::NonFinite)),
    }
});

//! Stress computation and the watering decision.

pub mod decision;
pub mod predictor;
pub mod stress;

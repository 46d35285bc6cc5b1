//! Actuator boards.  Both are fire-and-forget: one write per call.

pub mod motor;
pub mod pump;

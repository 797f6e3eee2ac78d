//! Hand landmarks and the finger states derived from them.
//!
//! Landmark estimation itself happens outside of this crate. The types in [`landmark`] describe
//! what the estimator hands us, [`fingers`] interprets them.

pub mod fingers;
pub mod landmark;

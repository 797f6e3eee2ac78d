//! Data filtering and smoothing.
//!
//! Filters are split into a parameter object implementing [`Filter`] and a separate, explicitly
//! passed state object. This allows a single set of parameters to drive several independent
//! signals (eg. the X and Y coordinates of the pointer), and allows the owner of the state to
//! decide how long it lives.

pub mod ema;

/// A filter for values of type `V`.
pub trait Filter<V> {
    /// The filter state that is carried between calls to [`Filter::filter`].
    type State: Default;

    /// Adds a new value to the filter, returning the filtered value.
    fn filter(&self, state: &mut Self::State, value: V) -> V;
}

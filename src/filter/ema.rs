//! Exponential Moving Average.

use super::Filter;

/// An Exponential Moving Average (EMA) filter.
///
/// Each new value moves the output towards it by `alpha` times the remaining distance. The pointer
/// smoothing uses this with `alpha = 1 / lag_factor`, see [`Ema::from_lag_factor`].
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
}

impl Ema {
    /// Creates a new Exponential Moving Average filter.
    ///
    /// The `alpha` parameter must be between 0.0 and 1.0 and defines how quickly the weight of
    /// older values should decay. Values closer to 1.0 favor recent values over older values, while
    /// values closer to 0.0 favor more recent values less strongly.
    ///
    /// # Panics
    ///
    /// This method will panic if `alpha` is not in between 0.0 and 1.0.
    pub fn new(alpha: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "EMA alpha must be in 0.0..=1.0, got {alpha}"
        );
        Self { alpha }
    }

    /// Creates an EMA filter that closes `1 / lag_factor` of the gap to the input on every value.
    ///
    /// Higher values result in heavier smoothing and more lag. A `lag_factor` of 1.0 disables
    /// smoothing entirely.
    ///
    /// # Panics
    ///
    /// This method will panic if `lag_factor` is less than 1.0 (or NaN).
    pub fn from_lag_factor(lag_factor: f32) -> Self {
        assert!(
            lag_factor >= 1.0,
            "lag factor must be at least 1.0, got {lag_factor}"
        );
        Self::new(1.0 / lag_factor)
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Filter state for [`Ema`] filters.
///
/// A default-constructed state adopts the first value passed to the filter unchanged. A state
/// created with [`EmaState::starting_at`] instead smooths the very first value towards the given
/// starting point.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EmaState {
    last: Option<f32>,
}

impl EmaState {
    /// Creates a filter state that behaves as if `value` was the last filter output.
    pub fn starting_at(value: f32) -> Self {
        Self { last: Some(value) }
    }

    /// Returns the last value output by the filter, if any.
    #[inline]
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}

impl Filter<f32> for Ema {
    type State = EmaState;

    fn filter(&self, state: &mut Self::State, value: f32) -> f32 {
        let out = match state.last {
            Some(last) => last + (value - last) * self.alpha,
            None => value,
        };
        state.last = Some(out);
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_ema() {
        let ema = Ema::new(0.5);
        let mut state = EmaState::default();
        assert_eq!(ema.filter(&mut state, 1.0), 1.0);
        assert_eq!(ema.filter(&mut state, 2.0), 1.5);
        assert_eq!(ema.filter(&mut state, 2.0), 1.75);
    }

    #[test]
    fn test_lag_factor() {
        let ema = Ema::from_lag_factor(1.2);
        let mut state = EmaState::starting_at(0.0);
        assert_relative_eq!(ema.filter(&mut state, 100.0), 83.333336, epsilon = 1e-3);
        assert_relative_eq!(state.last().unwrap(), 83.333336, epsilon = 1e-3);
        // Converges towards a constant input.
        for _ in 0..50 {
            ema.filter(&mut state, 100.0);
        }
        assert_relative_eq!(state.last().unwrap(), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_no_smoothing() {
        let ema = Ema::from_lag_factor(1.0);
        let mut state = EmaState::starting_at(0.0);
        assert_eq!(ema.filter(&mut state, 42.0), 42.0);
    }

    #[test]
    #[should_panic]
    fn test_invalid_lag_factor() {
        Ema::from_lag_factor(0.5);
    }
}

//! The [`TimeSpan`] covered by one simulation tick.

/// An immutable `(start, duration)` interval of simulation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpan {
    start: f32,
    duration: f32,
}

impl TimeSpan {
    /// Create a span beginning at `start` and lasting `duration`.
    pub fn new(start: f32, duration: f32) -> Self {
        Self { start, duration }
    }

    /// Start of the span.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Length of the span.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// End of the span (`start + duration`).
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Absolute time at `fraction` of the span; `0.0` is the start, `1.0` the end.
    pub fn interpolate(&self, fraction: f32) -> f32 {
        self.start + fraction * self.duration
    }

    /// Fraction of the span at which `time` lies.
    ///
    /// Returns `0.0` for a zero-length span.
    pub fn inverse_interpolate(&self, time: f32) -> f32 {
        if self.duration == 0.0 {
            return 0.0;
        }
        (time - self.start) / self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_start_plus_duration() {
        let span = TimeSpan::new(2.0, 0.5);
        assert_eq!(span.end(), 2.5);
    }

    #[test]
    fn interpolate_endpoints() {
        let span = TimeSpan::new(1.0, 4.0);
        assert_eq!(span.interpolate(0.0), 1.0);
        assert_eq!(span.interpolate(0.25), 2.0);
        assert_eq!(span.interpolate(1.0), 5.0);
    }

    #[test]
    fn inverse_interpolate_of_zero_span_is_zero() {
        let span = TimeSpan::new(3.0, 0.0);
        assert_eq!(span.inverse_interpolate(3.0), 0.0);
    }

    #[test]
    fn inverse_interpolate_undoes_interpolate() {
        let span = TimeSpan::new(0.0, 2.0);
        assert_eq!(span.inverse_interpolate(span.interpolate(0.75)), 0.75);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn interpolate_stays_within_span(
                start in -1000.0f32..1000.0,
                duration in 0.0f32..100.0,
                fraction in 0.0f32..=1.0,
            ) {
                let span = TimeSpan::new(start, duration);
                let t = span.interpolate(fraction);
                prop_assert!(t >= span.start() - 1e-3);
                prop_assert!(t <= span.end() + 1e-3);
            }
        }
    }
}

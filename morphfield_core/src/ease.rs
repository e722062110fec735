// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing curves mapping linear time `t ∈ [0, 1]` to morph progress.

/// A symmetric timing curve with `f(0) = 0` and `f(1) = 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Quintic ease-in-out: long dwell near both shapes, fast crossover.
    #[default]
    InOutQuint,
    /// Cubic ease-in-out.
    InOutCubic,
    /// Identity.
    Linear,
}

impl Easing {
    /// Evaluates the curve. Input is clamped to `[0, 1]`; NaN maps to 0.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::InOutQuint => ease_in_out_quint(t),
            Self::InOutCubic => ease_in_out_cubic(t),
            Self::Linear => t,
        }
    }
}

/// `t < 0.5 ? 16t⁵ : 1 - (-2t + 2)⁵ / 2`
#[must_use]
pub fn ease_in_out_quint(t: f64) -> f64 {
    if t < 0.5 {
        16.0 * t * t * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u * u * u / 2.0
    }
}

/// `t < 0.5 ? 4t³ : 1 - (-2t + 2)³ / 2`
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 3] = [Easing::InOutQuint, Easing::InOutCubic, Easing::Linear];

    #[test]
    fn endpoints_and_midpoint() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(0.5), 0.5, "{easing:?} at 0.5");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn eighths_mirror_exactly() {
        for easing in ALL {
            for k in 0..=8 {
                let t = f64::from(k) / 8.0;
                let mirrored = 1.0 - easing.apply(1.0 - t);
                assert_eq!(easing.apply(t), mirrored, "{easing:?} at {t}");
            }
        }
    }

    #[test]
    fn monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=1000 {
                let v = easing.apply(f64::from(i) / 1000.0);
                assert!(v >= prev, "{easing:?} fell at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn quint_known_values() {
        assert_eq!(ease_in_out_quint(0.25), 16.0 / 1024.0);
        assert_eq!(ease_in_out_quint(0.75), 1.0 - 1.0 / 64.0);
    }

    #[test]
    fn clamps_and_guards_input() {
        assert_eq!(Easing::InOutQuint.apply(-1.0), 0.0);
        assert_eq!(Easing::InOutQuint.apply(2.0), 1.0);
        assert_eq!(Easing::InOutCubic.apply(f64::NAN), 0.0);
    }
}

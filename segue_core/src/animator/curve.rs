// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing curves mapping linear progress to eased progress.

/// A timing curve for an [`Animator`](super::Animator).
///
/// All curves map `0.0` to `0.0` and `1.0` to `1.0`; intermediate values may
/// overshoot for springs and some bezier curves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimingCurve {
    /// No easing.
    Linear,
    /// Slow start, accelerating (`cubic-bezier(0.42, 0, 1, 1)`).
    EaseIn,
    /// Fast start, decelerating (`cubic-bezier(0, 0, 0.58, 1)`).
    EaseOut,
    /// Slow start and end (`cubic-bezier(0.42, 0, 0.58, 1)`).
    EaseInOut,
    /// Custom cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier {
        /// First control point x, in `0..=1`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `0..=1`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// Damped spring fitted to the animation duration.
    Spring {
        /// Damping ratio; `1.0` is critically damped, smaller values bounce.
        damping_ratio: f64,
    },
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::Spring {
            damping_ratio: 0.95,
        }
    }
}

/// Decay exponent reached at the end of a spring: `e^-6.9 ≈ 0.001`.
const SPRING_DECAY: f64 = 6.9;

impl TimingCurve {
    /// Creates a custom cubic bezier curve.
    ///
    /// # Panics
    ///
    /// Panics if `x1` or `x2` are outside `[0, 1]`.
    #[must_use]
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Evaluates the curve at linear progress `t` (clamped to `0..=1`).
    #[must_use]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Self::Linear => t,
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            Self::Spring { damping_ratio } => spring(damping_ratio, t),
        }
    }
}

fn spring(damping_ratio: f64, t: f64) -> f64 {
    let zeta = damping_ratio.max(0.05);
    if zeta >= 1.0 {
        let omega = SPRING_DECAY;
        return 1.0 - (-omega * t).exp() * (1.0 + omega * t);
    }
    let omega = SPRING_DECAY / zeta;
    let omega_d = omega * (1.0 - zeta * zeta).sqrt();
    let decay = (-zeta * omega * t).exp();
    1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
}

/// Newton-Raphson solve for the bezier parameter at `progress`, then
/// evaluate y there.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    let mut t = progress;
    for _ in 0..8 {
        let x = bezier(x1, x2, t) - progress;
        if x.abs() < 1e-7 {
            break;
        }
        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-7 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }
    bezier(y1, y2, t)
}

/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`
#[inline]
fn bezier(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [TimingCurve; 6] = [
        TimingCurve::Linear,
        TimingCurve::EaseIn,
        TimingCurve::EaseOut,
        TimingCurve::EaseInOut,
        TimingCurve::Spring { damping_ratio: 0.95 },
        TimingCurve::Spring { damping_ratio: 1.0 },
    ];

    #[test]
    fn endpoints_are_exact() {
        for curve in CURVES {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.evaluate(1.0), 1.0, "{curve:?}");
            assert_eq!(curve.evaluate(-3.0), 0.0, "{curve:?}");
            assert_eq!(curve.evaluate(7.0), 1.0, "{curve:?}");
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let c = TimingCurve::EaseInOut;
        assert!((c.evaluate(0.5) - 0.5).abs() < 1e-4);
        assert!((c.evaluate(0.25) + c.evaluate(0.75) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ease_in_starts_slow() {
        assert!(TimingCurve::EaseIn.evaluate(0.2) < 0.2);
        assert!(TimingCurve::EaseOut.evaluate(0.2) > 0.2);
    }

    #[test]
    fn spring_settles_near_one() {
        let c = TimingCurve::default();
        assert!((c.evaluate(0.999) - 1.0).abs() < 0.01);
        assert!(c.evaluate(0.1) > 0.0);
        let bouncy = TimingCurve::Spring { damping_ratio: 0.3 };
        let peak = (1..100)
            .map(|i| bouncy.evaluate(f64::from(i) / 100.0))
            .fold(0.0_f64, f64::max);
        assert!(peak > 1.0, "underdamped spring should overshoot");
    }

    #[test]
    #[should_panic(expected = "bezier x values must be in [0, 1]")]
    fn bezier_rejects_out_of_range_x() {
        let _ = TimingCurve::cubic_bezier(1.5, 0.0, 0.5, 1.0);
    }
}

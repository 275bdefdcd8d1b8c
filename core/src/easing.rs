//! Easing curve for the spin animation.
//!
//! A CSS-style cubic Bézier timing function with endpoints fixed at
//! (0, 0) and (1, 1). Used to sample the displayed rotation while a spin
//! is in flight; it never influences which outcome is drawn.

use serde::{Deserialize, Serialize};

/// `cubic-bezier(0.15, 0, 0.15, 1)`: fast start, long gentle stop.
pub const SPIN_EASING: CubicBezier = CubicBezier {
    x1: 0.15,
    y1: 0.0,
    x2: 0.15,
    y2: 1.0,
};

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_EPSILON: f64 = 1e-7;
const MIN_SLOPE: f64 = 1e-6;
const BISECTION_ITERATIONS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// Control point x values must stay in [0, 1] so time is monotonic.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<Self> {
        let valid_x = |x: f64| (0.0..=1.0).contains(&x);
        (valid_x(x1) && valid_x(x2) && y1.is_finite() && y2.is_finite())
            .then_some(Self { x1, y1, x2, y2 })
    }

    /// Eased progress for linear `progress`, clamped to [0, 1].
    pub fn ease(&self, progress: f64) -> f64 {
        if progress.is_nan() || progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(progress);
        component(self.y1, self.y2, t)
    }

    /// Value between `start` and `end` at linear `progress`.
    pub fn interpolate(&self, start: f64, end: f64, progress: f64) -> f64 {
        start + (end - start) * self.ease(progress)
    }

    /// Curve parameter t whose x coordinate equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = component(self.x1, self.x2, t) - x;
            if err.abs() < NEWTON_EPSILON && (0.0..=1.0).contains(&t) {
                return t;
            }
            let slope = slope(self.x1, self.x2, t);
            if slope.abs() < MIN_SLOPE {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = component(self.x1, self.x2, t);
            if (value - x).abs() < NEWTON_EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }
}

/// One coordinate of the curve with P0 = 0 and P3 = 1.
fn component(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn slope(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

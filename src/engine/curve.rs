//! Deceleration curves for inertial scrolling.
//!
//! A curve maps elapsed time since release and the initial speed to an
//! instantaneous velocity and a cumulative displacement. Units are whatever
//! the caller uses for speed (the inertial engine uses viewports per second),
//! with time in seconds.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub velocity: f64,
    pub displacement: f64,
}

/// Contract: displacement is 0 at `t = 0`, never decreases while velocity is
/// positive, and velocity reaches 0 after a finite time.
pub trait DecelerationCurve {
    fn sample(&self, t: f64, v0: f64) -> CurveSample;
}

/// Cubic ease-out velocity, `v(t) = v0 (1 - t/T)^3`, whose integral gives a
/// quartic displacement. The stop time `T` grows with the release speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicEaseOut {
    pub base_duration: f64,
    pub duration_per_speed: f64,
    pub max_duration: f64,
}

impl Default for CubicEaseOut {
    fn default() -> Self {
        Self {
            base_duration: 0.2,
            duration_per_speed: 0.05,
            max_duration: 0.7,
        }
    }
}

impl CubicEaseOut {
    pub fn duration(&self, v0: f64) -> f64 {
        (self.base_duration + self.duration_per_speed * v0.abs()).min(self.max_duration)
    }
}

impl DecelerationCurve for CubicEaseOut {
    fn sample(&self, t: f64, v0: f64) -> CurveSample {
        let duration = self.duration(v0);
        if !(duration > 0.0) || !v0.is_finite() {
            return CurveSample {
                velocity: 0.0,
                displacement: 0.0,
            };
        }

        let progress = (t / duration).clamp(0.0, 1.0);
        let remaining = 1.0 - progress;
        CurveSample {
            velocity: v0 * remaining.powi(3),
            displacement: v0 * duration / 4.0 * (1.0 - remaining.powi(4)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_starts_at_rest_position() {
        let sample = CubicEaseOut::default().sample(0.0, 8.0);
        assert!(approx(sample.velocity, 8.0));
        assert!(approx(sample.displacement, 0.0));
    }

    #[test]
    fn test_golden_values() {
        let curve = CubicEaseOut::default();
        // v0 = 4 -> T = 0.2 + 0.05 * 4 = 0.4s
        assert!(approx(curve.duration(4.0), 0.4));

        let half = curve.sample(0.2, 4.0);
        assert!(approx(half.velocity, 0.5));
        assert!(approx(half.displacement, 0.375));

        let end = curve.sample(0.4, 4.0);
        assert!(approx(end.velocity, 0.0));
        assert!(approx(end.displacement, 0.4));

        // v0 = 12 saturates at the 0.7s cap
        assert!(approx(curve.duration(12.0), 0.7));
    }

    #[test]
    fn test_displacement_monotonic_until_stop() {
        let curve = CubicEaseOut::default();
        let mut previous = 0.0;
        let mut t = 0.0;
        while t < 1.0 {
            let sample = curve.sample(t, 9.0);
            assert!(sample.displacement >= previous);
            previous = sample.displacement;
            t += 0.016;
        }
        assert!(approx(curve.sample(1.0, 9.0).velocity, 0.0));
    }

    #[test]
    fn test_zero_speed_is_at_rest() {
        let sample = CubicEaseOut::default().sample(0.016, 0.0);
        assert_eq!(sample.velocity, 0.0);
        assert_eq!(sample.displacement, 0.0);
    }
}

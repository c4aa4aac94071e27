mod catmull_rom;
mod segment;

pub use catmull_rom::CatmullRom;
pub use segment::Segment;

use crate::math::Point2;

/// Number of chords used to estimate curve length.
const LENGTH_SAMPLES: u32 = 64;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Maps a fraction in `[0, 1]` onto the domain.
    #[must_use]
    pub fn lerp(&self, frac: f64) -> f64 {
        self.t_min + frac * (self.t_max - self.t_min)
    }
}

/// Trait for bounded parametric curves in the section plane.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point2;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Estimates the arc length with a fixed chord subdivision.
    fn approx_length(&self) -> f64 {
        let domain = self.domain();
        let mut prev = self.evaluate(domain.t_min);
        let mut length = 0.0;
        for i in 1..=LENGTH_SAMPLES {
            let p = self.evaluate(domain.lerp(f64::from(i) / f64::from(LENGTH_SAMPLES)));
            length += (p - prev).norm();
            prev = p;
        }
        length
    }

    /// Samples the curve into `segments` equal parameter steps, endpoints included.
    fn sample(&self, segments: usize) -> Vec<Point2> {
        let domain = self.domain();
        let n = segments.max(1);
        (0..=n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let frac = i as f64 / n as f64;
                self.evaluate(domain.lerp(frac))
            })
            .collect()
    }
}

//! Flight path model: the filtered sample sequence and its bounding box.

use crate::Sample;
use glam::DVec3;

/// Whether a non-finite `time` cell excludes a row from the path.
///
/// By default rows are filtered on position fields only, so a row with a
/// garbled timestamp still joins the path (its segments then count as
/// zero-duration at playback). `RequireFinite` is the stricter
/// alternative, selectable per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRule {
    #[default]
    Ignore,
    RequireFinite,
}

/// Axis-aligned bounding box over x, y, altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    fn grow(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

/// Ordered sequence of valid samples defining the motion trajectory,
/// plus its precomputed bounding box.
///
/// Construction is a pure filter + reduce: samples keep their input
/// order, and nothing is deduplicated, clamped, or resampled.
#[derive(Debug, Clone, Default)]
pub struct FlightPath {
    samples: Vec<Sample>,
    bounds: Option<Aabb>,
}

impl FlightPath {
    /// An empty path; playback against it stays Idle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Filters raw samples down to the renderable path.
    pub fn from_samples(raw: Vec<Sample>, time_rule: TimeRule) -> Self {
        let samples: Vec<Sample> = raw
            .into_iter()
            .filter(|s| {
                s.has_finite_position()
                    && (time_rule == TimeRule::Ignore || s.time_ms.is_finite())
            })
            .collect();

        let bounds = samples.iter().map(Sample::position).fold(
            None::<Aabb>,
            |acc, p| {
                let mut aabb = acc.unwrap_or(Aabb { min: p, max: p });
                aabb.grow(p);
                Some(aabb)
            },
        );

        Self { samples, bounds }
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `None` when the path is empty; the box is undefined without samples.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_ms: f64, x: f64, y: f64, altitude: f64) -> Sample {
        Sample { time_ms, x, y, altitude }
    }

    #[test]
    fn keeps_input_order_without_sorting() {
        let path = FlightPath::from_samples(
            vec![
                sample(100.0, 3.0, 0.0, 0.0),
                sample(0.0, 1.0, 0.0, 0.0),
                sample(50.0, 2.0, 0.0, 0.0),
            ],
            TimeRule::Ignore,
        );
        let xs: Vec<f64> = path.samples().iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn drops_rows_with_non_finite_position() {
        let path = FlightPath::from_samples(
            vec![
                sample(0.0, 0.0, 0.0, 0.0),
                sample(1.0, f64::NAN, 2.0, 3.0),
                sample(2.0, 1.0, f64::INFINITY, 0.0),
                sample(3.0, 1.0, 1.0, 1.0),
            ],
            TimeRule::Ignore,
        );
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn nan_time_is_kept_by_default_but_droppable() {
        let raw = vec![
            sample(f64::NAN, 1.0, 2.0, 3.0),
            sample(5.0, 4.0, 5.0, 6.0),
        ];
        let lax = FlightPath::from_samples(raw.clone(), TimeRule::Ignore);
        assert_eq!(lax.len(), 2);

        let strict = FlightPath::from_samples(raw, TimeRule::RequireFinite);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict.samples()[0].x, 4.0);
    }

    #[test]
    fn bounding_box_over_retained_samples() {
        let path = FlightPath::from_samples(
            vec![
                sample(0.0, 0.0, 0.0, 0.0),
                sample(1.0, 10.0, 0.0, 0.0),
                sample(2.0, 0.0, 10.0, 0.0),
            ],
            TimeRule::Ignore,
        );
        let aabb = path.bounds().unwrap();
        assert_eq!(aabb.min, DVec3::ZERO);
        assert_eq!(aabb.max, DVec3::new(10.0, 10.0, 0.0));
        assert_eq!(aabb.center(), DVec3::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn empty_path_has_no_bounds() {
        let path = FlightPath::from_samples(
            vec![sample(0.0, f64::NAN, 0.0, 0.0)],
            TimeRule::Ignore,
        );
        assert!(path.is_empty());
        assert!(path.bounds().is_none());
    }

    #[test]
    fn single_sample_box_is_degenerate() {
        let path = FlightPath::from_samples(
            vec![sample(0.0, 2.0, 3.0, 4.0)],
            TimeRule::Ignore,
        );
        let aabb = path.bounds().unwrap();
        assert_eq!(aabb.min, aabb.max);
        assert_eq!(aabb.extent(), DVec3::ZERO);
    }
}

//! Playback clock and interpolator.
//!
//! [`Playback`] is an explicit session object: the host render loop calls
//! [`Playback::advance`] once per frame with the current wall-clock time in
//! milliseconds, and gets back the object transform for that frame. Nothing
//! here touches a real clock, so the whole state machine is drivable with
//! synthetic timestamps.

use crate::path::FlightPath;
use glam::{DQuat, DVec3};

/// Squared direction length below which a segment has no usable heading.
const DIR_EPSILON_SQ: f64 = 1e-12;

/// Where the session currently is in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No path, or an empty one. The object stays wherever it was.
    Idle,
    /// A next sample exists; the object is moving toward it.
    Interpolating,
    /// The last sample has been consumed. No wraparound, no looping.
    Holding,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Interpolating => "interpolating",
            Phase::Holding => "holding",
        })
    }
}

/// Pose of the moving object. Owned by the playback session; everything
/// else (camera, renderer) reads the value returned by `advance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

/// Per-session playback state: current segment index and the wall-clock
/// instant at which that segment started.
#[derive(Debug, Clone)]
pub struct Playback {
    index: usize,
    segment_start_ms: f64,
    transform: Transform,
}

impl Playback {
    pub fn new(now_ms: f64) -> Self {
        Self {
            index: 0,
            segment_start_ms: now_ms,
            transform: Transform::default(),
        }
    }

    /// Restarts from the first sample. Called whenever a new path is
    /// installed; progress against the old path is discarded outright.
    pub fn reset(&mut self, now_ms: f64) {
        self.index = 0;
        self.segment_start_ms = now_ms;
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn phase(&self, path: &FlightPath) -> Phase {
        if path.is_empty() {
            Phase::Idle
        } else if self.index + 1 < path.len() {
            Phase::Interpolating
        } else {
            Phase::Holding
        }
    }

    /// Advances the session to wall-clock time `now_ms` and returns the
    /// object transform for this frame.
    ///
    /// At most one segment is consumed per call; the frame loop is the
    /// only scheduler, and a late frame snaps to the segment end rather
    /// than skipping ahead through several samples.
    pub fn advance(&mut self, path: &FlightPath, now_ms: f64) -> Transform {
        let samples = path.samples();
        if samples.is_empty() {
            return self.transform;
        }

        // A stale index from a longer previous path means the caller
        // skipped reset(); clamp instead of indexing out of bounds.
        if self.index >= samples.len() {
            self.index = samples.len() - 1;
        }

        if self.index + 1 == samples.len() {
            // Holding. A single-sample path lands here on the very first
            // frame: the object sits on its one sample and never moves.
            self.transform.position = samples[self.index].position();
            return self.transform;
        }

        let a = samples[self.index].position();
        let b = samples[self.index + 1].position();
        let duration_ms = samples[self.index + 1].time_ms - samples[self.index].time_ms;

        // Zero, negative, or NaN durations count as already complete so a
        // non-monotonic log can never divide by zero or run time backwards.
        let progress = if duration_ms > 0.0 {
            ((now_ms - self.segment_start_ms) / duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.aim_along(b - a);

        if progress < 1.0 {
            self.transform.position = a.lerp(b, progress);
        } else {
            // Snap exactly to the segment end, then start the next segment
            // on this frame's clock.
            self.transform.position = b;
            self.index += 1;
            self.segment_start_ms = now_ms;
        }

        self.transform
    }

    /// Points the object's forward (+X) axis along `dir`, yaw about +Z and
    /// pitch from the vertical component. Coincident segment endpoints
    /// leave the heading undefined, so the previous orientation is kept.
    fn aim_along(&mut self, dir: DVec3) {
        if dir.length_squared() <= DIR_EPSILON_SQ {
            return;
        }
        let yaw = dir.y.atan2(dir.x);
        let pitch = dir.z.atan2(dir.x.hypot(dir.y));
        self.transform.orientation =
            DQuat::from_rotation_z(yaw) * DQuat::from_rotation_y(-pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::TimeRule;
    use crate::Sample;
    use approx::assert_relative_eq;

    fn path_of(points: &[(f64, f64, f64, f64)]) -> FlightPath {
        FlightPath::from_samples(
            points
                .iter()
                .map(|&(time_ms, x, y, altitude)| Sample { time_ms, x, y, altitude })
                .collect(),
            TimeRule::Ignore,
        )
    }

    fn assert_vec_eq(actual: DVec3, expected: DVec3) {
        assert_relative_eq!(actual.x, expected.x, max_relative = 1e-12);
        assert_relative_eq!(actual.y, expected.y, max_relative = 1e-12);
        assert_relative_eq!(actual.z, expected.z, max_relative = 1e-12);
    }

    #[test]
    fn interpolates_halfway_then_snaps_and_holds() {
        let path = path_of(&[(0.0, 0.0, 0.0, 0.0), (1000.0, 100.0, 0.0, 0.0)]);
        let mut playback = Playback::new(0.0);

        let t = playback.advance(&path, 500.0);
        assert_eq!(t.position, DVec3::new(50.0, 0.0, 0.0));
        assert_eq!(playback.phase(&path), Phase::Interpolating);

        let t = playback.advance(&path, 1000.0);
        assert_eq!(t.position, DVec3::new(100.0, 0.0, 0.0));
        assert_eq!(playback.index(), 1);
        assert_eq!(playback.phase(&path), Phase::Holding);
    }

    #[test]
    fn segment_boundaries_are_exact() {
        let path = path_of(&[(0.0, 1.0, 2.0, 3.0), (1000.0, 5.0, -2.0, 7.0)]);
        let mut playback = Playback::new(0.0);

        // progress = 0 must reproduce A bit-for-bit.
        let t = playback.advance(&path, 0.0);
        assert_eq!(t.position, DVec3::new(1.0, 2.0, 3.0));

        // progress = 1 must reproduce B bit-for-bit.
        let t = playback.advance(&path, 1000.0);
        assert_eq!(t.position, DVec3::new(5.0, -2.0, 7.0));
    }

    #[test]
    fn interpolation_is_linear_in_progress() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(5.0, -2.0, 7.0);
        for p in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let path = path_of(&[(0.0, a.x, a.y, a.z), (1000.0, b.x, b.y, b.z)]);
            let mut playback = Playback::new(0.0);
            let t = playback.advance(&path, 1000.0 * p);
            assert_vec_eq(t.position, a * (1.0 - p) + b * p);
        }
    }

    #[test]
    fn empty_path_never_moves_the_object() {
        let moving = path_of(&[(0.0, 0.0, 0.0, 0.0), (100.0, 10.0, 0.0, 0.0)]);
        let mut playback = Playback::new(0.0);
        let before = playback.advance(&moving, 50.0);

        let empty = FlightPath::empty();
        assert_eq!(playback.phase(&empty), Phase::Idle);
        for now in [60.0, 1000.0, 1_000_000.0] {
            let t = playback.advance(&empty, now);
            assert_eq!(t, before);
        }
        assert_eq!(playback.index(), 0);
    }

    #[test]
    fn single_sample_holds_on_first_frame() {
        let path = path_of(&[(0.0, 7.0, 8.0, 9.0)]);
        let mut playback = Playback::new(0.0);
        let t = playback.advance(&path, 0.0);
        assert_eq!(t.position, DVec3::new(7.0, 8.0, 9.0));
        assert_eq!(playback.phase(&path), Phase::Holding);
    }

    #[test]
    fn holding_never_advances_past_the_last_sample() {
        let path = path_of(&[(0.0, 0.0, 0.0, 0.0), (100.0, 10.0, 0.0, 0.0)]);
        let mut playback = Playback::new(0.0);
        playback.advance(&path, 100.0);
        assert_eq!(playback.index(), 1);

        for now in [200.0, 5000.0] {
            let t = playback.advance(&path, now);
            assert_eq!(t.position, DVec3::new(10.0, 0.0, 0.0));
            assert_eq!(playback.index(), 1);
        }
    }

    #[test]
    fn reset_mid_segment_uses_only_the_new_path() {
        let old = path_of(&[(0.0, 0.0, 0.0, 0.0), (1000.0, 100.0, 0.0, 0.0)]);
        let mut playback = Playback::new(0.0);
        playback.advance(&old, 400.0);

        // Reload at t=2000 with completely different data.
        let new = path_of(&[(0.0, 0.0, 50.0, 0.0), (500.0, 0.0, 100.0, 0.0)]);
        playback.reset(2000.0);
        assert_eq!(playback.index(), 0);

        let t = playback.advance(&new, 2250.0);
        assert_eq!(t.position, DVec3::new(0.0, 75.0, 0.0));
    }

    #[test]
    fn zero_duration_segment_completes_immediately() {
        let path = path_of(&[
            (1000.0, 0.0, 0.0, 0.0),
            (1000.0, 5.0, 0.0, 0.0),
            (2000.0, 10.0, 0.0, 0.0),
        ]);
        let mut playback = Playback::new(0.0);
        let t = playback.advance(&path, 0.0);
        assert_eq!(t.position, DVec3::new(5.0, 0.0, 0.0));
        assert_eq!(playback.index(), 1);
    }

    #[test]
    fn negative_duration_segment_completes_immediately() {
        let path = path_of(&[(1000.0, 0.0, 0.0, 0.0), (400.0, 5.0, 0.0, 0.0)]);
        let mut playback = Playback::new(0.0);
        let t = playback.advance(&path, 0.0);
        assert_eq!(t.position, DVec3::new(5.0, 0.0, 0.0));
        assert_eq!(playback.phase(&path), Phase::Holding);
    }

    #[test]
    fn nan_timestamp_segment_completes_immediately() {
        let path = path_of(&[(f64::NAN, 0.0, 0.0, 0.0), (1000.0, 5.0, 0.0, 0.0)]);
        let mut playback = Playback::new(0.0);
        let t = playback.advance(&path, 0.0);
        assert_eq!(t.position, DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn orientation_tracks_travel_direction() {
        // Due +Y: forward axis must rotate onto +Y.
        let path = path_of(&[(0.0, 0.0, 0.0, 0.0), (1000.0, 0.0, 10.0, 0.0)]);
        let mut playback = Playback::new(0.0);
        let t = playback.advance(&path, 500.0);
        let forward = t.orientation * DVec3::X;
        assert_vec_eq(forward, DVec3::Y);

        // 45 degree climb along +X.
        let path = path_of(&[(0.0, 0.0, 0.0, 0.0), (1000.0, 10.0, 0.0, 10.0)]);
        let mut playback = Playback::new(0.0);
        let t = playback.advance(&path, 500.0);
        let forward = t.orientation * DVec3::X;
        assert_vec_eq(forward, DVec3::new(1.0, 0.0, 1.0).normalize());
    }

    #[test]
    fn coincident_endpoints_keep_previous_orientation() {
        let path = path_of(&[
            (0.0, 0.0, 0.0, 0.0),
            (1000.0, 0.0, 10.0, 0.0),
            (2000.0, 0.0, 10.0, 0.0),
        ]);
        let mut playback = Playback::new(0.0);
        playback.advance(&path, 500.0);
        let heading = playback.transform().orientation;

        // Finish segment 0, then sit inside the degenerate segment 1.
        playback.advance(&path, 1000.0);
        let t = playback.advance(&path, 1500.0);
        assert_eq!(t.orientation, heading);
    }

    #[test]
    fn stale_index_from_longer_path_is_clamped() {
        let long = path_of(&[
            (0.0, 0.0, 0.0, 0.0),
            (10.0, 1.0, 0.0, 0.0),
            (20.0, 2.0, 0.0, 0.0),
        ]);
        let mut playback = Playback::new(0.0);
        playback.advance(&long, 10.0);
        playback.advance(&long, 20.0);
        assert_eq!(playback.index(), 2);

        // Shorter path without an intervening reset must not panic.
        let short = path_of(&[(0.0, 9.0, 0.0, 0.0)]);
        let t = playback.advance(&short, 30.0);
        assert_eq!(t.position, DVec3::new(9.0, 0.0, 0.0));
    }
}

//! Orbital camera for a Z-up world, plus the mouse controller.
//!
//! The camera orbits a target point with spherical parameters (azimuth,
//! elevation, radius). In follow mode the *desired* target is rewritten
//! every frame from the airplane transform and the actual target chases it
//! through exponential damping, so re-targeting never stomps an orbit or
//! zoom gesture in progress. In fixed mode the pose is set once from the
//! path bounds and input is never forwarded here.

use flightlog::Aabb;
use glam::{DVec3, Mat4, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Vertical field of view.
const FOV_Y_RAD: f32 = 1.308_997; // 75 degrees
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 50_000.0;

/// Fixed-frame viewpoint offset from the bounding-box center.
const FIXED_OFFSET: DVec3 = DVec3::new(100.0, 0.0, 100.0);

/// Damping rates (1/s) for follow re-targeting and scroll zoom.
const TARGET_DAMPING: f64 = 6.0;
const ZOOM_DAMPING: f64 = 10.0;

const MIN_RADIUS: f64 = 5.0;
const MAX_RADIUS: f64 = 20_000.0;

pub struct Camera {
    /// Point the camera looks at and orbits around.
    pub target: DVec3,
    desired_target: DVec3,
    /// Distance from the camera to the target.
    pub radius: f64,
    desired_radius: f64,
    /// Angle around +Z, radians. 0 looks down the -X axis toward target.
    pub azimuth: f64,
    /// Angle above the XY plane, radians.
    pub elevation: f64,

    pub proj: Mat4,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            target: DVec3::ZERO,
            desired_target: DVec3::ZERO,
            radius: 500.0,
            desired_radius: 500.0,
            azimuth: 0.0,
            elevation: 45f64.to_radians(),
            proj: Self::projection(aspect),
        }
    }

    fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_RAD, aspect.max(1e-6), Z_NEAR, Z_FAR)
    }

    /// Recomputes the projection for a new aspect ratio. The only camera
    /// state a window resize touches.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.proj = Self::projection(aspect);
    }

    /// Camera position derived from the orbital parameters.
    pub fn eye(&self) -> DVec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target
            + DVec3::new(
                self.radius * cos_el * cos_az,
                self.radius * cos_el * sin_az,
                self.radius * sin_el,
            )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye().as_vec3(), self.target.as_vec3(), Vec3::Z)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view()
    }

    /// One-shot fixed-frame placement: eye at the bounding-box center plus
    /// a constant offset, looking at the center. Never updated again.
    pub fn frame_bounds(&mut self, bounds: &Aabb) {
        let center = bounds.center();
        self.target = center;
        self.desired_target = center;
        // FIXED_OFFSET expressed in orbital terms so eye() lands exactly
        // on center + offset.
        self.radius = FIXED_OFFSET.length();
        self.desired_radius = self.radius;
        self.azimuth = FIXED_OFFSET.y.atan2(FIXED_OFFSET.x);
        self.elevation = FIXED_OFFSET.z.atan2(FIXED_OFFSET.x.hypot(FIXED_OFFSET.y));
    }

    /// Follow-mode re-target: records where the rig should look; the
    /// actual target converges in `update`.
    pub fn follow(&mut self, position: DVec3) {
        self.desired_target = position;
    }

    /// Moves the target immediately, bypassing damping. Used when a path
    /// first loads so the camera does not sweep in from the origin.
    pub fn snap_to(&mut self, position: DVec3) {
        self.target = position;
        self.desired_target = position;
    }

    /// Per-frame damped approach of target and zoom toward their desired
    /// values. `dt` is the frame delta in seconds.
    pub fn update(&mut self, dt: f64) {
        let blend = |rate: f64| 1.0 - (-rate * dt.max(0.0)).exp();
        self.target += (self.desired_target - self.target) * blend(TARGET_DAMPING);
        self.radius += (self.desired_radius - self.radius) * blend(ZOOM_DAMPING);
    }
}

pub struct CameraController {
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            mouse_down: false,
            last_mouse: None,
        }
    }

    /// Handles window events and updates the camera's orbit parameters.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left {
                    self.mouse_down = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let xy = (position.x, position.y);
                if let (Some(last), true) = (self.last_mouse, self.mouse_down) {
                    self.apply_drag(xy.0 - last.0, xy.1 - last.1, camera);
                }
                self.last_mouse = Some(xy);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.apply_scroll(scroll, camera);
            }
            _ => {}
        }
    }

    /// Scroll zoom adjusts the desired radius; damping in `Camera::update`
    /// smooths the actual distance.
    fn apply_scroll(&mut self, delta: f32, camera: &mut Camera) {
        let zoom = 1.1_f64.powf(-delta as f64);
        camera.desired_radius = (camera.desired_radius * zoom).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Left-drag orbits around the target. Elevation is clamped away from
    /// the poles to keep the Z-up basis well defined.
    fn apply_drag(&mut self, dx: f64, dy: f64, camera: &mut Camera) {
        camera.azimuth -= dx * 0.005;
        camera.elevation = (camera.elevation + dy * 0.005)
            .clamp(1f64.to_radians(), 89f64.to_radians());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(min: DVec3, max: DVec3) -> Aabb {
        Aabb { min, max }
    }

    #[test]
    fn frame_bounds_places_eye_at_center_plus_offset() {
        let mut camera = Camera::new(16.0 / 9.0);
        camera.frame_bounds(&aabb(DVec3::ZERO, DVec3::new(10.0, 10.0, 0.0)));

        let expected = DVec3::new(5.0, 5.0, 0.0) + FIXED_OFFSET;
        let eye = camera.eye();
        assert!((eye - expected).length() < 1e-9, "eye = {eye:?}");
        assert_eq!(camera.target, DVec3::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn follow_target_converges_under_damping() {
        let mut camera = Camera::new(1.0);
        camera.snap_to(DVec3::ZERO);
        camera.follow(DVec3::new(100.0, 0.0, 0.0));

        let mut last_dist = f64::INFINITY;
        for _ in 0..240 {
            camera.update(1.0 / 60.0);
            let dist = (camera.target - DVec3::new(100.0, 0.0, 0.0)).length();
            assert!(dist <= last_dist);
            last_dist = dist;
        }
        assert!(last_dist < 0.1, "target did not converge: {last_dist}");
    }

    #[test]
    fn retargeting_preserves_user_orbit_state() {
        let mut camera = Camera::new(1.0);
        camera.azimuth = 1.2;
        camera.elevation = 0.7;
        camera.follow(DVec3::new(50.0, 50.0, 10.0));
        camera.update(0.016);
        assert_eq!(camera.azimuth, 1.2);
        assert_eq!(camera.elevation, 0.7);
    }

    #[test]
    fn zoom_is_clamped_to_sane_range() {
        let mut camera = Camera::new(1.0);
        let mut controller = CameraController::new();
        for _ in 0..500 {
            controller.apply_scroll(10.0, &mut camera);
        }
        assert_eq!(camera.desired_radius, MIN_RADIUS);
        for _ in 0..500 {
            controller.apply_scroll(-10.0, &mut camera);
        }
        assert_eq!(camera.desired_radius, MAX_RADIUS);
    }

    #[test]
    fn drag_clamps_elevation_short_of_the_poles() {
        let mut camera = Camera::new(1.0);
        let mut controller = CameraController::new();
        controller.apply_drag(0.0, 1e6, &mut camera);
        assert!(camera.elevation <= 89f64.to_radians() + 1e-12);
        controller.apply_drag(0.0, -1e6, &mut camera);
        assert!(camera.elevation >= 1f64.to_radians() - 1e-12);
    }
}

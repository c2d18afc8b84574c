//! 3D flight path viewer library.
//!
//! Replays a CSV flight log in a window: the trajectory is drawn as a
//! polyline, and a simplified airplane model is moved along it by the
//! playback core in `flightlog`, interpolating between log samples in
//! real time.

pub mod app;
pub mod camera;
pub mod config;
pub mod mesh;
pub mod renderer;
pub mod ui;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// `flight-viewer` - replays a recorded flight from a CSV position log.
///
/// The log must carry `time`, `x`, `y` and `altitude` columns. Rows whose
/// coordinates fail to parse are skipped; if nothing survives, the window
/// opens on an empty scene and stays there.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Filesystem path to the CSV flight log.
    #[arg(long, env = "FLIGHT_LOG", default_value = "assets/logfile.csv")]
    pub log: PathBuf,

    /// Camera policy, chosen once at startup.
    ///
    /// `fixed` frames the whole path from the data bounds and never moves;
    /// `follow` tracks the airplane and accepts mouse orbit and zoom.
    #[arg(long, value_enum, default_value_t = CameraMode::Follow)]
    pub camera: CameraMode,

    /// Also drop log rows whose `time` cell is not a finite number.
    ///
    /// By default only the position fields gate row inclusion; a garbled
    /// timestamp yields a zero-duration segment instead.
    #[arg(long)]
    pub require_finite_time: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// One-shot viewpoint from the path bounding box.
    Fixed,
    /// Re-target the airplane every frame, with orbit/zoom input on top.
    Follow,
}

impl Config {
    pub fn time_rule(&self) -> flightlog::TimeRule {
        if self.require_finite_time {
            flightlog::TimeRule::RequireFinite
        } else {
            flightlog::TimeRule::Ignore
        }
    }
}

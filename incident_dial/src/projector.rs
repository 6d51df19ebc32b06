//! Projection module - per-event render attributes
//!
//! Maps an incident's severity and time-of-day onto the visual parameters of
//! its ray: angle, wedge length, angular spread, haze copy count, and the
//! selected flag.

use shared::EventRecord;

use crate::geometry;

/// Wedge length at severity 0, in board units
pub const BASE_LENGTH: f32 = 28.0;

/// Additional wedge length at severity 100
pub const LENGTH_RANGE: f32 = 220.0;

/// Angular spread at severity 0, in degrees
pub const BASE_SPREAD_DEG: f32 = 1.2;

/// Additional spread at severity 100
pub const SPREAD_RANGE_DEG: f32 = 6.0;

/// Every ray gets at least this many haze copies
const HAZE_BASE: u32 = 2;

/// One extra haze copy per this many severity points
const HAZE_DIVISOR: u32 = 35;

/// Render attributes for one incident's ray
#[derive(Debug, Clone)]
pub struct RayStyle {
    /// Center angle on the dial
    pub angle_deg: f32,
    /// Wedge length beyond the inner ring
    pub length: f32,
    /// Full angular width of the wedge
    pub spread_deg: f32,
    /// Background duplicate count; denser haze reads as higher severity
    pub haze_count: u32,
    /// Whether this incident is the current selection
    pub selected: bool,
}

/// Project an incident into its ray style
///
/// Length and spread scale linearly with severity, so both are monotonically
/// non-decreasing in it.
pub fn project(event: &EventRecord, selected_id: Option<&str>) -> RayStyle {
    let t = event.severity as f32 / 100.0;

    RayStyle {
        angle_deg: geometry::angle_from_minutes(event.minutes_of_day),
        length: BASE_LENGTH + t * LENGTH_RANGE,
        spread_deg: BASE_SPREAD_DEG + t * SPREAD_RANGE_DEG,
        haze_count: HAZE_BASE + event.severity as u32 / HAZE_DIVISOR,
        selected: selected_id == Some(event.id.as_str()),
    }
}

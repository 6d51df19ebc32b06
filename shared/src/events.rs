//! Event store - incident records and their render-facing derivations
//!
//! Seeds carry what the outside world supplies (name, location, severity,
//! age); derivation pins each seed to a fixed reference "now" and a display
//! timezone, producing the immutable records the chart renders.

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An externally supplied incident, before derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSeed {
    /// Short incident name
    pub name: String,
    /// Where the incident happened
    pub location: String,
    /// Severity on a 0-100 scale
    pub severity: u8,
    /// Hours between the incident and the reference "now"
    pub hours_ago: f32,
    /// One-line summary for the detail panel
    pub description: String,
}

/// File format of the optional `events.toml` dataset: an `[[events]]` array
#[derive(Debug, Deserialize)]
struct SeedFile {
    events: Vec<EventSeed>,
}

/// A derived, immutable incident record
///
/// Derivation happens once at load against a reference instant captured at
/// process start; `age_hours` is never re-evaluated per frame.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// Stable unique id (`"e-{index}"`, unique by construction)
    pub id: String,
    /// Short incident name
    pub name: String,
    /// Where the incident happened
    pub location: String,
    /// One-line summary for the detail panel
    pub description: String,
    /// Severity on a 0-100 scale (clamped at derivation)
    pub severity: u8,
    /// Absolute instant of the incident
    pub timestamp: DateTime<Utc>,
    /// The incident instant in the display timezone
    pub local_datetime: DateTime<Tz>,
    /// Local hour*60 + minute, drives the ray angle
    pub minutes_of_day: u32,
    /// Hours between the incident and the reference "now"
    pub age_hours: f32,
}

impl EventRecord {
    /// Format the local incident time as "hh:mm" (24-hour)
    pub fn format_time(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.local_datetime.hour(),
            self.local_datetime.minute()
        )
    }

    /// Format the local incident date as "Mon DD, YYYY"
    pub fn format_date(&self) -> String {
        self.local_datetime.format("%b %d, %Y").to_string()
    }

    /// Accessible label announced for the selectable ray
    pub fn accessible_label(&self) -> String {
        format!(
            "{} at {} in {}",
            self.name,
            self.format_time(),
            self.location
        )
    }
}

/// Derive immutable records from seeds
///
/// Ids are assigned from seed order; severity is clamped to 0-100 and
/// negative ages are treated as "just now".
pub fn derive_records(seeds: &[EventSeed], now: DateTime<Utc>, tz: Tz) -> Vec<EventRecord> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let severity = seed.severity.min(100);
            let age_hours = seed.hours_ago.max(0.0);
            let offset_ms = (age_hours as f64 * 3_600_000.0) as i64;
            let timestamp = now - Duration::milliseconds(offset_ms);
            let local = timestamp.with_timezone(&tz);
            let minutes_of_day = local.hour() * 60 + local.minute();

            EventRecord {
                id: format!("e-{}", i),
                name: seed.name.clone(),
                location: seed.location.clone(),
                description: seed.description.clone(),
                severity,
                timestamp,
                local_datetime: local,
                minutes_of_day,
                age_hours,
            }
        })
        .collect()
}

/// Parse an `[[events]]` dataset from TOML text
pub fn parse_seeds(text: &str) -> Result<Vec<EventSeed>, toml::de::Error> {
    let file: SeedFile = toml::from_str(text)?;
    Ok(file.events)
}

/// Load a dataset file, replacing the built-in incident list
pub fn load_seeds(path: &std::path::Path) -> Result<Vec<EventSeed>, crate::ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_seeds(&contents)?)
}

/// The built-in incident dataset
pub fn builtin_seeds() -> Vec<EventSeed> {
    fn seed(name: &str, location: &str, severity: u8, hours_ago: f32, description: &str) -> EventSeed {
        EventSeed {
            name: name.to_string(),
            location: location.to_string(),
            severity,
            hours_ago,
            description: description.to_string(),
        }
    }

    vec![
        seed("Stock Market Crash", "New York, USA", 97, 3.2, "Multi-index halt triggered by rapid selloff."),
        seed("Regional Conflict Escalation", "Kharkiv, UA", 94, 7.8, "Heavy artillery exchange resumed overnight."),
        seed("Pacific Earthquake", "Sendai, JP", 86, 12.4, "Strong quake with extensive transport disruption."),
        seed("Subsea Cable Failure", "Lisbon, PT", 54, 18.6, "High-latency outages impacted international traffic."),
        seed("Airliner Emergency Landing", "Reykjavík, IS", 41, 20.1, "Flight diverted after avionics anomaly."),
        seed("Port Closure Strike", "Rotterdam, NL", 59, 34.2, "Labor action halted major cargo routes."),
        seed("Flooding Event", "Dhaka, BD", 65, 48.8, "Rapid inundation displaced thousands."),
        seed("Grid Instability", "Johannesburg, ZA", 51, 70.3, "Rolling outages due to generation imbalance."),
        seed("Currency Shock", "Buenos Aires, AR", 72, 90.4, "Emergency controls imposed after steep devaluation."),
        seed("Wildfire Expansion", "Alberta, CA", 63, 126.7, "Rapid spread prompted extended evacuations."),
        seed("Orbital Debris Alert", "LEO", 33, 220.5, "Collision avoidance maneuvers executed."),
        seed("Emergency Rate Action", "London, UK", 69, 308.1, "Central bank made unscheduled policy adjustment."),
        seed("Bridge Collapse", "Assam, IN", 57, 406.9, "Critical transport link failed during heavy rain."),
        seed("Volcanic Ash Reroute", "Iceland", 46, 550.2, "Flight corridors redirected from ash plume."),
        seed("Refinery Fire", "Gulf Coast, USA", 61, 680.5, "Fuel production curtailed pending safety review."),
    ]
}

//! Ray pipeline - filtering, severity ordering, and layered wedge emission
//!
//! Turns the immutable incident list plus the current view state into a
//! render plan: an ordered background layer of jittered haze copies and an
//! ordered foreground layer of crisp, selectable wedges. The plan is plain
//! data; the drawing layer consumes it on screen and tests consume it
//! headlessly.

use nannou::prelude::*;
use shared::EventRecord;

use crate::geometry;
use crate::projector;
use crate::view::ViewState;

/// Haze copies rotate at most this far from the nominal angle
pub const HAZE_ROTATION_JITTER_DEG: f32 = 0.9;

/// Haze copies scale within [HAZE_SCALE_MIN, HAZE_SCALE_MIN + HAZE_SCALE_RANGE]
pub const HAZE_SCALE_MIN: f32 = 0.9;
pub const HAZE_SCALE_RANGE: f32 = 0.32;

/// Source of the cosmetic haze perturbations
///
/// Implementations must keep `rotation_deg` within ±`HAZE_ROTATION_JITTER_DEG`
/// and `scale` within the haze scale band.
pub trait HazeJitter {
    fn rotation_deg(&mut self) -> f32;
    fn scale(&mut self) -> f32;
}

/// The app's jitter source
pub struct RandomJitter;

impl HazeJitter for RandomJitter {
    fn rotation_deg(&mut self) -> f32 {
        (random_f32() - 0.5) * 2.0 * HAZE_ROTATION_JITTER_DEG
    }

    fn scale(&mut self) -> f32 {
        HAZE_SCALE_MIN + random_f32() * HAZE_SCALE_RANGE
    }
}

/// Jitter source that leaves every copy at nominal geometry (reduced motion)
pub struct StillJitter;

impl HazeJitter for StillJitter {
    fn rotation_deg(&mut self) -> f32 {
        0.0
    }

    fn scale(&mut self) -> f32 {
        1.0
    }
}

/// One background haze wedge; non-interactive
#[derive(Debug, Clone)]
pub struct HazeWedge {
    pub points: [Point2; 3],
    pub severity: u8,
}

/// One foreground wedge; doubles as the hit-test handle for its incident
#[derive(Debug, Clone)]
pub struct RayWedge {
    pub points: [Point2; 3],
    pub event_id: String,
    /// Accessible label: "{name} at {time} in {location}"
    pub label: String,
    pub severity: u8,
    pub selected: bool,
}

/// The ordered render plan, rebuilt on every render
#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    pub background: Vec<HazeWedge>,
    pub foreground: Vec<RayWedge>,
}

/// Incidents passing the active lookback filter, in store order
pub fn filtered_events<'a>(events: &'a [EventRecord], view: &ViewState) -> Vec<&'a EventRecord> {
    events.iter().filter(|e| view.is_visible(e)).collect()
}

/// Build the render plan for the current view state
///
/// Events are drawn in ascending severity so dominant rays land last and are
/// never occluded by lesser ones sharing angular space. Each event emits its
/// haze copies first, then exactly one crisp wedge at exact geometry.
pub fn build_plan(
    events: &[EventRecord],
    view: &ViewState,
    center: Point2,
    jitter: &mut dyn HazeJitter,
) -> RenderPlan {
    let mut visible = filtered_events(events, view);
    visible.sort_by_key(|e| e.severity);

    let mut plan = RenderPlan::default();

    for event in visible {
        let style = projector::project(event, view.selected_id());
        let nominal =
            geometry::make_ray_path(center, style.angle_deg, style.length, style.spread_deg);

        for _ in 0..style.haze_count {
            let rotation = jitter.rotation_deg();
            let scale = jitter.scale();
            plan.background.push(HazeWedge {
                points: perturb_wedge(nominal, center, rotation, scale),
                severity: event.severity,
            });
        }

        plan.foreground.push(RayWedge {
            points: nominal,
            event_id: event.id.clone(),
            label: event.accessible_label(),
            severity: event.severity,
            selected: style.selected,
        });
    }

    plan
}

/// Scale a wedge about the chart center, then rotate it clockwise
///
/// Uses the same clockwise angle convention as `geometry::polar_point`.
fn perturb_wedge(
    points: [Point2; 3],
    center: Point2,
    rotation_deg: f32,
    scale: f32,
) -> [Point2; 3] {
    let a = rotation_deg.to_radians();
    let (sin_a, cos_a) = a.sin_cos();

    points.map(|p| {
        let x = (p.x - center.x) * scale;
        let y = (p.y - center.y) * scale;
        pt2(
            center.x + x * cos_a + y * sin_a,
            center.y - x * sin_a + y * cos_a,
        )
    })
}

/// Find the topmost foreground wedge under a board-space point
///
/// Later wedges draw on top, so the scan runs back to front.
pub fn hit_test(plan: &RenderPlan, board_point: Point2) -> Option<&RayWedge> {
    plan.foreground
        .iter()
        .rev()
        .find(|ray| geometry::point_in_wedge(board_point, ray.points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Range;
    use chrono::{TimeZone, Utc};
    use shared::{derive_records, EventSeed};

    /// Scripted jitter that replays fixed rotation/scale sequences
    struct ScriptJitter {
        rotations: Vec<f32>,
        scales: Vec<f32>,
        rotation_cursor: usize,
        scale_cursor: usize,
    }

    impl ScriptJitter {
        fn new(rotations: Vec<f32>, scales: Vec<f32>) -> Self {
            Self {
                rotations,
                scales,
                rotation_cursor: 0,
                scale_cursor: 0,
            }
        }
    }

    impl HazeJitter for ScriptJitter {
        fn rotation_deg(&mut self) -> f32 {
            let r = self.rotations[self.rotation_cursor % self.rotations.len()];
            self.rotation_cursor += 1;
            r
        }

        fn scale(&mut self) -> f32 {
            let s = self.scales[self.scale_cursor % self.scales.len()];
            self.scale_cursor += 1;
            s
        }
    }

    fn seed(severity: u8, hours_ago: f32) -> EventSeed {
        EventSeed {
            name: "Test".to_string(),
            location: "Here".to_string(),
            severity,
            hours_ago,
            description: "".to_string(),
        }
    }

    fn records(seeds: &[EventSeed]) -> Vec<EventRecord> {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        derive_records(seeds, now, "UTC".parse().unwrap())
    }

    fn center() -> Point2 {
        pt2(0.0, 0.0)
    }

    #[test]
    fn test_filter_by_range() {
        let events = records(&[seed(80, 10.0), seed(50, 50.0), seed(30, 200.0)]);

        for (range, expected) in [(Range::Day, 1), (Range::FourDays, 2), (Range::Month, 3)] {
            let view = ViewState::new(range);
            assert_eq!(filtered_events(&events, &view).len(), expected);
        }
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let events = records(&[seed(80, 10.0), seed(50, 50.0), seed(30, 200.0)]);
        let view = ViewState::new(Range::FourDays);

        let once: Vec<EventRecord> = filtered_events(&events, &view)
            .into_iter()
            .cloned()
            .collect();
        let twice = filtered_events(&once, &view);

        assert_eq!(twice.len(), once.len());
        for (a, b) in once.iter().zip(twice) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_foreground_ordered_by_ascending_severity() {
        let events = records(&[seed(90, 1.0), seed(20, 2.0), seed(55, 3.0)]);
        let view = ViewState::new(Range::Day);
        let mut jitter = StillJitter;

        let plan = build_plan(&events, &view, center(), &mut jitter);

        let severities: Vec<u8> = plan.foreground.iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![20, 55, 90]);
    }

    #[test]
    fn test_haze_counts_match_projection() {
        // Severities 20, 55, 90 project 2, 3, and 4 haze copies
        let events = records(&[seed(90, 1.0), seed(20, 2.0), seed(55, 3.0)]);
        let view = ViewState::new(Range::Day);
        let mut jitter = StillJitter;

        let plan = build_plan(&events, &view, center(), &mut jitter);

        assert_eq!(plan.background.len(), 2 + 3 + 4);
        assert_eq!(plan.foreground.len(), 3);

        // Background blocks follow the foreground order
        let block_severities: Vec<u8> =
            plan.background.iter().map(|h| h.severity).collect();
        assert_eq!(block_severities, vec![20, 20, 55, 55, 55, 90, 90, 90, 90]);
    }

    #[test]
    fn test_still_jitter_leaves_nominal_geometry() {
        let events = records(&[seed(40, 1.0)]);
        let view = ViewState::new(Range::Day);
        let mut jitter = StillJitter;

        let plan = build_plan(&events, &view, center(), &mut jitter);
        let crisp = &plan.foreground[0];

        for haze in &plan.background {
            for (h, c) in haze.points.iter().zip(crisp.points.iter()) {
                assert!((h.x - c.x).abs() < 0.001);
                assert!((h.y - c.y).abs() < 0.001);
            }
        }
    }

    #[test]
    fn test_scripted_jitter_perturbs_copies() {
        let events = records(&[seed(10, 1.0)]);
        let view = ViewState::new(Range::Day);
        let mut jitter = ScriptJitter::new(vec![0.9, -0.9], vec![1.22, 0.9]);

        let plan = build_plan(&events, &view, center(), &mut jitter);
        assert_eq!(plan.background.len(), 2);

        // First copy scaled up: apex ends up farther from center than nominal
        let nominal_apex = plan.foreground[0].points[1];
        let scaled_apex = plan.background[0].points[1];
        assert!(scaled_apex.distance(center()) > nominal_apex.distance(center()));

        // Scaling and rotating about the center preserves the scaled radius
        let expected = nominal_apex.distance(center()) * 1.22;
        assert!((scaled_apex.distance(center()) - expected).abs() < 0.01);
    }

    #[test]
    fn test_random_jitter_stays_in_bounds() {
        let mut jitter = RandomJitter;
        for _ in 0..200 {
            let r = jitter.rotation_deg();
            let s = jitter.scale();
            assert!(r.abs() <= HAZE_ROTATION_JITTER_DEG);
            assert!((HAZE_SCALE_MIN..=HAZE_SCALE_MIN + HAZE_SCALE_RANGE).contains(&s));
        }
    }

    #[test]
    fn test_selected_flag_and_label_carried() {
        let events = records(&[seed(70, 1.0)]);
        let mut view = ViewState::new(Range::Day);
        view.select_event("e-0", &events);
        let mut jitter = StillJitter;

        let plan = build_plan(&events, &view, center(), &mut jitter);
        let ray = &plan.foreground[0];

        assert!(ray.selected);
        assert_eq!(ray.event_id, "e-0");
        assert_eq!(ray.label, "Test at 11:00 in Here");
    }

    #[test]
    fn test_hit_test_finds_topmost_ray() {
        // Two incidents at the same minute: the high-severity wedge draws on
        // top and wins the hit
        let mut seeds = vec![seed(30, 1.0), seed(95, 1.0)];
        seeds[0].name = "Low".to_string();
        seeds[1].name = "High".to_string();
        let events = records(&seeds);
        let view = ViewState::new(Range::Day);
        let mut jitter = StillJitter;

        let plan = build_plan(&events, &view, center(), &mut jitter);

        // Probe just beyond the inner ring on the shared center angle
        let style = crate::projector::project(&events[0], None);
        let probe = crate::geometry::polar_point(
            center(),
            crate::geometry::INNER_RADIUS + 5.0,
            style.angle_deg,
        );

        let hit = hit_test(&plan, probe).expect("probe should land on a wedge");
        assert_eq!(hit.severity, 95);

        // A point far outside every wedge misses
        assert!(hit_test(&plan, pt2(-1000.0, -1000.0)).is_none());
    }
}

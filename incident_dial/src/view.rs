//! View state module - the lookback filter, selection, and pan/zoom controller
//!
//! `ViewState` is the single owner of all mutable view data; every mutation
//! goes through a method here so the scale clamp and the selection invariant
//! hold at the point of change.

use nannou::prelude::*;
use shared::EventRecord;

/// Scale clamp bounds
pub const MIN_SCALE: f32 = 0.7;
pub const MAX_SCALE: f32 = 5.0;

/// Multiplicative zoom step per wheel tick
pub const ZOOM_IN_FACTOR: f32 = 1.12;
pub const ZOOM_OUT_FACTOR: f32 = 0.89;

/// Lookback window used to filter incidents by age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    Day,
    FourDays,
    Month,
}

impl Range {
    pub const ALL: [Range; 3] = [Range::Day, Range::FourDays, Range::Month];

    /// Maximum incident age admitted by this window
    pub fn max_age_hours(self) -> f32 {
        match self {
            Range::Day => 24.0,
            Range::FourDays => 96.0,
            Range::Month => 720.0,
        }
    }

    /// Short key used on buttons and in the preferences file
    pub fn key(self) -> &'static str {
        match self {
            Range::Day => "24h",
            Range::FourDays => "4d",
            Range::Month => "month",
        }
    }

    /// Parse a preferences key, tolerating unknown values
    pub fn from_key(key: &str) -> Option<Range> {
        Range::ALL.iter().copied().find(|r| r.key() == key)
    }
}

/// Zoom intent carried by a wheel tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Pan gesture phase
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    /// `grab` is the pointer's start position minus the pan at that moment
    Dragging { grab: Vec2 },
}

/// The single mutable view-state instance, created once at startup
#[derive(Debug, Clone)]
pub struct ViewState {
    range: Range,
    selected_id: Option<String>,
    scale: f32,
    pan: Vec2,
    drag: DragPhase,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Range::Day)
    }
}

impl ViewState {
    pub fn new(range: Range) -> Self {
        Self {
            range,
            selected_id: None,
            scale: 1.0,
            pan: Vec2::ZERO,
            drag: DragPhase::Idle,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragPhase::Dragging { .. })
    }

    /// Whether an incident passes the active lookback filter
    pub fn is_visible(&self, event: &EventRecord) -> bool {
        event.age_hours <= self.range.max_age_hours()
    }

    /// Switch the lookback window
    ///
    /// The selection is cleared unconditionally, even when the selected
    /// incident would survive the new filter. Returns true if a selection
    /// was dropped so the caller can empty the detail panel.
    pub fn set_range(&mut self, range: Range) -> bool {
        self.range = range;
        self.selected_id.take().is_some()
    }

    /// Select an incident by id
    ///
    /// Ids that are unknown or filtered out under the active range are
    /// ignored; such requests can legitimately race a range change. Returns
    /// true if the selection actually changed.
    pub fn select_event(&mut self, id: &str, events: &[EventRecord]) -> bool {
        let visible = events.iter().any(|e| e.id == id && self.is_visible(e));
        if !visible || self.selected_id.as_deref() == Some(id) {
            return false;
        }
        self.selected_id = Some(id.to_string());
        true
    }

    /// Move the selection through the filtered set in store order
    ///
    /// `step` is +1 or -1; with no current selection the first (or last)
    /// visible incident is chosen. Returns true if the selection changed.
    pub fn select_neighbor(&mut self, step: i32, events: &[EventRecord]) -> bool {
        let visible: Vec<&EventRecord> =
            events.iter().filter(|e| self.is_visible(e)).collect();
        if visible.is_empty() {
            return false;
        }

        let len = visible.len() as i32;
        let current = self
            .selected_id
            .as_deref()
            .and_then(|id| visible.iter().position(|e| e.id == id));

        let next = match current {
            None => {
                if step >= 0 { 0 } else { len - 1 }
            }
            Some(idx) => (idx as i32 + step).rem_euclid(len),
        };

        let id = visible[next as usize].id.clone();
        let changed = self.selected_id.as_deref() != Some(id.as_str());
        self.selected_id = Some(id);
        changed
    }

    /// Clear the selection if it no longer names a visible incident
    ///
    /// Returns true if a stale selection was dropped.
    pub fn reconcile_selection(&mut self, events: &[EventRecord]) -> bool {
        let stale = match self.selected_id.as_deref() {
            Some(id) => !events.iter().any(|e| e.id == id && self.is_visible(e)),
            None => false,
        };
        if stale {
            self.selected_id = None;
        }
        stale
    }

    /// Apply one zoom step, clamping immediately
    ///
    /// Geometry is independent of zoom, so only the view transform changes.
    pub fn zoom(&mut self, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_IN_FACTOR,
            ZoomDirection::Out => ZOOM_OUT_FACTOR,
        };
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Start a pan gesture at the given pointer position
    pub fn begin_pan(&mut self, pointer: Vec2) {
        self.drag = DragPhase::Dragging {
            grab: pointer - self.pan,
        };
    }

    /// Recompute the pan from the current pointer position
    ///
    /// Idempotent for a fixed pointer position; a no-op outside a drag.
    /// Returns true if the pan moved.
    pub fn update_pan(&mut self, pointer: Vec2) -> bool {
        match self.drag {
            DragPhase::Dragging { grab } => {
                self.pan = pointer - grab;
                true
            }
            DragPhase::Idle => false,
        }
    }

    /// End the pan gesture; always safe
    pub fn end_pan(&mut self) {
        self.drag = DragPhase::Idle;
    }

    /// Return pan and zoom to their startup values
    pub fn reset_view(&mut self) {
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }
}

//! Incident Dial
//!
//! Renders a fixed set of time-stamped incidents as a radial clock-face
//! chart: each incident is a wedge whose angle encodes its local time-of-day
//! and whose length, spread, and haze density encode severity. Users filter
//! by lookback window, select a ray to inspect details, and pan/zoom the
//! chart.

mod drawing;
mod geometry;
mod projector;
mod rays;
mod ui;
mod view;

use chrono::Utc;
use chrono_tz::Tz;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::EventRecord;

use crate::drawing::{
    colors, draw_dial_face, draw_error_banner, draw_help_text, draw_rays, window_to_board, Layout,
};
use crate::rays::{build_plan, filtered_events, hit_test, HazeJitter, RandomJitter, StillJitter};
use crate::ui::{draw_detail_panel, draw_range_bar, draw_settings_panel};
use crate::view::{Range, ViewState, ZoomDirection};

const DEFAULT_TZ: &str = "America/Los_Angeles";

/// Accumulated trackpad pixels needed to trigger one zoom step
const ZOOM_THRESHOLD: f32 = 30.0;

fn main() {
    nannou::app(model).update(update).run();
}

/// Persisted preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    range_key: String,
    reduced_motion: bool,
    display_tz: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range_key: Range::Day.key().to_string(),
            reduced_motion: false,
            display_tz: DEFAULT_TZ.to_string(),
        }
    }
}

/// Application state
struct Model {
    /// Immutable incident records, derived once at startup
    events: Vec<EventRecord>,
    /// The single mutable view-state instance
    view: ViewState,
    /// Reduced motion preference (freezes haze jitter)
    reduced_motion: bool,
    /// Display timezone used at derivation
    display_tz: Tz,
    /// Accumulated trackpad scroll for zoom stepping
    scroll_accumulator: f32,
    /// Warning to display when startup degraded to defaults
    error_message: Option<String>,
    /// egui integration
    egui: Egui,
}

fn save_config(model: &Model) {
    let config = Config {
        range_key: model.view.range().key().to_string(),
        reduced_motion: model.reduced_motion,
        display_tz: model.display_tz.name().to_string(),
    };
    if let Err(e) = shared::save_config(&config) {
        eprintln!("Failed to save config: {}", e);
    }
}

/// Load seeds from the optional dataset file, falling back to the built-ins
fn load_dataset(error_message: &mut Option<String>) -> Vec<shared::EventSeed> {
    let path = match shared::dataset_path() {
        Some(path) if path.exists() => path,
        _ => return shared::builtin_seeds(),
    };

    match shared::load_seeds(&path) {
        Ok(seeds) if !seeds.is_empty() => seeds,
        Ok(_) => {
            eprintln!("Dataset file {} is empty; using built-in incidents", path.display());
            shared::builtin_seeds()
        }
        Err(e) => {
            eprintln!("Failed to load dataset {}: {}", path.display(), e);
            *error_message = Some("Could not read events.toml. Showing built-in incidents.".to_string());
            shared::builtin_seeds()
        }
    }
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Incident Dial")
        .size(1100, 700)
        .min_size(800, 560)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_wheel(mouse_wheel)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let mut error_message = None;

    // Load preferences
    let config: Config = match shared::load_config() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            error_message = Some("Preferences file unreadable; using defaults.".to_string());
            Config::default()
        }
    };

    let display_tz: Tz = config.display_tz.parse().unwrap_or_else(|_| {
        eprintln!("Invalid display timezone {:?}; using {}", config.display_tz, DEFAULT_TZ);
        DEFAULT_TZ.parse().unwrap()
    });

    let range = Range::from_key(&config.range_key).unwrap_or(Range::Day);

    // Reference "now" is captured once; ages never shift during the session
    let now = Utc::now();
    let seeds = load_dataset(&mut error_message);
    let events = shared::derive_records(&seeds, now, display_tz);

    Model {
        events,
        view: ViewState::new(range),
        reduced_motion: config.reduced_motion,
        display_tz,
        scroll_accumulator: 0.0,
        error_message,
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    // Drop any selection the active filter no longer admits before the
    // detail panel reads it
    model.view.reconcile_selection(&model.events);

    let shown_count = filtered_events(&model.events, &model.view).len();
    let total_count = model.events.len();
    let current_range = model.view.range();
    let selected: Option<EventRecord> = model
        .view
        .selected_id()
        .and_then(|id| model.events.iter().find(|e| e.id == id))
        .cloned();
    let mut reduced_motion = model.reduced_motion;

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let picked_range = draw_range_bar(&ctx, current_range, shown_count, total_count);
    draw_detail_panel(&ctx, selected.as_ref());
    let settings_changed = draw_settings_panel(&ctx, &mut reduced_motion);

    drop(ctx);

    if let Some(range) = picked_range {
        model.view.set_range(range);
        save_config(model);
    }

    if settings_changed {
        model.reduced_motion = reduced_motion;
        save_config(model);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(colors::BACKGROUND);

    let layout = Layout::calculate(window_rect);

    let mut random_jitter = RandomJitter;
    let mut still_jitter = StillJitter;
    let jitter: &mut dyn HazeJitter = if model.reduced_motion {
        &mut still_jitter
    } else {
        &mut random_jitter
    };

    let plan = build_plan(&model.events, &model.view, layout.center, jitter);

    draw_dial_face(&draw, &layout, &model.view);
    draw_rays(&draw, &plan, &layout, &model.view);
    draw_help_text(&draw, window_rect);

    if let Some(ref message) = model.error_message {
        draw_error_banner(&draw, message, window_rect);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match key {
        // Range shortcuts
        Key::Key1 => {
            model.view.set_range(Range::Day);
            save_config(model);
        }
        Key::Key2 => {
            model.view.set_range(Range::FourDays);
            save_config(model);
        }
        Key::Key3 => {
            model.view.set_range(Range::Month);
            save_config(model);
        }

        // Tab cycles the selection through the filtered set
        Key::Tab => {
            let step = if app.keys.mods.shift() { -1 } else { 1 };
            model.view.select_neighbor(step, &model.events);
        }

        // R toggles reduced motion
        Key::R => {
            model.reduced_motion = !model.reduced_motion;
            save_config(model);
        }

        // Home returns pan and zoom to their defaults
        Key::Home => {
            model.view.reset_view();
        }

        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }

    let pos = app.mouse.position();
    let layout = Layout::calculate(app.window_rect());

    // Hit test against the crisp layer; haze never takes clicks. Jitter only
    // touches the background, so a motionless plan is exact here.
    let mut jitter = StillJitter;
    let plan = build_plan(&model.events, &model.view, layout.center, &mut jitter);
    let board_point = window_to_board(pos, &layout, &model.view);

    if let Some(ray) = hit_test(&plan, board_point) {
        let id = ray.event_id.clone();
        model.view.select_event(&id, &model.events);
    }

    // A press also arms the pan gesture; a motionless click pans nothing
    model.view.begin_pan(pos);
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.view.end_pan();
    }
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.view.update_pan(pos);
}

fn mouse_wheel(_app: &App, model: &mut Model, delta: MouseScrollDelta, phase: TouchPhase) {
    if phase == TouchPhase::Ended || phase == TouchPhase::Cancelled {
        model.scroll_accumulator = 0.0;
        return;
    }

    match delta {
        MouseScrollDelta::LineDelta(_, y) => {
            // Discrete wheel: one step per tick
            if y > 0.0 {
                model.view.zoom(ZoomDirection::In);
            } else if y < 0.0 {
                model.view.zoom(ZoomDirection::Out);
            }
        }
        MouseScrollDelta::PixelDelta(pos) => {
            // Trackpad: accumulate until a step's worth of travel
            model.scroll_accumulator += pos.y as f32;

            if model.scroll_accumulator >= ZOOM_THRESHOLD {
                model.view.zoom(ZoomDirection::In);
                model.scroll_accumulator = 0.0;
            } else if model.scroll_accumulator <= -ZOOM_THRESHOLD {
                model.view.zoom(ZoomDirection::Out);
                model.scroll_accumulator = 0.0;
            }
        }
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle raw events for keyboard and mouse input
    model.egui.handle_raw_event(event);
}

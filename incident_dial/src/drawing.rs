//! Drawing module - dial face and ray layer rendering
//!
//! Consumes the render plan produced by the ray pipeline and draws it with
//! nannou's Draw API under the whole-chart pan/zoom transform.

use nannou::prelude::*;

use crate::geometry::{self, BOARD_RADIUS, INNER_RADIUS};
use crate::rays::RenderPlan;
use crate::view::ViewState;

/// Color palette for the incident dial
pub mod colors {
    use nannou::prelude::*;

    /// Deep background - near black with a cold cast
    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 10,
        green: 12,
        blue: 16,
        standard: std::marker::PhantomData,
    };

    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 235,
        green: 238,
        blue: 242,
        standard: std::marker::PhantomData,
    };

    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 150,
        green: 158,
        blue: 168,
        standard: std::marker::PhantomData,
    };

    /// Inner ring and hour ticks
    pub const FACE: Srgb<u8> = Srgb {
        red: 52,
        green: 62,
        blue: 76,
        standard: std::marker::PhantomData,
    };

    /// Low-severity end of the ray ramp - cold teal
    pub const RAY_CALM: Srgb<u8> = Srgb {
        red: 64,
        green: 160,
        blue: 180,
        standard: std::marker::PhantomData,
    };

    /// High-severity end of the ray ramp - hot signal red
    pub const RAY_SEVERE: Srgb<u8> = Srgb {
        red: 255,
        green: 84,
        blue: 56,
        standard: std::marker::PhantomData,
    };

    /// Selected ray outline
    pub const SELECTION: Srgb<u8> = Srgb {
        red: 255,
        green: 244,
        blue: 214,
        standard: std::marker::PhantomData,
    };
}

/// Window-space layout: chart center and the board-to-pixel fit
pub struct Layout {
    pub center: Point2,
    pub fit_scale: f32,
}

impl Layout {
    /// Fit the board to the window, leaving a small margin
    pub fn calculate(window_rect: Rect) -> Self {
        let min_dim = window_rect.w().min(window_rect.h());
        Layout {
            center: pt2(0.0, 0.0),
            fit_scale: (min_dim * 0.5 * 0.94) / BOARD_RADIUS,
        }
    }

    /// Combined board-to-window zoom for the current view state
    pub fn total_zoom(&self, view: &ViewState) -> f32 {
        self.fit_scale * view.scale()
    }
}

/// Map a board-space point into the window under the view transform
pub fn board_to_window(point: Point2, layout: &Layout, view: &ViewState) -> Point2 {
    geometry::apply_view_transform(point, view.pan(), layout.total_zoom(view), layout.center)
}

/// Map a window point back into board space for hit testing
pub fn window_to_board(point: Point2, layout: &Layout, view: &ViewState) -> Point2 {
    geometry::unapply_view_transform(point, view.pan(), layout.total_zoom(view), layout.center)
}

/// Interpolate the severity color ramp
fn ray_color(severity: u8) -> Srgb<u8> {
    let t = severity as f32 / 100.0;
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    srgb(
        lerp(colors::RAY_CALM.red, colors::RAY_SEVERE.red),
        lerp(colors::RAY_CALM.green, colors::RAY_SEVERE.green),
        lerp(colors::RAY_CALM.blue, colors::RAY_SEVERE.blue),
    )
}

/// Draw the dial face: inner ring plus 24 hour ticks, majors every 6 hours
pub fn draw_dial_face(draw: &Draw, layout: &Layout, view: &ViewState) {
    let zoom = layout.total_zoom(view);
    let ring_center = board_to_window(layout.center, layout, view);

    draw.ellipse()
        .xy(ring_center)
        .radius(INNER_RADIUS * zoom)
        .no_fill()
        .stroke(colors::FACE)
        .stroke_weight(1.5);

    for hour in 0..24u32 {
        let angle = geometry::angle_from_minutes(hour * 60);
        let is_major = hour % 6 == 0;
        let tick_len = if is_major { 14.0 } else { 7.0 };

        let inner = geometry::polar_point(layout.center, INNER_RADIUS - tick_len, angle);
        let outer = geometry::polar_point(layout.center, INNER_RADIUS, angle);

        draw.line()
            .start(board_to_window(inner, layout, view))
            .end(board_to_window(outer, layout, view))
            .weight(if is_major { 2.0 } else { 1.0 })
            .color(colors::FACE);

        if is_major {
            let label_pos =
                geometry::polar_point(layout.center, INNER_RADIUS - 36.0, angle);
            draw.text(&format!("{:02}", hour))
                .xy(board_to_window(label_pos, layout, view))
                .color(colors::TEXT_SECONDARY)
                .font_size(12)
                .w(40.0);
        }
    }
}

/// Draw both ray layers: haze behind, crisp wedges in front
pub fn draw_rays(draw: &Draw, plan: &RenderPlan, layout: &Layout, view: &ViewState) {
    for haze in &plan.background {
        let color = ray_color(haze.severity);
        let [a, b, c] = haze
            .points
            .map(|p| board_to_window(p, layout, view));

        draw.tri()
            .points(a, b, c)
            .color(srgba(color.red, color.green, color.blue, 26));
    }

    for ray in &plan.foreground {
        let color = ray_color(ray.severity);
        let [a, b, c] = ray
            .points
            .map(|p| board_to_window(p, layout, view));

        draw.tri()
            .points(a, b, c)
            .color(srgba(color.red, color.green, color.blue, 215));

        if ray.selected {
            draw.polyline()
                .weight(2.0)
                .points(vec![a, b, c, a])
                .color(colors::SELECTION);
        }
    }
}

/// Draw keyboard shortcuts help
pub fn draw_help_text(draw: &Draw, window_rect: Rect) {
    let help_lines = [
        "Click ray: inspect  |  Drag: pan  |  Wheel: zoom",
        "1/2/3: 24h / 4d / month  |  Tab: cycle rays  |  Home: reset view",
    ];

    let base_y = window_rect.bottom() + 44.0;

    for (i, line) in help_lines.iter().enumerate() {
        draw.text(line)
            .x_y(0.0, base_y + (help_lines.len() - 1 - i) as f32 * 16.0)
            .color(srgba(150u8, 158u8, 168u8, 120u8))
            .font_size(11)
            .w(560.0);
    }
}

/// Draw the warning banner for degraded startup (bad config or dataset)
pub fn draw_error_banner(draw: &Draw, message: &str, rect: Rect) {
    let banner_height = 40.0;
    let banner_rect = Rect::from_x_y_w_h(
        rect.x(),
        rect.top() - banner_height / 2.0,
        rect.w(),
        banner_height,
    );

    draw.rect()
        .xy(banner_rect.xy())
        .wh(banner_rect.wh())
        .color(srgb(80u8, 20u8, 20u8));

    draw.text(message)
        .xy(banner_rect.xy())
        .color(colors::TEXT_PRIMARY)
        .font_size(14)
        .w(banner_rect.w() - 20.0);
}

use crate::foundation::core::{Point, Rect, Vec2};
use crate::scene::model::{LOGO_POS_RANGE, LogoOverlay};

/// Preview logo width in percent of the container width.
///
/// Sized from `scale` alone. Export sizing uses the logo's natural pixel size.
pub fn preview_logo_width_percent(scale: f64) -> f64 {
    (scale * 30.0).max(8.0)
}

/// Drag state of the preview logo.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// Not dragging.
    #[default]
    Idle,
    /// Pointer is held; `offset` is pointer minus logo center at press time.
    Dragging {
        /// Container-relative pixel offset.
        offset: Vec2,
    },
}

/// Pointer input for [`LogoPositioner`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed over the logo.
    Press(Point),
    /// Pointer moved.
    Move(Point),
    /// Pointer released.
    Release,
    /// Pointer capture lost.
    Cancel,
}

/// Drives a [`LogoOverlay`]'s center from pointer events in container pixels.
///
/// All points are container-relative (origin at the container's top-left corner).
#[derive(Clone, Debug)]
pub struct LogoPositioner {
    container: Rect,
    enabled: bool,
    state: DragState,
}

impl LogoPositioner {
    /// New positioner over a container of the given pixel size.
    pub fn new(container_width: f64, container_height: f64, enabled: bool) -> Self {
        Self {
            container: Rect::new(0.0, 0.0, container_width.max(0.0), container_height.max(0.0)),
            enabled,
            state: DragState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether presses start a drag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Update the container size, e.g. after a resize. An ongoing drag continues.
    pub fn set_container(&mut self, width: f64, height: f64) {
        self.container = Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0));
    }

    /// Rendered logo center in container pixels.
    pub fn center_px(&self, logo: &LogoOverlay) -> Point {
        Point::new(
            logo.x / 100.0 * self.container.width(),
            logo.y / 100.0 * self.container.height(),
        )
    }

    /// Feed one event. Returns true when `logo` was changed.
    pub fn handle(&mut self, event: PointerEvent, logo: &mut LogoOverlay) -> bool {
        match (self.state, event) {
            (DragState::Idle, PointerEvent::Press(p)) => {
                if self.enabled && is_finite(p) {
                    self.state = DragState::Dragging {
                        offset: p - self.center_px(logo),
                    };
                }
                false
            }
            (DragState::Dragging { offset }, PointerEvent::Move(p)) => {
                if !is_finite(p) {
                    return false;
                }
                let (w, h) = (self.container.width(), self.container.height());
                if w <= 0.0 || h <= 0.0 {
                    return false;
                }
                let c = p - offset;
                let (lo, hi) = LOGO_POS_RANGE;
                logo.x = (c.x / w * 100.0).clamp(lo, hi);
                logo.y = (c.y / h * 100.0).clamp(lo, hi);
                true
            }
            (DragState::Dragging { .. }, PointerEvent::Release | PointerEvent::Cancel) => {
                self.state = DragState::Idle;
                false
            }
            _ => false,
        }
    }
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/interact/logo_drag.rs"]
mod tests;

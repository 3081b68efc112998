// Window view-model.
// Size, position, and pointer-capture state of the single draggable, resizable window.

use super::geometry::{Geometry, Size, WindowConstraints, centered};

/// A pointer location in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pointer delta reported by the resize grip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeDelta {
    pub delta_x: i32,
    pub delta_y: i32,
}

/// Which handle, if any, currently holds the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// No measurable host yet.
    Uninitialized,
    Idle,
    Dragging { anchor: Point },
    Resizing { anchor: Point },
}

/// State behind the rendered window.
///
/// Every mutation computes the whole next geometry before storing it, so a
/// reader between events never sees a half-applied size or position.
#[derive(Debug, Clone)]
pub struct WindowViewModel {
    constraints: WindowConstraints,
    geometry: Geometry,
    interaction: Interaction,
    mobile: bool,
    host: Size,
    viewport: Size,
}

impl Default for WindowViewModel {
    fn default() -> Self {
        Self::new(WindowConstraints::default())
    }
}

impl WindowViewModel {
    pub fn new(constraints: WindowConstraints) -> Self {
        Self {
            constraints,
            geometry: Geometry::default(),
            interaction: Interaction::Uninitialized,
            mobile: false,
            host: Size::default(),
            viewport: Size::default(),
        }
    }

    pub fn constraints(&self) -> &WindowConstraints {
        &self.constraints
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_initialized(&self) -> bool {
        self.interaction != Interaction::Uninitialized
    }

    pub fn is_mobile_view(&self) -> bool {
        self.mobile
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.interaction, Interaction::Resizing { .. })
    }

    /// Run initial sizing once the host can be measured.
    ///
    /// Does nothing while the host has no layout size, or once already mounted.
    pub fn mount(&mut self, host: Size, viewport: Size) {
        if self.is_initialized() || !host.is_measurable() {
            return;
        }

        let mobile = self.constraints.is_mobile(viewport);
        let size = self.constraints.initial_size(mobile, host, viewport);
        let (x, y) = centered(host, size);

        self.geometry = Geometry {
            width: size.width,
            height: size.height,
            x,
            y,
        };
        self.mobile = mobile;
        self.host = host;
        self.viewport = viewport;
        self.interaction = Interaction::Idle;
    }

    /// Pointer-down on the title bar.
    pub fn start_drag(&mut self, at: Point) {
        if self.interaction == Interaction::Idle {
            self.interaction = Interaction::Dragging { anchor: at };
        }
    }

    /// Pointer-down on the resize grip.
    pub fn start_resize(&mut self, at: Point) {
        if self.interaction == Interaction::Idle {
            self.interaction = Interaction::Resizing { anchor: at };
        }
    }

    /// Move the window by the drag gesture's delta. Ignored unless dragging.
    pub fn drag_move(&mut self, dx: i32, dy: i32) {
        if let Interaction::Dragging { anchor } = self.interaction {
            self.geometry.x = self.geometry.x.saturating_add(dx);
            self.geometry.y = self.geometry.y.saturating_add(dy);
            self.interaction = Interaction::Dragging {
                anchor: Point::new(anchor.x.saturating_add(dx), anchor.y.saturating_add(dy)),
            };
        }
    }

    /// Pointer-up: releases either a drag or a resize.
    pub fn end_drag(&mut self) {
        if matches!(
            self.interaction,
            Interaction::Dragging { .. } | Interaction::Resizing { .. }
        ) {
            self.interaction = Interaction::Idle;
        }
    }

    /// Grow or shrink the window by a pointer delta.
    ///
    /// Each axis is clamped on its own between the minimum and the current
    /// maximum. Position stays where it is.
    pub fn resize_by(&mut self, delta: ResizeDelta) {
        if !self.is_initialized() || self.is_dragging() {
            return;
        }

        let max = self
            .constraints
            .max_size(self.mobile, self.host, self.viewport);
        let size = self
            .constraints
            .resized(self.geometry.size(), delta.delta_x, delta.delta_y, max);

        self.geometry.width = size.width;
        self.geometry.height = size.height;

        if let Interaction::Resizing { anchor } = self.interaction {
            self.interaction = Interaction::Resizing {
                anchor: Point::new(
                    anchor.x.saturating_add(delta.delta_x),
                    anchor.y.saturating_add(delta.delta_y),
                ),
            };
        }
    }

    /// Reconcile with a new host or viewport size.
    ///
    /// Before mount this is the deferred initial sizing. Afterwards it shrinks
    /// the window under the new maximum and recenters it unless a drag is in
    /// progress. Interaction state is left untouched.
    pub fn on_viewport_change(&mut self, host: Size, viewport: Size) {
        if !self.is_initialized() {
            self.mount(host, viewport);
            return;
        }
        if !host.is_measurable() {
            return;
        }

        let mobile = self.constraints.is_mobile(viewport);
        let max = self.constraints.max_size(mobile, host, viewport);
        let size = self.constraints.fit_within(self.geometry.size(), max);
        let (x, y) = if self.is_dragging() {
            (self.geometry.x, self.geometry.y)
        } else {
            centered(host, size)
        };

        self.geometry = Geometry {
            width: size.width,
            height: size.height,
            x,
            y,
        };
        self.mobile = mobile;
        self.host = host;
        self.viewport = viewport;
    }
}

// Window geometry math.
// Pure sizing, clamping, and centering rules for the single editor window.

/// Width and height in layout units (pixels, or terminal cells for the desk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// A container is measurable once it has a non-zero layout size.
    pub fn is_measurable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Position and size of the window inside its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

impl Geometry {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Sizing policy for the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConstraints {
    pub min_width: i32,
    pub min_height: i32,
    /// Viewports narrower than this use the mobile policy.
    pub mobile_breakpoint: i32,
    /// Preferred desktop size.
    pub default_width: i32,
    pub default_height: i32,
    /// Gap kept between the window and the host edge on desktop.
    pub margin: i32,
    /// Share of the viewport the window may take on mobile.
    pub mobile_width_ratio: f64,
    pub mobile_height_ratio: f64,
}

impl Default for WindowConstraints {
    fn default() -> Self {
        Self {
            min_width: 320,
            min_height: 280,
            mobile_breakpoint: 768,
            default_width: 800,
            default_height: 600,
            margin: 40,
            mobile_width_ratio: 0.92,
            mobile_height_ratio: 0.75,
        }
    }
}

impl WindowConstraints {
    /// Policy scaled to terminal cells.
    pub fn terminal() -> Self {
        Self {
            min_width: 30,
            min_height: 10,
            mobile_breakpoint: 60,
            default_width: 80,
            default_height: 24,
            margin: 4,
            ..Self::default()
        }
    }

    pub fn is_mobile(&self, viewport: Size) -> bool {
        viewport.width < self.mobile_breakpoint
    }

    /// Largest size the window may grow to.
    pub fn max_size(&self, mobile: bool, host: Size, viewport: Size) -> Size {
        if mobile {
            Size::new(
                scale(viewport.width, self.mobile_width_ratio),
                scale(viewport.height, self.mobile_height_ratio),
            )
        } else {
            Size::new(host.width - self.margin, host.height - self.margin)
        }
    }

    /// Size used when the window is first shown.
    pub fn initial_size(&self, mobile: bool, host: Size, viewport: Size) -> Size {
        if mobile {
            Size::new(
                self.min_width.max(scale(viewport.width, self.mobile_width_ratio)),
                self.min_height.max(scale(viewport.height, self.mobile_height_ratio)),
            )
        } else {
            let max = self.max_size(false, host, viewport);
            Size::new(
                clamp_dimension(self.default_width, self.min_width, max.width),
                clamp_dimension(self.default_height, self.min_height, max.height),
            )
        }
    }

    /// Apply a pointer delta to `current`, keeping each axis within bounds.
    pub fn resized(&self, current: Size, delta_x: i32, delta_y: i32, max: Size) -> Size {
        Size::new(
            clamp_dimension(current.width.saturating_add(delta_x), self.min_width, max.width),
            clamp_dimension(current.height.saturating_add(delta_y), self.min_height, max.height),
        )
    }

    /// Shrink `current` to fit under `max`; never grows it.
    pub fn fit_within(&self, current: Size, max: Size) -> Size {
        let shrink = |value: i32, max: i32, min: i32| {
            if value > max { max.max(min) } else { value }
        };
        Size::new(
            shrink(current.width, max.width, self.min_width),
            shrink(current.height, max.height, self.min_height),
        )
    }
}

/// Top-left corner that centers `size` in `host`, never negative.
pub fn centered(host: Size, size: Size) -> (i32, i32) {
    let x = ((host.width - size.width) as f64 / 2.0).floor() as i32;
    let y = ((host.height - size.height) as f64 / 2.0).floor() as i32;
    (x.max(0), y.max(0))
}

/// Clamp into `[min, max]`; when the bounds cross, the minimum wins.
pub fn clamp_dimension(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

fn scale(value: i32, ratio: f64) -> i32 {
    (value as f64 * ratio).floor() as i32
}

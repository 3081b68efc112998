// Window view-model.
// Geometry rules and interaction state for the single emulated editor window.

pub mod geometry;
pub mod view_model;

pub use geometry::{Geometry, Size, WindowConstraints, centered, clamp_dimension};
pub use view_model::{Interaction, Point, ResizeDelta, WindowViewModel};

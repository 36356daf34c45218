//! Divider position for the before/after slider
//!
//! Two images are stacked: "after" fills the container, "before" sits on top
//! inside a clip window as wide as the divider position. The before image is
//! scaled back up inside that window by `100 / position` so it stays aligned
//! with the after image underneath.

/// Lowest divider position (before image fully hidden)
pub const MIN_POSITION: f32 = 0.0;
/// Highest divider position (before image fully shown)
pub const MAX_POSITION: f32 = 100.0;
/// Where the divider starts
pub const DEFAULT_POSITION: f32 = 50.0;

/// The single source of truth for the slider geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealController {
    position: f32,
}

/// Everything a renderer needs to lay out the two layers and the handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealLayout {
    /// Width of the clip window onto the before image, % of container width
    pub clip_width_percent: f32,
    /// Inverse scale for the before image inside the clip window.
    /// `None` at position 0: skip the before layer entirely.
    pub before_scale: Option<f32>,
    /// Horizontal offset of the divider handle, % of container width
    pub divider_offset_percent: f32,
}

impl Default for RevealController {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
        }
    }
}

impl RevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the divider to the nearest whole percent. Out-of-range input is
    /// clamped, NaN is ignored.
    pub fn set_position(&mut self, position: f32) {
        if position.is_nan() {
            return;
        }
        self.position = position.round().clamp(MIN_POSITION, MAX_POSITION);
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn clip_width_percent(&self) -> f32 {
        self.position
    }

    pub fn before_scale_factor(&self) -> Option<f32> {
        if self.position <= MIN_POSITION {
            None
        } else {
            Some(MAX_POSITION / self.position)
        }
    }

    pub fn divider_offset_percent(&self) -> f32 {
        self.position
    }

    pub fn layout(&self) -> RevealLayout {
        RevealLayout {
            clip_width_percent: self.clip_width_percent(),
            before_scale: self.before_scale_factor(),
            divider_offset_percent: self.divider_offset_percent(),
        }
    }
}

impl RevealLayout {
    /// Clip window width in pixels for a container `width` wide
    pub fn clip_width_px(&self, width: f32) -> f32 {
        width * self.clip_width_percent / MAX_POSITION
    }

    /// Width of the scaled before image inside the clip window, in pixels.
    /// Equal to the full container width whenever the layer is drawn.
    pub fn before_inset_width_px(&self, width: f32) -> Option<f32> {
        self.before_scale
            .map(|scale| self.clip_width_px(width) * scale)
    }

    pub fn divider_x_px(&self, width: f32) -> f32 {
        width * self.divider_offset_percent / MAX_POSITION
    }
}

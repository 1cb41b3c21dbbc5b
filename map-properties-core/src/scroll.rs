use crate::media::ParallaxState;

/// Saved parallax scroll position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Single slot holding the last saved scroll offset.
///
/// Lives only as long as the plugin context; it is never written into
/// save data, so a fresh run starts at (0, 0).
#[derive(Debug, Default)]
pub struct ScrollMemory {
    saved: ScrollOffset,
}

impl ScrollMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> ScrollOffset {
        self.saved
    }

    pub fn save(&mut self, live: &ParallaxState) {
        self.saved = ScrollOffset {
            x: live.x,
            y: live.y,
        };
        log::debug!("saved parallax position ({}, {})", live.x, live.y);
    }

    pub fn load(&self, live: &mut ParallaxState) {
        live.x = self.saved.x;
        live.y = self.saved.y;
        log::debug!("loaded parallax position ({}, {})", live.x, live.y);
    }
}

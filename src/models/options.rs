use crate::config::DEFAULT_RESOLUTION;

/// Per-call lookup settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeocodeOptions {
    /// Resolution used when converting coordinates to a cell. Clamped into the
    /// supported range; ignored by cell lookups.
    pub resolution: Option<u8>,

    /// Walk coarser ancestors when the starting cell has no entry.
    pub fallback: bool,

    /// Emit timing events at debug level. Never affects results.
    pub debug: bool,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self {
            resolution: None,
            fallback: true,
            debug: false,
        }
    }
}

impl GeocodeOptions {
    pub fn resolution(mut self, resolution: u8) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Requested conversion resolution, defaulted and clamped.
    pub fn effective_resolution(&self) -> u8 {
        crate::config::clamp_resolution(self.resolution.unwrap_or(DEFAULT_RESOLUTION))
    }
}

//! Pointer control configuration.

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::{pointer::PointerMapper, resolution::Resolution};

/// Settings of the pointer control loop.
///
/// Every field has a default, so a configuration file only needs to list the settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Camera resolution assumed for frames that don't report their own.
    pub camera: Resolution,
    /// Resolution of the screen the pointer moves on.
    pub screen: Resolution,
    /// Border of the camera frame (in pixels, on every side) that is not part of the trackpad.
    pub trackpad_margin: u32,
    /// Pointer smoothing factor. Must be greater than 1.0.
    pub lag_factor: f32,
    /// Scroll distance per frame while a scroll gesture is held.
    pub scroll_amount: i32,
    /// Mirror landmarks horizontally before processing them.
    pub mirror: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: Resolution::RES_VGA,
            screen: Resolution::RES_1080P,
            trackpad_margin: PointerMapper::DEFAULT_MARGIN,
            lag_factor: PointerMapper::DEFAULT_LAG_FACTOR,
            scroll_amount: PointerMapper::DEFAULT_SCROLL_AMOUNT,
            mirror: false,
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Checks that the settings describe a usable pointer mapping.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.lag_factor > 1.0,
            "lag factor must be greater than 1.0, got {}",
            self.lag_factor
        );
        ensure!(!self.screen.is_empty(), "screen resolution must not be empty");
        ensure!(!self.camera.is_empty(), "camera resolution must not be empty");
        let inset = u64::from(self.trackpad_margin) * 2;
        ensure!(
            inset < u64::from(self.camera.width()) && inset < u64::from(self.camera.height()),
            "trackpad margin of {}px leaves no usable area in a {} camera frame",
            self.trackpad_margin,
            self.camera
        );
        Ok(())
    }

    /// Creates the [`PointerMapper`] described by this configuration.
    ///
    /// # Panics
    ///
    /// This method panics if the lag factor is less than 1.0. Call [`Config::validate`] first.
    pub fn pointer_mapper(&self) -> PointerMapper {
        let mut mapper = PointerMapper::new(self.screen);
        mapper.set_margin(self.trackpad_margin);
        mapper.set_lag_factor(self.lag_factor);
        mapper.set_scroll_amount(self.scroll_amount);
        mapper
    }
}

//! User settings read by the ink engines.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default pen thickness.
pub const DEFAULT_DRAW_THICKNESS: f32 = 5.0;
/// Default eraser radius in page units.
pub const DEFAULT_ERASER_RADIUS: f32 = 10.0;
/// Smallest eraser radius.
pub const MIN_ERASER_RADIUS: f32 = 1.0;
/// Default number of palette slots shown in the toolbar.
pub const DEFAULT_VISIBLE_SLOTS: usize = 5;

/// Default palette, ARGB.
pub const DEFAULT_PALETTE: [u32; 12] = [
    0xFF00_0000, // black
    0xFFFF_0000, // red
    0xFF00_FF00, // green
    0xFF00_00FF, // blue
    0xFFFF_FF00, // yellow
    0xFF00_FFFF, // cyan
    0xFFFF_00FF, // magenta
    0xFF88_8888, // gray
    0xFFFF_A500, // orange
    0xFF80_0080, // purple
    0xFF00_8080, // teal
    0xFFFF_FFFF, // white
];

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Accessors the engines use to read the current tool settings.
pub trait SettingsProvider {
    fn draw_thickness(&self) -> f32;
    fn eraser_radius(&self) -> f32;
    /// Active ink colour as ARGB widened to 64 bits.
    fn current_color(&self) -> u64;
}

/// Persisted tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub draw_thickness: f32,
    eraser_radius: f32,
    palette: Vec<u32>,
    current_color_index: usize,
    visible_color_slots: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_thickness: DEFAULT_DRAW_THICKNESS,
            eraser_radius: DEFAULT_ERASER_RADIUS,
            palette: DEFAULT_PALETTE.to_vec(),
            current_color_index: 0,
            visible_color_slots: DEFAULT_VISIBLE_SLOTS,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.normalize();
        Ok(settings)
    }

    /// Write settings as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn set_eraser_radius(&mut self, radius: f32) {
        self.eraser_radius = radius.max(MIN_ERASER_RADIUS);
    }

    pub fn palette(&self) -> &[u32] {
        &self.palette
    }

    pub fn current_color_index(&self) -> usize {
        self.current_color_index
    }

    /// Select a palette slot. Out-of-range indices are clamped.
    pub fn set_current_color_index(&mut self, index: usize) {
        self.current_color_index = index.min(self.palette.len().saturating_sub(1));
    }

    /// Replace the colour of a palette slot. Returns false for an unknown slot.
    pub fn set_palette_color(&mut self, index: usize, argb: u32) -> bool {
        match self.palette.get_mut(index) {
            Some(slot) => {
                *slot = argb;
                true
            }
            None => false,
        }
    }

    pub fn visible_color_slots(&self) -> usize {
        self.visible_color_slots
    }

    pub fn set_visible_color_slots(&mut self, count: usize) {
        self.visible_color_slots = count.max(1);
    }

    fn normalize(&mut self) {
        if self.palette.is_empty() {
            self.palette = DEFAULT_PALETTE.to_vec();
        }
        self.eraser_radius = self.eraser_radius.max(MIN_ERASER_RADIUS);
        self.visible_color_slots = self.visible_color_slots.max(1);
        self.set_current_color_index(self.current_color_index);
    }
}

impl SettingsProvider for Settings {
    fn draw_thickness(&self) -> f32 {
        self.draw_thickness
    }

    fn eraser_radius(&self) -> f32 {
        self.eraser_radius
    }

    fn current_color(&self) -> u64 {
        self.palette
            .get(self.current_color_index)
            .copied()
            .unwrap_or(DEFAULT_PALETTE[0]) as u64
    }
}

//! Game settings and asset references
//!
//! Each setting lives under its own `runner:setting:<key>` entry as JSON so
//! the config panel can update keys independently. The simulation only ever
//! sees an immutable `Settings` snapshot.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Tuning snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Billboard top edge (px from top), drives the jump cap
    pub billboard_offset: f32,
    /// Base scroll speed (px/s)
    pub obstacle_speed: f32,
    /// 0..=100, lower means larger gaps between obstacles
    pub obstacle_spacing: f32,
    /// Scale jump compensation by width instead of height
    pub width_scale: bool,
    /// Desired apex height (px) before scale compensation
    pub jump_height: f32,
    /// Floor of the width -> gravity curve
    pub min_gravity_mult: f32,
    /// Global gravity multiplier
    pub gravity_global_mult: f32,
    /// Diagnostic overlay
    pub show_physics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            billboard_offset: 80.0,
            obstacle_speed: 160.0,
            obstacle_spacing: 50.0,
            width_scale: false,
            jump_height: 120.0,
            min_gravity_mult: 0.45,
            gravity_global_mult: 1.0,
            show_physics: false,
        }
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

impl Settings {
    const KEY_PREFIX: &'static str = "runner:setting:";

    fn key(name: &str) -> String {
        format!("{}{}", Self::KEY_PREFIX, name)
    }

    /// Base scroll speed, negative treated as stopped
    pub fn scroll_base_speed(&self) -> f32 {
        finite_or(self.obstacle_speed, 160.0).max(0.0)
    }

    pub fn spacing_percent(&self) -> f32 {
        finite_or(self.obstacle_spacing, 50.0).clamp(0.0, 100.0)
    }

    pub fn jump_height(&self) -> f32 {
        finite_or(self.jump_height, 120.0).max(0.0)
    }

    pub fn billboard_offset(&self) -> f32 {
        finite_or(self.billboard_offset, 80.0)
    }

    pub fn min_gravity_mult(&self) -> f32 {
        finite_or(self.min_gravity_mult, 0.45).clamp(0.0, 1.0)
    }

    pub fn gravity_global_mult(&self) -> f32 {
        finite_or(self.gravity_global_mult, 1.0).max(0.0)
    }

    /// Restore gameplay defaults (leaves billboard and gravity tuning alone)
    pub fn reset_gameplay(&mut self) {
        let defaults = Self::default();
        self.obstacle_speed = defaults.obstacle_speed;
        self.obstacle_spacing = defaults.obstacle_spacing;
        self.width_scale = defaults.width_scale;
        self.jump_height = defaults.jump_height;
    }

    /// Read every key from the store. Missing or unreadable keys keep their default.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = Self::default();
        read_into(store, "billboardOffset", &mut settings.billboard_offset);
        read_into(store, "obstacleSpeed", &mut settings.obstacle_speed);
        read_into(store, "obstacleSpacing", &mut settings.obstacle_spacing);
        read_into(store, "widthScale", &mut settings.width_scale);
        read_into(store, "jumpHeight", &mut settings.jump_height);
        read_into(store, "minGravityMult", &mut settings.min_gravity_mult);
        read_into(store, "gravityGlobalMult", &mut settings.gravity_global_mult);
        read_into(store, "showPhysics", &mut settings.show_physics);
        settings
    }

    /// Write every key to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, &Self::key("billboardOffset"), &self.billboard_offset)?;
        save_json(store, &Self::key("obstacleSpeed"), &self.obstacle_speed)?;
        save_json(store, &Self::key("obstacleSpacing"), &self.obstacle_spacing)?;
        save_json(store, &Self::key("widthScale"), &self.width_scale)?;
        save_json(store, &Self::key("jumpHeight"), &self.jump_height)?;
        save_json(store, &Self::key("minGravityMult"), &self.min_gravity_mult)?;
        save_json(store, &Self::key("gravityGlobalMult"), &self.gravity_global_mult)?;
        save_json(store, &Self::key("showPhysics"), &self.show_physics)?;
        log::info!("Settings saved");
        Ok(())
    }
}

fn read_into<T: DeserializeOwned>(store: &dyn KeyValueStore, name: &str, slot: &mut T) {
    match load_json::<T>(store, &Settings::key(name)) {
        Ok(Some(value)) => *slot = value,
        Ok(None) => {}
        Err(e) => log::warn!("Ignoring setting {}: {}", name, e),
    }
}

/// Opaque image references (data URLs). Never decoded here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetHandles {
    pub billboard_left: Option<String>,
    pub billboard_center: Option<String>,
    pub billboard_right: Option<String>,
    pub background: Option<String>,
}

impl AssetHandles {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let get = |key: &str| match store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Could not read asset {}: {}", key, e);
                None
            }
        };
        Self {
            billboard_left: get("billboard:left"),
            billboard_center: get("billboard:center"),
            billboard_right: get("billboard:right"),
            background: get("background:image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_defaults_from_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_load_keys() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            obstacle_speed: 220.0,
            width_scale: true,
            jump_height: 150.0,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(
            store.get("runner:setting:obstacleSpeed").unwrap().as_deref(),
            Some("220.0")
        );
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set("runner:setting:jumpHeight", "\"tall\"").unwrap();
        store.set("runner:setting:obstacleSpeed", "not json").unwrap();
        store.set("runner:setting:obstacleSpacing", "80").unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.jump_height, 120.0);
        assert_eq!(settings.obstacle_speed, 160.0);
        assert_eq!(settings.obstacle_spacing, 80.0);
    }

    #[test]
    fn test_sanitizing_accessors() {
        let settings = Settings {
            obstacle_speed: -40.0,
            obstacle_spacing: 130.0,
            jump_height: -5.0,
            min_gravity_mult: 3.0,
            gravity_global_mult: f32::NAN,
            ..Default::default()
        };
        assert_eq!(settings.scroll_base_speed(), 0.0);
        assert_eq!(settings.spacing_percent(), 100.0);
        assert_eq!(settings.jump_height(), 0.0);
        assert_eq!(settings.min_gravity_mult(), 1.0);
        assert_eq!(settings.gravity_global_mult(), 1.0);
    }

    #[test]
    fn test_reset_gameplay() {
        let mut settings = Settings {
            obstacle_speed: 400.0,
            jump_height: 10.0,
            gravity_global_mult: 0.5,
            ..Default::default()
        };
        settings.reset_gameplay();
        assert_eq!(settings.obstacle_speed, 160.0);
        assert_eq!(settings.jump_height, 120.0);
        assert_eq!(settings.gravity_global_mult, 0.5);
    }

    #[test]
    fn test_asset_handles_pass_through() {
        let mut store = MemoryStore::new();
        store.set("billboard:left", "data:image/png;base64,AAAA").unwrap();
        store.set("background:image", "").unwrap();
        let assets = AssetHandles::load(&store);
        assert_eq!(assets.billboard_left.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(assets.billboard_center, None);
        assert_eq!(assets.background, None);
    }
}

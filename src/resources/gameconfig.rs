//! Game configuration resource.
//!
//! Tuning values for strokes, physics, zones and gears, loaded from an INI
//! file. Defaults are safe to run with when the file is missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [stroke]
//! thickness = 0.25
//! min_point_distance = 0.05
//! uv_scale = 3.0
//!
//! [physics]
//! gravity_x = 0
//! gravity_y = -9.81
//! gravity_scale = 1.0
//! friction = 0.4
//! bounciness = 0.05
//! density = 1.0
//! fixed_timestep = 0.02
//! max_substeps = 8
//!
//! [zone]
//! fade_out = true
//! fade_duration = 0.25
//!
//! [gear]
//! max_pins = 1
//! break_force = 0
//! break_torque = 0
//! down_impulse = 0.02
//!
//! [layers]
//! draw_zone = DrawArea
//! line = Line
//! gear = Gear
//! lift = Lift
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

use crate::components::collider::PhysicsMaterial;
use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_THICKNESS: f32 = 0.25;
const DEFAULT_MIN_POINT_DISTANCE: f32 = 0.05;
const DEFAULT_UV_SCALE: f32 = 3.0;
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.81);
const DEFAULT_GRAVITY_SCALE: f32 = 1.0;
const DEFAULT_FRICTION: f32 = 0.4;
const DEFAULT_BOUNCINESS: f32 = 0.05;
const DEFAULT_DENSITY: f32 = 1.0;
const DEFAULT_FIXED_TIMESTEP: f32 = 0.02;
const DEFAULT_MAX_SUBSTEPS: u32 = 8;
const DEFAULT_FADE_OUT: bool = true;
const DEFAULT_FADE_DURATION: f32 = 0.25;
const DEFAULT_MAX_PINS: usize = 1;
const DEFAULT_DOWN_IMPULSE: f32 = 0.02;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Layer names that the scene uses for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNames {
    pub draw_zone: String,
    pub line: String,
    pub gear: String,
    pub lift: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            draw_zone: "DrawArea".to_string(),
            line: "Line".to_string(),
            gear: "Gear".to_string(),
            lift: "Lift".to_string(),
        }
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Full ribbon width in world units.
    pub thickness: f32,
    /// Samples closer than this to the previous one are dropped.
    pub min_point_distance: f32,
    pub uv_scale: f32,
    pub gravity: Vec2,
    /// Gravity multiplier given to finalized strokes.
    pub gravity_scale: f32,
    pub friction: f32,
    pub bounciness: f32,
    /// Mass per unit area of stroke bodies.
    pub density: f32,
    pub fixed_timestep: f32,
    /// Upper bound of physics steps per frame.
    pub max_substeps: u32,
    /// Fade the zone out on release instead of hiding it at once.
    pub fade_out: bool,
    pub fade_duration: f32,
    pub max_pins: usize,
    /// `<= 0` means unbreakable.
    pub break_force: f32,
    /// `<= 0` means unbreakable.
    pub break_torque: f32,
    pub down_impulse: f32,
    pub layers: LayerNames,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
            min_point_distance: DEFAULT_MIN_POINT_DISTANCE,
            uv_scale: DEFAULT_UV_SCALE,
            gravity: DEFAULT_GRAVITY,
            gravity_scale: DEFAULT_GRAVITY_SCALE,
            friction: DEFAULT_FRICTION,
            bounciness: DEFAULT_BOUNCINESS,
            density: DEFAULT_DENSITY,
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            fade_out: DEFAULT_FADE_OUT,
            fade_duration: DEFAULT_FADE_DURATION,
            max_pins: DEFAULT_MAX_PINS,
            break_force: 0.0,
            break_torque: 0.0,
            down_impulse: DEFAULT_DOWN_IMPULSE,
            layers: LayerNames::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|message| ConfigError::Ini {
            path: self.config_path.clone(),
            message,
        })?;
        self.apply_ini(&config)?;

        info!(
            "Loaded config from {:?}: thickness={}, gravity={:?}, step={}s, max_pins={}",
            self.config_path, self.thickness, self.gravity, self.fixed_timestep, self.max_pins
        );
        Ok(())
    }

    /// Load configuration from INI text (used by tests and embedded defaults).
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(|message| ConfigError::Ini {
            path: self.config_path.clone(),
            message,
        })?;
        self.apply_ini(&config)
    }

    fn apply_ini(&mut self, config: &Ini) -> Result<(), ConfigError> {
        // [stroke] section
        if let Some(v) = float(config, "stroke", "thickness") {
            self.thickness = positive("stroke.thickness", v)?;
        }
        if let Some(v) = float(config, "stroke", "min_point_distance") {
            self.min_point_distance = v.max(0.0);
        }
        if let Some(v) = float(config, "stroke", "uv_scale") {
            self.uv_scale = v;
        }

        // [physics] section
        if let Some(v) = float(config, "physics", "gravity_x") {
            self.gravity.x = v;
        }
        if let Some(v) = float(config, "physics", "gravity_y") {
            self.gravity.y = v;
        }
        if let Some(v) = float(config, "physics", "gravity_scale") {
            self.gravity_scale = v;
        }
        if let Some(v) = float(config, "physics", "friction") {
            self.friction = v;
        }
        if let Some(v) = float(config, "physics", "bounciness") {
            self.bounciness = v;
        }
        if let Some(v) = float(config, "physics", "density") {
            self.density = positive("physics.density", v)?;
        }
        if let Some(v) = float(config, "physics", "fixed_timestep") {
            self.fixed_timestep = positive("physics.fixed_timestep", v)?;
        }
        if let Some(v) = config.getuint("physics", "max_substeps").ok().flatten() {
            self.max_substeps = (v as u32).max(1);
        }

        // [zone] section
        if let Some(v) = config.getbool("zone", "fade_out").ok().flatten() {
            self.fade_out = v;
        }
        if let Some(v) = float(config, "zone", "fade_duration") {
            self.fade_duration = v;
        }

        // [gear] section
        if let Some(v) = config.getuint("gear", "max_pins").ok().flatten() {
            self.max_pins = v as usize;
        }
        if let Some(v) = float(config, "gear", "break_force") {
            self.break_force = v;
        }
        if let Some(v) = float(config, "gear", "break_torque") {
            self.break_torque = v;
        }
        if let Some(v) = float(config, "gear", "down_impulse") {
            self.down_impulse = v;
        }

        // [layers] section
        if let Some(v) = config.get("layers", "draw_zone") {
            self.layers.draw_zone = v;
        }
        if let Some(v) = config.get("layers", "line") {
            self.layers.line = v;
        }
        if let Some(v) = config.get("layers", "gear") {
            self.layers.gear = v;
        }
        if let Some(v) = config.get("layers", "lift") {
            self.layers.lift = v;
        }
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        config.set("stroke", "thickness", Some(self.thickness.to_string()));
        config.set(
            "stroke",
            "min_point_distance",
            Some(self.min_point_distance.to_string()),
        );
        config.set("stroke", "uv_scale", Some(self.uv_scale.to_string()));

        config.set("physics", "gravity_x", Some(self.gravity.x.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity.y.to_string()));
        config.set("physics", "gravity_scale", Some(self.gravity_scale.to_string()));
        config.set("physics", "friction", Some(self.friction.to_string()));
        config.set("physics", "bounciness", Some(self.bounciness.to_string()));
        config.set("physics", "density", Some(self.density.to_string()));
        config.set("physics", "fixed_timestep", Some(self.fixed_timestep.to_string()));
        config.set("physics", "max_substeps", Some(self.max_substeps.to_string()));

        config.set("zone", "fade_out", Some(self.fade_out.to_string()));
        config.set("zone", "fade_duration", Some(self.fade_duration.to_string()));

        config.set("gear", "max_pins", Some(self.max_pins.to_string()));
        config.set("gear", "break_force", Some(self.break_force.to_string()));
        config.set("gear", "break_torque", Some(self.break_torque.to_string()));
        config.set("gear", "down_impulse", Some(self.down_impulse.to_string()));

        config.set("layers", "draw_zone", Some(self.layers.draw_zone.clone()));
        config.set("layers", "line", Some(self.layers.line.clone()));
        config.set("layers", "gear", Some(self.layers.gear.clone()));
        config.set("layers", "lift", Some(self.layers.lift.clone()));

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Io {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Surface material given to finalized strokes.
    pub fn stroke_material(&self) -> PhysicsMaterial {
        PhysicsMaterial {
            friction: self.friction,
            bounciness: self.bounciness,
        }
    }
}

fn float(config: &Ini, section: &str, key: &str) -> Option<f32> {
    config.getfloat(section, key).ok().flatten().map(|v| v as f32)
}

fn positive(key: &str, value: f32) -> Result<f32, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`KH_SECTION__KEY`)

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use keyhunt_core::{CollisionLayer, Material, Projection, Vec2, Vec3};
use keyhunt_gameplay::{FollowCameraSettings, PlayerSettings};
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`KH_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // KH_PLAYER__SPEED=4 -> player.speed = 4
        figment = figment.merge(Env::prefixed("KH_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Main camera projection for the configured viewport
    pub fn projection(&self) -> Projection {
        Projection::new(
            self.camera.fov,
            Vec2::new(self.window.width as f32, self.window.height as f32),
            self.camera.near,
            self.camera.far,
        )
    }
}

/// Window configuration
///
/// Only the viewport size matters to the headless host; it is what cursor
/// positions are measured against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Keyhunt".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Follow camera and projection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the player in the player's local axes [x, y, z]
    pub offset: [f32; 3],
    /// Smoothing time in seconds (clamped to [0.01, 1.0])
    pub smooth_time: f32,
    pub probe_radius: f32,
    pub collision_buffer: f32,
    /// Collision layer names treated as walls
    pub wall_layers: Vec<String>,
    pub look_height: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 3.0, -6.0],
            smooth_time: 0.05,
            probe_radius: 0.3,
            collision_buffer: 0.2,
            wall_layers: vec!["WALL".to_string()],
            look_height: 1.5,
            fov: 60.0,
            near: 0.3,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    pub fn offset(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }

    pub fn to_follow_settings(&self) -> FollowCameraSettings {
        FollowCameraSettings {
            offset: self.offset(),
            smooth_time: self.smooth_time,
            probe_radius: self.probe_radius,
            collision_buffer: self.collision_buffer,
            wall_mask: CollisionLayer::from_names(&self.wall_layers),
            look_height: self.look_height,
        }
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement speed (units per second)
    pub speed: f32,
    pub rotation_speed: f32,
    /// Collision sphere radius
    pub radius: f32,
    /// Key that collects an item in range
    pub action_key: KeyCode,
    pub pickup_tag: String,
    /// Highlight colour of an item in range [r, g, b, a]
    pub highlight_color: [f32; 4],
    pub prompt_text: String,
    pub win_scene: String,
    /// Seconds between collecting and loading the win scene
    pub win_delay: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            rotation_speed: 1.5,
            radius: 0.5,
            action_key: KeyCode::Space,
            pickup_tag: "Key".to_string(),
            highlight_color: [0.0, 0.0, 1.0, 1.0],
            prompt_text: "Press SPACE to collect the key and win the game!".to_string(),
            win_scene: "WinScene".to_string(),
            win_delay: 1.0,
        }
    }
}

impl PlayerConfig {
    pub fn to_player_settings(&self) -> PlayerSettings {
        let [r, g, b, a] = self.highlight_color;
        PlayerSettings {
            speed: self.speed,
            rotation_speed: self.rotation_speed,
            action_key: self.action_key,
            pickup_tag: self.pickup_tag.clone(),
            highlight: Material::new(r, g, b, a),
            prompt_text: self.prompt_text.clone(),
            win_scene: self.win_scene.clone(),
            win_delay: Duration::try_from_secs_f32(self.win_delay).unwrap_or_else(|_| {
                log::warn!("Invalid win_delay {}, using 1s", self.win_delay);
                Duration::from_secs(1)
            }),
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity (negative = downward)
    pub gravity: f32,
    /// Fixed physics step in seconds
    pub fixed_timestep: f32,
    /// Maximum fixed steps per display frame
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            fixed_timestep: 0.02,
            max_substeps: 8,
        }
    }
}

impl PhysicsConfig {
    pub fn to_physics_config(&self) -> keyhunt_core::PhysicsConfig {
        keyhunt_core::PhysicsConfig::new(self.gravity)
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RON level to load instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Where the player starts [x, y, z]
    pub player_spawn: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: None,
            player_spawn: [0.0, 0.5, 0.0],
        }
    }
}

impl SceneConfig {
    pub fn player_spawn(&self) -> Vec3 {
        Vec3::from_array(self.player_spawn)
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(#[from] figment::Error);

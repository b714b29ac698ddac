//! Gameplay tuning
//!
//! Every number that shapes how the game feels lives here, grouped the way
//! the systems consume it. Files are RON; any field left out falls back to
//! the defaults below, so a tuning file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::enemy::EnemyKind;

/// Error type for tuning files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

// =============================================================================
// Physics
// =============================================================================

/// Actor physics and tile collision tolerances (pixels, seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Maximum falling speed (px/s)
    pub terminal_velocity: f32,
    /// Tallest ledge an actor climbs without jumping
    pub max_step_height: f32,
    /// Horizontal inset of the foot/ceiling sample columns
    pub foot_inset: f32,
    /// Vertical inset of the head sample row
    pub head_inset: f32,
    /// Vertical inset of the feet sample row used by wall checks
    pub feet_sample_inset: f32,
    /// How far below the feet a grounded actor still sticks to the floor
    pub grounded_snap: f32,
    /// How far below the feet an airborne actor at rest vertically snaps
    pub airborne_snap: f32,
    /// A falling actor only lands once the gap reaches this value
    pub fall_snap_threshold: f32,
    /// Look-ahead time used to sample ground ahead of a running actor
    pub lookahead_window: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            terminal_velocity: 600.0,
            max_step_height: 16.0,
            foot_inset: 4.0,
            head_inset: 1.0,
            feet_sample_inset: 4.0,
            grounded_snap: 8.0,
            airborne_snap: 2.0,
            fall_snap_threshold: -0.5,
            lookahead_window: 0.05,
        }
    }
}

// =============================================================================
// Player
// =============================================================================

/// How the roll avoids damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollMode {
    /// Collider moves to a layer enemies never check against
    PassThrough,
    /// Collider stays, damage is ignored
    Invulnerable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollTuning {
    pub duration: f32,
    pub speed: f32,
    pub mode: RollMode,
}

impl Default for RollTuning {
    fn default() -> Self {
        Self {
            duration: 0.4,
            speed: 300.0,
            mode: RollMode::PassThrough,
        }
    }
}

/// Basic 8-directional melee swing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub duration: f32,
    /// Peak lunge speed at the start of the swing
    pub lunge_speed: f32,
    /// Time for the lunge to decay to zero
    pub lunge_duration: f32,
    pub damage: i32,
    pub knockback: f32,
    /// Long side of the hitbox
    pub reach: f32,
    /// Short side of the hitbox
    pub thickness: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            duration: 0.3,
            lunge_speed: 800.0,
            lunge_duration: 0.15,
            damage: 25,
            knockback: 150.0,
            reach: 82.0 * 3.0,
            thickness: 20.0 * 3.0,
        }
    }
}

/// Dash Strike: timed skill-check, then a homing dash at a locked target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashStrikeTuning {
    pub aim_time_scale: f32,
    /// Bar fill per real second
    pub bar_speed: f32,
    pub sweet_spot_start: f32,
    pub sweet_spot_end: f32,
    pub speed: f32,
    /// Targets further than this are never locked
    pub max_range: f32,
    pub arrival_radius: f32,
    pub damage: i32,
    pub knockback: f32,
    pub hitbox_size: f32,
    pub hitbox_life: f32,
    pub cooldown: f32,
}

impl Default for DashStrikeTuning {
    fn default() -> Self {
        Self {
            aim_time_scale: 0.5,
            bar_speed: 0.67,
            sweet_spot_start: 0.70,
            sweet_spot_end: 0.80,
            speed: 600.0,
            max_range: 300.0,
            arrival_radius: 30.0,
            damage: 30,
            knockback: 200.0,
            hitbox_size: 60.0,
            hitbox_life: 0.1,
            cooldown: 1.0,
        }
    }
}

/// Dream state and the Dream Slash blink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DreamTuning {
    pub speed_multiplier: f32,
    pub meter_max: f32,
    pub meter_per_hit: f32,
    pub aim_time_scale: f32,
    /// Real seconds before an unreleased aim gives up
    pub max_aim_time: f32,
    pub max_distance: f32,
    pub blink_speed: f32,
    pub damage: i32,
    pub knockback: f32,
    pub hitbox_size: f32,
    pub cost: f32,
    pub cooldown: f32,
}

impl Default for DreamTuning {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.5,
            meter_max: 100.0,
            meter_per_hit: 10.0,
            aim_time_scale: 0.12,
            max_aim_time: 2.0,
            max_distance: 300.0,
            blink_speed: 800.0,
            damage: 20,
            knockback: 100.0,
            hitbox_size: 50.0,
            cost: 35.0,
            cooldown: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    /// Run speed (px/s)
    pub speed: f32,
    /// Seconds of immunity after taking a hit
    pub damage_cooldown: f32,
    /// Upward impulse applied by Jump (px/s, positive number)
    pub jump_velocity: f32,
    /// Airborne frames tolerated before Fall takes over
    pub coyote_frames: u32,
    /// Per-tick horizontal decay in the air without input
    pub air_friction: f32,
    pub roll: RollTuning,
    pub attack: AttackTuning,
    pub dash_strike: DashStrikeTuning,
    pub dream: DreamTuning,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
            health: 100,
            speed: 220.0,
            damage_cooldown: 0.3,
            jump_velocity: 550.0,
            coyote_frames: 6,
            air_friction: 0.9,
            roll: RollTuning::default(),
            attack: AttackTuning::default(),
            dash_strike: DashStrikeTuning::default(),
            dream: DreamTuning::default(),
        }
    }
}

// =============================================================================
// Enemies
// =============================================================================

/// What an enemy does once its attack cooldown is ready
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyAttack {
    /// Short-lived hitbox in front of the enemy
    Melee {
        damage: i32,
        knockback: f32,
        width: f32,
        height: f32,
        life: f32,
    },
    /// Projectile aimed at the player's center
    Ranged {
        damage: i32,
        radius: f32,
        speed: f32,
        /// Seconds before expiry; None = until it hits something
        life: Option<f32>,
        /// Extra vertical offset of the muzzle
        spawn_y_offset: f32,
    },
}

/// Tunables for one enemy kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub speed: f32,
    /// Damage dealt to the player on body contact (0 = harmless body)
    pub contact_damage: i32,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Vertical "same floor" window
    pub vertical_awareness: f32,
    /// Same-floor window while either party stands on a slope
    pub stair_vertical_awareness: f32,
    /// Stationary shooter: only engages with a level line of fire
    pub turret_aim_tolerance: Option<f32>,
    pub attack: EnemyAttack,
}

impl EnemyProfile {
    pub fn brute() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            health: 50,
            speed: 60.0,
            contact_damage: 10,
            aggro_range: 320.0,
            attack_range: 40.0,
            attack_cooldown: 1.0,
            vertical_awareness: 64.0,
            stair_vertical_awareness: 160.0,
            turret_aim_tolerance: None,
            attack: EnemyAttack::Melee {
                damage: 10,
                knockback: 80.0,
                width: 40.0,
                height: 32.0,
                life: 0.2,
            },
        }
    }

    pub fn grunt() -> Self {
        Self {
            health: 55,
            speed: 35.0,
            attack: EnemyAttack::Melee {
                damage: 12,
                knockback: 80.0,
                width: 40.0,
                height: 32.0,
                life: 0.2,
            },
            ..Self::brute()
        }
    }

    pub fn scientist() -> Self {
        let speed = 30.0;
        Self {
            health: 40,
            speed,
            contact_damage: 0,
            attack_range: 260.0,
            attack_cooldown: 2.0,
            attack: EnemyAttack::Ranged {
                damage: 5,
                radius: 3.0,
                speed: speed * 12.0,
                life: None,
                spawn_y_offset: 0.0,
            },
            ..Self::brute()
        }
    }

    pub fn gangster() -> Self {
        Self {
            speed: 0.0,
            aggro_range: 760.0,
            attack_range: 760.0,
            attack_cooldown: 0.25,
            vertical_awareness: 500.0,
            stair_vertical_awareness: 500.0,
            turret_aim_tolerance: Some(56.0),
            attack: EnemyAttack::Ranged {
                damage: 1,
                radius: 2.0,
                speed: 540.0,
                life: None,
                spawn_y_offset: -20.0,
            },
            ..Self::scientist()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRoster {
    pub brute: EnemyProfile,
    pub grunt: EnemyProfile,
    pub scientist: EnemyProfile,
    pub gangster: EnemyProfile,
}

impl EnemyRoster {
    pub fn profile(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Brute => &self.brute,
            EnemyKind::Grunt => &self.grunt,
            EnemyKind::Scientist => &self.scientist,
            EnemyKind::Gangster => &self.gangster,
        }
    }
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self {
            brute: EnemyProfile::brute(),
            grunt: EnemyProfile::grunt(),
            scientist: EnemyProfile::scientist(),
            gangster: EnemyProfile::gangster(),
        }
    }
}

// =============================================================================
// Tuning root
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub enemies: EnemyRoster,
}

impl Tuning {
    /// Load and validate a tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_ron_str(&text)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = ron::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::new().depth_limit(4);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Reject values the simulation can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        positive("physics.gravity", p.gravity)?;
        positive("physics.terminal_velocity", p.terminal_velocity)?;
        non_negative("physics.max_step_height", p.max_step_height)?;
        non_negative("physics.grounded_snap", p.grounded_snap)?;
        non_negative("physics.airborne_snap", p.airborne_snap)?;
        non_negative("physics.lookahead_window", p.lookahead_window)?;
        if p.fall_snap_threshold > 0.0 {
            return Err(ConfigError::Invalid(
                "physics.fall_snap_threshold must not be positive".into(),
            ));
        }

        let pl = &self.player;
        positive("player.width", pl.width)?;
        positive("player.height", pl.height)?;
        if pl.foot_span_too_small(p.foot_inset) {
            return Err(ConfigError::Invalid(
                "player.width must exceed twice physics.foot_inset".into(),
            ));
        }
        if pl.health <= 0 {
            return Err(ConfigError::Invalid("player.health must be positive".into()));
        }
        positive("player.speed", pl.speed)?;
        positive("player.jump_velocity", pl.jump_velocity)?;
        positive("player.roll.duration", pl.roll.duration)?;
        positive("player.attack.duration", pl.attack.duration)?;
        positive("player.attack.lunge_duration", pl.attack.lunge_duration)?;

        let ds = &pl.dash_strike;
        positive("player.dash_strike.bar_speed", ds.bar_speed)?;
        positive("player.dash_strike.speed", ds.speed)?;
        positive("player.dash_strike.aim_time_scale", ds.aim_time_scale)?;
        if !(0.0..=1.0).contains(&ds.sweet_spot_start)
            || !(0.0..=1.0).contains(&ds.sweet_spot_end)
            || ds.sweet_spot_start > ds.sweet_spot_end
        {
            return Err(ConfigError::Invalid(format!(
                "dash strike sweet spot {}..{} must be an ordered range inside 0..1",
                ds.sweet_spot_start, ds.sweet_spot_end
            )));
        }

        let dr = &pl.dream;
        positive("player.dream.speed_multiplier", dr.speed_multiplier)?;
        positive("player.dream.blink_speed", dr.blink_speed)?;
        positive("player.dream.max_aim_time", dr.max_aim_time)?;
        positive("player.dream.aim_time_scale", dr.aim_time_scale)?;

        for kind in EnemyKind::ALL {
            let e = self.enemies.profile(kind);
            let name = format!("enemies.{:?}", kind);
            positive(&format!("{}.width", name), e.width)?;
            positive(&format!("{}.height", name), e.height)?;
            non_negative(&format!("{}.speed", name), e.speed)?;
            positive(&format!("{}.attack_cooldown", name), e.attack_cooldown)?;
            if e.health <= 0 {
                return Err(ConfigError::Invalid(format!("{}.health must be positive", name)));
            }
        }
        Ok(())
    }
}

impl PlayerTuning {
    fn foot_span_too_small(&self, foot_inset: f32) -> bool {
        self.width <= foot_inset * 2.0
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive (got {})", name, value)))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must not be negative (got {})", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tuning = Tuning::from_ron_str("(physics: (gravity: 1200.0))").unwrap();
        assert_eq!(tuning.physics.gravity, 1200.0);
        assert_eq!(tuning.physics.terminal_velocity, 600.0);
        assert_eq!(tuning.player, PlayerTuning::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.ron");

        let mut tuning = Tuning::default();
        tuning.player.roll.mode = RollMode::Invulnerable;
        tuning.enemies.grunt.health = 70;
        tuning.save(&path).unwrap();

        let loaded = Tuning::load(&path).unwrap();
        assert_eq!(loaded, tuning);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let err = Tuning::from_ron_str("(physics: (gravity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bad_sweet_spot_rejected() {
        let mut tuning = Tuning::default();
        tuning.player.dash_strike.sweet_spot_start = 0.9;
        tuning.player.dash_strike.sweet_spot_end = 0.8;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Tuning::load(dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_roster_lookup() {
        let roster = EnemyRoster::default();
        assert_eq!(roster.profile(EnemyKind::Scientist).contact_damage, 0);
        assert_eq!(roster.profile(EnemyKind::Gangster).speed, 0.0);
        assert_eq!(roster.profile(EnemyKind::Grunt).health, 55);
    }
}

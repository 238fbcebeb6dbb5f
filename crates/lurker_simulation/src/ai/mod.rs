//! Alien AI module
//!
//! Звуко-ориентированный hunting FSM:
//! Patrol ⇄ Idle, звук → Hunting → PrepareAttack → Attacking → Investigating.
//!
//! Подмодули:
//! - components: state enum, config, last heard sound, patrol anchor
//! - systems: hearing ingestion, FSM transitions, state → команды, реакции
//! - predict: экстраполяция позиции цели по устаревшему звуку
//! - leap: resolve точки прыжка (overshoot + fallbacks), line-of-sight gate

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod leap;
pub mod predict;
pub mod systems;

// Re-export основных типов
pub use components::{
    AlienConfig, AlienState, HeardSound, PatrolAnchor, ResumeState, SoundSnapshot,
};
pub use events::{emit_movement_noise, SoundEmitter, SoundEvent};
pub use leap::{line_of_sight_clear, resolve_leap_target};
pub use predict::predict_position;

use crate::SimulationSet;

/// Alien AI Plugin
///
/// Порядок выполнения (chain для детерминизма):
/// Perception: emit_movement_noise → alien_hear_sounds
/// Decision: alien_fsm_transitions → alien_movement_from_state →
///           alien_attack_execution → handle_alien_death
pub struct AlienPlugin;

impl Plugin for AlienPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundEvent>();

        app.add_systems(
            FixedUpdate,
            (events::emit_movement_noise, systems::alien_hear_sounds)
                .chain()
                .in_set(SimulationSet::Perception),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::alien_fsm_transitions,
                systems::alien_movement_from_state,
                systems::alien_attack_execution,
                systems::handle_alien_death,
                systems::warn_missing_capabilities,
            )
                .chain()
                .in_set(SimulationSet::Decision),
        );
    }
}

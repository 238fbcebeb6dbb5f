//! Combat module: leap attack capability + death events
//!
//! ECS ответственность:
//! - LeapAttack capability state: range, cooldown, полёт прыжка
//! - EntityDied событие для внешних подписчиков
//!
//! Engine ответственность (вне crate):
//! - Анимация прыжка, удар по игроку, звук
//!
//! FSM алиена трактует LeapAttack как opaque capability: execute() +
//! is_complete(), внутренние cooldown/range ему не принадлежат.

use bevy::prelude::*;

pub mod leap_attack;

pub use leap_attack::{drive_leap_attacks, LeapAttack, LeapInFlight};

use crate::SimulationSet;

/// Event: актор умер (Health дошёл до 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
}

/// Combat Plugin
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            drive_leap_attacks.in_set(SimulationSet::Actuation),
        );
    }
}

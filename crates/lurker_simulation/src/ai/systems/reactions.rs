//! AI reaction systems (death, missing collaborators).

use bevy::prelude::*;

use crate::ai::AlienState;
use crate::combat::{EntityDied, LeapAttack};
use crate::components::Health;
use crate::nav::NavAgent;

/// System: обработка смерти → Dead state
///
/// При HP == 0 FSM отключается навсегда: Dead — absorbing state, звуки и
/// тики дальше игнорируются.
pub fn handle_alien_death(
    mut aliens: Query<(Entity, &Health, &mut AlienState, &mut NavAgent), Changed<Health>>,
    mut died: EventWriter<EntityDied>,
) {
    for (entity, health, mut state, mut nav) in aliens.iter_mut() {
        if !health.is_alive() && !matches!(*state, AlienState::Dead) {
            *state = AlienState::Dead;
            nav.stop();
            died.write(EntityDied { entity });
            crate::logger::log(&format!("💀 {:?} died → FSM disabled (Dead state)", entity));
        }
    }
}

/// System: валидация collaborator'ов при спавне
///
/// Отсутствующая capability — не ошибка, а деградация: алиен без LeapAttack
/// охотится и обыскивает, но никогда не прыгает. Предупреждаем один раз.
pub fn warn_missing_capabilities(
    aliens: Query<(Entity, Option<&LeapAttack>), Added<AlienState>>,
) {
    for (entity, leap) in aliens.iter() {
        if leap.is_none() {
            crate::log_warning(&format!(
                "{:?} spawned without LeapAttack capability — will never attack",
                entity
            ));
        }
    }
}

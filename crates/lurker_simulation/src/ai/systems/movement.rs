//! AI movement systems: state → NavAgent команды, исполнение атаки

use bevy::prelude::*;

use crate::ai::leap::resolve_leap_target;
use crate::ai::predict::predict_position;
use crate::ai::{AlienConfig, AlienState, HeardSound};
use crate::combat::LeapAttack;
use crate::nav::NavAgent;
use crate::spatial::WorldGeometry;

/// Система: конвертация AlienState → NavAgent команды
///
/// Guards против повторной записи той же команды — иначе каждый тик
/// перезапускался бы просчёт пути (path_pending).
pub fn alien_movement_from_state(
    mut aliens: Query<(
        &AlienState,
        &AlienConfig,
        &HeardSound,
        &mut NavAgent,
        &mut Transform,
    )>,
) {
    for (state, config, heard, mut nav, mut transform) in aliens.iter_mut() {
        match state {
            AlienState::Dead | AlienState::Idle { .. } => {
                if !nav.is_stopped {
                    nav.stop();
                }
            }

            AlienState::Patrol { destination } | AlienState::Investigating { destination, .. } => {
                match destination {
                    Some(destination) => {
                        if nav.destination != Some(*destination) {
                            nav.set_destination(*destination);
                        }
                        nav.speed = config.patrol_speed;
                    }
                    None => {
                        // Точка ещё не выбрана (выберет FSM на этом/следующем тике)
                        if !nav.is_stopped {
                            nav.stop();
                        }
                    }
                }
            }

            AlienState::Hunting => {
                let Some(sound) = heard.sound else {
                    continue;
                };
                // Новый звук в Hunting обновляет destination без exit/enter
                if nav.destination != Some(sound.position) {
                    nav.set_destination(sound.position);
                }
                nav.speed = config.hunting_speed;
            }

            AlienState::PrepareAttack { .. } => {
                if !nav.is_stopped {
                    nav.stop();
                }
                // Замах: разворачиваемся на звук (только yaw)
                if let Some(sound) = heard.sound {
                    let flat_target = Vec3::new(
                        sound.position.x,
                        transform.translation.y,
                        sound.position.z,
                    );
                    if flat_target.distance_squared(transform.translation) > 1e-6 {
                        transform.look_at(flat_target, Vec3::Y);
                    }
                }
            }

            AlienState::Attacking { .. } => {
                // Трансформом владеет drive_leap_attacks
                if !nav.is_stopped {
                    nav.stop();
                }
            }
        }
    }
}

/// Система: исполнение атаки
///
/// Одноразово на вход в Attacking: предсказываем позицию цели по устаревшему
/// звуку (staleness == длительность замаха), резолвим точку прыжка и отдаём
/// команду capability.
pub fn alien_attack_execution(
    mut aliens: Query<(
        Entity,
        &Transform,
        &mut AlienState,
        &AlienConfig,
        &HeardSound,
        &mut LeapAttack,
    )>,
    geometry: Res<WorldGeometry>,
) {
    for (entity, transform, mut state, config, heard, mut leap) in aliens.iter_mut() {
        if !matches!(*state, AlienState::Attacking { executed: false }) {
            continue;
        }

        let Some(sound) = heard.sound else {
            // Без данных о звуке прыгать некуда — считаем атаку исполненной,
            // FSM уйдёт в Investigating на следующем тике
            crate::log_warning(&format!("{:?} Attacking without heard sound", entity));
            *state = AlienState::Attacking { executed: true };
            continue;
        };

        let origin = transform.translation;
        let predicted = predict_position(
            sound.position,
            sound.velocity,
            config.prepare_attack_duration,
            config,
            geometry.queries(),
        );
        let target = resolve_leap_target(origin, predicted, config, geometry.queries());

        leap.execute(origin, target);
        *state = AlienState::Attacking { executed: true };

        crate::log(&format!(
            "🦘 {:?} leap: predicted {:?} → target {:?}",
            entity, predicted, target
        ));
    }
}

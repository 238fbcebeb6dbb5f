//! FSM transitions алиена
//!
//! Один проход в тик: таймер активного состояния + его exit condition.
//! Tie-breaks:
//! - Idle прозрачен: всегда возобновляет записанный resume.
//! - В Hunting проверка атаки (range + готовность capability + LOS) идёт
//!   раньше проверки прибытия.
//! - Якорь патруля сбрасывается на home только при естественном истечении
//!   обыска (Investigating → Patrol), не при проходе через Idle.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::leap::line_of_sight_clear;
use crate::ai::{AlienConfig, AlienState, HeardSound, PatrolAnchor, ResumeState};
use crate::combat::LeapAttack;
use crate::nav::NavAgent;
use crate::spatial::{SpatialQueries, WorldGeometry};
use crate::DeterministicRng;

/// Система: FSM transitions
pub fn alien_fsm_transitions(
    mut aliens: Query<(
        Entity,
        &Transform,
        &mut AlienState,
        &mut PatrolAnchor,
        &AlienConfig,
        &HeardSound,
        &NavAgent,
        Option<&LeapAttack>,
    )>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut state, mut anchor, config, heard, nav, leap) in aliens.iter_mut() {
        let new_state = match state.as_ref() {
            AlienState::Dead => {
                // Absorbing state
                continue;
            }

            AlienState::Idle { timer, resume } => {
                let timer = timer + delta;
                if timer >= config.idle_duration {
                    // Пауза прозрачна: возобновляем прерванное поведение
                    match *resume {
                        ResumeState::Patrol => AlienState::Patrol { destination: None },
                        ResumeState::Investigate { timer } => AlienState::Investigating {
                            timer,
                            destination: None,
                        },
                    }
                } else {
                    AlienState::Idle {
                        timer,
                        resume: *resume,
                    }
                }
            }

            AlienState::Patrol { destination } => match destination {
                None => {
                    // Новая случайная точка вокруг якоря
                    let destination = sample_destination(
                        anchor.current,
                        config.patrol_radius,
                        config.walkable_snap_radius,
                        &mut rng,
                        geometry.queries(),
                    );
                    AlienState::Patrol {
                        destination: Some(destination),
                    }
                }
                Some(destination) => {
                    if nav.arrived() {
                        crate::log(&format!("💤 {:?} Patrol → Idle (reached {:?})", entity, destination));
                        AlienState::Idle {
                            timer: 0.0,
                            resume: ResumeState::Patrol,
                        }
                    } else {
                        AlienState::Patrol {
                            destination: Some(*destination),
                        }
                    }
                }
            },

            AlienState::Hunting => match heard.sound {
                None => {
                    // Hunting без звука — дефектный вход, откатываемся в патруль
                    crate::log_warning(&format!(
                        "{:?} Hunting without heard sound → Patrol",
                        entity
                    ));
                    AlienState::Patrol { destination: None }
                }
                Some(sound) => {
                    let origin = transform.translation;
                    let can_attack = leap
                        .map(|l| l.can_attack(origin, sound.position))
                        .unwrap_or(false);

                    if can_attack
                        && line_of_sight_clear(origin, sound.position, geometry.queries())
                    {
                        crate::log(&format!(
                            "⚔️ {:?} Hunting → PrepareAttack (target {:?})",
                            entity, sound.position
                        ));
                        AlienState::PrepareAttack { timer: 0.0 }
                    } else if nav.arrived() {
                        // Дошли до звука, цели нет — обыскиваем окрестность
                        anchor.current = sound.position;
                        crate::log(&format!(
                            "🔍 {:?} Hunting → Investigating (anchor {:?})",
                            entity, sound.position
                        ));
                        AlienState::Investigating {
                            timer: 0.0,
                            destination: None,
                        }
                    } else {
                        AlienState::Hunting
                    }
                }
            },

            AlienState::PrepareAttack { timer } => {
                let timer = timer + delta;
                if timer >= config.prepare_attack_duration {
                    crate::log(&format!("🦘 {:?} PrepareAttack → Attacking", entity));
                    AlienState::Attacking { executed: false }
                } else {
                    AlienState::PrepareAttack { timer }
                }
            }

            AlienState::Attacking { executed } => {
                // execute() делает alien_attack_execution; здесь только поллим завершение
                let complete = leap.map(|l| l.is_complete()).unwrap_or(true);
                if *executed && complete {
                    if let Some(sound) = heard.sound {
                        anchor.current = sound.position;
                    }
                    crate::log(&format!("🔍 {:?} Attacking → Investigating", entity));
                    AlienState::Investigating {
                        timer: 0.0,
                        destination: None,
                    }
                } else {
                    AlienState::Attacking {
                        executed: *executed,
                    }
                }
            }

            AlienState::Investigating { timer, destination } => {
                let timer = timer + delta;
                if timer >= config.investigate_duration {
                    // Обыск естественно истёк — только здесь якорь
                    // возвращается к home
                    anchor.reset();
                    crate::log(&format!("🚶 {:?} Investigating → Patrol (anchor reset)", entity));
                    AlienState::Patrol { destination: None }
                } else {
                    match destination {
                        None => {
                            let destination = sample_destination(
                                anchor.current,
                                config.investigate_radius,
                                config.walkable_snap_radius,
                                &mut rng,
                                geometry.queries(),
                            );
                            AlienState::Investigating {
                                timer,
                                destination: Some(destination),
                            }
                        }
                        Some(destination) => {
                            if nav.arrived() {
                                // Пауза с сохранением остатка таймера обыска
                                AlienState::Idle {
                                    timer: 0.0,
                                    resume: ResumeState::Investigate { timer },
                                }
                            } else {
                                AlienState::Investigating {
                                    timer,
                                    destination: Some(*destination),
                                }
                            }
                        }
                    }
                }
            }
        };

        if *state != new_state {
            *state = new_state;
        }
    }
}

/// Случайная точка в радиусе вокруг center, прижатая к walkable поверхности.
/// Нет поверхности в snap-радиусе — идём на сырую точку (best effort).
fn sample_destination(
    center: Vec3,
    radius: f32,
    snap_radius: f32,
    rng: &mut DeterministicRng,
    geometry: &dyn SpatialQueries,
) -> Vec3 {
    let angle = rng.rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = rng.rng.gen::<f32>() * radius;
    let candidate = center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);

    geometry
        .sample_walkable(candidate, snap_radius)
        .unwrap_or(candidate)
}

//! LeapAttack — внешняя attack capability алиена
//!
//! Контракт для FSM: attack_range() / can_attack(origin, target) / execute() /
//! is_complete(). Cooldown, длительность полёта и пере-рандомизация range
//! после приземления принадлежат capability, не state machine.

use bevy::prelude::*;
use rand::Rng;

use crate::DeterministicRng;

/// Прыжок в полёте (start → target за leap_duration секунд)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct LeapInFlight {
    pub start: Vec3,
    pub target: Vec3,
    pub elapsed: f32,
}

/// Capability прыжковой атаки
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LeapAttack {
    /// Текущий радиус атаки (пере-рандомизируется после каждого прыжка)
    pub attack_range: f32,
    pub range_min: f32,
    pub range_max: f32,

    /// Cooldown между прыжками (секунды)
    pub cooldown: f32,
    pub cooldown_timer: f32,

    /// Длительность полёта (секунды)
    pub leap_duration: f32,
    /// Высота дуги прыжка (метры)
    pub leap_arc_height: f32,

    /// Активный прыжок (None — на земле)
    pub leap: Option<LeapInFlight>,

    /// Последняя точка приземления (для отладки и тестов)
    pub last_target: Option<Vec3>,
}

impl Default for LeapAttack {
    fn default() -> Self {
        Self {
            attack_range: 5.0,
            range_min: 4.0,
            range_max: 7.0,
            cooldown: 3.0,
            cooldown_timer: 0.0,
            leap_duration: 0.6,
            leap_arc_height: 1.5,
            leap: None,
            last_target: None,
        }
    }
}

impl LeapAttack {
    pub fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Готова ли capability (cooldown прошёл, прыжок не в полёте)
    pub fn ready(&self) -> bool {
        self.leap.is_none() && self.cooldown_timer <= 0.0
    }

    /// Может ли атаковать target из origin (готовность + дистанция)
    pub fn can_attack(&self, origin: Vec3, target: Vec3) -> bool {
        self.ready() && origin.distance(target) <= self.attack_range
    }

    /// Запустить прыжок к target. Полёт исполняет drive_leap_attacks.
    pub fn execute(&mut self, origin: Vec3, target: Vec3) {
        self.leap = Some(LeapInFlight {
            start: origin,
            target,
            elapsed: 0.0,
        });
        self.last_target = Some(target);
    }

    /// Прыжок завершён (или не запускался)
    pub fn is_complete(&self) -> bool {
        self.leap.is_none()
    }
}

/// Система: исполнение прыжков + cooldown тик
///
/// Интерполяция start → target с параболической дугой; по приземлении
/// запускается cooldown и пере-рандомизируется attack_range (deterministic RNG).
pub fn drive_leap_attacks(
    mut attackers: Query<(Entity, &mut LeapAttack, &mut Transform)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut attack, mut transform) in attackers.iter_mut() {
        if attack.cooldown_timer > 0.0 {
            attack.cooldown_timer = (attack.cooldown_timer - delta).max(0.0);
        }

        let Some(mut leap) = attack.leap else {
            continue;
        };

        leap.elapsed += delta;
        let t = (leap.elapsed / attack.leap_duration).min(1.0);

        if t >= 1.0 {
            // Приземлились
            transform.translation = leap.target;
            attack.leap = None;
            attack.cooldown_timer = attack.cooldown;

            // Новый range на следующий прыжок — внешний side effect capability
            if attack.range_max - attack.range_min > f32::EPSILON {
                attack.attack_range = rng.rng.gen_range(attack.range_min..=attack.range_max);
            }

            crate::log(&format!(
                "🦶 {:?} landed at {:?}, next attack range {:.2}",
                entity, leap.target, attack.attack_range
            ));
        } else {
            let flat = leap.start.lerp(leap.target, t);
            // Парабола: 0 на краях, arc_height в середине
            let arc = attack.leap_arc_height * 4.0 * t * (1.0 - t);
            transform.translation = flat + Vec3::Y * arc;
            attack.leap = Some(leap);
        }
    }
}

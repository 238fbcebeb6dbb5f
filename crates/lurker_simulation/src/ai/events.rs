//! Sound events — звуковые стимулы от perception-слоя
//!
//! Звук — единственный канал восприятия алиена. Producer-owned, consumed once:
//! perception-слой (шаги игрока, броски предметов, engine-события) пишет
//! SoundEvent, система слуха копирует нужные поля в HeardSound алиена.

use bevy::prelude::*;

/// Дискретное звуковое событие
#[derive(Event, Debug, Clone)]
pub struct SoundEvent {
    /// Громкость ∈ [0, 1] (аттенюация по расстоянию — на стороне эмиттера)
    pub loudness: f32,
    /// Позиция источника (world space)
    pub position: Vec3,
    /// Opaque scalar качества звука от perception-слоя
    pub quality: f32,
    /// Скорость источника на момент звука (units/sec)
    pub velocity: Vec3,
}

/// Component: эмиттер шума движения (сторона выжившего/игрока)
///
/// Удобный producer для headless прогонов: громкость шагов масштабируется
/// скоростью (бег громче ходьбы). В игре эмиттером выступает engine bridge.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SoundEmitter {
    /// Громкость на reference_speed
    pub base_loudness: f32,
    /// Качество звука (прокидывается в SoundEvent как есть)
    pub quality: f32,
    /// Интервал между "шагами" (секунды)
    pub interval: f32,
    pub timer: f32,
    /// Скорость, при которой loudness == base_loudness (m/s)
    pub reference_speed: f32,
    /// Позиция на прошлом тике — для оценки скорости
    pub last_position: Option<Vec3>,
}

impl Default for SoundEmitter {
    fn default() -> Self {
        Self {
            base_loudness: 0.6,
            quality: 1.0,
            interval: 0.5,
            timer: 0.0,
            reference_speed: 5.0,
            last_position: None,
        }
    }
}

/// Система: шум движения от SoundEmitter'ов
///
/// Скорость оцениваем по дельте позиции (Transform принадлежит nav/leap
/// исполнителям, эмиттер только наблюдает).
pub fn emit_movement_noise(
    mut emitters: Query<(&mut SoundEmitter, &Transform)>,
    mut sounds: EventWriter<SoundEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut emitter, transform) in emitters.iter_mut() {
        let position = transform.translation;
        let velocity = match emitter.last_position {
            Some(last) if delta > 0.0 => (position - last) / delta,
            _ => Vec3::ZERO,
        };
        emitter.last_position = Some(position);

        emitter.timer += delta;
        if emitter.timer < emitter.interval {
            continue;
        }

        let speed = velocity.length();
        if speed < 0.05 {
            // Стоим — шагов нет, таймер не сбрасываем
            continue;
        }
        emitter.timer = 0.0;

        let loudness =
            (emitter.base_loudness * speed / emitter.reference_speed).clamp(0.0, 1.0);
        sounds.write(SoundEvent {
            loudness,
            position,
            quality: emitter.quality,
            velocity,
        });
    }
}

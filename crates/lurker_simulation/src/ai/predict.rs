//! TargetPredictor — предсказание текущей позиции источника звука
//!
//! Звук, на который алиен замахивался, устарел на elapsed_prep секунд —
//! экстраполируем по последней известной скорости и прижимаем к walkable
//! поверхности. Результат best effort: если поверхности в радиусе нет,
//! возвращаем сырую точку, вызывающий не должен считать её валидной.

use bevy::prelude::*;

use crate::ai::AlienConfig;
use crate::spatial::SpatialQueries;

/// Предсказать позицию цели через elapsed_prep секунд после снимка.
///
/// Цель со скоростью ниже velocity_epsilon считается стоячей: иначе шумовая
/// скорость, умноженная на время замаха, раздувается в большой ложный офсет.
pub fn predict_position(
    last_position: Vec3,
    last_velocity: Vec3,
    elapsed_prep: f32,
    config: &AlienConfig,
    geometry: &dyn SpatialQueries,
) -> Vec3 {
    let raw = if last_velocity.length() < config.velocity_epsilon {
        last_position
    } else {
        // Линейная экстраполяция
        last_position + last_velocity * elapsed_prep
    };

    geometry
        .sample_walkable(raw, config.walkable_snap_radius)
        .unwrap_or(raw)
}

//! LeapTargetResolver — финальная точка приземления прыжка
//!
//! Overshoot (перелёт за предсказанную позицию) делает прыжок по движущейся
//! цели труднее для уклонения, но каждая стадия, способная посадить алиена
//! в стену или за NavMesh, деградирует к немодифицированной предсказанной
//! точке, а не к невалидному состоянию.

use bevy::prelude::*;

use crate::ai::AlienConfig;
use crate::spatial::{SpatialQueries, GROUND_MASK, OBSTRUCTION_MASK};

/// Resolve точки прыжка: overshoot → клиппинг по стене → ground-луч →
/// финальный walkable snap. Возвращает либо скорректированную точку на
/// walkable поверхности, либо ровно predicted.
pub fn resolve_leap_target(
    origin: Vec3,
    predicted: Vec3,
    config: &AlienConfig,
    geometry: &dyn SpatialQueries,
) -> Vec3 {
    let Some(direction) = (predicted - origin).try_normalize() else {
        // Цель в точке origin'а — перелетать некуда
        return predicted;
    };

    // Идеальный перелёт за цель
    let mut overshoot = predicted + direction * config.overshoot_distance;

    // Стена на пути перелёта — прижимаемся перед ней
    if let Some(hit) = geometry.raycast(
        predicted,
        direction,
        config.overshoot_distance,
        OBSTRUCTION_MASK,
    ) {
        overshoot = hit.point - direction * config.wall_clearance;
    }

    // Вертикальный поиск пола с уровня origin'а (мульти-этажность: цель
    // может быть выше/ниже, валидна только точка с полом под ней)
    let probe = Vec3::new(
        overshoot.x,
        origin.y + config.ground_ray_height,
        overshoot.z,
    );
    let Some(ground) = geometry.raycast(
        probe,
        Vec3::NEG_Y,
        config.ground_search_distance,
        GROUND_MASK,
    ) else {
        // Яма/обрыв за целью — прыгаем без перелёта
        return predicted;
    };

    let candidate = Vec3::new(overshoot.x, ground.point.y, overshoot.z);

    // Второй независимый предохранитель: точка обязана быть у walkable
    // поверхности, иначе откатываемся к предсказанной позиции
    match geometry.sample_walkable(candidate, config.walkable_snap_radius) {
        Some(snapped) => snapped,
        None => predicted,
    }
}

/// Line-of-sight gate перед PrepareAttack: один raycast по obstruction-слою.
/// Любое попадание блокирует замах — продолжаем Hunting вместо прыжка в стену.
pub fn line_of_sight_clear(origin: Vec3, target: Vec3, geometry: &dyn SpatialQueries) -> bool {
    let to_target = target - origin;
    let distance = to_target.length();
    if distance < 1e-4 {
        return true;
    }
    geometry
        .raycast(origin, to_target / distance, distance, OBSTRUCTION_MASK)
        .is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Aabb, BlockWorld, OpenField};

    fn config() -> AlienConfig {
        AlienConfig::default() // overshoot 3.0, clearance 0.5, snap 5.0
    }

    #[test]
    fn test_open_field_overshoot() {
        let resolved = resolve_leap_target(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            &config(),
            &OpenField,
        );
        // Перелёт на 3м за цель по направлению прыжка
        assert_eq!(resolved, Vec3::new(13.0, 0.0, 0.0));
    }

    #[test]
    fn test_wall_clamps_overshoot() {
        let world = BlockWorld::default()
            .with_floor(Aabb::new(
                Vec3::new(-20.0, -0.5, -20.0),
                Vec3::new(20.0, 0.0, 20.0),
            ))
            .with_wall(Aabb::new(
                Vec3::new(11.0, -1.0, -5.0),
                Vec3::new(12.0, 3.0, 5.0),
            ));

        let resolved = resolve_leap_target(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            &config(),
            &world,
        );
        // Луч из predicted упирается в стену на x=11 → точка на 0.5 перед ней
        assert!((resolved - Vec3::new(10.5, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_pit_cancels_overshoot() {
        // Пол обрывается на x=11, перелётная точка x=13 висит над ямой
        let world = BlockWorld::default().with_floor(Aabb::new(
            Vec3::new(-20.0, -0.5, -20.0),
            Vec3::new(11.0, 0.0, 20.0),
        ));

        let resolved = resolve_leap_target(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            &config(),
            &world,
        );
        assert_eq!(resolved, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_unwalkable_ground_falls_back() {
        // Под перелётной точкой есть пол (hazard), но NavMesh туда не проложен
        let world = BlockWorld::default()
            .with_floor(Aabb::new(
                Vec3::new(-20.0, -0.5, -20.0),
                Vec3::new(11.0, 0.0, 20.0),
            ))
            .with_ground_only(Aabb::new(
                Vec3::new(11.0, -0.5, -20.0),
                Vec3::new(30.0, 0.0, 20.0),
            ));

        let mut cfg = config();
        cfg.walkable_snap_radius = 1.5; // ближайший walkable край в 2м — вне радиуса

        let resolved = resolve_leap_target(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            &cfg,
            &world,
        );
        assert_eq!(resolved, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_multi_floor_ground_height() {
        // Цель на втором этаже: пол на y=3
        let world = BlockWorld::default().with_floor(Aabb::new(
            Vec3::new(-20.0, 2.5, -20.0),
            Vec3::new(20.0, 3.0, 20.0),
        ));

        let mut cfg = config();
        cfg.ground_ray_height = 5.0; // луч стартует выше пола второго этажа

        let resolved = resolve_leap_target(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 3.0, 0.0),
            &cfg,
            &world,
        );
        // Высота взята из ground-луча (y=3), по горизонтали — перелёт
        assert!((resolved.y - 3.0).abs() < 1e-4);
        assert!(resolved.x > 10.0);
    }

    #[test]
    fn test_line_of_sight() {
        let world = BlockWorld::default().with_wall(Aabb::new(
            Vec3::new(4.0, -1.0, -5.0),
            Vec3::new(5.0, 3.0, 5.0),
        ));

        let origin = Vec3::new(0.0, 0.5, 0.0);
        assert!(!line_of_sight_clear(
            origin,
            Vec3::new(10.0, 0.5, 0.0),
            &world
        ));
        // Вбок от стены — чисто
        assert!(line_of_sight_clear(
            origin,
            Vec3::new(0.0, 0.5, 10.0),
            &world
        ));
        // Вырожденный случай: цель в нас самих
        assert!(line_of_sight_clear(origin, origin, &world));
    }
}

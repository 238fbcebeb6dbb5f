//! Геометрические запросы к миру (walkability + obstruction)
//!
//! Симуляция не владеет геометрией уровня: NavMesh и коллизии живут в engine
//! layer. Этот модуль — trait seam: симуляция спрашивает "ближайшая проходимая
//! точка" и "raycast", реализацию подставляет engine bridge (или headless
//! реализации ниже для тестов и демо).
//!
//! Каждый запрос возвращает Option: "не найдено" — нормальный ответ с
//! определённым fallback'ом у вызывающего, не ошибка (см. ai/predict, ai/leap).

use bevy::prelude::*;

/// Слой стен/препятствий (line-of-sight, overshoot clipping)
pub const OBSTRUCTION_MASK: u32 = 1 << 0;

/// Слой пола/земли (вертикальный raycast при резолве точки прыжка)
pub const GROUND_MASK: u32 = 1 << 1;

/// Результат raycast'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Запросы к геометрии мира
///
/// Контракт walkability: sample_walkable возвращает ближайшую точку
/// проходимой поверхности в радиусе radius от point, либо None.
pub trait SpatialQueries: Send + Sync {
    fn sample_walkable(&self, point: Vec3, radius: f32) -> Option<Vec3>;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<RaycastHit>;
}

/// Resource-обёртка над активной реализацией геометрии
#[derive(Resource)]
pub struct WorldGeometry(pub Box<dyn SpatialQueries>);

impl WorldGeometry {
    pub fn new(queries: impl SpatialQueries + 'static) -> Self {
        Self(Box::new(queries))
    }

    pub fn queries(&self) -> &dyn SpatialQueries {
        self.0.as_ref()
    }
}

impl Default for WorldGeometry {
    fn default() -> Self {
        Self::new(OpenField)
    }
}

/// Открытое поле: бесконечный проходимый пол на y=0, препятствий нет.
///
/// Default-геометрия для headless запуска и большинства тестов.
pub struct OpenField;

impl SpatialQueries for OpenField {
    fn sample_walkable(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        // Ближайшая точка плоскости y=0 — проекция; расстояние = |y|
        if point.y.abs() <= radius {
            Some(Vec3::new(point.x, 0.0, point.z))
        } else {
            None
        }
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<RaycastHit> {
        if mask & GROUND_MASK == 0 {
            // Стен в открытом поле нет
            return None;
        }
        // Пересечение луча с плоскостью y=0
        if direction.y.abs() < 1e-8 {
            return None;
        }
        let t = -origin.y / direction.y;
        if t < 0.0 || t > max_distance {
            return None;
        }
        let point = origin + direction * t;
        Some(RaycastHit {
            point: Vec3::new(point.x, 0.0, point.z),
            distance: t,
        })
    }
}

/// Axis-aligned box, метры
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Ближайшая точка верхней грани (для walkability: ходим по крышке)
    pub fn closest_point_on_top(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.max.y,
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Slab-тест: расстояние до входа луча в box, если пересекает в [0, max_distance]
    pub fn ray_intersect(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() < 1e-8 {
                // Луч параллелен slab'у — либо внутри, либо промах
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let mut t0 = (self.min[axis] - o) * inv;
                let mut t1 = (self.max[axis] - o) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(t_min)
    }
}

/// Blockout-геометрия из AABB'ов: полы (walkable + ground), стены (obstruction),
/// и ground_only — поверхности, по которым NavMesh не проложен (hazard-зоны):
/// вертикальный raycast их видит, walkability-сэмпл — нет.
///
/// Используется тестами и демо, где нужны стены/ямы/этажи.
#[derive(Default)]
pub struct BlockWorld {
    pub floors: Vec<Aabb>,
    pub walls: Vec<Aabb>,
    pub ground_only: Vec<Aabb>,
}

impl BlockWorld {
    pub fn with_floor(mut self, floor: Aabb) -> Self {
        self.floors.push(floor);
        self
    }

    pub fn with_wall(mut self, wall: Aabb) -> Self {
        self.walls.push(wall);
        self
    }

    pub fn with_ground_only(mut self, patch: Aabb) -> Self {
        self.ground_only.push(patch);
        self
    }
}

impl SpatialQueries for BlockWorld {
    fn sample_walkable(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        let mut best: Option<(Vec3, f32)> = None;

        for floor in &self.floors {
            let candidate = floor.closest_point_on_top(point);
            let distance = candidate.distance(point);
            if distance > radius {
                continue;
            }
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((candidate, distance)),
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<RaycastHit> {
        let mut nearest: Option<f32> = None;

        if mask & OBSTRUCTION_MASK != 0 {
            for wall in &self.walls {
                if let Some(t) = wall.ray_intersect(origin, direction, max_distance) {
                    if nearest.map(|n| t < n).unwrap_or(true) {
                        nearest = Some(t);
                    }
                }
            }
        }

        if mask & GROUND_MASK != 0 {
            for patch in self.floors.iter().chain(self.ground_only.iter()) {
                if let Some(t) = patch.ray_intersect(origin, direction, max_distance) {
                    if nearest.map(|n| t < n).unwrap_or(true) {
                        nearest = Some(t);
                    }
                }
            }
        }

        nearest.map(|t| RaycastHit {
            point: origin + direction * t,
            distance: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_field_sample() {
        let field = OpenField;
        assert_eq!(
            field.sample_walkable(Vec3::new(3.0, 1.0, -2.0), 5.0),
            Some(Vec3::new(3.0, 0.0, -2.0))
        );
        // Слишком высоко — нет поверхности в радиусе
        assert_eq!(field.sample_walkable(Vec3::new(0.0, 10.0, 0.0), 5.0), None);
    }

    #[test]
    fn test_open_field_ground_ray() {
        let field = OpenField;
        let hit = field
            .raycast(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Y, 50.0, GROUND_MASK)
            .unwrap();
        assert_eq!(hit.point, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(hit.distance, 2.0);

        // Obstruction-луч в поле всегда промах
        assert!(field
            .raycast(Vec3::ZERO, Vec3::X, 100.0, OBSTRUCTION_MASK)
            .is_none());
    }

    #[test]
    fn test_aabb_ray_intersect() {
        let wall = Aabb::new(Vec3::new(5.0, -1.0, -2.0), Vec3::new(6.0, 3.0, 2.0));

        // Прямое попадание
        let t = wall.ray_intersect(Vec3::ZERO, Vec3::X, 10.0).unwrap();
        assert!((t - 5.0).abs() < 1e-5);

        // Мимо по z
        assert!(wall
            .ray_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::X, 10.0)
            .is_none());

        // Слишком коротко
        assert!(wall.ray_intersect(Vec3::ZERO, Vec3::X, 4.0).is_none());
    }

    #[test]
    fn test_block_world_walkable_nearest() {
        let world = BlockWorld::default()
            .with_floor(Aabb::new(Vec3::new(-10.0, -0.5, -10.0), Vec3::new(10.0, 0.0, 10.0)))
            .with_floor(Aabb::new(Vec3::new(20.0, 2.5, -10.0), Vec3::new(40.0, 3.0, 10.0)));

        // Рядом с первым полом
        let snapped = world.sample_walkable(Vec3::new(2.0, 1.0, 2.0), 5.0).unwrap();
        assert_eq!(snapped, Vec3::new(2.0, 0.0, 2.0));

        // Над вторым этажом — цепляемся за его крышку
        let snapped = world.sample_walkable(Vec3::new(25.0, 4.0, 0.0), 5.0).unwrap();
        assert_eq!(snapped, Vec3::new(25.0, 3.0, 0.0));

        // В пустоте между ними — ничего в радиусе
        assert!(world.sample_walkable(Vec3::new(15.0, 10.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn test_block_world_masks() {
        let world = BlockWorld::default()
            .with_floor(Aabb::new(Vec3::new(-10.0, -0.5, -10.0), Vec3::new(10.0, 0.0, 10.0)))
            .with_wall(Aabb::new(Vec3::new(4.0, -1.0, -5.0), Vec3::new(5.0, 3.0, 5.0)));

        // Стена видна obstruction-лучу
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 10.0, OBSTRUCTION_MASK)
            .unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);

        // Пол не виден obstruction-лучу
        assert!(world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 10.0, OBSTRUCTION_MASK)
            .is_none());

        // Пол виден ground-лучу
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 10.0, GROUND_MASK)
            .unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-5);
    }
}

//! FSM components алиена (state machine, config, last heard sound, patrol anchor).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::nav::NavAgent;

/// Состояния алиена (звуко-ориентированный FSM)
///
/// Начальное состояние — Patrol. Таймеры живут в вариантах и считают вверх
/// от 0 на входе в состояние.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
#[require(AlienConfig, HeardSound, PatrolAnchor, NavAgent, Transform)]
pub enum AlienState {
    /// Пауза между перемещениями. resume — что возобновить после паузы
    /// (Idle прозрачен для окружающей последовательности поведения).
    Idle { timer: f32, resume: ResumeState },

    /// Патруль вокруг anchor'а: случайная точка в patrol_radius
    Patrol { destination: Option<Vec3> },

    /// Идём на последний услышанный звук на hunting_speed.
    /// Hunting — единственное re-enterable состояние: новый звук лишь
    /// обновляет данные HeardSound, без exit/enter side effects.
    Hunting,

    /// Замах перед прыжком: стоим, смотрим на цель
    PrepareAttack { timer: f32 },

    /// Прыжок: executed взводится после вызова LeapAttack::execute
    Attacking { executed: bool },

    /// Обыск окрестности последнего звука
    Investigating { timer: f32, destination: Option<Vec3> },

    /// Актёр мёртв (HP == 0), FSM отключен
    Dead,
}

impl Default for AlienState {
    fn default() -> Self {
        Self::Patrol { destination: None }
    }
}

impl AlienState {
    /// Атака в процессе — звуковые события игнорируются
    /// (инвариант: звук не перенаправляет начатую атаку)
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::PrepareAttack { .. } | Self::Attacking { .. })
    }

    /// Короткое имя для логов
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "Idle",
            Self::Patrol { .. } => "Patrol",
            Self::Hunting => "Hunting",
            Self::PrepareAttack { .. } => "PrepareAttack",
            Self::Attacking { .. } => "Attacking",
            Self::Investigating { .. } => "Investigating",
            Self::Dead => "Dead",
        }
    }
}

/// Что возобновить после Idle-паузы (аналог stateBeforeIdle)
///
/// Investigate несёт остаток investigate-таймера: пауза не перезапускает
/// обыск, иначе в тесной комнате он не закончился бы никогда.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ResumeState {
    Patrol,
    Investigate { timer: f32 },
}

/// Параметры алиена
///
/// Численные пороги подобраны эмпирически в оригинальной игре — поэтому
/// всё конфигурируемо, в коде систем констант нет.
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AlienConfig {
    /// Длительность Idle-паузы (секунды)
    pub idle_duration: f32,
    /// Длительность обыска до возврата в патруль (секунды)
    pub investigate_duration: f32,
    /// Замах перед прыжком (секунды)
    pub prepare_attack_duration: f32,

    /// Скорость патруля (m/s)
    pub patrol_speed: f32,
    /// Скорость охоты (m/s)
    pub hunting_speed: f32,

    /// Радиус патруля вокруг anchor'а (метры)
    pub patrol_radius: f32,
    /// Радиус обыска вокруг последнего звука (метры)
    pub investigate_radius: f32,

    /// Звуки тише порога не слышим (непрерывный шум шагов отфильтровывается)
    pub min_loudness: f32,

    /// Скорость цели ниже порога считаем стоячей (m/s) — глушим джиттер
    pub velocity_epsilon: f32,
    /// Радиус поиска walkable-поверхности при snap'е (метры)
    pub walkable_snap_radius: f32,

    /// Перелёт за предсказанную позицию цели (метры)
    pub overshoot_distance: f32,
    /// Отступ от стены при клиппинге overshoot-точки (метры)
    pub wall_clearance: f32,
    /// Высота над уровнем origin'а для вертикального ground-луча (метры)
    pub ground_ray_height: f32,
    /// Глубина вертикального ground-поиска (метры, мульти-этажность)
    pub ground_search_distance: f32,
}

impl Default for AlienConfig {
    fn default() -> Self {
        Self {
            idle_duration: 2.0,
            investigate_duration: 12.0,
            prepare_attack_duration: 1.5,
            patrol_speed: 2.0,
            hunting_speed: 5.0,
            patrol_radius: 15.0,
            investigate_radius: 6.0,
            min_loudness: 0.15,
            velocity_epsilon: 0.1,
            walkable_snap_radius: 5.0,
            overshoot_distance: 3.0,
            wall_clearance: 0.5,
            ground_ray_height: 2.0,
            ground_search_distance: 50.0,
        }
    }
}

/// Снимок последнего услышанного звука
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SoundSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub loudness: f32,
    /// Opaque scalar качества от perception-слоя
    pub quality: f32,
}

/// Component: последний услышанный звук (None — ещё ничего не слышали)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct HeardSound {
    pub sound: Option<SoundSnapshot>,
}

/// Якорь патруля
///
/// home — точка спавна (defaultPatrolCenter), current — текущий центр
/// сэмплирования: равен home в Patrol, позиции звука в Investigating.
/// Сбрасывается на home только при естественном истечении обыска.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolAnchor {
    pub home: Vec3,
    pub current: Vec3,
}

impl PatrolAnchor {
    pub fn new(home: Vec3) -> Self {
        Self {
            home,
            current: home,
        }
    }

    pub fn reset(&mut self) {
        self.current = self.home;
    }
}

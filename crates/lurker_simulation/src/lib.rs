//! LURKER Simulation Core
//!
//! ECS-симуляция охотящегося по звуку алиена (strategic layer) на Bevy 0.16.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (FSM алиена, hearing, предсказание цели, leap)
//! - Engine layer = tactical layer (рендер, NavMesh pathfinding, анимации) —
//!   вне этого crate; симуляция пишет команды в NavAgent/LeapAttack и
//!   опрашивает завершение, геометрию мира спрашивает через SpatialQueries.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod nav;
pub mod spatial;

// Re-export базовых типов для удобства
pub use ai::{
    AlienConfig, AlienPlugin, AlienState, HeardSound, PatrolAnchor, ResumeState, SoundEmitter,
    SoundEvent, SoundSnapshot,
};
pub use combat::{CombatPlugin, EntityDied, LeapAttack};
pub use components::{Actor, Health};
pub use nav::{NavAgent, NavPlugin};
pub use spatial::{
    Aabb, BlockWorld, OpenField, RaycastHit, SpatialQueries, WorldGeometry, GROUND_MASK,
    OBSTRUCTION_MASK,
};

// Re-export logger API (вызовы crate::log(...) из систем)
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};

/// Фазы симуляции внутри FixedUpdate.
///
/// Порядок фиксирован для детерминизма:
/// 1. Perception — ingest звуковых событий
/// 2. Decision — FSM transitions + конвертация state → команды
/// 3. Actuation — исполнители команд (nav driver, leap driver)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Perception,
    Decision,
    Actuation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct LurkerPlugin;

impl Plugin for LurkerPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Детерминистичный RNG (не перетираем seed, если тест уже вставил свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        // Геометрия мира по умолчанию — открытое поле (всё проходимо)
        app.init_resource::<WorldGeometry>();

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Perception,
                SimulationSet::Decision,
                SimulationSet::Actuation,
            )
                .chain(),
        );

        // Подсистемы (ECS strategic layer)
        app.add_plugins((AlienPlugin, CombatPlugin, NavPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один детерминированный тик симуляции.
///
/// Вместо app.update() (который копит реальное время и запускает FixedUpdate
/// нерегулярно) продвигаем Time<Fixed> ровно на один период и запускаем
/// schedule напрямую. Так тесты и headless бинарь шагают одинаково.
///
/// Event-буферы (SoundEvent, EntityDied) при этом не свопаются:
/// event_update_system живёт в Main-цикле, который здесь не запускается.
/// Для тестов и коротких прогонов рост буферов не важен; под движком тик
/// идёт через полный app.update(), и очистка событий — его забота.
pub fn step_fixed(app: &mut App) {
    let period = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(period);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-формат компонентов, отсортированный по Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

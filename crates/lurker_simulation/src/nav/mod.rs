//! Path planner / movement service contract + headless driver
//!
//! Симуляция не ходит по NavMesh сама: она пишет команды в NavAgent
//! (set_destination / stop / speed) и опрашивает прибытие
//! (remaining_distance <= stopping_distance, path_pending). В движке агент
//! исполняется NavigationAgent'ом; в headless режиме — drive_nav_agents ниже
//! (кинематическая интеграция по прямой, fixed timestep).

use bevy::prelude::*;

use crate::SimulationSet;

/// Polled-контракт внешнего планировщика пути.
///
/// Команды: set_destination / set_speed / stop.
/// Опрос: remaining_distance, path_pending, arrived().
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub is_stopped: bool,
    pub stopping_distance: f32,
    /// Остаток пути до цели; INFINITY пока путь не посчитан
    pub remaining_distance: f32,
    /// true между set_destination и первым просчётом пути
    pub path_pending: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 2.0,
            is_stopped: false,
            stopping_distance: 0.5,
            remaining_distance: f32::INFINITY,
            path_pending: false,
        }
    }
}

impl NavAgent {
    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.is_stopped = false;
        self.path_pending = true;
        self.remaining_distance = f32::INFINITY;
    }

    pub fn stop(&mut self) {
        self.destination = None;
        self.is_stopped = true;
        self.path_pending = false;
        self.remaining_distance = f32::INFINITY;
    }

    /// Цель достигнута (путь посчитан и остаток в пределах stopping_distance)
    pub fn arrived(&self) -> bool {
        !self.path_pending && self.remaining_distance <= self.stopping_distance
    }
}

/// Headless-исполнитель NavAgent команд.
///
/// Прямолинейная кинематика вместо NavMesh pathfinding'а: достаточно для
/// тестов и headless прогонов, engine bridge заменяет эту систему своей.
pub fn drive_nav_agents(
    mut agents: Query<(&mut NavAgent, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut agent, mut transform) in agents.iter_mut() {
        if agent.is_stopped {
            continue;
        }
        let Some(destination) = agent.destination else {
            continue;
        };

        // Headless: путь "посчитан" мгновенно
        if agent.path_pending {
            agent.path_pending = false;
        }

        let to_destination = destination - transform.translation;
        let distance = to_destination.length();
        let step = agent.speed * delta;

        if distance <= step {
            transform.translation = destination;
            agent.remaining_distance = 0.0;
        } else {
            transform.translation += to_destination / distance * step;
            agent.remaining_distance = distance - step;
        }
    }
}

/// Nav Plugin (headless driver в Actuation фазе)
pub struct NavPlugin;

impl Plugin for NavPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            drive_nav_agents.in_set(SimulationSet::Actuation),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_agent_commands() {
        let mut agent = NavAgent::default();
        assert!(!agent.arrived());

        agent.set_destination(Vec3::new(10.0, 0.0, 0.0));
        assert!(agent.path_pending);
        assert!(!agent.is_stopped);
        assert!(!agent.arrived()); // путь ещё не посчитан

        agent.path_pending = false;
        agent.remaining_distance = 0.3;
        assert!(agent.arrived());

        agent.stop();
        assert!(agent.is_stopped);
        assert!(!agent.arrived());
    }

    #[test]
    fn test_arrival_requires_path() {
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::ZERO);
        agent.remaining_distance = 0.0;
        // path_pending всё ещё true — прибытие не засчитывается
        assert!(!agent.arrived());
    }
}

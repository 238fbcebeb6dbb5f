//! Headless симуляция LURKER
//!
//! Прогоняет охоту алиена без рендера: выживший шумит шагами, алиен слышит,
//! охотится, прыгает, обыскивает. Полезно для ручной проверки FSM-логов.

use bevy::prelude::*;
use lurker_simulation::{
    create_headless_app, step_fixed, Actor, AlienConfig, AlienState, LeapAttack, LurkerPlugin,
    NavAgent, PatrolAnchor, SoundEmitter,
};

fn main() {
    let seed = 42;
    println!("Starting LURKER headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(LurkerPlugin);

    // Алиен в центре
    let alien = app
        .world_mut()
        .spawn((
            Actor { faction_id: 1 },
            AlienState::default(),
            AlienConfig::default(),
            PatrolAnchor::new(Vec3::ZERO),
            NavAgent::default(),
            LeapAttack::default(),
            Transform::from_translation(Vec3::ZERO),
        ))
        .id();

    // Выживший топает к дальней точке — источник шума
    app.world_mut().spawn((
        Actor { faction_id: 2 },
        SoundEmitter::default(),
        {
            let mut nav = NavAgent::default();
            nav.speed = 4.0;
            nav.set_destination(Vec3::new(-25.0, 0.0, 10.0));
            nav
        },
        Transform::from_translation(Vec3::new(20.0, 0.0, 0.0)),
    ));

    // 2000 тиков = ~33 секунды симуляции при 60Hz
    for tick in 0..2000 {
        step_fixed(&mut app);

        if tick % 200 == 0 {
            let state = app.world().get::<AlienState>(alien).expect("alien exists");
            let position = app
                .world()
                .get::<Transform>(alien)
                .expect("alien has transform")
                .translation;
            println!("Tick {}: alien {} at {:.1?}", tick, state.name(), position);
        }
    }

    println!("Simulation complete!");
}

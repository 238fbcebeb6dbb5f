//! Tests for alien FSM components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::fsm::{AlienConfig, AlienState, PatrolAnchor, ResumeState};

    #[test]
    fn test_alien_state_default_is_patrol() {
        let state = AlienState::default();
        assert!(matches!(state, AlienState::Patrol { destination: None }));
    }

    #[test]
    fn test_committed_states() {
        assert!(AlienState::PrepareAttack { timer: 0.0 }.is_committed());
        assert!(AlienState::Attacking { executed: false }.is_committed());

        assert!(!AlienState::Hunting.is_committed());
        assert!(!AlienState::default().is_committed());
        assert!(!AlienState::Idle {
            timer: 0.0,
            resume: ResumeState::Patrol
        }
        .is_committed());
        assert!(!AlienState::Dead.is_committed());
    }

    #[test]
    fn test_alien_config_default() {
        let config = AlienConfig::default();
        assert_eq!(config.velocity_epsilon, 0.1);
        assert_eq!(config.wall_clearance, 0.5);
        assert_eq!(config.walkable_snap_radius, 5.0);
        assert_eq!(config.ground_search_distance, 50.0);
        assert!(config.hunting_speed > config.patrol_speed);
    }

    #[test]
    fn test_patrol_anchor_reset() {
        let home = Vec3::new(1.0, 0.0, -3.0);
        let mut anchor = PatrolAnchor::new(home);
        assert_eq!(anchor.current, home);

        anchor.current = Vec3::new(10.0, 0.0, 0.0);
        anchor.reset();
        assert_eq!(anchor.current, home);
        assert_eq!(anchor.home, home);
    }
}

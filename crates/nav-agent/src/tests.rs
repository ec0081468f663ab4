//! Unit tests for nav-agent.

#[cfg(test)]
mod movable {
    use crate::MovableState;

    #[test]
    fn braking_distance() {
        let m = MovableState::new(10.0, 5.0);
        assert!((m.braking_distance_m().unwrap() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn stopped_agent_needs_no_distance() {
        assert_eq!(MovableState::new(0.0, 0.0).braking_distance_m(), Some(0.0));
    }

    #[test]
    fn moving_without_brakes_is_unbounded() {
        assert_eq!(MovableState::new(3.0, 0.0).braking_distance_m(), None);
    }
}

#[cfg(test)]
mod store {
    use nav_core::{AgentId, AreaId, MoverType};

    use crate::{ActionState, AgentStoreBuilder, AgentView, MovableState};

    #[test]
    fn builder_fills_defaults() {
        let store = AgentStoreBuilder::new(4)
            .mover_type(MoverType::Civil)
            .movable(MovableState::new(2.0, 4.0))
            .build();
        assert_eq!(store.count, 4);
        assert!(store.agent_ids().all(|a| store.mover_type(a) == MoverType::Civil));
        assert_eq!(store.movable(AgentId(3)).unwrap().speed_mps, 2.0);
        assert_eq!(store.action[0], ActionState::Idle);
    }

    #[test]
    fn push_agent_grows_all_arrays() {
        let mut store = AgentStoreBuilder::new(1).build();
        let id = store.push_agent(MoverType::Pedestrian);
        assert_eq!(id, AgentId(1));
        assert_eq!(store.count, 2);
        assert_eq!(store.transform.len(), 2);
        assert_eq!(store.collision.len(), 2);
        assert_eq!(store.mover_type(id), MoverType::Pedestrian);
    }

    #[test]
    fn despawned_agent_reads_as_unknown() {
        let mut store = AgentStoreBuilder::new(2)
            .mover_type(MoverType::Car)
            .movable(MovableState::new(5.0, 5.0))
            .build();
        store.set_current_area(AgentId(0), Some(AreaId(9)));
        assert!(store.is_in_area(AgentId(0), AreaId(9)));

        assert!(store.despawn(AgentId(0)));
        assert!(!store.despawn(AgentId(0)));
        assert!(!store.is_active(AgentId(0)));
        assert_eq!(store.mover_type(AgentId(0)), MoverType::Unknown);
        assert!(store.movable(AgentId(0)).is_none());
        assert!(!store.is_in_area(AgentId(0), AreaId(9)));
        assert_eq!(store.active_ids().collect::<Vec<_>>(), vec![AgentId(1)]);
    }

    #[test]
    fn out_of_range_agent_is_inactive() {
        let store = AgentStoreBuilder::new(1).build();
        assert!(!store.is_active(AgentId(5)));
        assert_eq!(store.current_area(AgentId(5)), None);
    }

    #[test]
    fn set_speed_attaches_movable() {
        let mut store = AgentStoreBuilder::new(1).build();
        store.set_speed(AgentId(0), 3.5);
        assert_eq!(store.movable(AgentId(0)).unwrap().speed_mps, 3.5);
        store.set_speed(AgentId(0), -1.0);
        assert_eq!(store.movable(AgentId(0)).unwrap().speed_mps, 0.0);
    }
}

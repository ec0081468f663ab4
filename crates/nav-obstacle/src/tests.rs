//! Unit tests for nav-obstacle.

use nav_agent::{AgentStore, AgentStoreBuilder, MovableState};
use nav_core::{AgentId, CollisionId, MoverType, Transform, Vec2};

use crate::ObstacleSnapshot;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn idle() -> ObstacleSnapshot {
    ObstacleSnapshot::default()
}

/// Stopped agents with a collision footprint attached.
fn parked(n: usize, mover: MoverType) -> AgentStore {
    let mut store = AgentStoreBuilder::new(n)
        .mover_type(mover)
        .movable(MovableState::new(0.0, 5.0))
        .build();
    for i in 0..n {
        store.collision[i] = Some(CollisionId(i as u32));
    }
    store
}

fn at(x: f32, y: f32) -> Transform {
    Transform::new(Vec2::new(x, y), 0.0)
}

// ── Rules ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rules {
    use super::*;
    use crate::{ClassifierConfig, ObstacleRule};

    #[test]
    fn default_rule() {
        let cfg = ClassifierConfig::default();
        assert!(ObstacleRule::Default.should_be_treated_as_static(&idle(), &cfg));
        for snapshot in [
            ObstacleSnapshot { has_move_target: true, ..idle() },
            ObstacleSnapshot { has_pending_action: true, ..idle() },
            ObstacleSnapshot { speed_mps: 1.0, ..idle() },
        ] {
            assert!(!ObstacleRule::Default.should_be_treated_as_static(&snapshot, &cfg));
        }
    }

    #[test]
    fn civil_person_evading_is_dynamic() {
        let cfg = ClassifierConfig::default();
        let evading = ObstacleSnapshot { about_to_evade: true, ..idle() };
        assert!(ObstacleRule::Default.should_be_treated_as_static(&evading, &cfg));
        assert!(!ObstacleRule::CivilPerson.should_be_treated_as_static(&evading, &cfg));
        assert!(!ObstacleRule::CivilCar.should_be_treated_as_static(&evading, &cfg));
    }

    #[test]
    fn civil_car_in_traffic_is_dynamic() {
        let cfg = ClassifierConfig::default();
        let waiting = ObstacleSnapshot { in_traffic: true, ..idle() };
        assert!(ObstacleRule::CivilPerson.should_be_treated_as_static(&waiting, &cfg));
        assert!(!ObstacleRule::CivilCar.should_be_treated_as_static(&waiting, &cfg));
    }

    #[test]
    fn rule_per_mover() {
        assert_eq!(ObstacleRule::for_mover(MoverType::Pedestrian), ObstacleRule::CivilPerson);
        assert_eq!(ObstacleRule::for_mover(MoverType::Civil), ObstacleRule::CivilCar);
        assert_eq!(ObstacleRule::for_mover(MoverType::Emergency), ObstacleRule::Default);
    }
}

// ── ObstacleClassifier ────────────────────────────────────────────────────────

#[cfg(test)]
mod classifier {
    use super::*;
    use crate::{
        ClassifierConfig, ObstacleClassifier, ObstacleError, ObstacleRule, ObstacleState,
        ObstacleTransition,
    };

    #[test]
    fn starts_dynamic_and_toggles() {
        let cfg = ClassifierConfig::default();
        let mut c = ObstacleClassifier::new(AgentId(0), ObstacleRule::Default);
        assert_eq!(c.state(), ObstacleState::Dynamic);
        assert_eq!(c.poll(&idle(), &cfg), Some(ObstacleTransition::ToStatic));
        assert_eq!(c.poll(&idle(), &cfg), None);
        let moving = ObstacleSnapshot { has_pending_action: true, ..idle() };
        assert_eq!(c.poll(&moving, &cfg), Some(ObstacleTransition::ToDynamic));
        assert_eq!(c.poll(&moving, &cfg), None);
    }

    #[test]
    fn transform_update_requires_static_and_collision() {
        let cfg = ClassifierConfig::default();
        let mut c = ObstacleClassifier::new(AgentId(0), ObstacleRule::Default);
        assert!(!c.needs_transform_update(&at(0.0, 0.0), &cfg.tolerance));

        c.poll(&idle(), &cfg);
        assert!(!c.needs_transform_update(&at(0.0, 0.0), &cfg.tolerance));

        c.refresh_collision(Some(CollisionId(3)));
        assert!(c.needs_transform_update(&at(0.0, 0.0), &cfg.tolerance));
        c.transfer_last_static_transform(at(0.0, 0.0)).unwrap();
        assert!(!c.needs_transform_update(&at(0.05, 0.0), &cfg.tolerance));
        assert!(c.needs_transform_update(&at(1.0, 0.0), &cfg.tolerance));
    }

    #[test]
    fn transfer_without_collision_fails() {
        let mut c = ObstacleClassifier::new(AgentId(4), ObstacleRule::Default);
        let err = c.transfer_last_static_transform(at(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, ObstacleError::MissingCollisionData(AgentId(4))));
        assert_eq!(c.last_static_transform(), None);
    }

    #[test]
    fn leaving_static_forgets_baked_transform() {
        let cfg = ClassifierConfig::default();
        let mut c = ObstacleClassifier::new(AgentId(0), ObstacleRule::Default);
        c.refresh_collision(Some(CollisionId(0)));
        c.poll(&idle(), &cfg);
        c.transfer_last_static_transform(at(2.0, 2.0)).unwrap();
        c.poll(&ObstacleSnapshot { speed_mps: 3.0, ..idle() }, &cfg);
        assert_eq!(c.last_static_transform(), None);
    }
}

// ── PollQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod poll_queue {
    use nav_core::Tick;

    use super::*;
    use crate::PollQueue;

    #[test]
    fn drains_everything_due() {
        let mut q = PollQueue::new();
        q.push(Tick(5), AgentId(2));
        q.push(Tick(3), AgentId(1));
        q.push(Tick(3), AgentId(1));
        q.push(Tick(9), AgentId(0));
        assert_eq!(q.len(), 4);
        assert_eq!(q.next_tick(), Some(Tick(3)));

        assert!(q.drain_due(Tick(2)).is_empty());
        assert_eq!(q.drain_due(Tick(6)), vec![AgentId(1), AgentId(2)]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(Tick(9)), vec![AgentId(0)]);
        assert!(q.is_empty());
    }

    #[test]
    fn remove_drops_every_entry_for_agent() {
        let mut q = PollQueue::new();
        q.push(Tick(3), AgentId(1));
        q.push(Tick(3), AgentId(2));
        q.push(Tick(7), AgentId(1));
        assert_eq!(q.remove(AgentId(1)), 2);
        assert_eq!(q.remove(AgentId(1)), 0);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_tick(), Some(Tick(3)));
        assert_eq!(q.drain_due(Tick(10)), vec![AgentId(2)]);
        assert!(q.is_empty());
    }
}

// ── ObstacleTracker ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tracker {
    use nav_agent::ActionState;
    use nav_core::Tick;

    use super::*;
    use crate::{ClassifierConfig, ObstacleError, ObstacleEvent, ObstacleRule, ObstacleState, ObstacleTracker};

    #[test]
    fn idle_agent_goes_static_then_dynamic_on_move() {
        let mut store = parked(1, MoverType::Car);
        let agent = AgentId(0);
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 10);
        tracker.register(agent, ObstacleRule::Default, Tick(0));

        let events = tracker.tick(Tick(0), &store).unwrap();
        assert_eq!(events, vec![
            ObstacleEvent::BecameStatic { agent },
            ObstacleEvent::StaticTransformUpdated { agent, transform: Transform::default() },
        ]);
        assert_eq!(tracker.state_of(agent), ObstacleState::Static);

        store.action[0] = ActionState::MoveInProgress;
        // Not due before the next period.
        assert!(tracker.tick(Tick(5), &store).unwrap().is_empty());
        assert!(tracker.is_static(agent));

        let events = tracker.tick(Tick(10), &store).unwrap();
        assert_eq!(events, vec![ObstacleEvent::BecameDynamic { agent }]);
        assert_eq!(tracker.state_of(agent), ObstacleState::Dynamic);
    }

    #[test]
    fn drifted_static_agent_is_rebaked() {
        let mut store = parked(1, MoverType::Car);
        let agent = AgentId(0);
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 1);
        tracker.register(agent, ObstacleRule::Default, Tick(0));
        tracker.tick(Tick(0), &store).unwrap();

        store.transform[0] = at(0.02, 0.0);
        assert!(tracker.tick(Tick(1), &store).unwrap().is_empty());

        store.transform[0] = at(3.0, 0.0);
        let events = tracker.tick(Tick(2), &store).unwrap();
        assert_eq!(events, vec![ObstacleEvent::StaticTransformUpdated { agent, transform: at(3.0, 0.0) }]);
    }

    #[test]
    fn static_without_collision_is_not_baked() {
        let mut store = parked(1, MoverType::Car);
        store.collision[0] = None;
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 1);
        tracker.register(AgentId(0), ObstacleRule::Default, Tick(0));
        let events = tracker.tick(Tick(0), &store).unwrap();
        assert_eq!(events, vec![ObstacleEvent::BecameStatic { agent: AgentId(0) }]);
        let err = tracker.transfer_static_transform(AgentId(0), at(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ObstacleError::MissingCollisionData(_)));
    }

    #[test]
    fn civil_car_in_traffic_stays_dynamic() {
        let mut store = parked(2, MoverType::Civil);
        store.in_traffic[1] = true;
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 5);
        for a in 0..2 {
            tracker.register(AgentId(a), ObstacleRule::for_mover(MoverType::Civil), Tick(0));
        }
        let events = tracker.tick(Tick(0), &store).unwrap();
        assert!(events.iter().all(|e| e.agent() == AgentId(0)));
        assert!(tracker.is_static(AgentId(0)));
        assert!(!tracker.is_static(AgentId(1)));
    }

    #[test]
    fn unregister_is_idempotent_and_despawned_agents_drop_out() {
        let mut store = parked(2, MoverType::Car);
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 1);
        tracker.register(AgentId(0), ObstacleRule::Default, Tick(0));
        tracker.register(AgentId(1), ObstacleRule::Default, Tick(0));

        assert!(tracker.unregister(AgentId(0)).is_some());
        assert!(tracker.unregister(AgentId(0)).is_none());

        store.despawn(AgentId(1));
        assert!(tracker.tick(Tick(0), &store).unwrap().is_empty());
        assert!(tracker.is_empty());
        assert!(matches!(
            tracker.set_rule(AgentId(1), ObstacleRule::CivilCar),
            Err(ObstacleError::NotRegistered(_))
        ));
    }

    #[test]
    fn register_after_unregister_polls_on_one_schedule() {
        let mut store = parked(1, MoverType::Car);
        let agent = AgentId(0);
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 10);
        tracker.register(agent, ObstacleRule::Default, Tick(0));
        tracker.tick(Tick(0), &store).unwrap();

        tracker.unregister(agent);
        assert_eq!(tracker.pending_polls(), 0);
        tracker.register(agent, ObstacleRule::Default, Tick(5));
        assert_eq!(tracker.pending_polls(), 1);

        // Moving during [5,10), [15,20), ...; idle in between.  Polls at
        // 5, 15, 25, ... always see a moving agent.
        let mut events = Vec::new();
        for t in 5..=45u64 {
            store.action[0] = if (t / 5) % 2 == 1 { ActionState::MoveInProgress } else { ActionState::Idle };
            events.extend(tracker.tick(Tick(t), &store).unwrap());
        }
        // A second schedule at 10, 20, ... would see it idle and flip it.
        assert!(events.is_empty());
        assert!(!tracker.is_static(agent));
        assert_eq!(tracker.pending_polls(), 1);
    }

    #[test]
    fn reregister_keeps_state() {
        let store = parked(1, MoverType::Pedestrian);
        let mut tracker = ObstacleTracker::new(ClassifierConfig::default(), 1);
        tracker.register(AgentId(0), ObstacleRule::Default, Tick(0));
        tracker.tick(Tick(0), &store).unwrap();
        tracker.register(AgentId(0), ObstacleRule::CivilPerson, Tick(0));
        assert!(tracker.is_static(AgentId(0)));
        assert_eq!(tracker.classifier(AgentId(0)).map(|c| c.rule()), Some(ObstacleRule::CivilPerson));
    }
}

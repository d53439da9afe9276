use std::sync::Arc;
use std::sync::atomic::Ordering::Relaxed;

use loom::sync::atomic::AtomicBool;
use loom::thread::spawn;

use crate::{Class, Coordinator, Direction};

#[test]
fn car_blocks_pedestrian() {
    loom::model(|| {
        let coordinator = Arc::new(Coordinator::default());
        let check = Arc::new(AtomicBool::new(false));

        coordinator.request_entry_car_sync(Direction::North);

        let coordinator_clone = coordinator.clone();
        let check_clone = check.clone();
        let thread = spawn(move || {
            coordinator_clone.request_entry_pedestrian_sync();
            assert!(check_clone.load(Relaxed));
            assert!(coordinator_clone.release_pedestrian().is_ok());
        });

        check.store(true, Relaxed);
        assert!(coordinator.release_car(Direction::North).is_ok());
        assert!(thread.join().is_ok());
        assert!(coordinator.snapshot().is_vacant());
    });
}

#[test]
fn opposing_cars() {
    loom::model(|| {
        let coordinator = Arc::new(Coordinator::default());

        let threads: Vec<_> = Direction::ALL
            .into_iter()
            .map(|direction| {
                let coordinator = coordinator.clone();
                spawn(move || {
                    coordinator.request_entry_car_sync(direction);
                    let state = coordinator.snapshot();
                    assert_eq!(state.occupying_class(), Some(direction.into()));
                    assert_eq!(state.occupants(direction.opposite().into()), 0);
                    assert!(coordinator.release_car(direction).is_ok());
                })
            })
            .collect();

        for thread in threads {
            assert!(thread.join().is_ok());
        }
        assert!(coordinator.snapshot().is_vacant());
    });
}

#[test]
fn pedestrians_share() {
    loom::model(|| {
        let coordinator = Arc::new(Coordinator::default());

        coordinator.request_entry_pedestrian_sync();

        let coordinator_clone = coordinator.clone();
        let thread = spawn(move || {
            coordinator_clone.request_entry_sync(Class::Pedestrian);
            assert!(coordinator_clone.release_pedestrian().is_ok());
        });

        assert!(coordinator.release_pedestrian().is_ok());
        assert!(thread.join().is_ok());
        assert!(coordinator.snapshot().is_vacant());
    });
}

#[test]
fn async_admission() {
    loom::model(|| {
        let coordinator = Arc::new(Coordinator::default());

        coordinator.request_entry_car_sync(Direction::North);

        let coordinator_clone = coordinator.clone();
        let thread = spawn(move || {
            loom::future::block_on(coordinator_clone.request_entry_pedestrian_async());
            assert_eq!(coordinator_clone.snapshot().occupants_north(), 0);
            assert!(coordinator_clone.release_pedestrian().is_ok());
        });

        assert!(coordinator.release_car(Direction::North).is_ok());
        assert!(thread.join().is_ok());
        assert!(coordinator.snapshot().is_vacant());
        assert_eq!(coordinator.waiting(Class::Pedestrian), 0);
    });
}

#[test]
fn drop_future() {
    loom::model(|| {
        let coordinator = Arc::new(Coordinator::default());

        coordinator.request_entry_car_sync(Direction::South);

        let coordinator_clone = coordinator.clone();
        let thread = spawn(move || {
            assert!(coordinator_clone.release_car(Direction::South).is_ok());
        });

        coordinator.test_drop_admission(Class::Pedestrian);
        assert!(thread.join().is_ok());
        assert!(coordinator.snapshot().is_vacant());
        assert_eq!(coordinator.waiting(Class::Pedestrian), 0);
    });
}

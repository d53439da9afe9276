use crossing::{Class, Coordinator, Direction, Error};

#[test]
fn car_exclusive() {
    let coordinator = Coordinator::default();

    coordinator.request_entry_car_sync(Direction::North);

    assert!(!coordinator.try_request_entry_car(Direction::South));
    assert!(!coordinator.try_request_entry_pedestrian());
    assert!(coordinator.try_request_entry_car(Direction::North));

    assert!(matches!(
        coordinator.release_pedestrian(),
        Err(Error::NotOccupied { class: Class::Pedestrian })
    ));
    assert!(coordinator.release_car(Direction::North).is_ok());
    assert!(coordinator.release_car(Direction::North).is_ok());
    assert!(coordinator.snapshot().is_vacant());
}

#[test]
fn pedestrian_passage() {
    let coordinator = Coordinator::default();

    let passage = coordinator.enter_pedestrian_sync();
    assert_eq!(passage.class(), Class::Pedestrian);
    assert!(coordinator.try_request_entry_pedestrian());
    assert_eq!(coordinator.snapshot().occupants_pedestrian(), 2);

    drop(passage);
    assert!(!coordinator.try_request_entry_car(Direction::North));
    assert!(coordinator.release_pedestrian().is_ok());
    assert!(coordinator.try_request_entry_car(Direction::North));
    assert!(coordinator.release_car(Direction::North).is_ok());
}

#[test]
fn async_entry() {
    let coordinator = Coordinator::default();

    futures::executor::block_on(async {
        coordinator.request_entry_car_async(Direction::South).await;
        let passage = coordinator.enter_car_async(Direction::South).await;
        assert_eq!(coordinator.snapshot().occupants_south(), 2);
        drop(passage);
    });

    assert!(coordinator.release_car(Direction::South).is_ok());
    assert!(coordinator.snapshot().is_vacant());
}

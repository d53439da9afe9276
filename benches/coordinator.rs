use criterion::{Criterion, criterion_group, criterion_main};
use crossing::{Coordinator, Direction};

fn enter_release(c: &mut Criterion) {
    c.bench_function("coordinator-enter-release", |b| {
        b.iter(|| {
            let coordinator = Coordinator::default();
            coordinator.request_entry_car_sync(Direction::North);
            assert!(coordinator.release_car(Direction::North).is_ok());
        });
    });
}

fn enter_enter_release_release(c: &mut Criterion) {
    c.bench_function("coordinator-enter-enter-release-release", |b| {
        b.iter(|| {
            let coordinator = Coordinator::default();
            coordinator.request_entry_pedestrian_sync();
            coordinator.request_entry_pedestrian_sync();
            assert!(coordinator.release_pedestrian().is_ok());
            assert!(coordinator.release_pedestrian().is_ok());
        });
    });
}

fn alternate_classes(c: &mut Criterion) {
    c.bench_function("coordinator-alternate-classes", |b| {
        let coordinator = Coordinator::default();
        b.iter(|| {
            for direction in Direction::ALL {
                let passage = coordinator.enter_car_sync(direction);
                drop(passage);
            }
            let passage = coordinator.enter_pedestrian_sync();
            drop(passage);
        });
    });
}

criterion_group!(
    coordinator,
    enter_release,
    enter_enter_release_release,
    alternate_classes,
);
criterion_main!(coordinator);

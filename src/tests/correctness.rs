use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use crate::{Class, Coordinator, CrossingState};

#[derive(Clone, Copy, Debug)]
enum Op {
    Enter(Class),
    Leave(Class),
}

fn class() -> impl Strategy<Value = Class> {
    prop_oneof![Just(Class::North), Just(Class::South), Just(Class::Pedestrian)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![class().prop_map(Op::Enter), class().prop_map(Op::Leave)]
}

/// Reference counters maintained next to the coordinator.
#[derive(Default)]
struct Model([usize; 3]);

impl Model {
    fn admits(&self, class: Class) -> bool {
        Class::ALL
            .into_iter()
            .filter(|other| *other != class)
            .all(|other| self.0[other.index()] == 0)
    }

    fn matches(&self, state: &CrossingState) -> bool {
        Class::ALL
            .into_iter()
            .all(|class| state.occupants(class) == self.0[class.index()])
    }
}

proptest! {
    #[test]
    fn interleaving_keeps_mutual_exclusion(ops in proptest::collection::vec(op(), 1..256)) {
        let coordinator = Coordinator::default();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Enter(class) => {
                    let admitted = coordinator.try_request_entry(class);
                    prop_assert_eq!(admitted, model.admits(class));
                    if admitted {
                        model.0[class.index()] += 1;
                    }
                }
                Op::Leave(class) => {
                    let released = coordinator.release(class).is_ok();
                    prop_assert_eq!(released, model.0[class.index()] != 0);
                    if released {
                        model.0[class.index()] -= 1;
                    }
                }
            }
            let state = coordinator.snapshot();
            prop_assert!(state.is_consistent());
            prop_assert!(model.matches(&state));
        }

        for class in Class::ALL {
            for _ in 0..model.0[class.index()] {
                prop_assert!(coordinator.release(class).is_ok());
            }
        }
        prop_assert!(coordinator.snapshot().is_vacant());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn concurrent_entities_balance(classes in proptest::collection::vec(class(), 1..24)) {
        let coordinator = Arc::new(Coordinator::default());

        let mut threads = Vec::new();
        for (i, class) in classes.iter().copied().enumerate() {
            let coordinator = coordinator.clone();
            threads.push(thread::spawn(move || {
                for _ in 0..4 {
                    coordinator.request_entry_sync(class);
                    let state = coordinator.snapshot();
                    assert!(state.is_consistent());
                    assert_eq!(state.occupying_class(), Some(class));
                    if i % 3 == 0 {
                        thread::yield_now();
                    }
                    assert!(coordinator.release(class).is_ok());
                }
            }));
        }

        for thread in threads {
            prop_assert!(thread.join().is_ok());
        }
        prop_assert!(coordinator.snapshot().is_vacant());
    }
}

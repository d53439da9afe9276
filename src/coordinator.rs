//! [`Coordinator`] arbitrates access to a one-way crossing shared by cars heading in two
//! directions and pedestrians.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
#[cfg(not(feature = "loom"))]
use std::sync::{Condvar, Mutex, MutexGuard};
use std::sync::PoisonError;
use std::task::{Context, Poll, Waker};

#[cfg(feature = "loom")]
use loom::sync::{Condvar, Mutex, MutexGuard};

use crate::wait_queue::WaitQueue;
use crate::{Class, CrossingState, Direction, Error, Passage};

/// [`Coordinator`] arbitrates access to a one-way crossing.
///
/// Cars may cross concurrently only if they travel in the same direction, and pedestrians may
/// cross concurrently with each other but never with a car. Every operation is a critical
/// section under a single lock; a blocked entity waits on the queue of its class and re-checks
/// its admission predicate each time it is woken. When a class vacates the crossing, every
/// waiter of every class is woken.
///
/// There is no priority between classes: a continuous stream of one class can keep the others
/// waiting indefinitely.
///
/// # Examples
///
/// ```
/// use crossing::{Coordinator, Direction};
///
/// let coordinator = Coordinator::default();
///
/// coordinator.request_entry_car_sync(Direction::North);
/// assert!(coordinator.try_request_entry_car(Direction::North));
/// assert!(!coordinator.try_request_entry_pedestrian());
///
/// assert!(coordinator.release_car(Direction::North).is_ok());
/// assert!(coordinator.release_car(Direction::North).is_ok());
/// assert!(coordinator.try_request_entry_pedestrian());
/// ```
pub struct Coordinator {
    /// Occupant counters and wait queues.
    inner: Mutex<Inner>,
    /// Condition variables of parked threads, one per class.
    condvars: [Condvar; 3],
}

/// State protected by the [`Coordinator`] lock.
#[derive(Debug, Default)]
struct Inner {
    /// Entities currently on the crossing.
    crossing: CrossingState,
    /// Entities waiting to enter, one queue per class.
    wait_queues: [WaitQueue; 3],
}

/// Pending asynchronous admission.
///
/// Dropping it before completion withdraws the request without admitting the entity.
struct Admission<'c> {
    /// The coordinator to enter.
    coordinator: &'c Coordinator,
    /// Class of the entity.
    class: Class,
    /// Key of the registered waker.
    key: Option<u64>,
    /// The entity has been admitted.
    admitted: bool,
}

impl Coordinator {
    /// Creates a new [`Coordinator`] with a vacant crossing.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Coordinator;
    ///
    /// let coordinator = Coordinator::new();
    /// assert!(coordinator.snapshot().is_vacant());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            condvars: [Condvar::new(), Condvar::new(), Condvar::new()],
        }
    }

    /// Returns a copy of the occupant counters.
    ///
    /// The copy may be outdated as soon as it is returned; it is meant for diagnostics only.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Coordinator;
    ///
    /// let coordinator = Coordinator::default();
    /// coordinator.request_entry_pedestrian_sync();
    /// assert_eq!(coordinator.snapshot().occupants_pedestrian(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> CrossingState {
        self.lock_inner().crossing
    }

    /// Returns the number of threads and tasks of the class waiting to enter.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Class, Coordinator};
    ///
    /// let coordinator = Coordinator::default();
    /// assert_eq!(coordinator.waiting(Class::North), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn waiting(&self, class: Class) -> usize {
        self.lock_inner().wait_queues[class.index()].len()
    }

    /// Enters the crossing as a car heading in the direction, synchronously.
    ///
    /// Blocks the current thread until neither opposing cars nor pedestrians are on the crossing.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Coordinator, Direction};
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// coordinator.request_entry_car_sync(Direction::North);
    /// coordinator.request_entry_car_sync(Direction::North);
    /// assert_eq!(coordinator.snapshot().occupants_north(), 2);
    /// ```
    #[inline]
    pub fn request_entry_car_sync(&self, direction: Direction) {
        self.request_entry_sync(direction.into());
    }

    /// Enters the crossing as a car heading in the direction, asynchronously.
    ///
    /// The request is withdrawn if the returned future is dropped before completion.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Coordinator, Direction};
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// async {
    ///     coordinator.request_entry_car_async(Direction::South).await;
    ///     assert_eq!(coordinator.snapshot().occupants_south(), 1);
    /// };
    /// ```
    #[inline]
    pub async fn request_entry_car_async(&self, direction: Direction) {
        self.request_entry_async(direction.into()).await;
    }

    /// Tries to enter the crossing as a car heading in the direction.
    ///
    /// Returns `false` if opposing cars or pedestrians are on the crossing.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Coordinator, Direction};
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// assert!(coordinator.try_request_entry_car(Direction::North));
    /// assert!(!coordinator.try_request_entry_car(Direction::South));
    /// ```
    #[inline]
    pub fn try_request_entry_car(&self, direction: Direction) -> bool {
        self.try_request_entry(direction.into())
    }

    /// Leaves the crossing as a car heading in the direction.
    ///
    /// Wakes every waiting entity if this was the last car heading in the direction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOccupied`] if no car heading in the direction is on the crossing; the
    /// counters are left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Coordinator, Direction};
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// coordinator.request_entry_car_sync(Direction::South);
    /// assert!(coordinator.release_car(Direction::South).is_ok());
    /// assert!(coordinator.release_car(Direction::South).is_err());
    /// ```
    #[inline]
    pub fn release_car(&self, direction: Direction) -> Result<(), Error> {
        self.release(direction.into())
    }

    /// Enters the crossing as a pedestrian, synchronously.
    ///
    /// Blocks the current thread until no cars are on the crossing.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Coordinator;
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// coordinator.request_entry_pedestrian_sync();
    /// coordinator.request_entry_pedestrian_sync();
    /// assert_eq!(coordinator.snapshot().occupants_pedestrian(), 2);
    /// ```
    #[inline]
    pub fn request_entry_pedestrian_sync(&self) {
        self.request_entry_sync(Class::Pedestrian);
    }

    /// Enters the crossing as a pedestrian, asynchronously.
    ///
    /// The request is withdrawn if the returned future is dropped before completion.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Coordinator;
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// async {
    ///     coordinator.request_entry_pedestrian_async().await;
    ///     assert_eq!(coordinator.snapshot().occupants_pedestrian(), 1);
    /// };
    /// ```
    #[inline]
    pub async fn request_entry_pedestrian_async(&self) {
        self.request_entry_async(Class::Pedestrian).await;
    }

    /// Tries to enter the crossing as a pedestrian.
    ///
    /// Returns `false` if cars are on the crossing.
    #[inline]
    pub fn try_request_entry_pedestrian(&self) -> bool {
        self.try_request_entry(Class::Pedestrian)
    }

    /// Leaves the crossing as a pedestrian.
    ///
    /// Wakes every waiting entity if this was the last pedestrian.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOccupied`] if no pedestrian is on the crossing; the counters are left
    /// untouched.
    #[inline]
    pub fn release_pedestrian(&self) -> Result<(), Error> {
        self.release(Class::Pedestrian)
    }

    /// Enters the crossing as an entity of the class, synchronously.
    pub fn request_entry_sync(&self, class: Class) {
        let mut inner = self.lock_inner();
        if !inner.crossing.admits(class) {
            inner.wait_queues[class.index()].park();
            while !inner.crossing.admits(class) {
                inner = self.condvars[class.index()]
                    .wait(inner)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            inner.wait_queues[class.index()].unpark();
        }
        inner.crossing.enter(class);
        tracing::trace!(%class, occupants = inner.crossing.occupants(class), "admitted");
    }

    /// Enters the crossing as an entity of the class, asynchronously.
    pub async fn request_entry_async(&self, class: Class) {
        Admission {
            coordinator: self,
            class,
            key: None,
            admitted: false,
        }
        .await;
    }

    /// Tries to enter the crossing as an entity of the class.
    ///
    /// Returns `false` if the class cannot enter right now.
    pub fn try_request_entry(&self, class: Class) -> bool {
        let mut inner = self.lock_inner();
        if !inner.crossing.admits(class) {
            return false;
        }
        inner.crossing.enter(class);
        tracing::trace!(%class, occupants = inner.crossing.occupants(class), "admitted");
        true
    }

    /// Leaves the crossing as an entity of the class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOccupied`] if no entity of the class is on the crossing.
    pub fn release(&self, class: Class) -> Result<(), Error> {
        let mut woken = Vec::new();
        {
            let mut inner = self.lock_inner();
            if !inner.crossing.leave(class)? {
                return Ok(());
            }
            tracing::debug!(%class, waiting = ?inner.waiting(), "vacated");
            for (condvar, wait_queue) in self.condvars.iter().zip(inner.wait_queues.iter_mut()) {
                condvar.notify_all();
                wait_queue.drain_into(&mut woken);
            }
        }
        woken.into_iter().for_each(Waker::wake);
        Ok(())
    }

    /// Enters the crossing as a car and returns a [`Passage`] releasing it when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::{Coordinator, Direction};
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// let passage = coordinator.enter_car_sync(Direction::North);
    /// assert_eq!(coordinator.snapshot().occupants_north(), 1);
    ///
    /// drop(passage);
    /// assert!(coordinator.snapshot().is_vacant());
    /// ```
    #[inline]
    pub fn enter_car_sync(&self, direction: Direction) -> Passage<'_> {
        self.request_entry_car_sync(direction);
        Passage::new(self, direction.into())
    }

    /// Enters the crossing as a car and returns a [`Passage`] releasing it when dropped.
    #[inline]
    pub async fn enter_car_async(&self, direction: Direction) -> Passage<'_> {
        self.request_entry_car_async(direction).await;
        Passage::new(self, direction.into())
    }

    /// Enters the crossing as a pedestrian and returns a [`Passage`] releasing it when dropped.
    #[inline]
    pub fn enter_pedestrian_sync(&self) -> Passage<'_> {
        self.request_entry_pedestrian_sync();
        Passage::new(self, Class::Pedestrian)
    }

    /// Enters the crossing as a pedestrian and returns a [`Passage`] releasing it when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossing::Coordinator;
    ///
    /// let coordinator = Coordinator::default();
    ///
    /// async {
    ///     let passage = coordinator.enter_pedestrian_async().await;
    ///     assert!(!coordinator.snapshot().is_vacant());
    ///     drop(passage);
    /// };
    /// ```
    #[inline]
    pub async fn enter_pedestrian_async(&self) -> Passage<'_> {
        self.request_entry_pedestrian_async().await;
        Passage::new(self, Class::Pedestrian)
    }

    /// Acquires the lock, recovering it if a previous owner panicked.
    ///
    /// Every critical section leaves the counters consistent before it can panic.
    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tests whether a pending asynchronous request can be dropped safely.
    ///
    /// Returns the key under which the waker had been registered, if the request was pending.
    #[cfg(test)]
    pub(crate) fn test_drop_admission(&self, class: Class) -> Option<u64> {
        let waker = Waker::noop();
        let mut admission = Admission {
            coordinator: self,
            class,
            key: None,
            admitted: false,
        };
        let poll = Pin::new(&mut admission).poll(&mut Context::from_waker(waker));
        let key = admission.key;
        drop(admission);
        if poll.is_ready() {
            assert!(self.release(class).is_ok());
        }
        if let Some(key) = key {
            assert!(!self.lock_inner().wait_queues[class.index()].is_registered(key));
        }
        key
    }
}

impl Default for Coordinator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock_inner();
        f.debug_struct("Coordinator")
            .field("crossing", &inner.crossing)
            .field("waiting", &inner.waiting())
            .finish()
    }
}

impl Inner {
    /// Returns the number of waiters of each class.
    fn waiting(&self) -> [usize; 3] {
        [
            self.wait_queues[0].len(),
            self.wait_queues[1].len(),
            self.wait_queues[2].len(),
        ]
    }
}

impl Future for Admission<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.admitted {
            return Poll::Ready(());
        }

        let mut guard = this.coordinator.lock_inner();
        let inner = &mut *guard;
        let wait_queue = &mut inner.wait_queues[this.class.index()];
        if inner.crossing.admits(this.class) {
            if let Some(key) = this.key.take() {
                wait_queue.deregister(key);
            }
            inner.crossing.enter(this.class);
            this.admitted = true;
            tracing::trace!(
                class = %this.class,
                occupants = inner.crossing.occupants(this.class),
                "admitted"
            );
            return Poll::Ready(());
        }

        match this.key {
            Some(key) => wait_queue.update(key, cx.waker()),
            None => this.key = Some(wait_queue.register(cx.waker())),
        }
        Poll::Pending
    }
}

impl Drop for Admission<'_> {
    #[inline]
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.coordinator.lock_inner().wait_queues[self.class.index()].deregister(key);
        }
    }
}

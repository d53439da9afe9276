//! Wait queue bookkeeping for entities blocked on the crossing.

use std::task::Waker;

/// Entities of one class waiting to enter the crossing.
///
/// Synchronous waiters are parked on the condition variable of their class and are only counted
/// here; asynchronous waiters register their [`Waker`] under a key so that a cancelled request
/// can withdraw it. The [`WaitQueue`] is always accessed under the coordinator lock.
#[derive(Debug, Default)]
pub(crate) struct WaitQueue {
    /// Number of threads parked on the condition variable.
    parked: usize,
    /// Wakers of pending tasks.
    wakers: Vec<(u64, Waker)>,
    /// Key to assign to the next registered waker.
    next_key: u64,
}

impl WaitQueue {
    /// Returns the number of waiting threads and tasks.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.parked + self.wakers.len()
    }

    /// A thread is about to wait on the condition variable.
    #[inline]
    pub(crate) fn park(&mut self) {
        self.parked += 1;
    }

    /// A parked thread has been admitted.
    #[inline]
    pub(crate) fn unpark(&mut self) {
        debug_assert_ne!(self.parked, 0);
        self.parked -= 1;
    }

    /// Registers the waker of a pending task, returning the key to withdraw it.
    pub(crate) fn register(&mut self, waker: &Waker) -> u64 {
        let key = self.next_key;
        self.next_key = self.next_key.wrapping_add(1);
        self.wakers.push((key, waker.clone()));
        key
    }

    /// Refreshes the waker registered under the key.
    ///
    /// The entry is pushed again if a broadcast has taken it in the meantime.
    pub(crate) fn update(&mut self, key: u64, waker: &Waker) {
        if let Some((_, registered)) = self.wakers.iter_mut().find(|(k, _)| *k == key) {
            if !registered.will_wake(waker) {
                registered.clone_from(waker);
            }
        } else {
            self.wakers.push((key, waker.clone()));
        }
    }

    /// Withdraws the waker registered under the key.
    pub(crate) fn deregister(&mut self, key: u64) {
        if let Some(pos) = self.wakers.iter().position(|(k, _)| *k == key) {
            self.wakers.swap_remove(pos);
        }
    }

    /// Moves every registered waker into `woken`.
    ///
    /// The wakers must be woken after the coordinator lock is released.
    pub(crate) fn drain_into(&mut self, woken: &mut Vec<Waker>) {
        woken.extend(self.wakers.drain(..).map(|(_, waker)| waker));
    }

    /// Returns `true` if a waker is registered under the key.
    #[cfg(test)]
    pub(crate) fn is_registered(&self, key: u64) -> bool {
        self.wakers.iter().any(|(k, _)| *k == key)
    }
}

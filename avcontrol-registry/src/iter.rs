//! Blocking consumption of registry notifications
//!
//! Provides the same iteration patterns as any channel consumer:
//! - Blocking: `recv()`, `for event in notifications`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`

use std::sync::mpsc;
use std::time::Duration;

/// Stream of add/remove notifications for one registry topic
///
/// Each subscriber owns its own queue, so a slow subscriber never delays
/// the registry or other subscribers. Dropping it unsubscribes.
///
/// # Example
///
/// ```rust,ignore
/// let devices = registry.subscribe_devices();
///
/// // Blocking iteration
/// for event in devices {
///     println!("{:?} {}", event.is_added(), event.usn());
/// }
/// ```
pub struct Notifications<E> {
    rx: mpsc::Receiver<E>,
}

impl<E> Notifications<E> {
    pub(crate) fn new(rx: mpsc::Receiver<E>) -> Self {
        Self { rx }
    }

    /// Block until the next notification is available
    ///
    /// Returns `None` if the registry has been dropped.
    pub fn recv(&self) -> Option<E> {
        self.rx.recv().ok()
    }

    /// Block until the next notification or timeout expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<E> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Try to receive a notification without blocking
    pub fn try_recv(&self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Iterator over the notifications currently queued, without blocking
    pub fn try_iter(&self) -> TryIter<'_, E> {
        TryIter { inner: self }
    }

    /// Iterator that waits up to `timeout` for each notification
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_, E> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl<E> Iterator for Notifications<E> {
    type Item = E;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over currently queued notifications
pub struct TryIter<'a, E> {
    inner: &'a Notifications<E>,
}

impl<'a, E> Iterator for TryIter<'a, E> {
    type Item = E;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a, E> {
    inner: &'a Notifications<E>,
    timeout: Duration,
}

impl<'a, E> Iterator for TimeoutIter<'a, E> {
    type Item = E;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}

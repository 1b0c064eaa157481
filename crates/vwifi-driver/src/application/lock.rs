//! Interruptible lock acquisition.
//!
//! The interface state is guarded by a mutex whose *wait* can be cut short.
//! A waiter passes an [`Interrupt`]; if the interrupt fires before the lock
//! becomes free, [`InterruptibleMutex::lock`] returns [`LockInterrupted`]
//! instead of blocking any longer.
//!
//! Acquisition semantics:
//!
//! ```text
//! lock free?          ──yes──► acquired (interrupt not consulted)
//!    │ no
//!    ▼
//! wait for whichever comes first:
//!    interrupt fired  ──────► Err(LockInterrupted)
//!    lock released    ──────► acquired
//! ```
//!
//! Only a wait can be interrupted; an uncontended acquisition always
//! succeeds.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex, MutexGuard};

/// Returned when a lock wait is cut short by its [`Interrupt`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("wait for the interface lock was interrupted")]
pub struct LockInterrupted;

/// A one-shot, cloneable interrupt signal.
///
/// Clones share the same flag: triggering any clone wakes every waiter
/// holding any other clone.  Once triggered it stays triggered.
#[derive(Debug, Clone)]
pub struct Interrupt {
    tx: Arc<watch::Sender<bool>>,
}

impl Interrupt {
    /// Creates an interrupt that has not fired.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fires the interrupt.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once [`trigger`](Self::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the interrupt has fired.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns once the flag is set.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

/// A mutex whose waits can be interrupted.
#[derive(Debug, Default)]
pub struct InterruptibleMutex<T> {
    inner: Mutex<T>,
}

impl<T> InterruptibleMutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Acquires the lock, giving up if `interrupt` fires while waiting.
    ///
    /// # Errors
    ///
    /// Returns [`LockInterrupted`] if the lock was contended and `interrupt`
    /// fired before it was released.
    pub async fn lock(&self, interrupt: &Interrupt) -> Result<MutexGuard<'_, T>, LockInterrupted> {
        if let Ok(guard) = self.inner.try_lock() {
            return Ok(guard);
        }

        tokio::select! {
            biased;
            _ = interrupt.triggered() => Err(LockInterrupted),
            guard = self.inner.lock() => Ok(guard),
        }
    }

    /// Acquires the lock, waiting as long as it takes.
    pub async fn lock_uninterruptible(&self) -> MutexGuard<'_, T> {
        self.inner.lock().await
    }

    /// Acquires the lock only if it is free right now.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.inner.try_lock().ok()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_interrupt_is_not_triggered() {
        assert!(!Interrupt::new().is_triggered());
    }

    #[test]
    fn test_trigger_is_visible_through_clones() {
        let a = Interrupt::new();
        let b = a.clone();
        b.trigger();
        assert!(a.is_triggered());
    }

    #[tokio::test]
    async fn test_triggered_resolves_immediately_when_already_fired() {
        let interrupt = Interrupt::new();
        interrupt.trigger();

        let result = tokio::time::timeout(Duration::from_millis(50), interrupt.triggered()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_uncontended_lock_succeeds_even_when_interrupted() {
        // Arrange
        let mutex = InterruptibleMutex::new(5u16);
        let interrupt = Interrupt::new();
        interrupt.trigger();

        // Act
        let guard = mutex.lock(&interrupt).await;

        // Assert
        assert_eq!(*guard.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_contended_lock_returns_interrupted_when_already_fired() {
        let mutex = InterruptibleMutex::new(());
        let _held = mutex.try_lock().unwrap();
        let interrupt = Interrupt::new();
        interrupt.trigger();

        let result = mutex.lock(&interrupt).await;

        assert_eq!(result.err(), Some(LockInterrupted));
    }

    #[tokio::test]
    async fn test_contended_lock_is_interrupted_while_waiting() {
        // Arrange
        let mutex = Arc::new(InterruptibleMutex::new(()));
        let held = mutex.try_lock().unwrap();
        let interrupt = Interrupt::new();

        let waiter = {
            let mutex = Arc::clone(&mutex);
            let interrupt = interrupt.clone();
            tokio::spawn(async move { mutex.lock(&interrupt).await.map(|_| ()) })
        };
        tokio::task::yield_now().await;

        // Act
        interrupt.trigger();
        let result = waiter.await.unwrap();

        // Assert
        assert_eq!(result, Err(LockInterrupted));
        drop(held);
    }

    #[tokio::test]
    async fn test_contended_lock_acquires_after_release() {
        let mutex = Arc::new(InterruptibleMutex::new(0u32));
        let held = mutex.try_lock().unwrap();
        let interrupt = Interrupt::new();

        let waiter = {
            let mutex = Arc::clone(&mutex);
            let interrupt = interrupt.clone();
            tokio::spawn(async move {
                let mut guard = mutex.lock(&interrupt).await?;
                *guard += 1;
                Ok::<_, LockInterrupted>(())
            })
        };
        tokio::task::yield_now().await;
        drop(held);

        assert_eq!(waiter.await.unwrap(), Ok(()));
        assert_eq!(*mutex.lock_uninterruptible().await, 1);
    }

    #[test]
    fn test_try_lock_fails_while_held() {
        let mutex = InterruptibleMutex::new(());
        let _held = mutex.try_lock().unwrap();
        assert!(mutex.try_lock().is_none());
    }
}

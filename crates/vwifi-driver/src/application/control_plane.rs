//! Control-plane API: scan, connect, and disconnect admission.
//!
//! [`WirelessInterface`] is the one object the upper stack talks to.  Each
//! admission call validates the request, records it in the shared
//! [`InterfaceContext`], queues exactly one deferred task, and returns.  It
//! never waits for the task; results arrive later through the
//! [`UpperStack`] callbacks.
//!
//! # Admission outcomes
//!
//! | Outcome                              | Class      | Host errno     |
//! |--------------------------------------|------------|----------------|
//! | `Ok(())`                             | accepted   | 0              |
//! | [`AdmissionError::ScanInProgress`]   | busy       | `-EBUSY`       |
//! | [`AdmissionError::ConnectInProgress`]| busy       | `-EBUSY`       |
//! | [`AdmissionError::QueueFull`]        | busy       | `-EBUSY`       |
//! | [`AdmissionError::QueueClosed`]      | busy       | `-EBUSY`       |
//! | [`AdmissionError::Interrupted`]      | cancelled  | `-ERESTARTSYS` |
//!
//! An interrupted admission changes nothing and queues nothing.
//!
//! # Lifecycle
//!
//! [`WirelessInterface::bring_up`] creates the context and starts the
//! executor.  [`WirelessInterface::teardown`] consumes the interface and only
//! returns once every deferred task has finished or been discarded, so the
//! context is never used after teardown.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use vwifi_core::{ScanRequest, Ssid, WiphyCapabilities};

use crate::application::context::InterfaceContext;
use crate::application::executor::{DrainReport, EnqueueError, Job, JobRunner, TaskExecutor};
use crate::application::lock::Interrupt;
use crate::application::tasks::TaskRunner;
use crate::application::upper_stack::UpperStack;

/// Host "device or resource busy" error number.
pub const EBUSY: i32 = 16;
/// Host "interrupted wait, restart the call" error number.
pub const ERESTARTSYS: i32 = 512;

/// Why an admission call did not accept its request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("device busy: a scan is already in progress")]
    ScanInProgress,
    #[error("device busy: a connect attempt is already in progress")]
    ConnectInProgress,
    #[error("device busy: the task queue is full")]
    QueueFull,
    #[error("device busy: the task queue is closed")]
    QueueClosed,
    #[error("interrupted while waiting for the interface lock")]
    Interrupted,
}

impl AdmissionError {
    /// Returns `true` for the busy class.
    pub fn is_busy(&self) -> bool {
        !self.is_cancelled()
    }

    /// Returns `true` for the cancelled class.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Returns the negative host error number for this outcome.
    pub fn errno(&self) -> i32 {
        if self.is_cancelled() {
            -ERESTARTSYS
        } else {
            -EBUSY
        }
    }
}

impl From<EnqueueError> for AdmissionError {
    fn from(e: EnqueueError) -> Self {
        match e {
            EnqueueError::Full(_) => Self::QueueFull,
            EnqueueError::Closed(_) => Self::QueueClosed,
        }
    }
}

// Defaults shared with the configuration file schema.
pub const DEFAULT_WIPHY_NAME: &str = "dummy";
pub const DEFAULT_NETDEV_NAME: &str = "dummy%d";
pub const DEFAULT_SCAN_DELAY_MS: u64 = 100;
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Runtime settings of one interface.
///
/// Populated from the configuration file by the infrastructure layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPlaneSettings {
    /// Name of the simulated PHY.
    pub wiphy_name: String,
    /// Network device name template.
    pub netdev_name: String,
    /// Simulated hardware scan latency.
    pub scan_delay: Duration,
    /// Capacity of the deferred task queue.
    pub queue_depth: usize,
    /// Reject a connect while another one is still being resolved.
    pub strict_connect: bool,
}

impl Default for ControlPlaneSettings {
    fn default() -> Self {
        Self {
            wiphy_name: DEFAULT_WIPHY_NAME.to_string(),
            netdev_name: DEFAULT_NETDEV_NAME.to_string(),
            scan_delay: Duration::from_millis(DEFAULT_SCAN_DELAY_MS),
            queue_depth: DEFAULT_QUEUE_DEPTH,
            strict_connect: false,
        }
    }
}

/// Names the interface registers under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceIdentity {
    pub wiphy_name: String,
    pub netdev_name: String,
}

/// One simulated wireless interface.
pub struct WirelessInterface {
    settings: ControlPlaneSettings,
    capabilities: WiphyCapabilities,
    context: Arc<InterfaceContext>,
    executor: TaskExecutor,
}

impl WirelessInterface {
    /// Creates the interface state and starts its task executor.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bring_up(settings: ControlPlaneSettings, upper: Arc<dyn UpperStack>) -> Self {
        let context = Arc::new(InterfaceContext::new());
        let shutdown = Interrupt::new();
        let runner = TaskRunner::new(
            Arc::clone(&context),
            upper,
            settings.scan_delay,
            shutdown.clone(),
        );
        let executor = TaskExecutor::start(
            settings.queue_depth,
            Arc::new(runner) as Arc<dyn JobRunner>,
            shutdown,
        );

        info!(
            wiphy = %settings.wiphy_name,
            netdev = %settings.netdev_name,
            "wireless interface up"
        );

        Self {
            settings,
            capabilities: WiphyCapabilities::dummy(),
            context,
            executor,
        }
    }

    pub fn settings(&self) -> &ControlPlaneSettings {
        &self.settings
    }

    pub fn identity(&self) -> InterfaceIdentity {
        InterfaceIdentity {
            wiphy_name: self.settings.wiphy_name.clone(),
            netdev_name: self.settings.netdev_name.clone(),
        }
    }

    /// The PHY capabilities advertised at registration.
    pub fn capabilities(&self) -> &WiphyCapabilities {
        &self.capabilities
    }

    /// The shared interface state.
    pub fn context(&self) -> Arc<InterfaceContext> {
        Arc::clone(&self.context)
    }

    /// Admits a scan.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::Interrupted`] if `interrupt` fired while waiting
    ///   for the lock.
    /// - [`AdmissionError::ScanInProgress`] if a scan is already pending; the
    ///   pending request is left untouched.
    /// - [`AdmissionError::QueueFull`] / [`AdmissionError::QueueClosed`] if
    ///   the task could not be queued; the request is not left pending.
    pub async fn start_scan(
        &self,
        request: ScanRequest,
        interrupt: &Interrupt,
    ) -> Result<(), AdmissionError> {
        let scan_id = request.id;
        {
            let mut state = self
                .context
                .lock(interrupt)
                .await
                .map_err(|_| AdmissionError::Interrupted)?;
            if state.pending_scan.is_some() {
                debug!(%scan_id, "scan rejected: another scan is in flight");
                return Err(AdmissionError::ScanInProgress);
            }
            state.pending_scan = Some(request);
        }

        if let Err(e) = self.executor.enqueue(Job::Scan) {
            warn!(%scan_id, "scan not queued: {e}");
            let mut state = self.context.lock_uninterruptible().await;
            if state.pending_scan.as_ref().map(|r| r.id) == Some(scan_id) {
                state.pending_scan = None;
            }
            return Err(e.into());
        }

        info!(%scan_id, "scan accepted");
        Ok(())
    }

    /// Admits a connect attempt to `ssid`.
    ///
    /// Only the first [`vwifi_core::MAX_CONNECT_SSID_LEN`] bytes of `ssid`
    /// are kept.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::Interrupted`] if `interrupt` fired while waiting
    ///   for the lock.
    /// - [`AdmissionError::ConnectInProgress`] if strict connect admission is
    ///   enabled and another attempt is still being resolved.
    /// - [`AdmissionError::QueueFull`] / [`AdmissionError::QueueClosed`] if
    ///   the task could not be queued; the previous SSID is put back.
    pub async fn start_connect(
        &self,
        ssid: &Ssid,
        interrupt: &Interrupt,
    ) -> Result<(), AdmissionError> {
        let bounded = ssid.to_connect_form();
        let previous = {
            let mut state = self
                .context
                .lock(interrupt)
                .await
                .map_err(|_| AdmissionError::Interrupted)?;
            if self.settings.strict_connect && !state.connecting_ssid.is_empty() {
                debug!(ssid = %bounded, pending = %state.connecting_ssid, "connect rejected: attempt in flight");
                return Err(AdmissionError::ConnectInProgress);
            }
            std::mem::replace(&mut state.connecting_ssid, bounded.clone())
        };

        if let Err(e) = self.executor.enqueue(Job::Connect) {
            warn!(ssid = %bounded, "connect not queued: {e}");
            let mut state = self.context.lock_uninterruptible().await;
            if state.connecting_ssid == bounded {
                state.connecting_ssid = previous;
            }
            return Err(e.into());
        }

        info!(ssid = %bounded, "connect accepted");
        Ok(())
    }

    /// Admits a disconnect with `reason_code`.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::Interrupted`] if `interrupt` fired while waiting
    ///   for the lock.
    /// - [`AdmissionError::QueueFull`] / [`AdmissionError::QueueClosed`] if
    ///   the task could not be queued; the previous reason is put back.
    pub async fn start_disconnect(
        &self,
        reason_code: u16,
        interrupt: &Interrupt,
    ) -> Result<(), AdmissionError> {
        let previous = {
            let mut state = self
                .context
                .lock(interrupt)
                .await
                .map_err(|_| AdmissionError::Interrupted)?;
            std::mem::replace(&mut state.pending_disconnect_reason, reason_code)
        };

        if let Err(e) = self.executor.enqueue(Job::Disconnect) {
            warn!(reason_code, "disconnect not queued: {e}");
            let mut state = self.context.lock_uninterruptible().await;
            if state.pending_disconnect_reason == reason_code {
                state.pending_disconnect_reason = previous;
            }
            return Err(e.into());
        }

        info!(reason_code, "disconnect accepted");
        Ok(())
    }

    /// Takes the interface down.
    ///
    /// Interrupts running tasks that are waiting on the lock or in the scan
    /// delay, discards queued tasks that never started, and waits for the
    /// rest to finish.
    pub async fn teardown(self) -> DrainReport {
        info!(wiphy = %self.settings.wiphy_name, "tearing down wireless interface");
        let report = self.executor.shutdown().await;
        info!(
            dropped = report.dropped.len(),
            awaited = report.awaited,
            "wireless interface down"
        );
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::upper_stack::mock::RecordingUpperStack;

    fn fast_settings() -> ControlPlaneSettings {
        ControlPlaneSettings {
            scan_delay: Duration::from_millis(5),
            ..ControlPlaneSettings::default()
        }
    }

    fn bring_up(settings: ControlPlaneSettings) -> (WirelessInterface, Arc<RecordingUpperStack>) {
        let upper = Arc::new(RecordingUpperStack::new());
        let iface =
            WirelessInterface::bring_up(settings, Arc::clone(&upper) as Arc<dyn UpperStack>);
        (iface, upper)
    }

    // ── Error classification ──────────────────────────────────────────────────

    #[test]
    fn test_interrupted_maps_to_restartsys() {
        let e = AdmissionError::Interrupted;
        assert!(e.is_cancelled());
        assert!(!e.is_busy());
        assert_eq!(e.errno(), -512);
    }

    #[test]
    fn test_busy_variants_map_to_ebusy() {
        for e in [
            AdmissionError::ScanInProgress,
            AdmissionError::ConnectInProgress,
            AdmissionError::QueueFull,
            AdmissionError::QueueClosed,
        ] {
            assert!(e.is_busy(), "{e:?} must be busy");
            assert_eq!(e.errno(), -16);
        }
    }

    #[test]
    fn test_enqueue_errors_convert_to_busy() {
        assert_eq!(
            AdmissionError::from(EnqueueError::Full(Job::Scan)),
            AdmissionError::QueueFull
        );
        assert_eq!(
            AdmissionError::from(EnqueueError::Closed(Job::Connect)),
            AdmissionError::QueueClosed
        );
    }

    // ── Scan admission ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_second_scan_is_rejected_and_first_kept() {
        // Arrange
        let (iface, _upper) = bring_up(fast_settings());
        let first = ScanRequest::new();
        let interrupt = Interrupt::new();

        // Act
        iface.start_scan(first.clone(), &interrupt).await.unwrap();
        let second = iface.start_scan(ScanRequest::new(), &interrupt).await;

        // Assert
        assert_eq!(second, Err(AdmissionError::ScanInProgress));
        assert_eq!(iface.context().snapshot().await.pending_scan, Some(first));
    }

    #[tokio::test]
    async fn test_scan_rolled_back_when_queue_is_full() {
        // Arrange – depth 1 and no yield, so the connect job still occupies the slot
        let settings = ControlPlaneSettings {
            queue_depth: 1,
            ..fast_settings()
        };
        let (iface, _upper) = bring_up(settings);
        let interrupt = Interrupt::new();
        iface
            .start_connect(&Ssid::try_from("x").unwrap(), &interrupt)
            .await
            .unwrap();

        // Act
        let result = iface.start_scan(ScanRequest::new(), &interrupt).await;

        // Assert
        assert_eq!(result, Err(AdmissionError::QueueFull));
        assert!(iface.context().snapshot().await.pending_scan.is_none());
    }

    #[tokio::test]
    async fn test_strict_connect_restored_when_queue_is_full() {
        // Arrange – a pending scan occupies the single queue slot
        let settings = ControlPlaneSettings {
            queue_depth: 1,
            strict_connect: true,
            ..fast_settings()
        };
        let (iface, upper) = bring_up(settings);
        let interrupt = Interrupt::new();
        let ssid = Ssid::try_from("MyAwesomeWiFi").unwrap();
        iface.start_scan(ScanRequest::new(), &interrupt).await.unwrap();

        // Act
        let rejected = iface.start_connect(&ssid, &interrupt).await;

        // Assert – nothing left behind, so a later strict connect is admitted
        assert_eq!(rejected, Err(AdmissionError::QueueFull));
        assert!(iface.context().snapshot().await.connecting_ssid.is_empty());
        assert!(upper.wait_for_calls(2, Duration::from_secs(2)).await);
        assert_eq!(iface.start_connect(&ssid, &interrupt).await, Ok(()));
    }

    #[tokio::test]
    async fn test_connect_restores_previous_ssid_when_queue_is_full() {
        let settings = ControlPlaneSettings {
            queue_depth: 1,
            ..fast_settings()
        };
        let (iface, _upper) = bring_up(settings);
        let interrupt = Interrupt::new();
        iface
            .start_connect(&Ssid::try_from("first").unwrap(), &interrupt)
            .await
            .unwrap();

        let second = iface
            .start_connect(&Ssid::try_from("second").unwrap(), &interrupt)
            .await;

        assert_eq!(second, Err(AdmissionError::QueueFull));
        assert_eq!(
            iface.context().snapshot().await.connecting_ssid.as_bytes(),
            b"first"
        );
    }

    #[tokio::test]
    async fn test_disconnect_restores_previous_reason_when_queue_is_full() {
        // Arrange
        let settings = ControlPlaneSettings {
            queue_depth: 1,
            ..fast_settings()
        };
        let (iface, upper) = bring_up(settings);
        let interrupt = Interrupt::new();
        iface.start_disconnect(4, &interrupt).await.unwrap();

        // Act
        let second = iface.start_disconnect(9, &interrupt).await;

        // Assert – the queued task still delivers the reason it was admitted with
        assert_eq!(second, Err(AdmissionError::QueueFull));
        assert_eq!(iface.context().snapshot().await.pending_disconnect_reason, 4);
        assert!(upper.wait_for_calls(1, Duration::from_secs(2)).await);
        assert_eq!(*upper.disconnects.lock().unwrap(), vec![(4, true)]);
    }

    #[tokio::test]
    async fn test_scan_interrupted_while_lock_held_changes_nothing() {
        let (iface, upper) = bring_up(fast_settings());
        let context = iface.context();
        let held = context.lock_uninterruptible().await;
        let interrupt = Interrupt::new();
        interrupt.trigger();

        let result = iface.start_scan(ScanRequest::new(), &interrupt).await;

        assert_eq!(result, Err(AdmissionError::Interrupted));
        assert!(held.pending_scan.is_none());
        drop(held);
        let report = iface.teardown().await;
        assert!(report.dropped.is_empty());
        assert!(upper.calls().is_empty());
    }

    // ── Connect admission ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_connect_stores_truncated_ssid() {
        let (iface, _upper) = bring_up(fast_settings());
        let long = Ssid::try_from("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap();

        iface.start_connect(&long, &Interrupt::new()).await.unwrap();

        assert_eq!(
            iface.context().snapshot().await.connecting_ssid.as_bytes(),
            b"ABCDEFGHIJKLMNO"
        );
    }

    #[tokio::test]
    async fn test_overlapping_connect_is_admitted_by_default() {
        let (iface, _upper) = bring_up(fast_settings());
        let interrupt = Interrupt::new();

        iface
            .start_connect(&Ssid::try_from("first").unwrap(), &interrupt)
            .await
            .unwrap();
        let second = iface
            .start_connect(&Ssid::try_from("second").unwrap(), &interrupt)
            .await;

        assert_eq!(second, Ok(()));
        assert_eq!(
            iface.context().snapshot().await.connecting_ssid.as_bytes(),
            b"second"
        );
    }

    #[tokio::test]
    async fn test_overlapping_connect_rejected_in_strict_mode() {
        let settings = ControlPlaneSettings {
            strict_connect: true,
            ..fast_settings()
        };
        let (iface, _upper) = bring_up(settings);
        let interrupt = Interrupt::new();

        iface
            .start_connect(&Ssid::try_from("first").unwrap(), &interrupt)
            .await
            .unwrap();
        let second = iface
            .start_connect(&Ssid::try_from("second").unwrap(), &interrupt)
            .await;

        assert_eq!(second, Err(AdmissionError::ConnectInProgress));
        assert_eq!(
            iface.context().snapshot().await.connecting_ssid.as_bytes(),
            b"first"
        );
    }

    // ── Disconnect admission ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_disconnect_records_reason_before_task_runs() {
        let (iface, upper) = bring_up(fast_settings());

        iface.start_disconnect(9, &Interrupt::new()).await.unwrap();

        assert_eq!(iface.context().snapshot().await.pending_disconnect_reason, 9);
        assert!(upper.disconnects.lock().unwrap().is_empty());
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_capabilities_are_the_dummy_table() {
        let (iface, _upper) = bring_up(fast_settings());
        assert_eq!(iface.capabilities(), &WiphyCapabilities::dummy());
        assert_eq!(
            iface.identity(),
            InterfaceIdentity {
                wiphy_name: "dummy".to_string(),
                netdev_name: "dummy%d".to_string(),
            }
        );
    }
}

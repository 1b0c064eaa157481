//! `vwifi`: headless demo of the simulated wireless interface.
//!
//! Brings the interface up, runs one scan, one connect, and one disconnect,
//! waits for each completion, prints what the upper stack saw, and tears the
//! interface down again.
//!
//! # Usage
//!
//! ```text
//! vwifi [OPTIONS]
//!
//! Options:
//!   --config     <PATH>  Configuration file [default: vwifi.toml]
//!   --ssid       <SSID>  Network to connect to [default: MyAwesomeWiFi]
//!   --reason     <CODE>  Disconnect reason code [default: 3]
//!   --timeout-ms <MS>    How long to wait for each completion [default: 2000]
//! ```
//!
//! | Variable        | Flag           |
//! |-----------------|----------------|
//! | `VWIFI_CONFIG`  | `--config`     |
//! | `VWIFI_SSID`    | `--ssid`       |
//! | `VWIFI_REASON`  | `--reason`     |
//! | `VWIFI_TIMEOUT` | `--timeout-ms` |
//!
//! The log filter comes from `RUST_LOG` if set, else from `interface.log_level`
//! in the configuration file.
//!
//! The process exits non-zero if an admission call is rejected or an expected
//! completion does not arrive in time.  Ctrl+C interrupts an admission call
//! that is waiting for the interface lock.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vwifi_core::{ConnectResult, ScanRequest, Ssid, SyntheticAccessPoint};
use vwifi_driver::application::control_plane::WirelessInterface;
use vwifi_driver::application::lock::Interrupt;
use vwifi_driver::application::upper_stack::UpperStack;
use vwifi_driver::infrastructure::storage::config::{load_config, DEFAULT_CONFIG_FILE};
use vwifi_driver::infrastructure::upper_stack::{ChannelUpperStack, UpperStackEvent};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Simulated wireless interface demo.
#[derive(Debug, Parser)]
#[command(
    name = "vwifi",
    about = "Scan, connect, and disconnect on a simulated wireless interface",
    version
)]
struct Cli {
    /// Configuration file.  A missing file means built-in defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "VWIFI_CONFIG")]
    config: PathBuf,

    /// SSID to connect to.  Anything other than the synthetic network times out.
    #[arg(long, default_value = SyntheticAccessPoint::SSID, env = "VWIFI_SSID")]
    ssid: String,

    /// Reason code carried by the disconnect.
    #[arg(long, default_value_t = 3, env = "VWIFI_REASON")]
    reason: u16,

    /// How long to wait for each completion, in milliseconds.
    #[arg(long, default_value_t = 2000, env = "VWIFI_TIMEOUT")]
    timeout_ms: u64,
}

/// What the upper stack reported during one demo run.
#[derive(Debug, Default)]
struct Summary {
    bss_seen: usize,
    scan_aborted: Option<bool>,
    connect: Option<ConnectResult>,
    disconnect: Option<(u16, bool)>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    // RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.interface.log_level)),
        )
        .init();

    let ssid = Ssid::try_from(cli.ssid.as_str()).context("invalid --ssid")?;
    let limit = Duration::from_millis(cli.timeout_ms);

    let (upper, mut events) = ChannelUpperStack::new();
    let upper = Arc::new(upper);
    let iface = WirelessInterface::bring_up(
        config.to_settings(),
        Arc::clone(&upper) as Arc<dyn UpperStack>,
    );
    let identity = iface.identity();
    info!(wiphy = %identity.wiphy_name, netdev = %identity.netdev_name, "vwifi starting");

    let interrupt = Interrupt::new();
    let ctrl_c = interrupt.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, interrupting");
                ctrl_c.trigger();
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let outcome = run(&iface, &mut events, &interrupt, &ssid, cli.reason, limit).await;

    let report = iface.teardown().await;
    info!(
        dropped = report.dropped.len(),
        awaited = report.awaited,
        "vwifi stopped"
    );

    let summary = outcome?;
    println!("networks announced : {}", summary.bss_seen);
    println!("known BSS records  : {}", upper.bss_count());
    if let Some(aborted) = summary.scan_aborted {
        println!("scan               : complete (aborted = {aborted})");
    }
    match &summary.connect {
        Some(ConnectResult::Connected { bssid, status }) => {
            println!("connect            : {ssid} via {bssid} ({status:?})")
        }
        Some(ConnectResult::TimedOut { reason }) => {
            println!("connect            : {ssid} timed out ({reason})")
        }
        None => {}
    }
    if let Some((reason_code, locally_generated)) = summary.disconnect {
        println!("disconnect         : reason {reason_code} (local = {locally_generated})");
    }
    Ok(())
}

/// Drives scan, connect, and disconnect in sequence.
async fn run(
    iface: &WirelessInterface,
    events: &mut UnboundedReceiver<UpperStackEvent>,
    interrupt: &Interrupt,
    ssid: &Ssid,
    reason: u16,
    limit: Duration,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();

    let request = ScanRequest::new();
    let scan_id = request.id;
    iface
        .start_scan(request, interrupt)
        .await
        .context("scan rejected")?;
    match next_completion(events, &mut summary, limit).await? {
        UpperStackEvent::ScanComplete { request, info } if request.id == scan_id => {
            summary.scan_aborted = Some(info.aborted);
        }
        other => bail!("expected scan completion, got {other:?}"),
    }

    iface
        .start_connect(ssid, interrupt)
        .await
        .context("connect rejected")?;
    match next_completion(events, &mut summary, limit).await? {
        UpperStackEvent::ConnectResult(result) => summary.connect = Some(result),
        other => bail!("expected connect result, got {other:?}"),
    }

    iface
        .start_disconnect(reason, interrupt)
        .await
        .context("disconnect rejected")?;
    match next_completion(events, &mut summary, limit).await? {
        UpperStackEvent::Disconnected {
            reason_code,
            locally_generated,
        } => summary.disconnect = Some((reason_code, locally_generated)),
        other => bail!("expected disconnect, got {other:?}"),
    }

    Ok(summary)
}

/// Returns the next event that is not a BSS announcement.
async fn next_completion(
    events: &mut UnboundedReceiver<UpperStackEvent>,
    summary: &mut Summary,
    limit: Duration,
) -> anyhow::Result<UpperStackEvent> {
    loop {
        let event = tokio::time::timeout(limit, events.recv())
            .await
            .context("timed out waiting for a completion")?
            .context("upper stack event channel closed")?;
        match event {
            UpperStackEvent::BssDiscovered { bssid, center_freq } => {
                info!(%bssid, center_freq, "network announced");
                summary.bss_seen += 1;
            }
            other => return Ok(other),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

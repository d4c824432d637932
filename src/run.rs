//! Application execution logic.
//!
//! This module wires the production components together and runs the
//! selected mode: a single check, the status query, or the watch loop.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

use vpn_watch::check::{AlertOutcome, CheckOrchestrator, CheckOutcome, CheckReport};
use vpn_watch::config::{Command, ValidatedConfig};
use vpn_watch::gate::AlertGate;
use vpn_watch::resolver::{AddressResolver, EchoResolver};
use vpn_watch::state::{FileStateStore, StateStore};
use vpn_watch::time::Clock;
use vpn_watch::transport::ReqwestClient;
use vpn_watch::webhook::{NotificationSender, WebhookDispatcher};

/// The orchestrator assembled from production components.
type AppOrchestrator = CheckOrchestrator<
    EchoResolver<ReqwestClient>,
    WebhookDispatcher<ReqwestClient>,
    FileStateStore,
>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// No echo endpoint produced an address.
    #[error("Public IP address could not be determined")]
    DiscoveryFailed,

    /// The status snapshot could not be encoded.
    #[error("Failed to encode status: {0}")]
    StatusEncode(#[source] serde_json::Error),

    /// Unexpected ticker termination.
    #[error("Check schedule terminated unexpectedly")]
    ScheduleTerminated,
}

/// Executes the selected mode.
///
/// # Errors
///
/// Returns an error if:
/// - A single check could not determine the public address
/// - The status snapshot cannot be encoded
/// - The watch schedule terminates unexpectedly
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires
/// real network access and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(command: Command, config: ValidatedConfig) -> Result<(), RunError> {
    let mut orchestrator = create_orchestrator(&config);

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - alerts will be logged but not sent");
    }
    tracing::debug!(
        "State file: {}",
        orchestrator.store().path().display()
    );

    match command {
        Command::Status => execute_status(&orchestrator).await,
        Command::Watch => {
            tracing::info!(
                "Watch mode enabled (interval: {}s)",
                config.check_interval.as_secs()
            );
            execute_watch(&mut orchestrator, config.check_interval, shutdown_signal()).await
        }
        Command::Check | Command::Init { .. } => execute_check(&mut orchestrator).await,
    }
}

/// Builds the orchestrator from configuration.
///
/// Loads the persisted state as a side effect.
fn create_orchestrator(config: &ValidatedConfig) -> AppOrchestrator {
    let client = ReqwestClient::new();

    let resolver = EchoResolver::new(client.clone(), config.resolver_endpoints.clone())
        .with_timeout(config.resolver_timeout);

    CheckOrchestrator::new(
        resolver,
        create_webhook(client, config),
        FileStateStore::new(config.state_file.clone()),
        config.protected_ranges.clone(),
        AlertGate::new(config.cooldown),
    )
    .with_dry_run(config.dry_run)
}

/// Creates the HTTP webhook dispatcher from configuration.
fn create_webhook(client: ReqwestClient, config: &ValidatedConfig) -> WebhookDispatcher<ReqwestClient> {
    let mut webhook = WebhookDispatcher::new(client, config.url.clone())
        .with_method(config.method)
        .with_basic_auth(config.auth.clone())
        .with_timeout(config.webhook_timeout);

    if let Some(ref template) = config.message_template {
        webhook = webhook.with_message_template(template);
    }

    webhook
}

/// Runs one check.
///
/// A failed webhook or state write is logged but still succeeds; only a
/// failed address discovery is an error.
async fn execute_check<R, N, S, C>(
    orchestrator: &mut CheckOrchestrator<R, N, S, C>,
) -> Result<(), RunError>
where
    R: AddressResolver,
    N: NotificationSender,
    S: StateStore,
    C: Clock,
{
    let report = orchestrator.run_check().await;
    log_report(&report);

    if report.is_success() {
        Ok(())
    } else {
        Err(RunError::DiscoveryFailed)
    }
}

/// Prints the status snapshot as pretty JSON on stdout.
async fn execute_status<R, N, S, C>(
    orchestrator: &CheckOrchestrator<R, N, S, C>,
) -> Result<(), RunError>
where
    R: AddressResolver,
    N: NotificationSender,
    S: StateStore,
    C: Clock,
{
    let snapshot = orchestrator.status().await;
    let json = serde_json::to_string_pretty(&snapshot).map_err(RunError::StatusEncode)?;
    println!("{json}");
    Ok(())
}

/// Runs a check immediately and then once per `interval` until `shutdown` completes.
///
/// Each check is awaited before the next tick is taken, so checks never
/// overlap; ticks missed during a slow check are delayed rather than bursted.
async fn execute_watch<R, N, S, C>(
    orchestrator: &mut CheckOrchestrator<R, N, S, C>,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> Result<(), RunError>
where
    R: AddressResolver,
    N: NotificationSender,
    S: StateStore,
    C: Clock,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(ticker);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            tick = ticks.next() => {
                if tick.is_none() {
                    return Err(RunError::ScheduleTerminated);
                }
                let report = orchestrator.run_check().await;
                log_report(&report);
            }
        }
    }
}

/// Logs a one-line summary of a check.
fn log_report(report: &CheckReport) {
    match &report.outcome {
        CheckOutcome::DiscoveryFailed => {
            tracing::error!("Check failed: public IP address unavailable");
        }
        CheckOutcome::Safe { address } => {
            tracing::debug!("Check passed: {address} is outside protected ranges");
        }
        CheckOutcome::Unsafe { address, alert, .. } => match alert {
            AlertOutcome::Sent => tracing::info!("Alert sent for {address}"),
            AlertOutcome::Suppressed => {
                tracing::info!("Alert for {address} suppressed by cooldown");
            }
            AlertOutcome::Failed => tracing::warn!("Alert for {address} could not be delivered"),
            AlertOutcome::DryRun => tracing::info!("Dry-run: alert for {address} not sent"),
        },
    }

    if !report.persisted {
        tracing::warn!("State was not saved; counters may be stale on next run");
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// A signal source that cannot be installed is logged and never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

//! The check orchestrator.

use std::net::IpAddr;

use crate::classify::{self, ProtectedRange};
use crate::gate::AlertGate;
use crate::resolver::AddressResolver;
use crate::state::{LoadResult, RunState, StateStore};
use crate::time::{Clock, SystemClock};
use crate::webhook::{NotificationPayload, NotificationSender};

use super::{AlertOutcome, CheckOutcome, CheckReport, StatusSnapshot};

/// Runs monitoring passes against one immutable configuration snapshot.
///
/// Built once per process; it owns every collaborator and the in-memory
/// [`RunState`], which it loads on construction and writes back after every
/// check. At most one check may run at a time (enforced by `&mut self`).
///
/// # Type Parameters
///
/// - `R`: address resolver
/// - `N`: notification sender
/// - `S`: state store
/// - `C`: clock (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct CheckOrchestrator<R, N, S, C = SystemClock> {
    resolver: R,
    notifier: N,
    store: S,
    clock: C,
    ranges: Vec<ProtectedRange>,
    gate: AlertGate,
    dry_run: bool,
    state: RunState,
}

impl<R, N, S: StateStore> CheckOrchestrator<R, N, S, SystemClock> {
    /// Creates an orchestrator and loads the persisted state.
    ///
    /// A missing or corrupted state file starts from defaults.
    #[must_use]
    pub fn new(
        resolver: R,
        notifier: N,
        store: S,
        ranges: Vec<ProtectedRange>,
        gate: AlertGate,
    ) -> Self {
        let state = load_state(&store);
        Self {
            resolver,
            notifier,
            store,
            clock: SystemClock,
            ranges,
            gate,
            dry_run: false,
            state,
        }
    }
}

fn load_state(store: &impl StateStore) -> RunState {
    match store.load() {
        LoadResult::Loaded(state) => {
            tracing::debug!(
                "Loaded state: {} check(s), {} alert(s) sent",
                state.total_checks,
                state.alerts_sent
            );
            state
        }
        LoadResult::NotFound => {
            tracing::info!("No previous state found, starting fresh");
            RunState::default()
        }
        LoadResult::Corrupted { reason } => {
            tracing::warn!("State file corrupted ({reason}), will overwrite on next save");
            RunState::default()
        }
    }
}

impl<R, N, S, C> CheckOrchestrator<R, N, S, C> {
    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> CheckOrchestrator<R, N, S, C2> {
        CheckOrchestrator {
            resolver: self.resolver,
            notifier: self.notifier,
            store: self.store,
            clock,
            ranges: self.ranges,
            gate: self.gate,
            dry_run: self.dry_run,
            state: self.state,
        }
    }

    /// Logs alerts instead of sending them.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Current in-memory state.
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Configured protected ranges.
    #[must_use]
    pub fn ranges(&self) -> &[ProtectedRange] {
        &self.ranges
    }

    /// The state store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<R, N, S, C> CheckOrchestrator<R, N, S, C>
where
    R: AddressResolver,
    N: NotificationSender,
    S: StateStore,
    C: Clock,
{
    /// Performs one monitoring pass.
    ///
    /// Never fails: discovery and dispatch failures are part of the
    /// returned report, and the state is written back in every case.
    pub async fn run_check(&mut self) -> CheckReport {
        tracing::info!("Starting VPN IP check");
        self.state.total_checks = self.state.total_checks.saturating_add(1);

        let outcome = match self.resolver.resolve().await {
            Ok(address) => {
                tracing::info!("Current public IP: {address}");
                self.state.last_known_address = Some(address.to_string());
                self.evaluate(address).await
            }
            Err(e) => {
                tracing::error!("Could not retrieve current IP address: {e}");
                CheckOutcome::DiscoveryFailed
            }
        };

        let persisted = self.persist().await;
        tracing::info!("VPN IP check completed");

        CheckReport { outcome, persisted }
    }

    async fn evaluate(&mut self, address: IpAddr) -> CheckOutcome {
        let classification = classify::classify(&address.to_string(), &self.ranges);

        if classification.is_safe {
            tracing::info!("IP is outside all protected ranges - VPN is working");
            self.state.consecutive_alerts = 0;
            return CheckOutcome::Safe { address };
        }

        self.state.consecutive_alerts = self.state.consecutive_alerts.saturating_add(1);
        match &classification.matched_range {
            Some(range) => tracing::warn!(
                "IP {address} is inside protected range {range} - VPN may be down! ({} in a row)",
                self.state.consecutive_alerts
            ),
            None => tracing::warn!(
                "IP {address} could not be verified - treating as exposed ({} in a row)",
                self.state.consecutive_alerts
            ),
        }

        let alert = self
            .alert(address, classification.matched_range.clone())
            .await;

        CheckOutcome::Unsafe {
            address,
            matched_range: classification.matched_range,
            alert,
        }
    }

    async fn alert(&mut self, address: IpAddr, matched: Option<ProtectedRange>) -> AlertOutcome {
        let now = self.clock.now();

        if !self.gate.may_alert(&self.state, now) {
            return AlertOutcome::Suppressed;
        }

        let payload =
            NotificationPayload::new(address.to_string(), &self.ranges, matched, &self.state, now);

        if self.dry_run {
            tracing::info!("Dry-run: would send alert: {}", payload.message);
            return AlertOutcome::DryRun;
        }

        match self.notifier.send(&payload).await {
            Ok(_) => {
                self.state.last_alert_time = Some(now);
                self.state.alerts_sent = self.state.alerts_sent.saturating_add(1);
                AlertOutcome::Sent
            }
            Err(e) => {
                tracing::error!("Failed to send notification: {e}");
                AlertOutcome::Failed
            }
        }
    }

    async fn persist(&self) -> bool {
        match self.store.save(&self.state).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save state: {e}");
                false
            }
        }
    }

    /// Resolves and classifies the current address without touching state.
    pub async fn status(&self) -> StatusSnapshot {
        let now = self.clock.now();

        let (current_ip, is_safe, matched_range) = match self.resolver.resolve().await {
            Ok(address) => {
                let classification = classify::classify(&address.to_string(), &self.ranges);
                (
                    Some(address.to_string()),
                    Some(classification.is_safe),
                    classification.matched_range,
                )
            }
            Err(e) => {
                tracing::warn!("Status query could not resolve address: {e}");
                (None, None, None)
            }
        };

        StatusSnapshot {
            current_ip,
            is_safe,
            matched_range,
            protected_ranges: self.ranges.clone(),
            state: self.state.clone(),
            alert_permitted: self.gate.may_alert(&self.state, now),
            cooldown_remaining_secs: self
                .gate
                .remaining(&self.state, now)
                .map(|left| left.as_secs()),
            timestamp: now,
        }
    }
}

//! Tests for the run module.

use super::*;

use std::net::IpAddr;
use std::sync::Mutex;

use vpn_watch::classify::ProtectedRange;
use vpn_watch::config::Cli;
use vpn_watch::resolver::ResolveError;
use vpn_watch::state::{LoadResult, RunState, StateError};
use vpn_watch::transport::HttpError;
use vpn_watch::webhook::{NotificationPayload, WebhookError, WebhookMethod};

/// Resolver returning a fixed address, or failing when `None`.
struct FixedResolver(Option<IpAddr>);

impl AddressResolver for FixedResolver {
    async fn resolve(&self) -> Result<IpAddr, ResolveError> {
        self.0.ok_or(ResolveError::Exhausted { attempted: 4 })
    }
}

/// Sender that accepts or rejects every alert.
struct FixedSender {
    accept: bool,
}

impl NotificationSender for FixedSender {
    async fn send(&self, _payload: &NotificationPayload) -> Result<http::StatusCode, WebhookError> {
        if self.accept {
            Ok(http::StatusCode::OK)
        } else {
            Err(WebhookError::Http(HttpError::Timeout))
        }
    }
}

/// In-memory store starting empty.
#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Vec<RunState>>,
}

impl StateStore for MemoryStore {
    fn load(&self) -> LoadResult {
        LoadResult::NotFound
    }

    async fn save(&self, state: &RunState) -> Result<(), StateError> {
        self.saved.lock().unwrap().push(state.clone());
        Ok(())
    }
}

fn orchestrator(
    address: Option<&str>,
    accept: bool,
) -> CheckOrchestrator<FixedResolver, FixedSender, MemoryStore> {
    CheckOrchestrator::new(
        FixedResolver(address.map(|a| a.parse().unwrap())),
        FixedSender { accept },
        MemoryStore::default(),
        vec![ProtectedRange::new_unchecked("203.0.113.0/24")],
        AlertGate::default(),
    )
}

fn config(extra: &[&str]) -> ValidatedConfig {
    let mut args = vec![
        "vpn-watch",
        "--url",
        "https://example.com/webhook",
        "--protected-ranges",
        "203.0.113.0/24",
    ];
    args.extend(extra);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(args), None).unwrap()
}

mod run_error {
    use super::*;

    #[test]
    fn discovery_failed_displays_message() {
        let error = RunError::DiscoveryFailed;
        assert_eq!(
            error.to_string(),
            "Public IP address could not be determined"
        );
    }

    #[test]
    fn schedule_terminated_displays_message() {
        let error = RunError::ScheduleTerminated;
        assert_eq!(error.to_string(), "Check schedule terminated unexpectedly");
    }

    #[test]
    fn debug_format_works() {
        let debug_str = format!("{:?}", RunError::DiscoveryFailed);
        assert!(debug_str.contains("DiscoveryFailed"));
    }
}

mod create_webhook {
    use super::*;

    #[test]
    fn creates_webhook_with_url() {
        let webhook = create_webhook(ReqwestClient::new(), &config(&[]));

        assert_eq!(webhook.url().as_str(), "https://example.com/webhook");
        assert_eq!(webhook.method(), WebhookMethod::Post);
        assert!(!webhook.has_auth());
    }

    #[test]
    fn creates_webhook_with_method_and_auth() {
        let config = config(&[
            "--method",
            "get",
            "--username",
            "alice",
            "--password",
            "secret",
        ]);
        let webhook = create_webhook(ReqwestClient::new(), &config);

        assert_eq!(webhook.method(), WebhookMethod::Get);
        assert!(webhook.has_auth());
    }
}

mod check_mode {
    use super::*;

    #[tokio::test]
    async fn safe_address_succeeds() {
        let mut orchestrator = orchestrator(Some("8.8.8.8"), true);

        assert!(execute_check(&mut orchestrator).await.is_ok());
        assert_eq!(orchestrator.state().total_checks, 1);
    }

    #[tokio::test]
    async fn discovery_failure_is_an_error() {
        let mut orchestrator = orchestrator(None, true);

        let result = execute_check(&mut orchestrator).await;

        assert!(matches!(result, Err(RunError::DiscoveryFailed)));
        assert_eq!(orchestrator.store().saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_webhook_still_succeeds() {
        let mut orchestrator = orchestrator(Some("203.0.113.5"), false);

        assert!(execute_check(&mut orchestrator).await.is_ok());
        assert_eq!(orchestrator.state().alerts_sent, 0);
        assert_eq!(orchestrator.state().consecutive_alerts, 1);
    }
}

mod status_mode {
    use super::*;

    #[tokio::test]
    async fn prints_without_saving() {
        let orchestrator = orchestrator(Some("203.0.113.5"), true);

        assert!(execute_status(&orchestrator).await.is_ok());
        assert!(orchestrator.store().saved.lock().unwrap().is_empty());
    }
}

mod watch_mode {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn checks_immediately_and_on_every_tick() {
        let mut orchestrator = orchestrator(Some("8.8.8.8"), true);
        let shutdown = tokio::time::sleep(Duration::from_secs(25));

        execute_watch(&mut orchestrator, Duration::from_secs(10), shutdown)
            .await
            .unwrap();

        // t=0, t=10, t=20
        assert_eq!(orchestrator.state().total_checks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_shutdown_stops_before_first_check() {
        let mut orchestrator = orchestrator(Some("8.8.8.8"), true);

        execute_watch(
            &mut orchestrator,
            Duration::from_secs(10),
            std::future::ready(()),
        )
        .await
        .unwrap();

        assert_eq!(orchestrator.state().total_checks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_spans_watch_iterations() {
        let mut orchestrator = orchestrator(Some("203.0.113.5"), true);
        let shutdown = tokio::time::sleep(Duration::from_secs(35));

        execute_watch(&mut orchestrator, Duration::from_secs(10), shutdown)
            .await
            .unwrap();

        let state = orchestrator.state();
        assert_eq!(state.total_checks, 4);
        assert_eq!(state.consecutive_alerts, 4);
        // One alert; the rest fall inside the one-hour cooldown
        assert_eq!(state.alerts_sent, 1);
    }
}

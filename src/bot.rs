use std::fmt;
use std::future::Future;
use std::io;
use std::sync::Arc;

use teloxide::Bot;
use tracing::{error, info};

use crate::commands::CommandRouter;
use crate::config::Config;
use crate::error::Result;
use crate::platform::telegram;
use crate::platform::{BotIdentity, Gateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Starting,
    VerifyingConnectivity,
    Polling,
    Stopped,
    Failed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Starting => write!(f, "starting"),
            Lifecycle::VerifyingConnectivity => write!(f, "verifying connectivity"),
            Lifecycle::Polling => write!(f, "polling"),
            Lifecycle::Stopped => write!(f, "stopped"),
            Lifecycle::Failed => write!(f, "failed"),
        }
    }
}

/// Owns the gateway for the whole run and drives it through startup and polling.
/// The gateway is released when the supervisor is dropped.
pub struct Supervisor<G> {
    gateway: G,
    config: Config,
    state: Lifecycle,
}

impl<G> Supervisor<G> {
    pub fn state(&self) -> Lifecycle {
        self.state
    }
}

impl<G: Gateway> Supervisor<G> {
    pub fn new(gateway: G, config: Config) -> Self {
        Self {
            gateway,
            config,
            state: Lifecycle::Starting,
        }
    }

    fn transition(&mut self, next: Lifecycle) {
        info!("Lifecycle: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Identity check followed by the connectivity probe. Either failing is fatal.
    pub async fn start(&mut self) -> Result<BotIdentity> {
        info!("Bot is starting...");
        let identity = match self.gateway.identity().await {
            Ok(identity) => identity,
            Err(e) => {
                error!("Failed to fetch bot identity: {}", e);
                self.transition(Lifecycle::Failed);
                return Err(e.into());
            }
        };
        info!(
            "Bot started as @{} (id {})",
            identity.username.as_deref().unwrap_or(&identity.first_name),
            identity.id
        );

        self.transition(Lifecycle::VerifyingConnectivity);
        match self.gateway.probe_updates(self.config.probe_timeout).await {
            Ok(pending) => info!("Connection to Telegram API OK ({} pending updates)", pending),
            Err(e) => {
                error!("Telegram API connectivity check failed: {}", e);
                self.transition(Lifecycle::Failed);
                return Err(e.into());
            }
        }

        Ok(identity)
    }

    /// [`start`](Self::start), abandoned when `stop` resolves first.
    /// `Ok(None)` means the operator stopped the bot during startup.
    pub async fn start_or_stop<S>(&mut self, stop: S) -> Result<Option<BotIdentity>>
    where
        S: Future<Output = ()>,
    {
        let started = tokio::select! {
            result = self.start() => Some(result),
            () = stop => None,
        };
        match started {
            Some(result) => result.map(Some),
            None => {
                self.stopped();
                Ok(None)
            }
        }
    }

    fn stopped(&mut self) {
        info!("Bot stopped by operator");
        self.transition(Lifecycle::Stopped);
    }
}

/// Resolves once `signal` reports an interrupt. If the listener could not be
/// installed it never resolves, so the bot keeps running.
async fn stop_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for Ctrl-C, running until polling ends: {}", e);
        std::future::pending::<()>().await;
    }
}

impl Supervisor<Bot> {
    /// Start, then long-poll. Ctrl-C stops the bot cleanly in any phase.
    pub async fn run(mut self) -> Result<()> {
        let shutdown = stop_on(tokio::signal::ctrl_c());
        tokio::pin!(shutdown);

        let Some(identity) = self.start_or_stop(&mut shutdown).await? else {
            return Ok(());
        };
        let router = Arc::new(CommandRouter::new(identity.username.as_deref()));

        self.transition(Lifecycle::Polling);
        let interrupted = tokio::select! {
            _ = telegram::poll(self.gateway.clone(), router, self.config.poll_timeout) => false,
            () = &mut shutdown => true,
        };
        if interrupted {
            self.stopped();
        } else {
            info!("Polling finished");
            self.transition(Lifecycle::Stopped);
        }

        Ok(())
    }
}

impl<G> Drop for Supervisor<G> {
    fn drop(&mut self) {
        info!("Telegram session closed ({})", self.state());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::BotError;
    use crate::platform::testing::FakeGateway;

    fn config() -> Config {
        Config::from_lookup(|_| Some("123:abc".to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_start_reports_identity() {
        let mut supervisor = Supervisor::new(FakeGateway::new(), config());
        assert_eq!(supervisor.state(), Lifecycle::Starting);

        let identity = supervisor.start().await.unwrap();
        assert_eq!(identity.username.as_deref(), Some("TestStatusBot"));
        assert_eq!(supervisor.state(), Lifecycle::VerifyingConnectivity);
    }

    #[tokio::test]
    async fn test_identity_failure_is_fatal() {
        let mut supervisor = Supervisor::new(FakeGateway::failing_identity(), config());
        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, BotError::Gateway(_)));
        assert_eq!(supervisor.state(), Lifecycle::Failed);
    }

    #[tokio::test]
    async fn test_probe_failure_is_fatal() {
        let mut supervisor = Supervisor::new(FakeGateway::failing_probe(), config());
        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, BotError::Gateway(_)));
        assert_eq!(supervisor.state(), Lifecycle::Failed);
    }

    #[tokio::test]
    async fn test_stop_during_startup() {
        let mut supervisor = Supervisor::new(FakeGateway::hanging_probe(), config());
        let started = supervisor.start_or_stop(std::future::ready(())).await.unwrap();
        assert!(started.is_none());
        assert_eq!(supervisor.state(), Lifecycle::Stopped);
    }

    #[tokio::test]
    async fn test_start_without_stop_request() {
        let mut supervisor = Supervisor::new(FakeGateway::new(), config());
        let started = supervisor
            .start_or_stop(std::future::pending())
            .await
            .unwrap();
        assert_eq!(started.unwrap().id, 42);
        assert_eq!(supervisor.state(), Lifecycle::VerifyingConnectivity);
    }

    #[tokio::test]
    async fn test_startup_failure_wins_over_pending_stop() {
        let mut supervisor = Supervisor::new(FakeGateway::failing_probe(), config());
        let err = supervisor
            .start_or_stop(std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Gateway(_)));
        assert_eq!(supervisor.state(), Lifecycle::Failed);
    }

    #[tokio::test]
    async fn test_interrupt_resolves_stop() {
        stop_on(std::future::ready(Ok(()))).await;
    }

    #[tokio::test]
    async fn test_listener_failure_never_stops() {
        let signal = std::future::ready(Err(io::Error::other("no signal handling")));
        let waited = tokio::time::timeout(Duration::from_millis(50), stop_on(signal)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_startup_sends_nothing() {
        let mut supervisor = Supervisor::new(FakeGateway::new(), config());
        supervisor.start().await.unwrap();
        assert!(supervisor.gateway.sent().is_empty());
    }
}

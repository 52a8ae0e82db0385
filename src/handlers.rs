use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::commands::{Command, CommandRouter};
use crate::error::{BotError, Result};
use crate::platform::{Gateway, IncomingMessage};
use crate::replies::{self, Reply};

/// What the error boundary reports back to the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
}

/// Check the platform is reachable and report it along with the current time.
pub async fn status<G: Gateway + ?Sized>(gateway: &G) -> Reply {
    let status = match gateway.identity().await {
        Ok(_) => replies::STATUS_OK.to_string(),
        Err(e) => {
            error!("API error while checking status: {}", e);
            replies::status_failure(&e.to_string())
        }
    };
    replies::status(&status, &replies::timestamp())
}

pub fn time() -> Reply {
    replies::time(&replies::timestamp())
}

/// Build the reply for an already routed command.
pub async fn respond<G: Gateway + ?Sized>(gateway: &G, command: Command) -> Reply {
    match command {
        Command::Start => replies::greeting(),
        Command::Help => replies::help(),
        Command::Status => status(gateway).await,
        Command::Time => time(),
        Command::Unknown => replies::unknown_command(),
    }
}

/// Route one message and send exactly one reply.
pub async fn handle_message<G: Gateway + ?Sized>(
    gateway: &G,
    router: &CommandRouter,
    msg: &IncomingMessage,
) -> Result<()> {
    debug!("Message in chat {} dated {}", msg.chat_id, msg.date);
    let command = router.route(msg.text.as_deref());
    match command {
        Command::Unknown => info!(
            "User {} sent: {}",
            msg.sender(),
            msg.text.as_deref().unwrap_or("<non-text>")
        ),
        _ => info!("User {} requested {}", msg.sender(), command),
    }

    let reply = respond(gateway, command).await;
    gateway.send_reply(msg.chat_id, &reply).await?;
    Ok(())
}

/// Process one update behind the error boundary. Never fails, and a
/// panicking handler is reported like any other error.
pub async fn process_update<G: Gateway + ?Sized>(
    gateway: &G,
    router: &CommandRouter,
    msg: Option<&IncomingMessage>,
) -> Outcome {
    let Some(msg) = msg else {
        return Outcome::Handled;
    };
    let result = AssertUnwindSafe(handle_message(gateway, router, msg))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            Err(BotError::Unhandled(anyhow::anyhow!(
                "handler panicked: {}",
                panic_message(panic.as_ref())
            )))
        });
    match result {
        Ok(()) => Outcome::Handled,
        Err(e) => report_error(gateway, Some(msg), &e).await,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Log a failed update and apologise to its chat, best effort. Never fails.
pub async fn report_error<G: Gateway + ?Sized>(
    gateway: &G,
    msg: Option<&IncomingMessage>,
    err: &BotError,
) -> Outcome {
    error!("Error while processing update: {}", err);

    if let Some(msg) = msg {
        let sent = AssertUnwindSafe(gateway.send_reply(msg.chat_id, &replies::apology()))
            .catch_unwind()
            .await;
        match sent {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Failed to send error notice to chat {}: {}", msg.chat_id, e),
            Err(panic) => error!(
                "Panic while sending error notice to chat {}: {}",
                msg.chat_id,
                panic_message(panic.as_ref())
            ),
        }
    }

    Outcome::Handled
}

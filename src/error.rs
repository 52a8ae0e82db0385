use thiserror::Error;

/// A failure reported by the Telegram Bot API or the transport underneath it.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct GatewayError(#[from] teloxide::RequestError);

#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("Telegram API error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::{ApiError, RequestError};

    #[test]
    fn test_gateway_error_keeps_api_text() {
        let source = RequestError::Api(ApiError::BotBlocked);
        let expected = source.to_string();
        let err = GatewayError::from(source);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_bot_error_from_gateway() {
        let err: BotError = GatewayError::from(RequestError::Api(ApiError::BotBlocked)).into();
        assert!(matches!(err, BotError::Gateway(_)));
        assert!(err.to_string().starts_with("Telegram API error: "));
    }

    #[test]
    fn test_configuration_error_message() {
        let err = BotError::Configuration("BOT_TOKEN is not set".to_string());
        assert_eq!(err.to_string(), "configuration error: BOT_TOKEN is not set");
    }
}

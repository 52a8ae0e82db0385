use std::collections::HashMap;
use std::fmt;

use crate::replies::{HELP_BUTTON, STATUS_BUTTON, TIME_BUTTON};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Help,
    Status,
    Time,
    Unknown,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => write!(f, "start"),
            Command::Help => write!(f, "help"),
            Command::Status => write!(f, "status"),
            Command::Time => write!(f, "time"),
            Command::Unknown => write!(f, "unknown"),
        }
    }
}

/// Maps message text to a [`Command`]. Built once at startup.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    routes: HashMap<String, Command>,
    /// Own username, lower-cased, for stripping `/cmd@username`.
    username: Option<String>,
}

impl CommandRouter {
    pub fn new(username: Option<&str>) -> Self {
        let mut routes = HashMap::new();
        routes.insert("/start".to_string(), Command::Start);
        routes.insert("/help".to_string(), Command::Help);
        routes.insert("/status".to_string(), Command::Status);
        routes.insert("/time".to_string(), Command::Time);
        routes.insert(STATUS_BUTTON.to_lowercase(), Command::Status);
        routes.insert(TIME_BUTTON.to_lowercase(), Command::Time);
        routes.insert(HELP_BUTTON.to_lowercase(), Command::Help);

        Self {
            routes,
            username: username.map(str::to_lowercase),
        }
    }

    /// Case-insensitive lookup. A `/command` is matched on its first word and
    /// anything after it is ignored; button labels must match whole.
    /// Anything else is [`Command::Unknown`].
    pub fn route(&self, text: Option<&str>) -> Command {
        let Some(text) = text else {
            return Command::Unknown;
        };
        let text = text.trim().to_lowercase();
        let key = if text.starts_with('/') {
            let command = text.split_whitespace().next().unwrap_or_default();
            self.strip_mention(command)
        } else {
            text.as_str()
        };
        self.routes.get(key).copied().unwrap_or(Command::Unknown)
    }

    fn strip_mention<'a>(&self, key: &'a str) -> &'a str {
        if !key.starts_with('/') {
            return key;
        }
        match (key.split_once('@'), self.username.as_deref()) {
            (Some((command, mention)), Some(own)) if mention == own => command,
            _ => key,
        }
    }
}

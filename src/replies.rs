//! Reply texts and the fixed reply keyboard.

use chrono::Local;

pub const STATUS_BUTTON: &str = "Проверить статус";
pub const TIME_BUTTON: &str = "Получить время";
pub const HELP_BUTTON: &str = "Помощь";

const BUTTONS_PER_ROW: usize = 2;

pub const GREETING: &str = "Привет! Я тестовый бот. Используй команды или клавиатуру ниже.";

pub const HELP: &str = "Доступные команды:\n\
/start - Запустить бота\n\
/help - Показать это сообщение\n\
/status - Проверить статус бота\n\
/time - Получить текущее время\n\
\n\
Или используй кнопки клавиатуры!";

pub const UNKNOWN_COMMAND: &str = "Неизвестная команда. Используй /help для списка команд.";

pub const APOLOGY: &str = "Произошла ошибка. Попробуйте позже или свяжитесь с администратором.";

pub const STATUS_OK: &str = "🟢 Бот работает нормально";

/// Format of every timestamp shown to users.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reply keyboard layout: rows of button labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<&'static str>>,
    pub resize: bool,
}

impl Keyboard {
    /// Status, time and help buttons, two per row.
    pub fn main() -> Self {
        let rows = [STATUS_BUTTON, TIME_BUTTON, HELP_BUTTON]
            .chunks(BUTTONS_PER_ROW)
            .map(|row| row.to_vec())
            .collect();
        Self { rows, resize: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    /// A reply carrying the main keyboard.
    pub fn with_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(Keyboard::main()),
        }
    }
}

/// Current local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn greeting() -> Reply {
    Reply::with_keyboard(GREETING)
}

pub fn help() -> Reply {
    Reply::with_keyboard(HELP)
}

pub fn unknown_command() -> Reply {
    Reply::with_keyboard(UNKNOWN_COMMAND)
}

pub fn apology() -> Reply {
    Reply::with_keyboard(APOLOGY)
}

pub fn time(now: &str) -> Reply {
    Reply::with_keyboard(format!("Текущее время: {}", now))
}

/// `status` is the already-rendered status line.
pub fn status(status: &str, now: &str) -> Reply {
    Reply::with_keyboard(format!("Статус бота: {}\nВремя работы: {}", status, now))
}

pub fn status_failure(error: &str) -> String {
    format!("🔴 Ошибка API: {}", error)
}

use crate::domain::{ChatId, UserId};

/// Incoming update model, independent of the transport.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
    Callback(CallbackQuery),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    /// `None` when the originating message is no longer available.
    pub chat_id: Option<ChatId>,
    pub user_id: UserId,
    pub username: Option<String>,
    pub callback_id: String,
    pub data: String,
}

/// Inline keyboard (buttons); each button is rendered on its own row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    /// One button per option, using the option as both label and callback data.
    pub fn one_per_row(options: &[String]) -> Self {
        let buttons = options
            .iter()
            .map(|opt| InlineButton {
                label: opt.clone(),
                callback_data: opt.clone(),
            })
            .collect();
        Self { buttons }
    }
}

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    /// Longest callback payload a button can carry, in bytes.
    pub max_callback_data_len: usize,
}

/// Parse `/cmd@botname args` into a lowercase command name. Arguments are ignored.
pub fn parse_command(text: &str) -> String {
    let first = text.split_whitespace().next().unwrap_or("");

    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

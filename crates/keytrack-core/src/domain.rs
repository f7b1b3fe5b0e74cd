/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A redeemable key from the catalog.
pub type Key = u64;

/// Who sent the update being handled.
///
/// The chat id is the only session identity the bot has; replies and pickers are
/// routed back through it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: String,
}

impl RequestContext {
    pub fn new(chat_id: ChatId, user_id: UserId, username: Option<String>) -> Self {
        Self {
            chat_id,
            user_id,
            username: username.unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

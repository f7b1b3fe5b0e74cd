use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{InlineKeyboard, MessagingCapabilities},
    Result,
};

/// Outbound side of the chat transport.
///
/// The shop only talks to users through this trait, so handlers can be driven
/// in tests with a recording fake instead of a live bot.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    /// Upload the file at `path` as an audio attachment.
    async fn send_audio(&self, chat_id: ChatId, path: &Path) -> Result<MessageRef>;

    /// Acknowledge a button press, optionally with a toast or (if `show_alert`) a modal alert.
    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;
}

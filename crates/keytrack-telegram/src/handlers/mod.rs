//! Telegram update handlers.
//!
//! Each handler is a small adapter that maps a teloxide update into the
//! transport-independent `IncomingUpdate` and hands it to the key shop.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use crate::router::AppState;
mod callback;
mod commands;
mod text;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(is_command) = msg.text().map(|t| t.starts_with('/')) else {
        // Voice, photos, stickers... are not keys.
        return Ok(());
    };

    if is_command {
        return commands::handle_command(msg, state).await;
    }

    text::handle_text(msg, state).await
}

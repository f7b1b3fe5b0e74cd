use std::sync::Arc;

use teloxide::prelude::*;

use keytrack_core::{
    domain::{ChatId, UserId},
    messaging::types::{parse_command, Command, IncomingUpdate},
};

use crate::router::AppState;

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let name = parse_command(text);
    tracing::debug!(command = %name, chat_id = msg.chat.id.0, "command received");

    let update = IncomingUpdate::Command(Command {
        chat_id: ChatId(msg.chat.id.0),
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        name,
    });

    state.shop.handle_update(update).await;
    Ok(())
}

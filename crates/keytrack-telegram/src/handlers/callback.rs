use std::sync::Arc;

use teloxide::prelude::*;

use keytrack_core::{
    domain::{ChatId, UserId},
    messaging::types::{self, IncomingUpdate},
};

use crate::router::AppState;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let update = IncomingUpdate::Callback(types::CallbackQuery {
        chat_id: q.message.as_ref().map(|m| ChatId(m.chat.id.0)),
        user_id: UserId(q.from.id.0 as i64),
        username: q.from.username.clone(),
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
    });

    state.shop.handle_update(update).await;
    Ok(())
}

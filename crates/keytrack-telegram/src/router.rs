use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use keytrack_core::{
    audit::AuditLogger, catalog::KeyCatalog, config::Config, messaging::port::MessagingPort,
    shop::KeyShop, tracks::TrackLibrary,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub shop: Arc<KeyShop>,
}

/// Build the shop around a live bot and poll Telegram until interrupted.
pub async fn run_polling(cfg: Arc<Config>, catalog: KeyCatalog) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => tracing::info!(bot = %me.username(), "keytrack started"),
        Err(e) => tracing::warn!(error = %e, "could not fetch bot identity"),
    }
    tracing::info!(
        keys = catalog.remaining().await,
        catalog = %cfg.catalog_path.display(),
        "key catalog loaded"
    );
    tracing::info!(
        dir = %cfg.track_dir.display(),
        extension = %cfg.track_extension,
        "serving tracks"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let shop = Arc::new(KeyShop::new(
        catalog,
        TrackLibrary::new(cfg.track_dir.clone(), cfg.track_extension.clone()),
        messenger,
        AuditLogger::new(cfg.audit_log_path.clone(), cfg.audit_log_json),
    ));

    let state = Arc::new(AppState { shop });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("keytrack stopped");
    Ok(())
}

//! The key shop: redemption of keys and delivery of tracks over a [`MessagingPort`].

use std::{path::PathBuf, sync::Arc};

use crate::{
    audit::{AuditEvent, AuditLogger},
    catalog::KeyCatalog,
    domain::{ChatId, RequestContext},
    faults,
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, Command, IncomingUpdate, InlineKeyboard, TextMessage},
    },
    redemption::{self, Redemption},
    tracks::{TrackLibrary, TrackListing},
    Result,
};

pub const WELCOME: &str = "Welcome! Enter your key number to get your music.";
pub const INVALID_NUMBER: &str = "Please enter a valid number.";
pub const KEY_REJECTED: &str =
    "Sorry, the number you entered has already been used or is invalid. Please try another.";
pub const PURCHASE_CONFIRMED: &str = "Thank you for your purchase! Here are the available tracks:";
pub const CHOOSE_TRACK: &str = "Choose a track to download:";
pub const TRACK_SENDING: &str = "Track is being sent!";

pub fn dir_not_found(dir: &std::path::Path) -> String {
    format!("Directory '{}' not found!", dir.display())
}

pub fn no_tracks_found(dir: &std::path::Path) -> String {
    format!("No music files found in '{}'.", dir.display())
}

pub fn track_not_found(token: &str) -> String {
    format!("Sorry, the track '{token}' was not found.")
}

/// What happened to a track selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent(PathBuf),
    NotFound,
    /// Callback without a chat or payload; acknowledged and dropped.
    Ignored,
}

/// Owns the key catalog and track library and answers updates through a messenger.
pub struct KeyShop {
    catalog: KeyCatalog,
    tracks: TrackLibrary,
    messenger: Arc<dyn MessagingPort>,
    audit: AuditLogger,
}

impl KeyShop {
    pub fn new(
        catalog: KeyCatalog,
        tracks: TrackLibrary,
        messenger: Arc<dyn MessagingPort>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            catalog,
            tracks,
            messenger,
            audit,
        }
    }

    pub fn catalog(&self) -> &KeyCatalog {
        &self.catalog
    }

    /// Handle one update to completion. Failures are reported, never propagated.
    pub async fn handle_update(&self, update: IncomingUpdate) {
        match update {
            IncomingUpdate::Command(cmd) => {
                let ctx = RequestContext::new(cmd.chat_id, cmd.user_id, cmd.username.clone());
                if let Err(e) = self.handle_command(&ctx, &cmd).await {
                    faults::report(&self.audit, &ctx, "command", &cmd.name, &e).await;
                }
            }
            IncomingUpdate::Text(msg) => {
                let ctx = RequestContext::new(msg.chat_id, msg.user_id, msg.username.clone());
                if let Err(e) = self.handle_text(&ctx, &msg).await {
                    faults::report(&self.audit, &ctx, "redeem_key", &msg.text, &e).await;
                }
            }
            IncomingUpdate::Callback(q) => {
                // Chat-less callbacks are reported under chat 0.
                let ctx = RequestContext::new(
                    q.chat_id.unwrap_or(ChatId(0)),
                    q.user_id,
                    q.username.clone(),
                );
                if let Err(e) = self.handle_selection(&q).await {
                    faults::report(&self.audit, &ctx, "deliver_track", &q.data, &e).await;
                }
            }
        }
    }

    pub async fn handle_command(&self, ctx: &RequestContext, cmd: &Command) -> Result<()> {
        if cmd.name.eq_ignore_ascii_case("start") {
            self.messenger.send_text(ctx.chat_id, WELCOME).await?;
        }
        Ok(())
    }

    /// Classify a text message as a key and, on success, present the track picker.
    ///
    /// A redeemed key stays consumed even when no track can be offered.
    pub async fn handle_text(&self, ctx: &RequestContext, msg: &TextMessage) -> Result<Redemption> {
        let outcome = redemption::redeem(&self.catalog, &msg.text).await;

        match outcome {
            Redemption::NotNumeric => {
                self.audit
                    .record(AuditEvent::redemption(ctx, &msg.text, "invalid"))
                    .await;
                self.messenger.send_text(ctx.chat_id, INVALID_NUMBER).await?;
            }
            Redemption::Rejected => {
                self.audit
                    .record(AuditEvent::redemption(ctx, &msg.text, "rejected"))
                    .await;
                self.messenger.send_text(ctx.chat_id, KEY_REJECTED).await?;
            }
            Redemption::Redeemed(key) => {
                tracing::info!(key, chat_id = ctx.chat_id.0, user = %ctx.username, "key redeemed");
                self.audit
                    .record(AuditEvent::redemption(ctx, &msg.text, "redeemed"))
                    .await;
                self.messenger
                    .send_text(ctx.chat_id, PURCHASE_CONFIRMED)
                    .await?;
                self.offer_tracks(ctx.chat_id).await?;
            }
        }

        Ok(outcome)
    }

    async fn offer_tracks(&self, chat_id: ChatId) -> Result<()> {
        let names = match self.tracks.scan().await? {
            TrackListing::MissingDir => {
                tracing::warn!(dir = %self.tracks.dir().display(), "track directory not found");
                self.messenger
                    .send_text(chat_id, &dir_not_found(self.tracks.dir()))
                    .await?;
                return Ok(());
            }
            TrackListing::Empty => Vec::new(),
            TrackListing::Tracks(names) => self.selectable(names),
        };

        if names.is_empty() {
            self.messenger
                .send_text(chat_id, &no_tracks_found(self.tracks.dir()))
                .await?;
            return Ok(());
        }

        self.messenger
            .send_inline_keyboard(chat_id, CHOOSE_TRACK, InlineKeyboard::one_per_row(&names))
            .await?;
        Ok(())
    }

    /// Drop names that cannot be carried as a button payload.
    fn selectable(&self, names: Vec<String>) -> Vec<String> {
        let limit = self.messenger.capabilities().max_callback_data_len;
        names
            .into_iter()
            .filter(|name| {
                let fits = name.len() <= limit;
                if !fits {
                    tracing::warn!(track = %name, limit, "track name too long for a picker button");
                }
                fits
            })
            .collect()
    }

    /// Resolve a picker selection and send the track, or alert that it is gone.
    pub async fn handle_selection(&self, q: &CallbackQuery) -> Result<Delivery> {
        let Some(chat_id) = q.chat_id.filter(|_| !q.data.is_empty()) else {
            self.messenger
                .answer_callback_query(&q.callback_id, None, false)
                .await?;
            return Ok(Delivery::Ignored);
        };
        let ctx = RequestContext::new(chat_id, q.user_id, q.username.clone());

        let Some(path) = self.tracks.locate(&q.data).await? else {
            self.audit
                .record(AuditEvent::delivery(&ctx, &q.data, "not_found"))
                .await;
            self.messenger
                .answer_callback_query(&q.callback_id, Some(&track_not_found(&q.data)), true)
                .await?;
            return Ok(Delivery::NotFound);
        };

        self.messenger
            .answer_callback_query(&q.callback_id, Some(TRACK_SENDING), false)
            .await?;
        self.messenger.send_audio(chat_id, &path).await?;

        tracing::info!(track = %q.data, chat_id = chat_id.0, "track delivered");
        self.audit
            .record(AuditEvent::delivery(&ctx, &q.data, "sent"))
            .await;
        Ok(Delivery::Sent(path))
    }
}

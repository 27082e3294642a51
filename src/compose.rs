//! Composing a card and punching it into a share link.

use echocard_packs::{cycle_seal, find_launch_card, launch_cards, random_seal, seal_options};
use echocard_share::{
    encode_payload, share_url, truncate_chars, SharePayload, MAX_MESSAGE_CHARS, MAX_NAME_CHARS,
    SUPPORTED_VERSION,
};
use echocard_stickers::{encode_sticker_field, StickerPlacement};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::route::Route;
use crate::source::PackSource;
use crate::state::AppState;

/// Message starters offered on the compose screen.
pub const MESSAGE_TEMPLATES: [&str; 7] = [
    "You're my favorite glitch in the matrix.",
    "I choose you. Every timeline.",
    "If this is a simulation... keep me in yours.",
    "Your vibe? Unreasonably elite.",
    "I'd fight a bear for you (politely).",
    "You + me = soft chaos, perfect.",
    "Here's a tiny spell: be kind to yourself.",
];

pub fn templates() -> &'static [&'static str] {
    &MESSAGE_TEMPLATES
}

/// A card being personalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeDraft {
    pub pack: String,
    pub card: String,
    pub to: String,
    pub from: String,
    pub msg: String,
    /// Track key, or empty for no music.
    pub track: String,
    /// Pack-relative seal image, or empty for no seal.
    pub seal: String,
    pub stickers: Vec<StickerPlacement>,
}

impl ComposeDraft {
    pub fn new(pack: impl Into<String>, card: impl Into<String>) -> Self {
        Self {
            pack: pack.into(),
            card: card.into(),
            ..Default::default()
        }
    }

    /// Start a draft for a sendable card, defaulting the seal to the pack's
    /// first SVG sticker.
    ///
    /// # Errors
    /// `AppError::NotFound` if the pack or card does not exist (sticker
    /// sheets count as missing).
    pub async fn prepare(
        state: &AppState,
        source: &dyn PackSource,
        pack_id: &str,
        card_id: &str,
        template: Option<&str>,
    ) -> Result<Self> {
        if state.pack(pack_id).is_none() {
            return Err(AppError::pack_not_found(pack_id));
        }
        let data = state.pack_data(source, pack_id).await?;
        let card = find_launch_card(&data.cards, card_id)
            .ok_or_else(|| AppError::card_not_found(pack_id, card_id))?;

        let mut draft = Self::new(pack_id, card.id.clone());
        draft.msg = template.unwrap_or_default().to_string();
        draft.seal = seal_options(&data.stickers)
            .first()
            .map(|src| src.to_string())
            .unwrap_or_default();
        Ok(draft)
    }

    /// Move to the next (or, with a negative `step`, previous) seal option.
    /// With no options the seal is left as it is.
    pub fn cycle_seal(&mut self, options: &[&str], step: isize) {
        if let Some(seal) = cycle_seal(options, &self.seal, step) {
            self.seal = seal.to_string();
        }
    }

    pub fn randomize_seal<R: Rng + ?Sized>(&mut self, options: &[&str], rng: &mut R) {
        if let Some(seal) = random_seal(options, rng) {
            self.seal = seal.to_string();
        }
    }

    /// Send without an envelope seal.
    pub fn clear_seal(&mut self) {
        self.seal.clear();
    }

    /// Freeze the draft into a payload stamped with `ts` (ms since epoch).
    /// Names and message are cut to their maximum lengths.
    pub fn punch(&self, ts: i64) -> Result<SharePayload> {
        Ok(SharePayload {
            v: SUPPORTED_VERSION,
            pack: self.pack.clone(),
            card: self.card.clone(),
            to: truncate_chars(&self.to, MAX_NAME_CHARS),
            from: truncate_chars(&self.from, MAX_NAME_CHARS),
            msg: truncate_chars(&self.msg, MAX_MESSAGE_CHARS),
            sticker: encode_sticker_field(&self.stickers).map_err(AppError::Stickers)?,
            track: self.track.clone(),
            seal: self.seal.clone(),
            ts,
            extra: Default::default(),
        })
    }
}

/// Result of punching a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct PunchedLink {
    pub payload: SharePayload,
    pub token: String,
    pub url: String,
}

/// Punch a draft now and build the link to share.
///
/// The link points at `config.base_url` when set, else `current_origin`.
pub fn punch_link(
    config: &AppConfig,
    current_origin: &str,
    draft: &ComposeDraft,
) -> Result<PunchedLink> {
    let payload = draft.punch(chrono::Utc::now().timestamp_millis())?;
    let token = encode_payload(&payload)?;
    let url = share_url(config.share_base(current_origin), &token);
    tracing::info!(
        pack = %payload.pack,
        card = %payload.card,
        token_len = token.len(),
        "punched share link"
    );
    Ok(PunchedLink {
        payload,
        token,
        url,
    })
}

/// Route to a random card to compose: from `prefer` if that pack exists,
/// else from a random pack, with a random message template.
///
/// # Errors
/// `AppError::NotFound` if there are no packs or the chosen pack has no
/// sendable card.
pub async fn shuffle_compose(
    state: &AppState,
    source: &dyn PackSource,
    prefer: Option<&str>,
) -> Result<Route> {
    let mut rng = StdRng::from_os_rng();
    shuffle_compose_with(state, source, prefer, &mut rng).await
}

/// [`shuffle_compose`] with a caller-supplied random source.
pub async fn shuffle_compose_with<R: Rng + ?Sized>(
    state: &AppState,
    source: &dyn PackSource,
    prefer: Option<&str>,
    rng: &mut R,
) -> Result<Route> {
    let pack = match prefer.filter(|id| state.pack(id).is_some()) {
        Some(id) => id.to_string(),
        None => state
            .packs()
            .choose(rng)
            .map(|entry| entry.id.clone())
            .ok_or_else(|| AppError::NotFound("any pack".to_string()))?,
    };

    let data = state.pack_data(source, &pack).await?;
    let cards: Vec<_> = launch_cards(&data.cards).collect();
    let card = cards
        .choose(rng)
        .map(|card| card.id.clone())
        .ok_or_else(|| AppError::NotFound(format!("sendable card in pack `{pack}`")))?;
    let template = MESSAGE_TEMPLATES.choose(rng).map(|t| t.to_string());

    tracing::debug!(%pack, %card, "shuffled compose target");
    Ok(Route::Compose {
        pack,
        card,
        template,
    })
}

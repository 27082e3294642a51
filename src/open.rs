//! Opening a share link: rebuild the card the sender punched.

use echocard_packs::{asset_url, find_launch_card, find_track, is_svg_path};
use echocard_share::{decode_payload, token_from_link, SharePayload};
use echocard_stickers::{normalize_stickers, parse_sticker_field, StageSize, StickerPlacement};

use crate::compose::ComposeDraft;
use crate::error::{AppError, Result};
use crate::source::PackSource;
use crate::state::AppState;

/// Everything the recipient's view needs.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedCard {
    pub payload: SharePayload,
    pub pack_name: String,
    pub card_title: String,
    /// Served path of the card art.
    pub card_src: String,
    /// Served path of the envelope seal, or empty.
    pub seal_src: String,
    pub track: Option<OpenedTrack>,
    pub stickers: Vec<PlacedSticker>,
    pub reply: ReplyPrefill,
}

/// The track the sender picked, located in the pack's playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedTrack {
    /// Position in the pack's track list.
    pub index: usize,
    pub title: String,
    /// Served path of the audio, or empty if the track has no file.
    pub src: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSticker {
    pub placement: StickerPlacement,
    /// Served path of the sticker image.
    pub image_src: String,
}

/// Prefill for sending a card back: same pack and card, names swapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPrefill {
    pub pack: String,
    pub card: String,
    pub to: String,
    pub from: String,
}

impl ReplyPrefill {
    pub fn into_draft(self) -> ComposeDraft {
        ComposeDraft {
            to: self.to,
            from: self.from,
            ..ComposeDraft::new(self.pack, self.card)
        }
    }
}

/// Decode `token` and resolve the card it describes.
///
/// `stage` is the content size of the card stage, used for pixel-based
/// sticker positions; without it those stickers may be dropped.
///
/// # Errors
/// `AppError::InvalidLink` for a token that does not decode,
/// `AppError::NotFound` for an unknown pack or card.
pub async fn open_card(
    state: &AppState,
    source: &dyn PackSource,
    token: &str,
    stage: Option<StageSize>,
) -> Result<OpenedCard> {
    let payload = decode_payload(token)?;
    if !payload.is_current_version() {
        tracing::warn!(v = payload.v, "opening share payload of unknown version");
    }

    let entry = state
        .pack(&payload.pack)
        .ok_or_else(|| AppError::pack_not_found(&payload.pack))?;
    let data = state.pack_data(source, &payload.pack).await?;
    let card = find_launch_card(&data.cards, &payload.card)
        .ok_or_else(|| AppError::card_not_found(&payload.pack, &payload.card))?;
    let pack_dir = entry.pack_dir.as_str();

    let track = find_track(&data.tracks, &payload.track).map(|(index, track)| OpenedTrack {
        index,
        title: track.display_title().to_string(),
        src: asset_url(pack_dir, track.source()),
    });

    let seal_src = if is_svg_path(&payload.seal) {
        asset_url(pack_dir, &payload.seal)
    } else {
        String::new()
    };

    let records = parse_sticker_field(&payload.sticker);
    let stickers: Vec<PlacedSticker> = normalize_stickers(&records, stage)
        .map(|placement| {
            let dir = match placement.pack_id.as_deref() {
                Some(sticker_pack) => state.pack_dir(sticker_pack),
                None => pack_dir,
            };
            PlacedSticker {
                image_src: asset_url(dir, &placement.src),
                placement,
            }
        })
        .collect();
    if stickers.len() < records.len() {
        tracing::debug!(
            kept = stickers.len(),
            dropped = records.len() - stickers.len(),
            "some stickers could not be placed"
        );
    }

    tracing::info!(pack = %payload.pack, card = %payload.card, "opened card");

    Ok(OpenedCard {
        pack_name: entry.name().to_string(),
        card_title: card.title.clone().unwrap_or_else(|| card.id.clone()),
        card_src: asset_url(pack_dir, card.image()),
        seal_src,
        track,
        stickers,
        reply: ReplyPrefill {
            pack: payload.pack.clone(),
            card: payload.card.clone(),
            to: payload.from.clone(),
            from: payload.to.clone(),
        },
        payload,
    })
}

/// Open pasted text: a full share link, a fragment, or a bare token.
pub async fn open_link(
    state: &AppState,
    source: &dyn PackSource,
    text: &str,
    stage: Option<StageSize>,
) -> Result<OpenedCard> {
    let token = token_from_link(text).ok_or(AppError::MissingToken)?;
    open_card(state, source, token, stage).await
}

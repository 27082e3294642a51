//! Catalog questions asked while composing and opening cards.

use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;

use crate::types::{CardRecord, StickerAsset, TrackRecord};
use crate::PACKS_DIR;

static SVG_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.svg($|\?)").expect("invalid svg path pattern"));

const STICKER_MARKERS: [&str; 3] = ["-st-", "_st_", "sticker"];

pub fn is_svg_path(path: &str) -> bool {
    SVG_PATH.is_match(path)
}

/// Sticker sheets are shipped in the card list of some packs; they are not
/// sendable cards.
pub fn is_sticker_card(card: &CardRecord) -> bool {
    let id = card.id.to_lowercase();
    let image = card.image().to_lowercase();
    let title = card.title.as_deref().unwrap_or_default().to_lowercase();
    STICKER_MARKERS
        .iter()
        .any(|marker| id.contains(marker) || image.contains(marker))
        || title.contains("sticker")
}

/// Cards that can be picked and sent.
pub fn launch_cards(cards: &[CardRecord]) -> impl Iterator<Item = &CardRecord> {
    cards.iter().filter(|card| !is_sticker_card(card))
}

pub fn find_launch_card<'a>(cards: &'a [CardRecord], card_id: &str) -> Option<&'a CardRecord> {
    launch_cards(cards).find(|card| card.id == card_id)
}

/// Stickers usable as an envelope seal (SVG only), in pack order.
pub fn seal_options(stickers: &[StickerAsset]) -> Vec<&str> {
    stickers
        .iter()
        .map(|sticker| sticker.src.as_str())
        .filter(|src| is_svg_path(src))
        .collect()
}

/// Step through seal options with wrap-around. An unknown `current` counts
/// as the first option.
pub fn cycle_seal<'a>(options: &[&'a str], current: &str, step: isize) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    let len = options.len() as isize;
    let start = options
        .iter()
        .position(|option| *option == current)
        .unwrap_or(0) as isize;
    let next = (start + step.rem_euclid(len)) % len;
    Some(options[next as usize])
}

/// Pick any seal option.
pub fn random_seal<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> Option<&'a str> {
    options.choose(rng).copied()
}

/// Find a track by the key stored in a share payload.
pub fn find_track<'a>(tracks: &'a [TrackRecord], key: &str) -> Option<(usize, &'a TrackRecord)> {
    if key.is_empty() {
        return None;
    }
    tracks
        .iter()
        .enumerate()
        .find(|(_, track)| track.key() == key)
}

/// Resolve a pack-relative asset path to the path it is served from.
/// Absolute `http(s)` URLs pass through; an empty path stays empty.
pub fn asset_url(pack_dir: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http") {
        return path.to_string();
    }
    format!("{PACKS_DIR}/{pack_dir}/{path}")
}

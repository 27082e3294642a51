//! Card pack model for EchoCard.
//!
//! A pack is listed in `manifest.json`, described by its own `pack.json`,
//! and ships card, sticker, and track lists. Fetching those files is the
//! caller's job; this crate parses them and answers catalog questions
//! (which cards can be sent, which stickers can seal an envelope, where an
//! asset lives).

mod catalog;
mod error;
mod loader;
mod types;

pub use catalog::{
    asset_url, cycle_seal, find_launch_card, find_track, is_sticker_card, is_svg_path,
    launch_cards, random_seal, seal_options,
};
pub use error::PackError;
pub use loader::{parse_list, parse_manifest, parse_pack_definition};
pub use types::{
    CardRecord, ManifestEntry, PackAssets, PackData, PackDataPaths, PackDefinition, StickerAsset,
    TrackRecord,
};

/// Directory all pack assets are served from.
pub const PACKS_DIR: &str = "packs";

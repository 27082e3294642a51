//! Sticker placement normalization.
//!
//! Sticker records have been stored three ways over time: fractional or
//! 0–100 percent centers (`xp`/`yp`), pixel centers relative to the stage
//! (`x`/`y`), and old fractional `x`/`y` with no stage size. Everything is
//! normalized to one canonical [`StickerPlacement`] so the renderer never
//! branches on format. Records that fit none of the shapes are dropped.

mod field;
mod normalize;
mod types;

pub use field::{encode_sticker_field, parse_sticker_field};
pub use normalize::{
    clamp01, normalize_sticker, normalize_stickers, StickerNormalizer, StickerShape,
    DEFAULT_LEGACY_FRACTION_MAX,
};
pub use types::{
    StageSize, StickerPlacement, DEFAULT_ROTATION, DEFAULT_SCALE, DEFAULT_WIDTH_PERCENT,
};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_ROTATION: f64 = 0.0;
/// Base sticker width as a percentage of stage width.
pub const DEFAULT_WIDTH_PERCENT: f64 = 9.0;

/// One sticker on a card, in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerPlacement {
    /// Relative path to the sticker image.
    pub src: String,
    /// `None` ⇒ the sticker comes from the card's own pack.
    #[serde(rename = "packId")]
    pub pack_id: Option<String>,
    /// Center x as a fraction of stage width, in [0, 1].
    pub xp: f64,
    /// Center y as a fraction of stage height, in [0, 1].
    pub yp: f64,
    pub sp: f64,
    /// Degrees.
    pub rot: f64,
    pub wv: f64,
}

impl StickerPlacement {
    /// A default-sized, unrotated sticker centered at (`xp`, `yp`).
    pub fn at(src: impl Into<String>, xp: f64, yp: f64) -> Self {
        Self {
            src: src.into(),
            pack_id: None,
            xp,
            yp,
            sp: DEFAULT_SCALE,
            rot: DEFAULT_ROTATION,
            wv: DEFAULT_WIDTH_PERCENT,
        }
    }
}

/// Content size of the stage a sticker was placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSize {
    pub cw: f64,
    pub ch: f64,
}

impl StageSize {
    pub fn new(cw: f64, ch: f64) -> Self {
        Self { cw, ch }
    }

    /// Pixel coordinates can only be converted against a non-empty stage.
    pub fn is_usable(&self) -> bool {
        self.cw > 0.0 && self.ch > 0.0
    }
}

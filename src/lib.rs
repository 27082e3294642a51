//! EchoCard: themed greeting cards shared as self-contained links.
//!
//! The sender composes a card from a pack and "punches" it into a share
//! link whose token carries the whole card. The recipient's side decodes
//! the token and rebuilds the card (art, message, seal, track, stickers)
//! from the same pack data. Nothing is stored server-side.
//!
//! Rendering, audio, and input handling live in the embedding UI; this
//! crate owns the data flow between the pack files and the share token.

pub mod compose;
pub mod config;
pub mod error;
pub mod open;
pub mod route;
pub mod source;
pub mod state;

pub use compose::{
    punch_link, shuffle_compose, shuffle_compose_with, templates, ComposeDraft, PunchedLink,
    MESSAGE_TEMPLATES,
};
pub use config::AppConfig;
pub use error::{AppError, ConfigError, Result};
pub use open::{open_card, open_link, OpenedCard, OpenedTrack, PlacedSticker, ReplyPrefill};
pub use route::Route;
pub use source::{FsPackSource, MemoryPackSource, PackSource, SourceError};
pub use state::{AppState, PackEntry, RenderTicket};

pub use echocard_packs as packs;
pub use echocard_share as share;
pub use echocard_stickers as stickers;

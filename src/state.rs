//! Application state shared by the compose and open flows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use echocard_packs::{
    parse_manifest, parse_pack_definition, ManifestEntry, PackData, PackDefinition,
};
use parking_lot::Mutex;

use crate::error::{AppError, Result};
use crate::source::PackSource;

/// A pack listed in the manifest, with its definition loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PackEntry {
    pub id: String,
    /// Directory under the packs root holding this pack's files.
    pub pack_dir: String,
    pub definition: PackDefinition,
}

impl PackEntry {
    pub fn from_manifest(entry: &ManifestEntry, definition: PackDefinition) -> Self {
        Self {
            id: entry.id.clone(),
            pack_dir: entry.pack_dir().to_string(),
            definition,
        }
    }

    pub fn name(&self) -> &str {
        self.definition.display_name(&self.id)
    }

    fn data_path(&self, file: &str) -> String {
        format!("{}/{}", self.pack_dir, file)
    }
}

/// Identifies one render pass. Only the most recently started render is
/// current; a render that finishes after a newer one started should drop
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn is_current(&self, state: &AppState) -> bool {
        state.render_seq.load(Ordering::Acquire) == self.0
    }
}

/// Pack index, lazily loaded pack data, and the render sequence.
///
/// Interior mutability via `parking_lot::Mutex`; the lock is never held
/// across an await.
#[derive(Debug, Default)]
pub struct AppState {
    packs: Vec<PackEntry>,
    data_cache: Mutex<HashMap<String, Arc<PackData>>>,
    render_seq: AtomicU64,
}

impl AppState {
    pub fn new(packs: Vec<PackEntry>) -> Self {
        Self {
            packs,
            ..Default::default()
        }
    }

    /// Load the manifest and every listed pack definition.
    ///
    /// A pack whose definition fails to load is skipped; the manifest itself
    /// failing is an error.
    pub async fn bootstrap(source: &dyn PackSource, manifest_path: &str) -> Result<Self> {
        let manifest = source.load_json(manifest_path).await?;
        let entries = parse_manifest(&manifest)?;

        let mut packs = Vec::with_capacity(entries.len());
        for entry in &entries {
            let definition = match source.load_json(&entry.pack_path).await {
                Ok(json) => parse_pack_definition(&json).map_err(AppError::from),
                Err(e) => Err(e.into()),
            };
            match definition {
                Ok(definition) => packs.push(PackEntry::from_manifest(entry, definition)),
                Err(e) => tracing::warn!(pack = %entry.id, error = %e, "skipping pack"),
            }
        }

        tracing::info!(packs = packs.len(), listed = entries.len(), "pack index loaded");
        Ok(Self::new(packs))
    }

    /// Packs in manifest order.
    pub fn packs(&self) -> &[PackEntry] {
        &self.packs
    }

    pub fn pack(&self, pack_id: &str) -> Option<&PackEntry> {
        self.packs.iter().find(|p| p.id == pack_id)
    }

    /// Directory for a pack id; unknown ids map to themselves.
    pub fn pack_dir<'a>(&'a self, pack_id: &'a str) -> &'a str {
        self.pack(pack_id)
            .map(|p| p.pack_dir.as_str())
            .unwrap_or(pack_id)
    }

    /// Cards, stickers, and tracks of a pack, loaded once and cached.
    ///
    /// The track list is optional: if it fails to load the pack simply has
    /// no tracks.
    pub async fn pack_data(&self, source: &dyn PackSource, pack_id: &str) -> Result<Arc<PackData>> {
        let cached = self.data_cache.lock().get(pack_id).cloned();
        if let Some(data) = cached {
            return Ok(data);
        }

        let entry = self
            .pack(pack_id)
            .ok_or_else(|| AppError::pack_not_found(pack_id))?;
        let paths = &entry.definition.data;

        let cards = source.load_json(&entry.data_path(&paths.cards)).await?;
        let stickers = source.load_json(&entry.data_path(&paths.stickers)).await?;
        let tracks = match &paths.tracks {
            Some(file) => match source.load_json(&entry.data_path(file)).await {
                Ok(json) => Some(json),
                Err(e) => {
                    tracing::warn!(pack = %pack_id, error = %e, "track list unavailable");
                    None
                }
            },
            None => None,
        };

        let data = Arc::new(PackData::from_json(&cards, &stickers, tracks.as_ref())?);
        tracing::debug!(
            pack = %pack_id,
            cards = data.cards.len(),
            stickers = data.stickers.len(),
            tracks = data.tracks.len(),
            "pack data loaded"
        );

        let mut cache = self.data_cache.lock();
        Ok(Arc::clone(cache.entry(pack_id.to_string()).or_insert(data)))
    }

    /// Start a render pass, superseding any render still in flight.
    pub fn begin_render(&self) -> RenderTicket {
        RenderTicket(self.render_seq.fetch_add(1, Ordering::AcqRel) + 1)
    }
}

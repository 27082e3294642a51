use serde_json::{Map, Value};

use crate::types::{
    StageSize, StickerPlacement, DEFAULT_ROTATION, DEFAULT_SCALE, DEFAULT_WIDTH_PERCENT,
};

/// Largest `x`/`y` still read as a fraction when no stage size is known.
pub const DEFAULT_LEGACY_FRACTION_MAX: f64 = 1.2;

/// `max(0, min(1, n))`.
pub fn clamp01(n: f64) -> f64 {
    n.min(1.0).max(0.0)
}

/// Position shape of a raw sticker record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickerShape {
    /// `xp`/`yp` as fractions, or as 0–100 percentages when above 1.
    Percent { xp: f64, yp: f64 },
    /// `x`/`y` in stage pixels.
    Pixel { x: f64, y: f64, stage: StageSize },
    /// `x`/`y` fractions from records saved without a stage size.
    LegacyFraction { x: f64, y: f64 },
}

impl StickerShape {
    /// Normalized center, clamped to [0, 1].
    pub fn center(&self) -> (f64, f64) {
        match *self {
            StickerShape::Percent { xp, yp } => {
                (clamp01(from_percent(xp)), clamp01(from_percent(yp)))
            }
            StickerShape::Pixel { x, y, stage } => (clamp01(x / stage.cw), clamp01(y / stage.ch)),
            StickerShape::LegacyFraction { x, y } => (clamp01(x), clamp01(y)),
        }
    }
}

fn from_percent(n: f64) -> f64 {
    if n > 1.0 {
        n / 100.0
    } else {
        n
    }
}

/// Resolves raw sticker records into [`StickerPlacement`]s.
#[derive(Debug, Clone, Copy)]
pub struct StickerNormalizer {
    legacy_fraction_max: f64,
}

impl Default for StickerNormalizer {
    fn default() -> Self {
        Self {
            legacy_fraction_max: DEFAULT_LEGACY_FRACTION_MAX,
        }
    }
}

impl StickerNormalizer {
    pub fn with_legacy_fraction_max(legacy_fraction_max: f64) -> Self {
        Self {
            legacy_fraction_max,
        }
    }

    /// Decide which shape a record has. First matching rule wins:
    /// percent, then pixel (needs a usable stage), then legacy fraction.
    pub fn classify(&self, record: &Value, stage: Option<StageSize>) -> Option<StickerShape> {
        let obj = record.as_object()?;

        if let (Some(xp), Some(yp)) = (number(obj, "xp"), number(obj, "yp")) {
            return Some(StickerShape::Percent { xp, yp });
        }

        let (x, y) = (number(obj, "x")?, number(obj, "y")?);
        match stage {
            Some(stage) if stage.is_usable() => Some(StickerShape::Pixel { x, y, stage }),
            _ if x <= self.legacy_fraction_max && y <= self.legacy_fraction_max => {
                Some(StickerShape::LegacyFraction { x, y })
            }
            _ => None,
        }
    }

    /// Normalize one record, or `None` if it has to be dropped.
    pub fn normalize(&self, record: &Value, stage: Option<StageSize>) -> Option<StickerPlacement> {
        let Some(shape) = self.classify(record, stage) else {
            tracing::debug!(%record, "dropping sticker with no usable position");
            return None;
        };
        let obj = record.as_object()?;
        let (xp, yp) = shape.center();

        let sp = match shape {
            StickerShape::Percent { .. } => number(obj, "sp"),
            StickerShape::Pixel { .. } | StickerShape::LegacyFraction { .. } => {
                number(obj, "s").or_else(|| number(obj, "sp"))
            }
        };

        Some(StickerPlacement {
            src: obj
                .get("src")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            pack_id: obj
                .get("packId")
                .and_then(Value::as_str)
                .map(str::to_string),
            xp,
            yp,
            sp: sp.unwrap_or(DEFAULT_SCALE),
            rot: number(obj, "rot").unwrap_or(DEFAULT_ROTATION),
            wv: number(obj, "wv").unwrap_or(DEFAULT_WIDTH_PERCENT),
        })
    }

    /// Lazily normalize a list of records, keeping order and skipping the
    /// ones that cannot be placed.
    pub fn normalize_all<'a>(
        &'a self,
        records: &'a [Value],
        stage: Option<StageSize>,
    ) -> impl Iterator<Item = StickerPlacement> + 'a {
        records
            .iter()
            .filter_map(move |record| self.normalize(record, stage))
    }
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

/// Normalize one record with the default legacy threshold.
pub fn normalize_sticker(record: &Value, stage: Option<StageSize>) -> Option<StickerPlacement> {
    StickerNormalizer::default().normalize(record, stage)
}

/// Normalize a list of records with the default legacy threshold.
pub fn normalize_stickers(
    records: &[Value],
    stage: Option<StageSize>,
) -> impl Iterator<Item = StickerPlacement> + '_ {
    records
        .iter()
        .filter_map(move |record| normalize_sticker(record, stage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stage(cw: f64, ch: f64) -> Option<StageSize> {
        Some(StageSize::new(cw, ch))
    }

    #[test]
    fn percent_hundred_form() {
        let p = normalize_sticker(&json!({ "xp": 50, "yp": 50 }), None).unwrap();
        assert_eq!((p.xp, p.yp, p.sp, p.rot), (0.5, 0.5, 1.0, 0.0));
        assert_eq!(p.wv, DEFAULT_WIDTH_PERCENT);
    }

    #[test]
    fn already_fractional() {
        let p = normalize_sticker(&json!({ "xp": 0.25, "yp": 0.75 }), None).unwrap();
        assert_eq!((p.xp, p.yp, p.sp, p.rot), (0.25, 0.75, 1.0, 0.0));
    }

    #[test]
    fn percent_values_convert_independently() {
        let p = normalize_sticker(&json!({ "xp": 0.3, "yp": 80 }), None).unwrap();
        assert_eq!((p.xp, p.yp), (0.3, 0.8));
    }

    #[test]
    fn percent_form_clamps() {
        let p = normalize_sticker(&json!({ "xp": 250, "yp": -0.5 }), None).unwrap();
        assert_eq!((p.xp, p.yp), (1.0, 0.0));
    }

    #[test]
    fn percent_form_keeps_scale_rotation_and_width() {
        let record = json!({
            "src": "stickers/heart.svg", "packId": "hearts",
            "xp": 0.1, "yp": 0.2, "sp": 1.5, "rot": -30, "wv": 12
        });
        let p = normalize_sticker(&record, None).unwrap();
        assert_eq!(p.src, "stickers/heart.svg");
        assert_eq!(p.pack_id.as_deref(), Some("hearts"));
        assert_eq!((p.sp, p.rot, p.wv), (1.5, -30.0, 12.0));
    }

    #[test]
    fn percent_form_wins_over_pixel_fields() {
        let record = json!({ "xp": 0.5, "yp": 0.5, "x": 300, "y": 300 });
        let shape = StickerNormalizer::default().classify(&record, stage(600.0, 600.0));
        assert_eq!(shape, Some(StickerShape::Percent { xp: 0.5, yp: 0.5 }));
    }

    #[test]
    fn pixel_form_with_stage() {
        let p = normalize_sticker(&json!({ "x": 150, "y": 300 }), stage(600.0, 600.0)).unwrap();
        assert_eq!((p.xp, p.yp), (0.25, 0.5));
        assert_eq!(p.sp, 1.0);
    }

    #[test]
    fn pixel_form_scale_fallbacks() {
        let s = stage(100.0, 100.0);
        let both = normalize_sticker(&json!({ "x": 1, "y": 1, "s": 2, "sp": 3 }), s).unwrap();
        assert_eq!(both.sp, 2.0);
        let sp_only = normalize_sticker(&json!({ "x": 1, "y": 1, "sp": 3 }), s).unwrap();
        assert_eq!(sp_only.sp, 3.0);
    }

    #[test]
    fn pixel_form_clamps_outside_stage() {
        let p = normalize_sticker(&json!({ "x": 900, "y": -20 }), stage(600.0, 400.0)).unwrap();
        assert_eq!((p.xp, p.yp), (1.0, 0.0));
    }

    #[test]
    fn legacy_fraction_without_stage() {
        let p = normalize_sticker(&json!({ "x": 0.9, "y": 1.1 }), None).unwrap();
        assert_eq!((p.xp, p.yp), (0.9, 1.0));
    }

    #[test]
    fn empty_stage_falls_back_to_legacy_rule() {
        let shape = StickerNormalizer::default()
            .classify(&json!({ "x": 0.4, "y": 0.6 }), stage(0.0, 600.0));
        assert_eq!(shape, Some(StickerShape::LegacyFraction { x: 0.4, y: 0.6 }));
    }

    #[test]
    fn large_pixels_without_stage_are_dropped() {
        assert_eq!(normalize_sticker(&json!({ "x": 500, "y": 500 }), None), None);
    }

    #[test]
    fn threshold_is_tunable() {
        let loose = StickerNormalizer::with_legacy_fraction_max(2.0);
        let p = loose
            .normalize(&json!({ "x": 1.5, "y": 0.5 }), None)
            .unwrap();
        assert_eq!((p.xp, p.yp), (1.0, 0.5));
        assert_eq!(normalize_sticker(&json!({ "x": 1.5, "y": 0.5 }), None), None);
    }

    #[test]
    fn unplaceable_records_are_dropped() {
        for record in [
            json!(null),
            json!("sticker.svg"),
            json!({ "src": "a.svg" }),
            json!({ "xp": 0.5 }),
            json!({ "x": "10", "y": "10" }),
        ] {
            assert_eq!(normalize_sticker(&record, None), None, "{record}");
        }
    }

    #[test]
    fn non_string_pack_id_is_null() {
        let p = normalize_sticker(&json!({ "xp": 0.5, "yp": 0.5, "packId": 4 }), None).unwrap();
        assert_eq!(p.pack_id, None);
        assert_eq!(p.src, "");
    }

    #[test]
    fn sequence_keeps_order_and_skips_drops() {
        let records = vec![
            json!({ "src": "a", "xp": 10, "yp": 10 }),
            json!({ "src": "b", "x": 500, "y": 500 }),
            json!({ "src": "c", "x": 0.5, "y": 0.5 }),
        ];
        let placed: Vec<_> = normalize_stickers(&records, None).collect();
        let srcs: Vec<_> = placed.iter().map(|p| p.src.as_str()).collect();
        assert_eq!(srcs, ["a", "c"]);
    }

    #[test]
    fn clamp01_bounds() {
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(7.0), 1.0);
    }
}

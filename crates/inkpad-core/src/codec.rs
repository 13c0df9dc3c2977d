//! Flat records for persisting strokes, pages and notes.
//!
//! Stroke records are lossless: floats are copied bit-for-bit and the point
//! order is kept. Page decoding is fail-soft, a malformed stroke record is
//! skipped and the rest of the page still loads.

use crate::note::{LayoutMode, Note};
use crate::page::Page;
use crate::stroke::{Brush, BrushFamily, InkPoint, Stroke, StrokeId, ToolType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while decoding a stroke record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unknown brush family index: {0}")]
    UnknownBrushFamily(u8),
    #[error("Non-finite {field} in point {index}")]
    NonFinite { index: usize, field: &'static str },
    #[error("Timestamp goes backwards at point {index}: {previous} -> {found}")]
    NonMonotonicTime {
        index: usize,
        previous: i64,
        found: i64,
    },
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted brush.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushRecord {
    pub fam: u8,
    pub size: f32,
    pub eps: f32,
    pub color: u64,
}

/// Persisted sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    pub t: i64,
    pub p: f32,
    pub tilt: f32,
    pub orient: f32,
}

/// Persisted stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StrokeId>,
    pub brush: BrushRecord,
    pub tool: u8,
    #[serde(rename = "unitCm")]
    pub unit_cm: f32,
    pub pts: Vec<PointRecord>,
}

/// Persisted page. Strokes are kept as raw JSON so each one decodes on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub strokes: Vec<serde_json::Value>,
}

/// Persisted note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub title: String,
    #[serde(default)]
    pub layout: u8,
    #[serde(default)]
    pub current_page: usize,
    #[serde(default)]
    pub pages: Vec<PageRecord>,
    #[serde(default)]
    pub filter_id: Option<String>,
}

/// Encode a stroke to its flat record.
pub fn encode_stroke(stroke: &Stroke) -> StrokeRecord {
    let brush = stroke.brush();
    StrokeRecord {
        id: Some(stroke.id()),
        brush: BrushRecord {
            fam: brush.family.index(),
            size: brush.size,
            eps: brush.epsilon,
            color: brush.color,
        },
        tool: stroke.tool_type().index(),
        unit_cm: stroke.unit_length_cm(),
        pts: stroke
            .points()
            .iter()
            .map(|p| PointRecord {
                x: p.x,
                y: p.y,
                t: p.elapsed_time_ms,
                p: p.pressure,
                tilt: p.tilt_radians,
                orient: p.orientation_radians,
            })
            .collect(),
    }
}

/// Decode a stroke record. Records without an id get a fresh one.
pub fn decode_stroke(record: &StrokeRecord) -> Result<Stroke, CodecError> {
    let family = BrushFamily::from_index(record.brush.fam)
        .ok_or(CodecError::UnknownBrushFamily(record.brush.fam))?;

    let mut points = Vec::with_capacity(record.pts.len());
    let mut previous: Option<i64> = None;
    for (index, pt) in record.pts.iter().enumerate() {
        for (field, value) in [
            ("x", pt.x),
            ("y", pt.y),
            ("pressure", pt.p),
            ("tilt", pt.tilt),
            ("orientation", pt.orient),
        ] {
            if !value.is_finite() {
                return Err(CodecError::NonFinite { index, field });
            }
        }
        if let Some(previous) = previous {
            if pt.t < previous {
                return Err(CodecError::NonMonotonicTime {
                    index,
                    previous,
                    found: pt.t,
                });
            }
        }
        previous = Some(pt.t);
        points.push(InkPoint {
            x: pt.x,
            y: pt.y,
            elapsed_time_ms: pt.t,
            pressure: pt.p,
            tilt_radians: pt.tilt,
            orientation_radians: pt.orient,
        });
    }

    Ok(Stroke::with_id(
        record.id.unwrap_or_else(Uuid::new_v4),
        Brush::new(family, record.brush.size, record.brush.eps, record.brush.color),
        ToolType::from_index(record.tool),
        record.unit_cm,
        points,
    ))
}

/// Encode the strokes of a page in z-order.
pub fn encode_page(page: &Page) -> Result<PageRecord, CodecError> {
    let strokes = page
        .strokes
        .iter()
        .map(|s| serde_json::to_value(encode_stroke(s)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PageRecord { strokes })
}

/// Decode a page, skipping malformed stroke records.
///
/// The decoded page has an empty history.
pub fn decode_page(record: &PageRecord) -> Page {
    let mut seen = HashSet::new();
    let strokes = record
        .strokes
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let decoded = serde_json::from_value::<StrokeRecord>(value.clone())
                .map_err(CodecError::from)
                .and_then(|r| decode_stroke(&r));
            match decoded {
                Ok(stroke) if seen.insert(stroke.id()) => Some(stroke),
                Ok(stroke) => {
                    log::warn!(
                        "Duplicate stroke id {} at record {index}, assigning a new one",
                        stroke.id()
                    );
                    let stroke = stroke.duplicate();
                    seen.insert(stroke.id());
                    Some(stroke)
                }
                Err(e) => {
                    log::warn!("Skipping stroke record {index}: {e}");
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    Page::with_strokes(strokes)
}

/// Encode a whole note.
pub fn encode_note(note: &Note) -> Result<NoteRecord, CodecError> {
    Ok(NoteRecord {
        title: note.title.clone(),
        layout: note.layout.index(),
        current_page: note.current_page_index(),
        pages: note
            .pages()
            .iter()
            .map(encode_page)
            .collect::<Result<Vec<_>, _>>()?,
        filter_id: note.filter_id.clone(),
    })
}

/// Decode a note record stored under `id`.
pub fn decode_note(id: &str, record: &NoteRecord) -> Note {
    Note::from_parts(
        id,
        record.title.clone(),
        LayoutMode::from_index(record.layout),
        record.current_page,
        record.pages.iter().map(decode_page).collect(),
        record.filter_id.clone(),
    )
}

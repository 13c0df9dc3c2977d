//! InkPad Core Library
//!
//! Platform-agnostic stroke model, input engines and note persistence for
//! InkPad digital-ink notes.

pub mod authoring;
pub mod codec;
pub mod eraser;
pub mod flags;
pub mod gesture;
pub mod history;
pub mod note;
pub mod page;
pub mod router;
pub mod selection;
pub mod session;
pub mod settings;
pub mod storage;
pub mod stroke;
pub mod transform;

pub use authoring::{PointerSample, StrokeAuthoringEngine};
pub use codec::{CodecError, NoteRecord, StrokeRecord, decode_stroke, encode_stroke};
pub use eraser::EraserEngine;
pub use flags::EngineFlags;
pub use gesture::{TouchGesture, TouchPoint};
pub use history::{History, HistoryAction};
pub use note::{LayoutMode, Note};
pub use page::{Page, StrokeList};
pub use router::{InputRouter, PointerEvent, PointerPhase, SideButton, ToolMode};
pub use selection::SelectionEngine;
pub use session::NoteSession;
pub use settings::{Settings, SettingsError, SettingsProvider};
pub use storage::{Storage, StorageError, StorageResult};
pub use stroke::{Brush, BrushFamily, InkPoint, Stroke, StrokeId, ToolType};
pub use transform::ViewTransform;

// Imports
use crate::notes;
use anyhow::Context;
use inkpad_core::storage::{BlockingPersister, Persister, Storage, WriteQueue};
use inkpad_core::{NoteSession, PointerEvent, Settings, SideButton, ToolMode, TouchPoint};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// One recorded input step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ScriptStep {
    Pointer(PointerEvent),
    SideButton(SideButton),
    Tool(ToolMode),
    /// Active finger contacts for pan/zoom.
    Touches(Vec<TouchPoint>),
    Undo,
    Redo,
    Copy,
    Delete,
    AddPage,
    /// Switch to a page, zero-based.
    Page(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ReplaySummary {
    pub(crate) steps: usize,
    pub(crate) handled: usize,
    pub(crate) commits: usize,
    pub(crate) pages: usize,
    pub(crate) strokes: usize,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Replayed {} step(s): {} handled, {} commit(s). \
             Note now has {} page(s), {} stroke(s) on the current page.",
            self.steps, self.handled, self.commits, self.pages, self.strokes
        )
    }
}

pub(crate) fn parse_script(json: &str) -> anyhow::Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("Parsing event script failed")
}

pub(crate) fn run_replay(
    storage: impl Storage + 'static,
    settings: Settings,
    id: &str,
    script: &Path,
    queued: bool,
) -> anyhow::Result<ReplaySummary> {
    let json = std::fs::read_to_string(script)
        .with_context(|| format!("Reading script \"{}\" failed", script.display()))?;
    let steps = parse_script(&json)?;
    let storage: Arc<dyn Storage> = Arc::new(storage);
    let note = notes::load(storage.as_ref(), id)?;

    let summary = if queued {
        let queue = WriteQueue::new(storage.clone())?;
        let mut session = NoteSession::new(note, settings, queue);
        let summary = replay(&mut session, &steps);
        session.persister().flush()?;
        summary
    } else {
        let mut session = NoteSession::new(note, settings, BlockingPersister::new(storage.clone()));
        replay(&mut session, &steps)
    };
    Ok(summary)
}

/// Feed every step to the session in order.
pub(crate) fn replay<P: Persister>(
    session: &mut NoteSession<P>,
    steps: &[ScriptStep],
) -> ReplaySummary {
    let mut summary = ReplaySummary {
        steps: steps.len(),
        ..ReplaySummary::default()
    };
    for step in steps {
        let flags = match step {
            ScriptStep::Pointer(event) => session.handle_pointer(event),
            ScriptStep::SideButton(button) => session.side_button(*button),
            ScriptStep::Tool(mode) => session.set_tool(*mode),
            ScriptStep::Touches(touches) => {
                if session.handle_touches(touches) {
                    summary.handled += 1;
                }
                continue;
            }
            ScriptStep::Undo => session.undo(),
            ScriptStep::Redo => session.redo(),
            ScriptStep::Copy => session.copy_selection(),
            ScriptStep::Delete => session.delete_selection(),
            ScriptStep::AddPage => session.add_page(),
            ScriptStep::Page(index) => session.set_current_page(*index),
        };
        if flags.handled {
            summary.handled += 1;
        }
        if flags.store_modified {
            summary.commits += 1;
        }
    }
    log::debug!("replay finished: {:?}", summary);
    summary.pages = session.note().page_count();
    summary.strokes = session.page().strokes.len();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::Note;
    use inkpad_core::storage::MemoryStorage;

    const SCRIPT: &str = r#"[
        {"pointer": {"x": 0, "y": 0, "timestamp_ms": 0, "phase": "down"}},
        {"pointer": {"x": 10, "y": 10, "timestamp_ms": 16, "phase": "up"}},
        {"pointer": {"x": 100, "y": 100, "timestamp_ms": 40, "phase": "down"}},
        {"pointer": {"x": 110, "y": 110, "timestamp_ms": 56, "phase": "up"}},
        {"pointer": {"x": 500, "y": 500, "timestamp_ms": 60, "tool_type": "touch", "phase": "down"}},
        {"tool": "select"},
        {"pointer": {"x": 90, "y": 90, "timestamp_ms": 100, "phase": "down"}},
        {"pointer": {"x": 120, "y": 90, "timestamp_ms": 110, "phase": "move"}},
        {"pointer": {"x": 120, "y": 120, "timestamp_ms": 120, "phase": "move"}},
        {"pointer": {"x": 90, "y": 120, "timestamp_ms": 130, "phase": "up"}},
        "copy",
        {"tool": "draw"},
        {"side_button": "down"},
        {"pointer": {"x": 5, "y": 5, "timestamp_ms": 200, "phase": "down"}},
        {"pointer": {"x": 5, "y": 5, "timestamp_ms": 210, "phase": "up"}},
        {"side_button": "up"},
        "undo",
        "redo"
    ]"#;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps.len(), 18);
        assert!(matches!(steps[5], ScriptStep::Tool(ToolMode::Select)));
        assert!(matches!(steps[10], ScriptStep::Copy));
        assert!(matches!(steps[12], ScriptStep::SideButton(SideButton::Down)));
        assert!(parse_script(r#"["jump"]"#).is_err());
    }

    #[test]
    fn test_replay_into_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let note = Note::with_id("replayed", "Replay");
        let persister = BlockingPersister::new(storage.clone());
        let mut session = NoteSession::new(note, Settings::default(), persister);

        let summary = replay(&mut session, &parse_script(SCRIPT).unwrap());
        assert_eq!(summary.steps, 18);
        // B and its copy remain; A is erased, restored by undo and erased again by redo.
        assert_eq!(summary.strokes, 2);
        assert_eq!(summary.pages, 1);

        let stored = pollster::block_on(storage.load("replayed")).unwrap();
        let strokes = stored.current_page().strokes.as_slice();
        assert_eq!(strokes.len(), 2);
        assert!(strokes.iter().all(|s| s.points()[0].x == 100.0));
    }

    #[test]
    fn test_replay_through_queue() {
        let storage = Arc::new(MemoryStorage::new());
        let queue = WriteQueue::new(storage.clone()).unwrap();
        let mut session = NoteSession::new(Note::with_id("queued", ""), Settings::default(), queue);
        let steps = parse_script(SCRIPT).unwrap();
        let summary = replay(&mut session, &steps);
        session.persister().flush().unwrap();

        let stored = pollster::block_on(storage.load("queued")).unwrap();
        assert_eq!(stored.current_page().strokes.len(), summary.strokes);
    }
}

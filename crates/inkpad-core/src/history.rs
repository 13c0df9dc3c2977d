//! Per-page undo/redo of structural stroke changes.

use crate::page::StrokeList;
use crate::stroke::Stroke;

/// A reversible change to a page's stroke list.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    /// A stroke was appended.
    Add(Stroke),
    /// A stroke was removed.
    Delete(Stroke),
}

impl HistoryAction {
    /// The stroke this action refers to.
    pub fn stroke(&self) -> &Stroke {
        match self {
            HistoryAction::Add(stroke) | HistoryAction::Delete(stroke) => stroke,
        }
    }
}

/// Linear undo/redo stacks.
///
/// `past` and `future` together hold every known action in temporal order.
/// Recording a new action drops the redo branch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    past: Vec<HistoryAction>,
    future: Vec<HistoryAction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed action and clear the redo stack.
    pub fn record(&mut self, action: HistoryAction) {
        self.future.clear();
        self.past.push(action);
    }

    /// Record several actions from one event; the redo stack is cleared once.
    pub fn record_all(&mut self, actions: impl IntoIterator<Item = HistoryAction>) {
        self.future.clear();
        self.past.extend(actions);
    }

    /// Drop the redo stack.
    pub fn clear_future(&mut self) {
        self.future.clear();
    }

    /// Revert the most recent action. Returns false when there is nothing to undo.
    pub fn undo(&mut self, strokes: &mut StrokeList) -> bool {
        let Some(action) = self.past.pop() else {
            return false;
        };
        match &action {
            HistoryAction::Add(stroke) => {
                strokes.remove(stroke.id());
            }
            HistoryAction::Delete(stroke) => {
                strokes.push(stroke.clone());
            }
        }
        log::debug!("undo {} of stroke {}", kind(&action), action.stroke().id());
        self.future.push(action);
        true
    }

    /// Re-apply the most recently undone action. Returns false when there is nothing to redo.
    pub fn redo(&mut self, strokes: &mut StrokeList) -> bool {
        let Some(action) = self.future.pop() else {
            return false;
        };
        match &action {
            HistoryAction::Add(stroke) => {
                strokes.push(stroke.clone());
            }
            HistoryAction::Delete(stroke) => {
                strokes.remove(stroke.id());
            }
        }
        log::debug!("redo {} of stroke {}", kind(&action), action.stroke().id());
        self.past.push(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Undo stack, oldest first.
    pub fn past(&self) -> &[HistoryAction] {
        &self.past
    }

    /// Redo stack, the next action to redo last.
    pub fn future(&self) -> &[HistoryAction] {
        &self.future
    }
}

fn kind(action: &HistoryAction) -> &'static str {
    match action {
        HistoryAction::Add(_) => "add",
        HistoryAction::Delete(_) => "delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::tests::stroke_through;

    fn list_with(strokes: &[Stroke]) -> StrokeList {
        let mut list = StrokeList::new();
        for stroke in strokes {
            list.push(stroke.clone());
        }
        list
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut history = History::new();
        let mut strokes = StrokeList::new();
        assert!(!history.undo(&mut strokes));
        assert!(!history.redo(&mut strokes));
    }

    #[test]
    fn test_undo_adds_in_reverse_order() {
        let a = stroke_through(&[(0.0, 0.0)]);
        let b = stroke_through(&[(1.0, 1.0)]);
        let c = stroke_through(&[(2.0, 2.0)]);
        let mut strokes = list_with(&[a.clone(), b.clone(), c.clone()]);
        let mut history = History::new();
        for s in [&a, &b, &c] {
            history.record(HistoryAction::Add(s.clone()));
        }

        assert!(history.undo(&mut strokes));
        assert!(history.undo(&mut strokes));
        assert_eq!(strokes.as_slice(), &[a.clone()]);

        assert!(history.redo(&mut strokes));
        assert!(history.redo(&mut strokes));
        assert_eq!(strokes.as_slice(), &[a, b, c]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_delete_reinserts_value() {
        let a = stroke_through(&[(0.0, 0.0)]);
        let mut strokes = StrokeList::new();
        let mut history = History::new();
        history.record(HistoryAction::Delete(a.clone()));

        assert!(history.undo(&mut strokes));
        assert_eq!(strokes.get(a.id()), Some(&a));
        assert!(history.redo(&mut strokes));
        assert!(strokes.is_empty());
    }

    #[test]
    fn test_record_clears_future() {
        let a = stroke_through(&[(0.0, 0.0)]);
        let b = stroke_through(&[(1.0, 1.0)]);
        let mut strokes = list_with(&[a.clone()]);
        let mut history = History::new();
        history.record(HistoryAction::Add(a.clone()));
        history.undo(&mut strokes);
        assert!(history.can_redo());

        strokes.push(b.clone());
        history.record(HistoryAction::Add(b));
        assert!(!history.can_redo());
        assert!(!history.redo(&mut strokes));
        assert_eq!(strokes.len(), 1);
    }

    #[test]
    fn test_record_all_keeps_order() {
        let a = stroke_through(&[(0.0, 0.0)]);
        let b = stroke_through(&[(1.0, 1.0)]);
        let mut history = History::new();
        history.record_all([HistoryAction::Delete(a.clone()), HistoryAction::Delete(b.clone())]);
        assert_eq!(
            history.past(),
            &[HistoryAction::Delete(a), HistoryAction::Delete(b)]
        );
    }
}

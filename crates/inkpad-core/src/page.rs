//! Pages: ordered stroke lists with their undo history.

use crate::history::History;
use crate::stroke::{Stroke, StrokeId};
use std::collections::HashMap;

/// Strokes of a page in z-order (back to front), indexed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeList {
    strokes: Vec<Stroke>,
    index: HashMap<StrokeId, usize>,
}

impl StrokeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stroke on top.
    ///
    /// If a stroke with the same id is already present it is replaced in place
    /// and `false` is returned.
    pub fn push(&mut self, stroke: Stroke) -> bool {
        if self.replace(stroke.clone()) {
            return false;
        }
        self.index.insert(stroke.id(), self.strokes.len());
        self.strokes.push(stroke);
        true
    }

    /// Swap in a new value for the stroke with the same id.
    /// Returns false if no such stroke exists.
    pub fn replace(&mut self, stroke: Stroke) -> bool {
        match self.index.get(&stroke.id()) {
            Some(&idx) => {
                self.strokes[idx] = stroke;
                true
            }
            None => false,
        }
    }

    /// Remove a stroke by id, keeping the order of the others.
    pub fn remove(&mut self, id: StrokeId) -> Option<Stroke> {
        let idx = self.index.remove(&id)?;
        let stroke = self.strokes.remove(idx);
        self.reindex_from(idx);
        Some(stroke)
    }

    /// Remove every stroke matching `pred`.
    ///
    /// Survivors keep their order; the removed strokes are returned in their
    /// original order.
    pub fn extract_if(&mut self, mut pred: impl FnMut(&Stroke) -> bool) -> Vec<Stroke> {
        let (removed, kept): (Vec<Stroke>, Vec<Stroke>) =
            std::mem::take(&mut self.strokes).into_iter().partition(|s| pred(s));
        self.strokes = kept;
        if !removed.is_empty() {
            self.index.clear();
            self.reindex_from(0);
        }
        removed
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.index.get(&id).map(|&idx| &self.strokes[idx])
    }

    pub fn contains(&self, id: StrokeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Position of a stroke in z-order.
    pub fn position(&self, id: StrokeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.index.clear();
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, stroke) in self.strokes.iter().enumerate().skip(start) {
            self.index.insert(stroke.id(), idx);
        }
    }
}

impl<'a> IntoIterator for &'a StrokeList {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}

impl FromIterator<Stroke> for StrokeList {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        let mut list = StrokeList::new();
        for stroke in iter {
            list.push(stroke);
        }
        list
    }
}

/// One page of a note. The unit of undo/redo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Committed strokes, back to front.
    pub strokes: StrokeList,
    /// Undo/redo stacks.
    pub history: History,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a page holding the given strokes and no history.
    pub fn with_strokes(strokes: impl IntoIterator<Item = Stroke>) -> Self {
        Self {
            strokes: strokes.into_iter().collect(),
            history: History::new(),
        }
    }

    /// Undo the last structural change. No-op on an empty history.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.strokes)
    }

    /// Redo the last undone change. No-op on an empty redo stack.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.strokes)
    }
}

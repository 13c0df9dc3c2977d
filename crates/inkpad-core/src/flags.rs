/// Flags returned to the caller after an engine handled an input.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineFlags {
    /// The event was consumed by an engine.
    pub handled: bool,
    /// Ephemeral overlay state changed (cursor, lasso, selection box).
    pub redraw: bool,
    /// Committed page content changed and must be persisted.
    pub store_modified: bool,
}

impl EngineFlags {
    /// Flags for an event that was consumed but changed nothing visible.
    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    /// Flags for an event that only changed overlay state.
    pub fn redraw() -> Self {
        Self {
            handled: true,
            redraw: true,
            store_modified: false,
        }
    }

    /// Flags for a committed mutation.
    pub fn modified() -> Self {
        Self {
            handled: true,
            redraw: true,
            store_modified: true,
        }
    }

    /// Merge with another set of flags.
    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.redraw |= other.redraw;
        self.store_modified |= other.store_modified;
    }
}

//! An open note: its view, input routing and persistence.

use crate::flags::EngineFlags;
use crate::gesture::{TouchGesture, TouchPoint};
use crate::note::Note;
use crate::page::Page;
use crate::router::{InputRouter, PointerEvent, SideButton, ToolMode};
use crate::settings::Settings;
use crate::storage::Persister;
use crate::transform::ViewTransform;

/// Editing session for one note.
///
/// Every committed change is handed to the persister before the call returns.
pub struct NoteSession<P: Persister> {
    note: Note,
    view: ViewTransform,
    gesture: TouchGesture,
    router: InputRouter,
    settings: Settings,
    persister: P,
}

impl<P: Persister> NoteSession<P> {
    pub fn new(note: Note, settings: Settings, persister: P) -> Self {
        Self {
            note,
            view: ViewTransform::new(),
            gesture: TouchGesture::new(),
            router: InputRouter::new(),
            settings,
            persister,
        }
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Page receiving input.
    pub fn page(&self) -> &Page {
        self.note.current_page()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn persister(&self) -> &P {
        &self.persister
    }

    pub fn tool(&self) -> ToolMode {
        self.router.mode()
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> EngineFlags {
        let flags = self.router.handle_pointer(
            event,
            self.note.current_page_mut(),
            &self.view,
            &self.settings,
        );
        self.commit(flags)
    }

    /// Feed the active finger contacts. Returns true if the view changed.
    pub fn handle_touches(&mut self, touches: &[TouchPoint]) -> bool {
        self.gesture.update(touches, &mut self.view)
    }

    pub fn side_button(&mut self, button: SideButton) -> EngineFlags {
        let flags = self
            .router
            .handle_side_button(button, self.note.current_page_mut());
        self.commit(flags)
    }

    pub fn set_tool(&mut self, mode: ToolMode) -> EngineFlags {
        let flags = self.router.set_mode(mode, self.note.current_page_mut());
        self.commit(flags)
    }

    pub fn undo(&mut self) -> EngineFlags {
        let flags = self.router.undo(self.note.current_page_mut());
        self.commit(flags)
    }

    pub fn redo(&mut self) -> EngineFlags {
        let flags = self.router.redo(self.note.current_page_mut());
        self.commit(flags)
    }

    pub fn copy_selection(&mut self) -> EngineFlags {
        let flags = self.router.copy_selection(self.note.current_page_mut());
        self.commit(flags)
    }

    pub fn delete_selection(&mut self) -> EngineFlags {
        let flags = self.router.delete_selection(self.note.current_page_mut());
        self.commit(flags)
    }

    /// Switch to another page, dropping any gesture and selection.
    pub fn set_current_page(&mut self, index: usize) -> EngineFlags {
        let mut flags = self.router.reset(self.note.current_page_mut());
        self.note.set_current_page(index);
        flags.merge(EngineFlags::modified());
        self.commit(flags)
    }

    /// Append a page and make it current.
    pub fn add_page(&mut self) -> EngineFlags {
        let index = self.note.add_page();
        self.set_current_page(index)
    }

    pub fn move_page_up(&mut self, index: usize) -> EngineFlags {
        self.move_page(index, index.wrapping_sub(1))
    }

    pub fn move_page_down(&mut self, index: usize) -> EngineFlags {
        self.move_page(index, index + 1)
    }

    /// Delete a page. The last remaining page is kept.
    pub fn delete_page(&mut self, index: usize) -> EngineFlags {
        if index >= self.note.page_count() || self.note.page_count() <= 1 {
            return EngineFlags::default();
        }
        let mut flags = self.router.reset(self.note.current_page_mut());
        self.note.remove_page(index);
        flags.merge(EngineFlags::modified());
        self.commit(flags)
    }

    pub fn rename(&mut self, title: impl Into<String>) -> EngineFlags {
        self.note.title = title.into();
        self.commit(EngineFlags::modified())
    }

    /// Hand the note to the persister now.
    pub fn persist(&self) {
        if let Err(e) = self.persister.persist(&self.note) {
            log::warn!("Failed to persist note {}: {}", self.note.id, e);
        }
    }

    pub fn into_note(self) -> Note {
        self.note
    }

    fn move_page(&mut self, from: usize, to: usize) -> EngineFlags {
        if !self.note.move_page(from, to) {
            return EngineFlags::default();
        }
        self.commit(EngineFlags::modified())
    }

    fn commit(&mut self, flags: EngineFlags) -> EngineFlags {
        if flags.store_modified {
            self.persist();
        }
        flags
    }
}

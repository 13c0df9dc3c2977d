// Imports
use anyhow::Context;
use inkpad_core::codec::encode_note;
use inkpad_core::storage::{self, Storage, StorageError};
use inkpad_core::{LayoutMode, Note};
use std::fmt::Write;

pub(crate) fn run_new(storage: &dyn Storage, title: &str) -> anyhow::Result<Note> {
    pollster::block_on(storage::create_note(storage, title))
        .with_context(|| format!("Creating note \"{title}\" failed"))
}

pub(crate) fn run_list(storage: &dyn Storage) -> anyhow::Result<()> {
    let notes = pollster::block_on(storage::load_all(storage)).context("Listing notes failed")?;
    if notes.is_empty() {
        println!("No notes.");
    }
    for note in notes {
        println!("{}", list_line(&note));
    }
    Ok(())
}

pub(crate) fn run_show(storage: &dyn Storage, id: &str, json: bool) -> anyhow::Result<()> {
    let note = load(storage, id)?;
    if json {
        let record = encode_note(&note)?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", describe(&note));
    }
    Ok(())
}

pub(crate) fn run_delete(storage: &dyn Storage, id: &str) -> anyhow::Result<()> {
    if !pollster::block_on(storage.exists(id))? {
        return Err(StorageError::NotFound(id.to_string()).into());
    }
    pollster::block_on(storage.delete(id)).with_context(|| format!("Deleting note {id} failed"))
}

pub(crate) fn load(storage: &dyn Storage, id: &str) -> anyhow::Result<Note> {
    pollster::block_on(storage.load(id)).with_context(|| format!("Loading note {id} failed"))
}

fn stroke_count(note: &Note) -> usize {
    note.pages().iter().map(|p| p.strokes.len()).sum()
}

pub(crate) fn list_line(note: &Note) -> String {
    format!(
        "{}  {:<24}  {} page(s), {} stroke(s)",
        note.id,
        note.title,
        note.page_count(),
        stroke_count(note)
    )
}

pub(crate) fn describe(note: &Note) -> String {
    let layout = match note.layout {
        LayoutMode::Pages => "pages",
        LayoutMode::Infinite => "infinite",
        LayoutMode::InfiniteDown => "infinite-down",
    };
    let mut out = String::new();
    let _ = writeln!(out, "Note:   {}", note.id);
    let _ = writeln!(out, "Title:  {}", note.title);
    let _ = writeln!(out, "Layout: {layout}");
    if let Some(filter) = &note.filter_id {
        let _ = writeln!(out, "Filter: {filter}");
    }
    for (index, page) in note.pages().iter().enumerate() {
        let marker = if index == note.current_page_index() { '*' } else { ' ' };
        let points: usize = page.strokes.iter().map(|s| s.len()).sum();
        let _ = writeln!(
            out,
            "{marker} page {}: {} stroke(s), {} point(s)",
            index + 1,
            page.strokes.len(),
            points
        );
    }
    out
}

//! Ordered background writer for note snapshots.

use super::{Persister, Storage, StorageError, StorageResult};
use crate::note::Note;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::thread;

enum WriteCommand {
    Write(Note),
    Flush(Sender<()>),
    Shutdown,
}

/// Single-writer persistence queue.
///
/// Snapshots are written by one background thread in submission order.
/// Snapshots of the same note still waiting in the queue are coalesced so
/// only the newest is written.
pub struct WriteQueue {
    sender: Sender<WriteCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl WriteQueue {
    pub fn new(storage: Arc<dyn Storage>) -> StorageResult<Self> {
        let (sender, receiver) = unbounded();
        let worker = thread::Builder::new()
            .name("inkpad-writer".to_string())
            .spawn(move || writer_loop(storage, receiver))
            .map_err(|e| StorageError::Other(format!("Failed to spawn writer: {}", e)))?;
        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    /// Queue a snapshot of `note` for writing.
    pub fn submit(&self, note: Note) -> StorageResult<()> {
        self.sender
            .send(WriteCommand::Write(note))
            .map_err(|_| StorageError::Other("Writer thread has stopped".to_string()))
    }

    /// Block until every snapshot submitted so far has been written.
    pub fn flush(&self) -> StorageResult<()> {
        let (ack_tx, ack_rx) = bounded(1);
        self.sender
            .send(WriteCommand::Flush(ack_tx))
            .map_err(|_| StorageError::Other("Writer thread has stopped".to_string()))?;
        ack_rx
            .recv()
            .map_err(|_| StorageError::Other("Writer thread has stopped".to_string()))
    }
}

impl Persister for WriteQueue {
    fn persist(&self, note: &Note) -> StorageResult<()> {
        self.submit(note.clone())
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        let _ = self.sender.send(WriteCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Writer thread panicked");
            }
        }
    }
}

fn writer_loop(storage: Arc<dyn Storage>, receiver: Receiver<WriteCommand>) {
    log::debug!("Writer thread started");
    while let Ok(first) = receiver.recv() {
        let mut pending: Vec<Note> = Vec::new();
        let mut acks = Vec::new();
        let mut stop = false;

        for command in std::iter::once(first).chain(receiver.try_iter()) {
            match command {
                WriteCommand::Write(note) => {
                    match pending.iter_mut().find(|queued| queued.id == note.id) {
                        Some(queued) => *queued = note,
                        None => pending.push(note),
                    }
                }
                WriteCommand::Flush(ack) => acks.push(ack),
                WriteCommand::Shutdown => {
                    stop = true;
                    break;
                }
            }
        }

        for note in &pending {
            if let Err(e) = pollster::block_on(storage.save(&note.id, note)) {
                log::warn!("Failed to write note {}: {}", note.id, e);
            }
        }
        for ack in acks {
            let _ = ack.send(());
        }
        if stop {
            break;
        }
    }
    log::debug!("Writer thread stopped");
}

//! Journal sinks. `append` is called while the room lock is held, so every
//! implementation must return without waiting on I/O.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::JournalEntry;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::journal as journal_repo;

const WRITE_ATTEMPTS: u32 = 3;

pub trait Journal: Send + Sync {
    fn append(&self, entry: &JournalEntry) -> Result<(), DomainError>;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;

    /// False once the sink has stopped accepting entries.
    fn is_available(&self) -> bool {
        true
    }
}

/// Keeps entries in memory. Used by tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Journal for MemoryJournal {
    fn append(&self, entry: &JournalEntry) -> Result<(), DomainError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Hands entries to a background writer over an unbounded channel, tagging
/// each with the next sequence number.
#[derive(Debug)]
pub struct ChannelJournal {
    tx: mpsc::UnboundedSender<(i64, JournalEntry)>,
    next_seq: AtomicI64,
}

impl ChannelJournal {
    /// `next_seq` continues after the highest sequence already stored.
    pub fn new(tx: mpsc::UnboundedSender<(i64, JournalEntry)>, next_seq: i64) -> Self {
        Self {
            tx,
            next_seq: AtomicI64::new(next_seq),
        }
    }
}

impl Journal for ChannelJournal {
    fn append(&self, entry: &JournalEntry) -> Result<(), DomainError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.tx.send((seq, entry.clone())).map_err(|_| {
            DomainError::infra(
                InfraErrorKind::JournalUnavailable,
                format!("journal writer stopped before entry {seq}"),
            )
        })
    }

    fn backend(&self) -> &'static str {
        "database"
    }

    fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Drain the channel into `journal_entries` until every sender is dropped.
///
/// An entry that cannot be stored stops the writer: the channel is closed so
/// every later `append` fails, and the table keeps a gap-free prefix that
/// still replays.
pub fn spawn_writer(
    db: DatabaseConnection,
    mut rx: mpsc::UnboundedReceiver<(i64, JournalEntry)>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some((seq, entry)) = rx.recv().await {
            if let Err(e) = write_with_retry(&db, seq, &entry).await {
                rx.close();
                let dropped = std::iter::from_fn(|| rx.try_recv().ok()).count();
                error!(
                    seq,
                    kind = entry.kind(),
                    dropped,
                    error = %e,
                    "journal write failed, writer stopped"
                );
                return;
            }
        }
        debug!("journal writer finished");
    })
}

async fn write_with_retry(
    db: &DatabaseConnection,
    seq: i64,
    entry: &JournalEntry,
) -> Result<(), DomainError> {
    let mut attempt = 1;
    loop {
        match journal_repo::append(db, seq, entry).await {
            Ok(()) => {
                debug!(seq, kind = entry.kind(), "journal entry stored");
                return Ok(());
            }
            Err(e) if attempt < WRITE_ATTEMPTS => {
                warn!(seq, attempt, error = %e, "journal write failed, retrying");
                tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt))).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

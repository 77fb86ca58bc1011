// history.rs

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::error::HistoryError;
use crate::storage::KeyValueStore;

/// Storage key the history lives under.
pub const HISTORY_KEY: &str = "calcHistory";

/// Maximum number of records kept.
pub const HISTORY_CAPACITY: usize = 10;

/// Number of records shown by the history view.
pub const HISTORY_VIEW_SIZE: usize = 5;

/// Status shown when the startup load fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load history";

/// Chronological list of `"<expression> = <result>"` records, never longer
/// than [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryList {
    entries: Vec<String>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build a list from records in chronological order, keeping the newest.
    pub fn from_records(records: Vec<String>) -> Self {
        let mut list = Self { entries: records };
        list.truncate_front();
        list
    }

    /// Format a completed calculation as a record.
    pub fn record(expression: &str, result: &str) -> String {
        format!("{} = {}", expression, result)
    }

    /// New list with `record` added last, oldest entries dropped past capacity.
    pub fn appended(&self, record: String) -> Self {
        let mut entries = self.entries.clone();
        entries.push(record);
        Self::from_records(entries)
    }

    /// Records loaded from storage placed before the ones made this session.
    pub fn merged_after(loaded: HistoryList, session: &HistoryList) -> Self {
        let mut entries = loaded.entries;
        entries.extend(session.entries.iter().cloned());
        Self::from_records(entries)
    }

    pub fn get(&self, n: usize) -> Option<&String> {
        self.entries.get(n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn all(&self) -> &[String] {
        &self.entries
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::from_records(records))
    }

    fn truncate_front(&mut self) {
        if self.entries.len() > HISTORY_CAPACITY {
            let excess = self.entries.len() - HISTORY_CAPACITY;
            self.entries.drain(..excess);
        }
    }
}

/// Read the persisted history. A missing key is an empty history.
pub async fn load_from<S: KeyValueStore>(store: &S) -> Result<HistoryList, HistoryError> {
    let raw = store
        .get(HISTORY_KEY)
        .await
        .map_err(|e| HistoryError::read(e.to_string()))?;

    match raw {
        Some(raw) => HistoryList::from_json(&raw).map_err(|e| HistoryError::read(e.to_string())),
        None => Ok(HistoryList::new()),
    }
}

/// Write the history under [`HISTORY_KEY`].
pub async fn persist_to<S: KeyValueStore>(
    store: &S,
    list: &HistoryList,
) -> Result<(), HistoryError> {
    let raw = list
        .to_json()
        .map_err(|e| HistoryError::write(e.to_string()))?;
    store
        .set(HISTORY_KEY, &raw)
        .await
        .map_err(|e| HistoryError::write(e.to_string()))
}

enum WriteRequest {
    Save(HistoryList),
    Flush(oneshot::Sender<()>),
}

/// Drains save requests one at a time, so the last list sent is the last
/// list written.
async fn run_writer<S: KeyValueStore>(store: Arc<S>, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Save(mut list) => {
                // Only the newest of the queued saves matters.
                let mut flushes = Vec::new();
                while let Ok(next) = rx.try_recv() {
                    match next {
                        WriteRequest::Save(newer) => list = newer,
                        WriteRequest::Flush(ack) => {
                            flushes.push(ack);
                            break;
                        }
                    }
                }
                match persist_to(store.as_ref(), &list).await {
                    Ok(()) => debug!(records = list.len(), "history saved"),
                    Err(e) => error!(error = %e, "error saving history"),
                }
                for ack in flushes {
                    let _ = ack.send(());
                }
            }
            WriteRequest::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

/// Loads the history on a background runtime and saves it through a single
/// writer task.
pub struct HistoryStore<S> {
    store: Arc<S>,
    runtime: Handle,
    writes: mpsc::UnboundedSender<WriteRequest>,
}

impl<S: KeyValueStore + 'static> HistoryStore<S> {
    pub fn new(store: Arc<S>, runtime: Handle) -> Self {
        let (writes, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_writer(Arc::clone(&store), rx));
        Self {
            store,
            runtime,
            writes,
        }
    }

    pub async fn load(&self) -> Result<HistoryList, HistoryError> {
        load_from(self.store.as_ref()).await
    }

    pub fn append(&self, record: String, current: &HistoryList) -> HistoryList {
        current.appended(record)
    }

    pub async fn persist(&self, list: &HistoryList) -> Result<(), HistoryError> {
        persist_to(self.store.as_ref(), list).await
    }

    /// Start the one-shot startup load; the outcome arrives on the receiver.
    pub fn spawn_load(&self) -> oneshot::Receiver<Result<HistoryList, HistoryError>> {
        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        self.runtime.spawn(async move {
            let outcome = load_from(store.as_ref()).await;
            match &outcome {
                Ok(list) => info!(records = list.len(), "history loaded"),
                Err(e) => error!(error = %e, "error loading history"),
            }
            // The receiver is gone only if the calculator was dropped.
            let _ = tx.send(outcome);
        });
        rx
    }

    /// Queue a background save. Failures are logged and otherwise ignored.
    pub fn queue_persist(&self, list: HistoryList) {
        if self.writes.send(WriteRequest::Save(list)).is_err() {
            error!("history writer stopped, save dropped");
        }
    }

    /// Wait until every save queued so far has been written or has failed.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.writes.send(WriteRequest::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

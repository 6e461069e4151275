//! Background snapshot recorder.
//!
//! Snapshot trees are handed to a single writer thread over a bounded
//! channel. The writer owns the SQLite connection, serializes each tree to
//! pretty JSON and appends it to the session's records.
//!
//! `submit` never waits longer than the configured submit timeout. When the
//! queue stays full the snapshot is dropped and counted, so recording can't
//! stall the program being observed.

use crate::errors::{io_error, Result};
use crate::migrations::apply_migrations;
use crate::records::insert_record;
use crate::session::{create_session, SessionRow};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use rusqlite::Connection;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use varscope_core::errors::VarscopeError;
use varscope_core::{log_op_end, log_op_error, log_op_start, Config, Node};

/// Outcome of [`Recorder::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Queued for the writer
    Accepted,
    /// Queue stayed full for the whole submit timeout, or the writer is gone
    Dropped,
}

/// Recorder counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    /// Snapshots queued for the writer
    pub accepted: u64,
    /// Snapshots rejected by `submit`
    pub dropped: u64,
    /// Records inserted by the writer
    pub written: u64,
    /// Accepted snapshots the writer failed to insert
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    accepted: AtomicU64,
    dropped: AtomicU64,
    written: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> RecorderStats {
        RecorderStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

struct Job {
    name: String,
    tree: Node,
}

/// Persists snapshot trees on a background writer thread.
///
/// # Example
///
/// ```ignore
/// let conn = db::open_for_recording(&config.db_path)?;
/// let recorder = Recorder::start(conn, &config)?;
///
/// recorder.submit("xs", inspect("xs", &xs, config.max_depth));
///
/// let stats = recorder.drain()?;
/// ```
pub struct Recorder {
    sender: Option<Sender<Job>>,
    writer: Option<JoinHandle<()>>,
    session: SessionRow,
    counters: Arc<Counters>,
    submit_timeout: Duration,
}

impl Recorder {
    /// Prepare the database, open a session and spawn the writer.
    ///
    /// # Errors
    ///
    /// - `Persistence` if migrations or the session insert fail
    /// - `InvalidConfig` if `queue_capacity` is zero
    /// - `Io` if the writer thread cannot be spawned
    pub fn start(mut conn: Connection, config: &Config) -> Result<Self> {
        let start = Instant::now();
        log_op_start!("recorder_start", queue_capacity = config.queue_capacity);

        config.validate()?;
        apply_migrations(&mut conn)?;
        let session = create_session(&conn)?;

        let (sender, receiver) = bounded(config.queue_capacity);
        let counters = Arc::new(Counters::default());

        let session_id = session.id;
        let writer_counters = Arc::clone(&counters);
        let writer = std::thread::Builder::new()
            .name("varscope-writer".to_string())
            .spawn(move || write_loop(conn, receiver, session_id, &writer_counters))
            .map_err(|e| io_error("spawn_writer", e))?;

        log_op_end!(
            "recorder_start",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = session_id
        );

        Ok(Self {
            sender: Some(sender),
            writer: Some(writer),
            session,
            counters,
            submit_timeout: config.submit_timeout(),
        })
    }

    /// Queue a snapshot tree for persistence under `name`.
    ///
    /// Waits at most the submit timeout for room in the queue.
    pub fn submit(&self, name: impl Into<String>, tree: Node) -> Submission {
        let Some(sender) = &self.sender else {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return Submission::Dropped;
        };

        let job = Job {
            name: name.into(),
            tree,
        };
        match sender.send_timeout(job, self.submit_timeout) {
            Ok(()) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                Submission::Accepted
            }
            Err(SendTimeoutError::Timeout(job)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    var_name = %job.name,
                    timeout_ms = self.submit_timeout.as_millis() as u64,
                    "recorder queue full, snapshot dropped"
                );
                Submission::Dropped
            }
            Err(SendTimeoutError::Disconnected(job)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                log_op_error!(
                    "recorder_submit",
                    VarscopeError::QueueClosed,
                    duration_ms = 0,
                    var_name = %job.name
                );
                Submission::Dropped
            }
        }
    }

    /// The session every record from this recorder belongs to.
    pub fn session(&self) -> &SessionRow {
        &self.session
    }

    pub fn session_id(&self) -> i64 {
        self.session.id
    }

    pub fn stats(&self) -> RecorderStats {
        self.counters.snapshot()
    }

    /// Close the queue and wait until every accepted snapshot is persisted.
    ///
    /// # Errors
    ///
    /// - `Internal` if the writer thread panicked
    pub fn drain(mut self) -> Result<RecorderStats> {
        self.finish()
    }

    fn finish(&mut self) -> Result<RecorderStats> {
        let Some(writer) = self.writer.take() else {
            return Ok(self.stats());
        };

        let start = Instant::now();
        log_op_start!("recorder_drain", session_id = self.session.id);

        // Dropping the sender ends the writer's receive loop once the queue is empty.
        self.sender.take();
        if writer.join().is_err() {
            log_op_error!(
                "recorder_drain",
                VarscopeError::WriterPanicked,
                duration_ms = start.elapsed().as_millis() as u64,
                session_id = self.session.id
            );
            return Err(VarscopeError::WriterPanicked.into());
        }

        let stats = self.stats();
        log_op_end!(
            "recorder_drain",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = self.session.id,
            written = stats.written,
            dropped = stats.dropped
        );
        Ok(stats)
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::error!(error = %e, "recorder drain on drop failed");
        }
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("session", &self.session)
            .field("stats", &self.stats())
            .field("submit_timeout", &self.submit_timeout)
            .finish()
    }
}

fn write_loop(conn: Connection, receiver: Receiver<Job>, session_id: i64, counters: &Counters) {
    for job in receiver.iter() {
        let start = Instant::now();
        let data = match job.tree.to_json_pretty() {
            Ok(text) => Some(text),
            Err(e) => {
                log_op_error!(
                    "record_serialize",
                    VarscopeError::from(e),
                    duration_ms = start.elapsed().as_millis() as u64,
                    var_name = %job.name
                );
                None
            }
        };

        match insert_record(&conn, session_id, &job.name, data.as_deref()) {
            Ok(record_id) => {
                counters.written.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(record_id, var_name = %job.name, "snapshot recorded");
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "snapshot insert failed");
                log_op_error!(
                    "record_insert",
                    e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    var_name = %job.name,
                    session_id = session_id
                );
            }
        }
    }
    tracing::debug!(session_id, "recorder writer stopped");
}

//! Recording connection factory for tests
//!
//! Counts every lifecycle call so tests can assert commit/rollback/close
//! happen exactly once, and counts drops so tests can assert every
//! connection and session went back to the pool. Pings and commits can be
//! told to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DbError;
use crate::factory::{ConnectionFactory, SessionScope, TransactionScope};

/// Snapshot of recorded calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub connects: usize,
    pub begins: usize,
    pub pings: usize,
    pub commits: usize,
    pub rollbacks: usize,
    /// Connections dropped, whatever the outcome
    pub releases: usize,
    pub sessions: usize,
    pub session_rollbacks: usize,
    pub session_closes: usize,
    /// Sessions dropped, whatever the outcome
    pub session_releases: usize,
    pub disposes: usize,
}

#[derive(Debug, Default)]
struct Counters {
    connects: AtomicUsize,
    begins: AtomicUsize,
    pings: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    releases: AtomicUsize,
    sessions: AtomicUsize,
    session_rollbacks: AtomicUsize,
    session_closes: AtomicUsize,
    session_releases: AtomicUsize,
    disposes: AtomicUsize,
    fail_pings: AtomicBool,
    fail_commits: AtomicBool,
}

/// Shared call recorder. Also serves as the factory's options.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    counters: Arc<Counters>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> CallCounts {
        let c = &self.counters;
        CallCounts {
            connects: c.connects.load(Ordering::SeqCst),
            begins: c.begins.load(Ordering::SeqCst),
            pings: c.pings.load(Ordering::SeqCst),
            commits: c.commits.load(Ordering::SeqCst),
            rollbacks: c.rollbacks.load(Ordering::SeqCst),
            releases: c.releases.load(Ordering::SeqCst),
            sessions: c.sessions.load(Ordering::SeqCst),
            session_rollbacks: c.session_rollbacks.load(Ordering::SeqCst),
            session_closes: c.session_closes.load(Ordering::SeqCst),
            session_releases: c.session_releases.load(Ordering::SeqCst),
            disposes: c.disposes.load(Ordering::SeqCst),
        }
    }

    /// Make every ping fail with a pool timeout.
    pub fn fail_pings(&self, fail: bool) {
        self.counters.fail_pings.store(fail, Ordering::SeqCst);
    }

    /// Make every commit fail with a protocol error.
    pub fn fail_commits(&self, fail: bool) {
        self.counters.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Connection factory that records calls instead of talking to a database
#[derive(Debug)]
pub struct RecordingFactory {
    recorder: Recorder,
}

#[derive(Debug)]
pub struct RecordingConnection {
    recorder: Recorder,
}

#[derive(Debug)]
pub struct RecordingSession {
    recorder: Recorder,
}

#[async_trait]
impl ConnectionFactory for RecordingFactory {
    type Options = Recorder;
    type Connection = RecordingConnection;
    type Session = RecordingSession;

    fn connect(options: &Recorder) -> Result<Self, DbError> {
        Recorder::bump(&options.counters.connects);
        Ok(Self {
            recorder: options.clone(),
        })
    }

    async fn begin(&self) -> Result<RecordingConnection, DbError> {
        Recorder::bump(&self.recorder.counters.begins);
        Ok(RecordingConnection {
            recorder: self.recorder.clone(),
        })
    }

    fn session(&self) -> RecordingSession {
        Recorder::bump(&self.recorder.counters.sessions);
        RecordingSession {
            recorder: self.recorder.clone(),
        }
    }

    async fn dispose(&self) {
        Recorder::bump(&self.recorder.counters.disposes);
    }
}

#[async_trait]
impl TransactionScope for RecordingConnection {
    async fn ping(&mut self) -> Result<(), DbError> {
        let counters = &self.recorder.counters;
        Recorder::bump(&counters.pings);
        if counters.fail_pings.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), DbError> {
        let counters = &self.recorder.counters;
        Recorder::bump(&counters.commits);
        if counters.fail_commits.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("commit rejected".into()).into());
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), DbError> {
        Recorder::bump(&self.recorder.counters.rollbacks);
        Ok(())
    }
}

impl Drop for RecordingConnection {
    fn drop(&mut self) {
        Recorder::bump(&self.recorder.counters.releases);
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        Recorder::bump(&self.recorder.counters.session_releases);
    }
}

#[async_trait]
impl SessionScope for RecordingSession {
    async fn rollback(&mut self) -> Result<(), DbError> {
        Recorder::bump(&self.recorder.counters.session_rollbacks);
        Ok(())
    }

    async fn close(self) -> Result<(), DbError> {
        Recorder::bump(&self.recorder.counters.session_closes);
        Ok(())
    }
}

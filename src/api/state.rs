//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::dashboard::{DashboardContext, DispatchTable};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only datasets, cached maps and insights
    pub context: Arc<DashboardContext>,
    /// Control-to-handler bindings
    pub dispatch: Arc<DispatchTable>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Open WebSocket view sessions
    sessions: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(context: DashboardContext) -> Self {
        Self::with_dispatch(context, DispatchTable::default())
    }

    pub fn with_dispatch(context: DashboardContext, dispatch: DispatchTable) -> Self {
        Self {
            context: Arc::new(context),
            dispatch: Arc::new(dispatch),
            start_time: Instant::now(),
            sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.load(Ordering::Relaxed)
    }

    /// Count a session until the returned guard drops
    pub fn open_session(&self) -> SessionGuard {
        self.sessions.fetch_add(1, Ordering::Relaxed);
        SessionGuard {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Decrements the session count on drop
pub struct SessionGuard {
    sessions: Arc<AtomicUsize>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.fetch_sub(1, Ordering::Relaxed);
    }
}

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::guard::NavigationGuard;
use crate::models::{HistoryEntry, Location};
use crate::routes::RouteTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches {0:?}")]
    NotFound(String),
    #[error("navigation to {path:?} exceeded {limit} redirects")]
    RedirectLoop { path: String, limit: usize },
}

/// Navigator
///
/// One router session: resolves paths against the table, runs the guard's
/// pre-navigation hook, and follows redirects until the guard allows a
/// destination. Each redirect target goes back through the guard.
pub struct Navigator {
    session_id: Uuid,
    table: Arc<RouteTable>,
    guard: NavigationGuard,
    max_redirects: usize,
    history: Vec<HistoryEntry>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, guard: NavigationGuard, max_redirects: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            table,
            guard,
            max_redirects,
            history: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn current(&self) -> Option<&Location> {
        self.history.last().map(|entry| &entry.location)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// navigate
    ///
    /// Drives one navigation attempt to completion. On success the landing
    /// location becomes current and is appended to the history; on failure the
    /// current location is left unchanged.
    pub fn navigate(&mut self, path: &str) -> Result<Location, NavigationError> {
        let requested = path.to_string();
        let mut target = requested.clone();
        let mut redirects = 0;
        let table = Arc::clone(&self.table);

        loop {
            let matched = table.match_path(&target).ok_or_else(|| {
                warn!(session = %self.session_id, path = %target, "no route matches");
                NavigationError::NotFound(target.clone())
            })?;

            let from = self
                .current()
                .and_then(|location| table.by_name(&location.name));

            let mut redirect: Option<String> = None;
            self.guard.before_each(matched.route, from, |next| {
                redirect = next.map(str::to_string);
            });

            let Some(next) = redirect else {
                let location = Location {
                    path: target.clone(),
                    name: matched.route.name.clone(),
                    view: matched.route.view,
                    params: matched.params,
                    redirected_from: (redirects > 0).then(|| requested.clone()),
                };
                debug!(
                    session = %self.session_id,
                    path = %location.path,
                    redirects,
                    "navigation complete"
                );
                self.history.push(HistoryEntry {
                    location: location.clone(),
                    at: Utc::now(),
                });
                return Ok(location);
            };

            redirects += 1;
            if redirects > self.max_redirects {
                warn!(
                    session = %self.session_id,
                    path = %requested,
                    limit = self.max_redirects,
                    "redirect limit exceeded"
                );
                return Err(NavigationError::RedirectLoop {
                    path: requested,
                    limit: self.max_redirects,
                });
            }
            target = next;
        }
    }
}

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::client::ClientError;

/// Lifecycle of a view backed by one aggregate fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Ready(_) => "ready",
            ViewState::Error(_) => "error",
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one load so late completions can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Owns a view's snapshot. Every (re)load hands out a fresh ticket; only the
/// latest ticket may complete, and nothing completes after disposal.
#[derive(Debug)]
pub struct ViewModel<T> {
    state: ViewState<T>,
    generation: u64,
    disposed: bool,
}

impl<T> Default for ViewModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewModel<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            generation: 0,
            disposed: false,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Enter `loading`, either initially or as an explicit refresh.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if !self.disposed {
            self.state = ViewState::Loading;
        }
        LoadTicket(self.generation)
    }

    /// Apply a finished load. Returns `false` when the result was dropped
    /// because the view was disposed or a newer load superseded it.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<T, ClientError>) -> bool {
        if self.disposed || ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                disposed = self.disposed,
                "discarding stale view load"
            );
            return false;
        }

        self.state = match result {
            Ok(value) => ViewState::Ready(value),
            Err(err) => ViewState::Error(err.user_message()),
        };
        true
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// Per-row expansion flags keyed by record id, so an open row stays open
/// when the list re-sorts underneath it.
#[derive(Debug, Clone)]
pub struct ExpansionState<K> {
    flags: HashMap<K, bool>,
}

impl<K> Default for ExpansionState<K> {
    fn default() -> Self {
        Self {
            flags: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> ExpansionState<K> {
    pub fn is_expanded(&self, id: &K) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Flip a row and return its new state.
    pub fn toggle(&mut self, id: &K) -> bool {
        let expanded = !self.is_expanded(id);
        self.flags.insert(id.clone(), expanded);
        expanded
    }

    pub fn set(&mut self, id: &K, expanded: bool) {
        self.flags.insert(id.clone(), expanded);
    }

    pub fn collapse_all(&mut self) {
        self.flags.clear();
    }

    /// Forget rows that are no longer listed after a refresh.
    pub fn retain_ids<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let live: Vec<&K> = ids.into_iter().collect();
        self.flags.retain(|id, _| live.contains(&id));
    }

    pub fn expanded(&self) -> impl Iterator<Item = &K> {
        self.flags
            .iter()
            .filter_map(|(id, expanded)| expanded.then_some(id))
    }
}

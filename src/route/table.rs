use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::error::RegistrationError;
use super::handler::{Entry, Handler};
use super::pattern::RoutePattern;

#[derive(Default)]
struct RouteTable {
    exact: HashMap<String, Vec<Arc<Entry>>>,
    patterns: Vec<(RoutePattern, Vec<Arc<Entry>>)>,
}

/// Exact and pattern routes for one registry (consumers, interceptors or
/// pipeline handlers).
///
/// Registration takes the write lock and stamps each entry with a
/// monotonically increasing sequence number. Resolution clones the matching
/// entries under the read lock and orders them by priority descending, then
/// by sequence ascending.
pub(crate) struct Registry {
    kind: &'static str,
    table: RwLock<RouteTable>,
    sequence: AtomicU64,
}

impl Registry {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            table: RwLock::new(RouteTable::default()),
            sequence: AtomicU64::new(0),
        }
    }

    pub(crate) fn register(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        if id.is_empty() {
            return Err(RegistrationError::EmptyRoute);
        }
        let mut table = self.write();
        let entry = self.entry(handler, priority);
        debug!(kind = self.kind, route = id, priority, sequence = entry.sequence, "registered");
        table.exact.entry(id.to_string()).or_default().push(entry);
        Ok(())
    }

    pub(crate) fn register_pattern(
        &self,
        glob: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        if !handler.takes_routing_key() {
            return Err(RegistrationError::MissingRoutingKey {
                route: glob.to_string(),
            });
        }
        let pattern = RoutePattern::compile(glob)?;

        let mut table = self.write();
        let entry = self.entry(handler, priority);
        debug!(
            kind = self.kind,
            pattern = glob,
            priority,
            sequence = entry.sequence,
            "registered pattern"
        );
        match table.patterns.iter_mut().find(|(p, _)| p.as_str() == glob) {
            Some((_, entries)) => entries.push(entry),
            None => table.patterns.push((pattern, vec![entry])),
        }
        Ok(())
    }

    /// Every entry whose exact route equals `id` or whose pattern matches it,
    /// in dispatch order.
    pub(crate) fn resolve(&self, id: &str) -> Vec<Arc<Entry>> {
        let table = self.read();
        let exact = table.exact.get(id).into_iter().flatten();
        let patterns = table
            .patterns
            .iter()
            .filter(|(pattern, _)| pattern.matches(id))
            .flat_map(|(_, entries)| entries);
        let mut matched: Vec<Arc<Entry>> = exact.chain(patterns).cloned().collect();
        drop(table);

        matched.sort_by_key(|entry| (Reverse(entry.priority), entry.sequence));
        matched
    }

    /// Number of registered entries across all routes.
    pub(crate) fn len(&self) -> usize {
        let table = self.read();
        table.exact.values().map(Vec::len).sum::<usize>()
            + table.patterns.iter().map(|(_, e)| e.len()).sum::<usize>()
    }

    /// Exact routes followed by pattern globs, each sorted.
    pub(crate) fn routes(&self) -> Vec<String> {
        let table = self.read();
        let mut exact: Vec<String> = table.exact.keys().cloned().collect();
        exact.sort();
        let mut globs: Vec<String> = table
            .patterns
            .iter()
            .map(|(p, _)| p.as_str().to_string())
            .collect();
        globs.sort();
        exact.extend(globs);
        exact
    }

    fn entry(&self, handler: Handler, priority: i32) -> Arc<Entry> {
        Arc::new(Entry {
            handler,
            priority,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        })
    }

    // A panicking registrant cannot leave the table half-written: every
    // mutation is a single push.
    fn read(&self) -> RwLockReadGuard<'_, RouteTable> {
        self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RouteTable> {
        self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

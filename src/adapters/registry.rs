use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime};

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::AdapterError;
use crate::route::Handler;

/// Heartbeat age after which an adapter no longer counts as active.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(60);

/// A registered adapter plugin.
#[derive(Debug, Clone)]
pub struct AdapterInfo {
    pub id: String,
    pub version: String,
    pub registered_at: SystemTime,
    pub last_heartbeat: Instant,
    pub metadata: Map<String, Value>,
}

/// Adapters (plugins bridging an external messaging system) and their
/// heartbeats.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Mutex<HashMap<String, AdapterInfo>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        id: &str,
        version: &str,
        metadata: Option<Map<String, Value>>,
    ) -> Result<(), AdapterError> {
        let mut adapters = self.lock();
        if adapters.contains_key(id) {
            return Err(AdapterError::AlreadyRegistered(id.to_string()));
        }
        adapters.insert(
            id.to_string(),
            AdapterInfo {
                id: id.to_string(),
                version: version.to_string(),
                registered_at: SystemTime::now(),
                last_heartbeat: Instant::now(),
                metadata: metadata.unwrap_or_default(),
            },
        );
        info!(adapter = id, version, "adapter registered");
        Ok(())
    }

    /// Refresh the adapter's liveness. The version must match the one it
    /// registered with.
    pub fn heartbeat(&self, id: &str, version: &str) -> Result<(), AdapterError> {
        let mut adapters = self.lock();
        let info = adapters
            .get_mut(id)
            .ok_or_else(|| AdapterError::NotRegistered(id.to_string()))?;
        if info.version != version {
            return Err(AdapterError::VersionMismatch {
                expected: info.version.clone(),
                got: version.to_string(),
            });
        }
        info.last_heartbeat = Instant::now();
        debug!(adapter = id, "heartbeat");
        Ok(())
    }

    pub fn unregister(&self, id: &str) -> Result<AdapterInfo, AdapterError> {
        let removed = self
            .lock()
            .remove(id)
            .ok_or_else(|| AdapterError::NotRegistered(id.to_string()))?;
        info!(adapter = id, "adapter unregistered");
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<AdapterInfo> {
        self.lock().get(id).cloned()
    }

    /// Every registered adapter, sorted by id.
    pub fn list(&self) -> Vec<AdapterInfo> {
        let mut all: Vec<AdapterInfo> = self.lock().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Ids of adapters whose last heartbeat is younger than `timeout`, sorted.
    pub fn active(&self, timeout: Duration) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .values()
            .filter(|info| info.last_heartbeat.elapsed() < timeout)
            .map(|info| info.id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn active_default(&self) -> Vec<String> {
        self.active(DEFAULT_LIVENESS_TIMEOUT)
    }

    /// A payload handler that heartbeats `id` each time it runs. Register it
    /// as an interceptor on the adapter's liveness-probe route.
    pub fn heartbeat_handler(self: &Arc<Self>, id: &str, version: &str) -> Handler {
        let registry = Arc::clone(self);
        let id = id.to_string();
        let version = version.to_string();
        Handler::payload(move |_| {
            registry.heartbeat(&id, &version)?;
            Ok(())
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AdapterInfo>> {
        self.adapters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

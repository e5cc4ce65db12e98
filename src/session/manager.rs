use super::error::SessionError;
use super::replay::ReplayHandle;
use super::simulator::Simulator;
use crate::SESSION_CLEANUP_INTERVAL_SECONDS;
use crate::SESSION_TTL_SECONDS;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

/// owner of every live session. sessions are single-threaded behind their
/// own mutex; this map only hands out handles. idle simulators are pruned
/// opportunistically, at most once a minute, and never while locked.
pub struct Sessions {
    replays: RwLock<HashMap<String, Arc<ReplayHandle>>>,
    simulators: RwLock<HashMap<String, Arc<Mutex<Simulator>>>>,
    swept: std::sync::Mutex<Instant>,
}

impl Default for Sessions {
    fn default() -> Self {
        Self {
            replays: RwLock::new(HashMap::new()),
            simulators: RwLock::new(HashMap::new()),
            swept: std::sync::Mutex::new(Instant::now()),
        }
    }
}

// replay sessions
impl Sessions {
    pub async fn insert_replay(&self, handle: ReplayHandle) -> Arc<ReplayHandle> {
        let handle = Arc::new(handle);
        self.replays
            .write()
            .await
            .insert(handle.id.clone(), handle.clone());
        handle
    }

    pub async fn replay(&self, id: &str) -> Result<Arc<ReplayHandle>, SessionError> {
        self.replays
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(format!("session {}", id)))
    }

    pub async fn remove_replay(&self, id: &str) -> Option<Arc<ReplayHandle>> {
        let handle = self.replays.write().await.remove(id);
        if let Some(handle) = &handle {
            handle.stop();
        }
        handle
    }
}

// simulator sessions
impl Sessions {
    pub async fn insert_simulator(&self, simulator: Simulator) -> Arc<Mutex<Simulator>> {
        let id = simulator.id.clone();
        let simulator = Arc::new(Mutex::new(simulator));
        self.simulators.write().await.insert(id, simulator.clone());
        simulator
    }

    pub async fn simulator(&self, id: &str) -> Result<Arc<Mutex<Simulator>>, SessionError> {
        self.sweep().await;
        self.simulators
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(format!("session {}", id)))
    }

    pub async fn remove_simulator(&self, id: &str) -> bool {
        self.simulators.write().await.remove(id).is_some()
    }

    /// drop simulators idle past the TTL. skips any session whose lock is
    /// held, and runs at most once per cleanup interval.
    pub async fn sweep(&self) {
        {
            let mut swept = self.swept.lock().expect("sweep clock");
            if swept.elapsed().as_secs() < SESSION_CLEANUP_INTERVAL_SECONDS {
                return;
            }
            *swept = Instant::now();
        }
        let mut expired = Vec::new();
        {
            let simulators = self.simulators.read().await;
            for (id, session) in simulators.iter() {
                if let Ok(guard) = session.try_lock() {
                    if guard.idle_seconds() >= SESSION_TTL_SECONDS {
                        expired.push(id.clone());
                    }
                }
            }
        }
        if !expired.is_empty() {
            let mut simulators = self.simulators.write().await;
            for id in expired {
                log::info!("session {} expired, removing", id);
                simulators.remove(&id);
            }
        }
    }
}

/// short random session identifiers
pub fn session_id(prefix: &str) -> String {
    let noise = rand::random::<u64>();
    format!("{}_{:012x}", prefix, noise & 0xffff_ffff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_prefixed_and_distinct() {
        let a = session_id("sim");
        let b = session_id("sim");
        assert!(a.starts_with("sim_"));
        assert!(a.len() == "sim_".len() + 12);
        assert!(a != b);
    }
}

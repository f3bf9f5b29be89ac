use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::errors::{JoinError, JoinStep};
use crate::settings::Settings;
use crate::storage::{ConnectionProfile, ProfileStore};
use crate::wlan::{WirelessNetwork, WlanBackend, WlanError, WlanInterface};

/// Longest SSID 802.11 allows, in bytes.
const MAX_SSID_LEN: usize = 32;

/// The adapter confirmed to be associated with the SSID a join asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedAdapter {
    pub name: String,
    pub description: String,
    pub mac: String,
    pub ssid: String,
}

impl ConnectedAdapter {
    fn from_interface(iface: WlanInterface, ssid: &str) -> Self {
        Self {
            name: iface.name,
            description: iface.description,
            mac: iface.mac,
            ssid: ssid.to_string(),
        }
    }
}

/// Runs discovery and join against a [`WlanBackend`].
///
/// Cloning is cheap: the backend and the "currently connected adapter" slot are
/// shared, so every clone observes the result of the latest join.
#[derive(Clone)]
pub struct WifiManager {
    backend: Arc<dyn WlanBackend>,
    store: ProfileStore,
    association_timeout: Duration,
    poll_interval: Duration,
    connected: Arc<Mutex<Option<ConnectedAdapter>>>,
}

impl WifiManager {
    pub fn new(backend: Arc<dyn WlanBackend>, store: ProfileStore) -> Self {
        let defaults = Settings::default();
        Self {
            backend,
            store,
            association_timeout: defaults.association_timeout(),
            poll_interval: defaults.poll_interval(),
            connected: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_settings(
        backend: Arc<dyn WlanBackend>,
        settings: &Settings,
    ) -> std::io::Result<Self> {
        Ok(Self::new(backend, settings.profile_store()?)
            .with_timing(settings.association_timeout(), settings.poll_interval()))
    }

    /// Bound the post-connect association poll.
    pub fn with_timing(mut self, association_timeout: Duration, poll_interval: Duration) -> Self {
        self.association_timeout = association_timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Every visible network on every adapter.
    ///
    /// Adapter order first, then driver order; duplicates are kept. Any
    /// adapter error fails the whole scan.
    pub async fn scan(&self) -> Result<Vec<WirelessNetwork>, WlanError> {
        let interfaces = self.backend.interfaces().await?;
        debug!("Scanning {} wireless adapter(s)", interfaces.len());

        let mut networks = Vec::new();
        for iface in &interfaces {
            let visible = self.backend.visible_networks(iface).await?;
            debug!("{} sees {} network(s)", iface.name, visible.len());
            networks.extend(visible);
        }
        info!("Scan complete: {} network(s) found", networks.len());
        Ok(networks)
    }

    /// Adapters as the OS reports them right now.
    pub async fn status(&self) -> Result<Vec<WlanInterface>, WlanError> {
        self.backend.interfaces().await
    }

    /// Result of the most recent join (`None` if it failed or none ran).
    pub async fn connected_adapter(&self) -> Option<ConnectedAdapter> {
        self.connected.lock().await.clone()
    }

    /// Join `ssid` through a throw-away WPA2-Personal profile.
    ///
    /// The installed profile is deleted after every attempt that managed to
    /// install it, and the XML file is removed from disk in all cases.
    pub async fn join(&self, ssid: &str, passphrase: &str) -> Result<ConnectedAdapter, JoinError> {
        validate_ssid(ssid)?;

        self.store.ensure_dir()?;
        let profile = ConnectionProfile::new(ssid, passphrase);
        let path = self.store.write(&profile)?;
        info!("Joining '{}' with temporary profile {}", ssid, profile.profile_name);

        let outcome = self.provision(&profile, &path).await;

        if let Err(e) = self.store.remove(&profile.profile_name) {
            warn!("Could not remove profile file {:?}: {}", path, e);
        }

        match &outcome {
            Ok(adapter) => info!("{} ({}) is associated with '{}'", adapter.name, adapter.mac, ssid),
            Err(e) => warn!("Joining '{}' failed: {}", ssid, e),
        }
        *self.connected.lock().await = outcome.as_ref().ok().cloned();
        outcome
    }

    async fn provision(
        &self,
        profile: &ConnectionProfile,
        path: &Path,
    ) -> Result<ConnectedAdapter, JoinError> {
        self.backend
            .add_profile(path)
            .await
            .map_err(|source| JoinError::Step {
                step: JoinStep::AddProfile,
                source,
            })?;
        debug!("Installed profile {}", profile.profile_name);

        let attempt = match self.backend.connect(&profile.profile_name, &profile.ssid).await {
            Ok(()) => self.wait_for_association(&profile.ssid).await,
            Err(source) => Err(JoinError::Step {
                step: JoinStep::Connect,
                source,
            }),
        };

        let cleanup = self.backend.delete_profile(&profile.profile_name).await;
        match (attempt, cleanup) {
            (Ok(adapter), Ok(())) => Ok(adapter),
            (Ok(_), Err(source)) => Err(JoinError::Step {
                step: JoinStep::DeleteProfile,
                source,
            }),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                warn!(
                    "Profile {} may still be installed: {}",
                    profile.profile_name, cleanup_err
                );
                Err(e)
            }
        }
    }

    async fn wait_for_association(&self, ssid: &str) -> Result<ConnectedAdapter, JoinError> {
        // a timeout past the clock's range means no deadline at all
        let deadline = Instant::now().checked_add(self.association_timeout);
        loop {
            let interfaces = self
                .backend
                .interfaces()
                .await
                .map_err(|source| JoinError::Step {
                    step: JoinStep::Associate,
                    source,
                })?;
            if let Some(iface) = interfaces.into_iter().find(|i| i.is_associated_with(ssid)) {
                return Ok(ConnectedAdapter::from_interface(iface, ssid));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(JoinError::NotAssociated {
                    ssid: ssid.to_string(),
                    waited: self.association_timeout,
                });
            }
            debug!("'{}' not associated yet, polling again", ssid);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn validate_ssid(ssid: &str) -> Result<(), JoinError> {
    if ssid.is_empty() {
        return Err(JoinError::InvalidSsid("SSID is empty".into()));
    }
    if ssid.len() > MAX_SSID_LEN {
        return Err(JoinError::InvalidSsid(format!(
            "'{}' is {} bytes, the limit is {}",
            ssid,
            ssid.len(),
            MAX_SSID_LEN
        )));
    }
    // netsh has no way to escape a quote inside name="…"
    if ssid.contains('"') {
        return Err(JoinError::InvalidSsid(format!("'{}' contains a double quote", ssid)));
    }
    Ok(())
}

//! A deterministic **in‑process stand‑in** for `netscan_core::wlan::WlanBackend`.
//!
//! *  Adapters and their visible networks are scripted up front.
//! *  Every call is recorded in `calls`, and the profiles currently "installed"
//!    in the fake OS store are tracked in `installed`, so tests can check
//!    ordering and cleanup without running `netsh`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use netscan_core::wlan::{WirelessNetwork, WlanBackend, WlanError, WlanInterface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Interfaces,
    VisibleNetworks(String),
    AddProfile(PathBuf),
    Connect { profile: String, ssid: String },
    DeleteProfile(String),
}

#[derive(Default)]
pub struct FakeState {
    pub interfaces: Vec<WlanInterface>,
    /// Per adapter, in the same order as `interfaces`.
    pub networks: Vec<Vec<String>>,
    /// Adapter whose network listing fails.
    pub failing_scan: Option<String>,
    pub fail_add: bool,
    pub fail_connect: bool,
    pub fail_delete: bool,
    /// When false, connect "succeeds" but no adapter ever reports the SSID.
    pub associate_on_connect: bool,

    pub calls: Vec<Call>,
    pub installed: BTreeSet<String>,
    /// XML documents seen by `add_profile`, in call order.
    pub added_documents: Vec<String>,
}

pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                associate_on_connect: true,
                ..Default::default()
            }),
        })
    }

    /// Script an adapter and the SSIDs it will report.
    pub fn with_adapter(self: Arc<Self>, name: &str, mac: &str, ssids: &[&str]) -> Arc<Self> {
        {
            let mut state = self.state();
            state.interfaces.push(WlanInterface {
                name: name.to_string(),
                description: format!("{name} adapter"),
                guid: format!("guid-{name}"),
                mac: mac.to_string(),
                state: "disconnected".to_string(),
                ssid: None,
            });
            state
                .networks
                .push(ssids.iter().map(|s| s.to_string()).collect());
        }
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake backend state poisoned")
    }

    fn failure(command: &str) -> WlanError {
        WlanError::CommandFailed {
            command: format!("netsh wlan {command}"),
            code: Some(1),
            output: "The operation failed (scripted).".into(),
        }
    }
}

/// Pull `<name>` of the profile (the first one in the document).
fn profile_name_in(xml: &str) -> Option<String> {
    let start = xml.find("<name>")? + "<name>".len();
    let end = xml[start..].find("</name>")? + start;
    Some(xml[start..end].to_string())
}

#[async_trait]
impl WlanBackend for FakeBackend {
    async fn interfaces(&self) -> Result<Vec<WlanInterface>, WlanError> {
        let mut state = self.state();
        state.calls.push(Call::Interfaces);
        Ok(state.interfaces.clone())
    }

    async fn visible_networks(
        &self,
        interface: &WlanInterface,
    ) -> Result<Vec<WirelessNetwork>, WlanError> {
        let mut state = self.state();
        state.calls.push(Call::VisibleNetworks(interface.name.clone()));
        if state.failing_scan.as_deref() == Some(interface.name.as_str()) {
            return Err(Self::failure("show networks"));
        }
        let index = state
            .interfaces
            .iter()
            .position(|i| i.name == interface.name)
            .ok_or_else(|| WlanError::Other(format!("unknown adapter {}", interface.name)))?;
        Ok(state.networks[index]
            .iter()
            .map(|ssid| WirelessNetwork {
                ssid: ssid.clone(),
                interface: interface.name.clone(),
            })
            .collect())
    }

    async fn add_profile(&self, path: &Path) -> Result<(), WlanError> {
        let mut state = self.state();
        state.calls.push(Call::AddProfile(path.to_path_buf()));
        if state.fail_add {
            return Err(Self::failure("add profile"));
        }
        let xml = fs::read_to_string(path)?;
        let name = profile_name_in(&xml)
            .ok_or_else(|| WlanError::ParseError("profile has no <name>".into()))?;
        state.installed.insert(name);
        state.added_documents.push(xml);
        Ok(())
    }

    async fn connect(&self, profile_name: &str, ssid: &str) -> Result<(), WlanError> {
        let mut state = self.state();
        state.calls.push(Call::Connect {
            profile: profile_name.to_string(),
            ssid: ssid.to_string(),
        });
        if state.fail_connect {
            return Err(Self::failure("connect"));
        }
        if !state.installed.contains(profile_name) {
            return Err(WlanError::Other(format!("no profile named {profile_name}")));
        }
        if state.associate_on_connect {
            if let Some(first) = state.interfaces.first_mut() {
                first.state = "connected".to_string();
                first.ssid = Some(ssid.to_string());
            }
        }
        Ok(())
    }

    async fn delete_profile(&self, profile_name: &str) -> Result<(), WlanError> {
        let mut state = self.state();
        state.calls.push(Call::DeleteProfile(profile_name.to_string()));
        if state.fail_delete {
            return Err(Self::failure("delete profile"));
        }
        state.installed.remove(profile_name);
        Ok(())
    }
}

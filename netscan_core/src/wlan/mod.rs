pub mod errors;
pub mod netsh;

use std::path::Path;

use async_trait::async_trait;

pub use errors::WlanError;
pub use netsh::NetshBackend;

/// One SSID as reported by one adapter during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirelessNetwork {
    pub ssid: String,
    /// Name of the adapter that saw it.
    pub interface: String,
}

/// A wireless adapter as the OS currently reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WlanInterface {
    pub name: String,
    pub description: String,
    pub guid: String,
    /// Physical address exactly as reported, e.g. `aa:bb:cc:dd:ee:ff`.
    pub mac: String,
    pub state: String,
    /// SSID the adapter is associated with, if any.
    pub ssid: Option<String>,
}

impl WlanInterface {
    pub fn is_connected(&self) -> bool {
        self.state.eq_ignore_ascii_case("connected")
    }

    /// True when the adapter reports an established association with `ssid`.
    pub fn is_associated_with(&self, ssid: &str) -> bool {
        self.is_connected() && self.ssid.as_deref() == Some(ssid)
    }
}

/// The seam between the provisioning workflow and the OS wireless stack.
///
/// Every call runs to completion before returning; the workflow never issues
/// two calls concurrently.
#[async_trait]
pub trait WlanBackend: Send + Sync {
    /// Every wireless adapter, in OS enumeration order.
    async fn interfaces(&self) -> Result<Vec<WlanInterface>, WlanError>;

    /// Networks visible to one adapter, in the order the driver lists them.
    async fn visible_networks(
        &self,
        interface: &WlanInterface,
    ) -> Result<Vec<WirelessNetwork>, WlanError>;

    /// Install a profile from an XML file.
    async fn add_profile(&self, path: &Path) -> Result<(), WlanError>;

    /// Ask the OS to connect to `ssid` using the installed profile.
    async fn connect(&self, profile_name: &str, ssid: &str) -> Result<(), WlanError>;

    /// Remove an installed profile by name.
    async fn delete_profile(&self, profile_name: &str) -> Result<(), WlanError>;
}

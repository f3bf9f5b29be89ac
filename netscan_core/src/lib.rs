pub mod core;
pub mod settings;
pub mod storage;
pub mod utils;
pub mod vendor;
pub mod wlan;

// re‑export ergonomic entry points
pub use self::core::errors::{JoinError, JoinStep};
pub use self::core::wifi_manager::{ConnectedAdapter, WifiManager};
pub use settings::Settings;
pub use storage::{ConnectionProfile, ProfileStore};
pub use vendor::{Manufacturer, VendorClient};
pub use wlan::{NetshBackend, WirelessNetwork, WlanBackend, WlanInterface};

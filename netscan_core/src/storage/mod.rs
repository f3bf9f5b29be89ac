pub mod profile;
pub mod store;

pub use profile::{ConnectionProfile, PROFILE_PREFIX};
pub use store::ProfileStore;

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::warn;

use super::profile::{ConnectionProfile, PROFILE_PREFIX};

/// Directory holding the transient `WiFiProfile_<token>.xml` files.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Uses `dir` without touching the filesystem; see [`ensure_dir`](Self::ensure_dir).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `%ProgramData%\WLANProfiles` on Windows, the platform data dir elsewhere
    /// (`~/.local/share/netscan/WLANProfiles` on Linux).
    pub fn default_dir() -> io::Result<PathBuf> {
        if let Some(program_data) = env::var_os("ProgramData") {
            return Ok(PathBuf::from(program_data).join("WLANProfiles"));
        }
        let proj = ProjectDirs::from("", "", "netscan")
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Unable to locate data dir"))?;
        Ok(proj.data_dir().join("WLANProfiles"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it is missing. Idempotent.
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    fn file_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.xml"))
    }

    /// Write the profile document and return its path.
    pub fn write(&self, profile: &ConnectionProfile) -> io::Result<PathBuf> {
        let path = self.file_for(&profile.profile_name);
        fs::write(&path, profile.to_xml())?;
        Ok(path)
    }

    /// Delete a profile file (`Ok(true)` if removed, `Ok(false)` if it didn’t exist).
    pub fn remove(&self, name: &str) -> io::Result<bool> {
        match fs::remove_file(self.file_for(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Profile files left behind by interrupted runs.
    pub fn list(&self) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut out = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_profile = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(PROFILE_PREFIX) && n.ends_with(".xml"));
            if is_profile {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Remove every leftover profile file, returning how many went away.
    pub fn purge(&self) -> io::Result<usize> {
        let mut removed = 0;
        for path in self.list()? {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("could not remove {:?}: {e}", path),
            }
        }
        Ok(removed)
    }
}

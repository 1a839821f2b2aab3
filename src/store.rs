//! Per-patch enabled flags persisted as tiny text files under `<base>/patches/settings`.
//!
//! Nothing here fails the caller: I/O problems are logged and the patch reads as disabled,
//! so a patch menu stays usable even when the settings directory is read-only.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::patch_key::{PatchIdentity, PatchKey};
use crate::toggle_format::{
    self, Catalog, PatchMetadata, FALSE_DATA, PATCH_VERSION_FILE, SETTINGS_DIR, XML_DIR,
};
use crate::util;

/// Receives the user-facing message emitted after a successful toggle.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Prints notifications to stdout.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        log::info!("notify: {}", message);
        println!("{}", message);
    }
}

pub struct PatchStore<N: Notifier> {
    config: Config,
    notifier: N,
    /// Definition located by the last `locate_definition` call; used as the title ID.
    patch_file: PathBuf,
}

impl<N: Notifier> PatchStore<N> {
    pub fn new(config: Config, notifier: N) -> Self {
        Self {
            config,
            notifier,
            patch_file: PathBuf::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn definition_path(&self) -> &Path {
        &self.patch_file
    }

    /// Point the store at `<base>/patches/xml/<name>.xml` and report whether it exists.
    pub fn locate_definition(&mut self, name: &str) -> bool {
        self.patch_file = self
            .config
            .base_dir
            .join(XML_DIR)
            .join(format!("{}.xml", name));
        log::info!("Got patch path: {}", self.patch_file.display());
        self.patch_file.exists()
    }

    pub fn key_for(&self, identity: &PatchIdentity) -> PatchKey {
        PatchKey::derive(self.config.key_scheme, identity)
    }

    pub fn settings_file(&self, key: PatchKey) -> PathBuf {
        self.config
            .base_dir
            .join(SETTINGS_DIR)
            .join(format!("{}.txt", key))
    }

    /// Read the flag for `key`, writing the disabled default first if the file is missing or empty.
    pub fn load_or_init_state(&self, key: PatchKey) -> bool {
        let path = self.settings_file(key);

        let content = match util::read_file(&path) {
            Ok(content) if !content.is_empty() => content,
            Ok(_) => {
                log::warn!("File {} is empty, initializing false", path.display());
                Self::init_default(&path);
                return false;
            }
            Err(err) => {
                log::warn!("{:#}, initializing false", err);
                Self::init_default(&path);
                return false;
            }
        };

        toggle_format::is_enabled(&content)
    }

    fn init_default(path: &Path) {
        if let Err(err) = util::write_file(path, FALSE_DATA) {
            log::error!("Could not initialize patch state: {:#}", err);
        }
    }

    /// Flip the flag stored in `cfg_file` and notify. Unreadable or empty files are left alone.
    pub fn toggle(&mut self, cfg_file: &Path, patch_name: &str) {
        let content = match util::read_file(cfg_file) {
            Ok(content) if !content.is_empty() => content,
            Ok(_) => return,
            Err(err) => {
                log::debug!("Not toggling: {:#}", err);
                return;
            }
        };

        let new_state = content[0] == b'0';
        if let Err(err) = util::write_file(cfg_file, toggle_format::encode_state(new_state)) {
            log::error!("Could not save patch state: {:#}", err);
            return;
        }

        log::debug!("Setting {} {}", cfg_file.display(), new_state);
        let prefix = if new_state {
            &self.config.enabled_message
        } else {
            &self.config.disabled_message
        };
        let message = format!("{} {}", prefix, patch_name);
        self.notifier.notify(&message);
    }

    /// Append `meta` and its persisted flag to `catalog`, keyed with the current definition path.
    pub fn register_patch_metadata(&self, catalog: &mut Catalog, meta: PatchMetadata) -> bool {
        let identity = PatchIdentity {
            title: meta.title.clone(),
            name: meta.name.clone(),
            app_version: meta.app_ver.clone(),
            title_id: self.patch_file.to_string_lossy().into_owned(),
            elf_name: meta.app_elf.clone(),
        };
        let key = self.key_for(&identity);
        let enabled = self.load_or_init_state(key);
        catalog.push(meta, enabled);
        debug_assert!(catalog.lengths().iter().all(|&len| len == catalog.len()));
        enabled
    }

    /// Every toggle file in the settings directory with its state. Read only.
    pub fn scan_settings(&self) -> Vec<(PatchKey, bool)> {
        let dir = self.config.base_dir.join(SETTINGS_DIR);
        let entries = match util::walk_toggle_files(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("Could not scan patch settings: {:#}", err);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .map(|entry| {
                let enabled = util::read_file(&entry.full_path)
                    .map(|content| toggle_format::is_enabled(&content))
                    .unwrap_or(false);
                (entry.key, enabled)
            })
            .collect()
    }

    /// Version string left behind by the patch repository download, if any.
    pub fn read_catalog_version(&self) -> Option<String> {
        let path = self.config.base_dir.join(PATCH_VERSION_FILE);
        let content = util::read_file(&path).ok()?;
        let version = String::from_utf8_lossy(&content).trim().to_owned();
        if version.is_empty() {
            None
        } else {
            Some(version)
        }
    }
}

use serde::Deserialize;

pub const FALSE_DATA: &[u8; 2] = b"0\n";
pub const TRUE_DATA: &[u8; 2] = b"1\n";

pub const SETTINGS_DIR: &str = "patches/settings";
pub const XML_DIR: &str = "patches/xml";
pub const PATCH_VERSION_FILE: &str = "patches/misc/patch_ver.txt";

/// Enabled iff the first byte is `'1'`. Empty or malformed content reads as disabled.
pub fn is_enabled(content: &[u8]) -> bool {
    content.first() == Some(&b'1')
}

pub fn encode_state(enabled: bool) -> &'static [u8] {
    if enabled {
        TRUE_DATA
    } else {
        FALSE_DATA
    }
}

/// One patch entry as it arrives from a parsed patch definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatchMetadata {
    pub app_ver: String,
    pub app_elf: String,
    pub title: String,
    pub patch_ver: String,
    pub name: String,
    pub author: String,
    pub note: String,
}

/// Registered patches as parallel sequences; index `i` of every sequence is the same patch.
#[derive(Debug, Default)]
pub struct Catalog {
    app_ver: Vec<String>,
    app_elf: Vec<String>,
    title: Vec<String>,
    patch_ver: Vec<String>,
    name: Vec<String>,
    author: Vec<String>,
    note: Vec<String>,
    enablement: Vec<bool>,
}

impl Catalog {
    pub fn push(&mut self, meta: PatchMetadata, enabled: bool) {
        self.app_ver.push(meta.app_ver);
        self.app_elf.push(meta.app_elf);
        self.title.push(meta.title);
        self.patch_ver.push(meta.patch_ver);
        self.name.push(meta.name);
        self.author.push(meta.author);
        self.note.push(meta.note);
        self.enablement.push(enabled);
    }

    pub fn len(&self) -> usize {
        self.enablement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enablement.is_empty()
    }

    pub fn enablement(&self) -> &[bool] {
        &self.enablement
    }

    /// Reassemble the entry at `index`.
    pub fn get(&self, index: usize) -> Option<(PatchMetadata, bool)> {
        let enabled = *self.enablement.get(index)?;
        let meta = PatchMetadata {
            app_ver: self.app_ver.get(index)?.clone(),
            app_elf: self.app_elf.get(index)?.clone(),
            title: self.title.get(index)?.clone(),
            patch_ver: self.patch_ver.get(index)?.clone(),
            name: self.name.get(index)?.clone(),
            author: self.author.get(index)?.clone(),
            note: self.note.get(index)?.clone(),
        };
        Some((meta, enabled))
    }

    pub fn lengths(&self) -> [usize; 8] {
        [
            self.app_ver.len(),
            self.app_elf.len(),
            self.title.len(),
            self.patch_ver.len(),
            self.name.len(),
            self.author.len(),
            self.note.len(),
            self.enablement.len(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled_first_byte_only() {
        assert!(is_enabled(b"1\n"));
        assert!(is_enabled(b"1garbage"));
        assert!(!is_enabled(b"0\n"));
        assert!(!is_enabled(b""));
        assert!(!is_enabled(b"x\n"));
        assert!(!is_enabled(b" 1\n"));
    }

    #[test]
    fn test_encode_state() {
        assert_eq!(encode_state(true), b"1\n");
        assert_eq!(encode_state(false), b"0\n");
    }

    #[test]
    fn test_catalog_sequences_stay_aligned() {
        let mut catalog = Catalog::default();
        for (i, title) in ["A", "B", "C"].iter().enumerate() {
            catalog.push(
                PatchMetadata {
                    title: title.to_string(),
                    name: format!("patch {}", i),
                    ..Default::default()
                },
                i == 1,
            );
        }

        assert_eq!(catalog.lengths(), [3; 8]);
        let (first, enabled) = catalog.get(0).unwrap();
        assert_eq!(first.title, "A");
        assert!(!enabled);
        assert!(catalog.get(1).unwrap().1);
        assert!(catalog.get(3).is_none());

        assert!(!catalog.is_empty());
        assert!(Catalog::default().is_empty());
    }

    #[test]
    fn test_get_tolerates_ragged_sequences() {
        let mut catalog = Catalog::default();
        catalog.push(PatchMetadata::default(), true);
        catalog.enablement.push(false);

        assert!(catalog.get(0).is_some());
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn test_metadata_missing_fields_default_empty() {
        let meta: PatchMetadata = serde_json::from_str(r#"{"title": "Infinite Ammo"}"#).unwrap();
        assert_eq!(meta.title, "Infinite Ammo");
        assert!(meta.author.is_empty());
    }
}

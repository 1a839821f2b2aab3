//! Patch key derivation.
//!
//! A patch is identified by five text fields concatenated in a fixed order.
//! The default scheme hashes them with a djb2 variant (seed 5381, `h = h * 33 ^ b`)
//! so that existing toggle files on disk keep resolving to the same key. Bytes are
//! folded as signed chars, sign-extended to 64 bits, as the loader that wrote those files does.

use serde::{Deserialize, Serialize};
use std::fmt;

const DJB2_SEED: u64 = 5381;

/// Width in bytes of a wide key (first half of a BLAKE3 digest).
const WIDE_KEY_LEN: usize = 16;

/// The five fields a patch key is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchIdentity {
    pub title: String,
    pub name: String,
    pub app_version: String,
    /// The patch definition path stands in for a real title ID.
    pub title_id: String,
    pub elf_name: String,
}

impl PatchIdentity {
    /// Concatenation fed to the hash: title, name, app version, title ID, elf name.
    pub fn hash_input(&self) -> String {
        let mut input = String::with_capacity(
            self.title.len()
                + self.name.len()
                + self.app_version.len()
                + self.title_id.len()
                + self.elf_name.len(),
        );
        input.push_str(&self.title);
        input.push_str(&self.name);
        input.push_str(&self.app_version);
        input.push_str(&self.title_id);
        input.push_str(&self.elf_name);
        input
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    #[default]
    Djb2,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatchKey {
    Djb2(u64),
    Wide(u128),
}

impl PatchKey {
    pub fn derive(scheme: KeyScheme, identity: &PatchIdentity) -> Self {
        let input = identity.hash_input();
        let key = match scheme {
            KeyScheme::Djb2 => PatchKey::Djb2(djb2(input.as_bytes())),
            KeyScheme::Wide => PatchKey::Wide(wide(input.as_bytes())),
        };
        log::debug!("hash_input: {}", input);
        log::debug!("hash_data: {}", key);
        key
    }

    /// Parse the hex form used in toggle file names (`0x` + 16 or 32 digits).
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            16 => u64::from_str_radix(digits, 16).ok().map(PatchKey::Djb2),
            32 => u128::from_str_radix(digits, 16).ok().map(PatchKey::Wide),
            _ => None,
        }
    }
}

impl fmt::Display for PatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Width counts the "0x" prefix.
        match self {
            PatchKey::Djb2(key) => write!(f, "{:#018x}", key),
            PatchKey::Wide(key) => write!(f, "{:#034x}", key),
        }
    }
}

/// djb2 with XOR folding, wrapping mod 2^64. Each byte is sign-extended before the XOR.
pub fn djb2(data: &[u8]) -> u64 {
    data.iter()
        .fold(DJB2_SEED, |hash, &byte| hash.wrapping_mul(33) ^ byte as i8 as i64 as u64)
}

/// 128-bit key from the leading bytes of a BLAKE3 digest.
pub fn wide(data: &[u8]) -> u128 {
    let digest = blake3::hash(data);
    let mut head = [0u8; WIDE_KEY_LEN];
    head.copy_from_slice(&digest.as_bytes()[..WIDE_KEY_LEN]);
    u128::from_be_bytes(head)
}

//! Letterhead logos.
//!
//! Logos are loaded and decoded once, before any report is generated, so a
//! missing or broken file surfaces as a configuration error at startup
//! rather than in the middle of a request.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::layout::{ASSET_LOGO_LEFT, ASSET_LOGO_RIGHT};

/// Where the two letterhead logos come from. Each entry is a file path or a
/// `data:image/...;base64,` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoPaths {
    pub left: String,
    pub right: String,
}

impl Default for LogoPaths {
    fn default() -> Self {
        Self {
            left: "assets/logo_left.png".to_string(),
            right: "assets/logo_right.png".to_string(),
        }
    }
}

/// A decoded image ready to embed.
#[derive(Debug, Clone)]
pub struct LogoAsset {
    pub bytes: Vec<u8>,
    pub px_width: u32,
    pub px_height: u32,
}

impl LogoAsset {
    /// Validate encoded PNG/JPEG bytes and record their pixel size.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ReportError> {
        let img = ::image::load_from_memory(&bytes)
            .map_err(|e| ReportError::Config(format!("undecodable logo image: {e}")))?;
        Ok(Self {
            px_width: img.width(),
            px_height: img.height(),
            bytes,
        })
    }

    /// Load from a file path or a base64 data URI.
    pub fn load(source: &str) -> Result<Self, ReportError> {
        let bytes = if source.starts_with("data:") {
            parse_data_uri(source).map_err(ReportError::Config)?
        } else {
            let path = PathBuf::from(source);
            fs::read(&path).map_err(|e| {
                ReportError::Config(format!("cannot read logo '{}': {e}", path.display()))
            })?
        };
        Self::from_bytes(bytes)
    }
}

/// Logos keyed by the asset names the layout refers to.
#[derive(Debug, Clone, Default)]
pub struct ReportAssets {
    logos: BTreeMap<String, LogoAsset>,
}

impl ReportAssets {
    /// Load both letterhead logos; either one missing is an error.
    pub fn load(paths: &LogoPaths) -> Result<Self, ReportError> {
        let mut assets = Self::default();
        assets.insert(ASSET_LOGO_LEFT, LogoAsset::load(&paths.left)?);
        assets.insert(ASSET_LOGO_RIGHT, LogoAsset::load(&paths.right)?);
        log::debug!("loaded letterhead logos {:?} and {:?}", paths.left, paths.right);
        Ok(assets)
    }

    /// Same as [`ReportAssets::load`], with relative paths resolved against `base`.
    pub fn load_relative_to(base: &Path, paths: &LogoPaths) -> Result<Self, ReportError> {
        let resolve = |p: &str| {
            if p.starts_with("data:") || Path::new(p).is_absolute() {
                p.to_string()
            } else {
                base.join(p).to_string_lossy().into_owned()
            }
        };
        Self::load(&LogoPaths {
            left: resolve(&paths.left),
            right: resolve(&paths.right),
        })
    }

    /// Build from already-decoded logos.
    pub fn from_logos(left: LogoAsset, right: LogoAsset) -> Self {
        let mut assets = Self::default();
        assets.insert(ASSET_LOGO_LEFT, left);
        assets.insert(ASSET_LOGO_RIGHT, right);
        assets
    }

    pub fn insert(&mut self, key: &str, logo: LogoAsset) {
        self.logos.insert(key.to_string(), logo);
    }

    pub fn get(&self, key: &str) -> Option<&LogoAsset> {
        self.logos.get(key)
    }
}

/// Parse a `data:<mime>;base64,<data>` URI and return the raw decoded bytes.
fn parse_data_uri(src: &str) -> Result<Vec<u8>, String> {
    let rest = src
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let comma_pos = rest.find(',').ok_or_else(|| {
        "Invalid data URI: missing `,` separator between header and data".to_string()
    })?;
    let header = &rest[..comma_pos];
    if !header.contains(";base64") {
        return Err("Only base64-encoded data URIs are supported. \
             The header must contain `;base64` (e.g. `data:image/png;base64,...`)."
            .to_string());
    }
    let b64_data = rest[comma_pos + 1..].trim();
    BASE64_STD
        .decode(b64_data)
        .map_err(|e| format!("Base64 decode error: {e}"))
}

// src/assets/paths.rs
//! Pure functions for asset path calculations.
//!
//! This module maps remote asset URLs to local files without performing
//! any I/O.

use crate::constants::ASSET_NOTION_DIR;
use crate::types::ValidationError;
use std::path::{Path, PathBuf};
use url::Url;

/// The last two path segments of an asset URL: `(dir, file)`.
///
/// Notion-hosted files live under a per-upload directory, so the pair is
/// unique per file.
pub fn asset_segments(url: &str) -> Result<(String, String), ValidationError> {
    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [.., dir, file] if is_safe_segment(dir) && is_safe_segment(file) => {
            Ok((dir.to_string(), file.to_string()))
        }
        _ => Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "URL path needs a directory and a file name".to_string(),
        }),
    }
}

fn is_safe_segment(segment: &str) -> bool {
    segment != "." && segment != ".." && !segment.contains('\\')
}

/// Where the asset at `url` is stored under `root`:
/// `{root}/notion/{dir}/{file}`.
pub fn local_asset_path(root: &Path, url: &str) -> Result<PathBuf, ValidationError> {
    let (dir, file) = asset_segments(url)?;
    Ok(root.join(ASSET_NOTION_DIR).join(dir).join(file))
}

/// Site-relative URL a page should reference for a localized asset.
pub fn local_asset_url(url: &str) -> Option<String> {
    let (dir, file) = asset_segments(url).ok()?;
    Some(format!("/{}/{}/{}", ASSET_NOTION_DIR, dir, file))
}

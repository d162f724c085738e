// src/assets/mod.rs
//! Build-time localization of Notion-hosted images.
//!
//! Notion serves uploaded files from signed URLs that expire, so covers,
//! icons and featured images are copied under the asset root before the
//! site is built.

pub mod downloader;
pub mod paths;

pub use downloader::{AssetDownloader, DownloadReport};
pub use paths::{local_asset_path, local_asset_url};

use crate::model::{FileObject, Icon, Post, SiteDatabase};
use std::path::Path;

/// Which image an integration localizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AssetKind {
    /// Page and database covers
    Cover,
    /// Custom (non-emoji) icons
    Icon,
    /// The `FeaturedImage` property of posts
    #[value(name = "featured")]
    FeaturedImage,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Cover, AssetKind::Icon, AssetKind::FeaturedImage];

    /// The file of this kind attached to a post, if any.
    pub fn select_post(self, post: &Post) -> Option<&FileObject> {
        match self {
            AssetKind::Cover => post.cover.as_ref(),
            AssetKind::Icon => post.icon.as_ref().and_then(Icon::file),
            AssetKind::FeaturedImage => post.featured_image.as_ref(),
        }
    }

    /// The file of this kind attached to the database itself, if any.
    pub fn select_database(self, database: &SiteDatabase) -> Option<&FileObject> {
        match self {
            AssetKind::Cover => database.cover.as_ref(),
            AssetKind::Icon => database.icon.as_ref().and_then(Icon::file),
            AssetKind::FeaturedImage => None,
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Cover => write!(f, "cover"),
            AssetKind::Icon => write!(f, "icon"),
            AssetKind::FeaturedImage => write!(f, "featured"),
        }
    }
}

/// The URL a page should use for `file`: the localized copy when a
/// Notion-hosted file was downloaded under `asset_root`, the original URL
/// otherwise.
pub fn public_url(file: &FileObject, asset_root: &Path) -> String {
    let url = file.url();
    if file.is_internal() {
        let downloaded = local_asset_path(asset_root, url).is_ok_and(|path| path.is_file());
        if downloaded {
            if let Some(local) = local_asset_url(url) {
                return local;
            }
        }
    }
    url.to_string()
}

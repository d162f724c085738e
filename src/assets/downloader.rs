// src/assets/downloader.rs
//! Paced, batched downloads of expiring Notion files.
//!
//! Posts are processed in batches of `ASSET_BATCH_SIZE`. Downloads inside a
//! batch run concurrently; consecutive batches are separated by
//! `ASSET_BATCH_PAUSE`. There are no retries: a failed file is logged and
//! left absent.

use super::paths::local_asset_path;
use super::AssetKind;
use crate::constants::{ASSET_BATCH_PAUSE, ASSET_BATCH_SIZE};
use crate::error::AppError;
use crate::model::{FileObject, Post, SiteDatabase};
use crate::remote::RemoteFetcher;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Outcome counts of a download run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    /// External files and malformed URLs
    pub skipped: usize,
    pub failed: Vec<String>,
    pub batches: usize,
}

impl DownloadReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Downloaded => self.downloaded += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(url) => self.failed.push(url),
        }
    }

    pub fn merge(mut self, other: DownloadReport) -> Self {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed.extend(other.failed);
        self.batches += other.batches;
        self
    }
}

#[derive(Debug)]
enum Outcome {
    Downloaded,
    Skipped,
    Failed(String),
}

/// Copies Notion-hosted files under an asset root.
pub struct AssetDownloader {
    fetcher: Arc<dyn RemoteFetcher>,
    asset_root: PathBuf,
    batch_size: usize,
    pause: Duration,
}

impl AssetDownloader {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            asset_root: asset_root.into(),
            batch_size: ASSET_BATCH_SIZE,
            pause: ASSET_BATCH_PAUSE,
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Downloads the database's own cover and icon for the selected kinds.
    pub async fn download_site_assets(
        &self,
        database: &SiteDatabase,
        kinds: &[AssetKind],
    ) -> DownloadReport {
        let mut report = DownloadReport::default();
        let files = kinds.iter().filter_map(|k| k.select_database(database));
        for outcome in join_all(files.map(|f| self.download(f))).await {
            report.record(outcome);
        }
        report
    }

    /// Downloads the selected kinds of file for every post, batch by batch.
    pub async fn download_for_posts(&self, posts: &[Post], kinds: &[AssetKind]) -> DownloadReport {
        let mut report = DownloadReport::default();

        for (index, batch) in posts.chunks(self.batch_size.max(1)).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause).await;
            }
            log::debug!("Downloading assets for batch {} ({} posts)", index + 1, batch.len());

            let downloads = batch
                .iter()
                .flat_map(|post| kinds.iter().filter_map(move |kind| kind.select_post(post)))
                .map(|file| self.download(file));

            for outcome in join_all(downloads).await {
                report.record(outcome);
            }
            report.batches += 1;
        }

        log::info!(
            "Assets: {} downloaded, {} skipped, {} failed in {} batches",
            report.downloaded,
            report.skipped,
            report.failed.len(),
            report.batches
        );
        report
    }

    async fn download(&self, file: &FileObject) -> Outcome {
        if !file.is_internal() {
            return Outcome::Skipped;
        }

        let url = file.url();
        let path = match local_asset_path(&self.asset_root, url) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Invalid asset URL, skipping: {}", e);
                return Outcome::Skipped;
            }
        };

        match self.fetch_to(url, &path).await {
            Ok(bytes) => {
                log::debug!("Saved {} ({} bytes)", path.display(), bytes);
                Outcome::Downloaded
            }
            Err(e) => {
                log::error!("Failed to download {}: {}", url, e);
                Outcome::Failed(url.to_string())
            }
        }
    }

    async fn fetch_to(&self, url: &str, path: &Path) -> Result<usize, AppError> {
        let bytes = self.fetcher.fetch_bytes(url).await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::StaticFetcher;
    use crate::types::{PageId, Slug};

    fn post_with_featured(n: usize, url: &str) -> Post {
        Post {
            page_id: PageId::new_v4(),
            slug: Slug::new(format!("post-{}", n)).unwrap(),
            title: format!("Post {}", n),
            icon: None,
            cover: None,
            tags: vec![],
            excerpt: None,
            featured_image: Some(FileObject::File {
                url: url.to_string(),
                expiry_time: None,
            }),
            rank: 0,
            date: None,
        }
    }

    #[tokio::test]
    async fn external_files_are_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::new());
        let downloader = AssetDownloader::new(fetcher.clone(), dir.path());

        let mut post = post_with_featured(0, "https://example.com/a/b.png");
        post.featured_image = Some(FileObject::External {
            url: "https://example.com/a/b.png".to_string(),
        });

        let report = downloader
            .download_for_posts(&[post], &[AssetKind::FeaturedImage])
            .await;
        assert_eq!(report.skipped, 1);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn site_cover_is_written_under_asset_root() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://files.example.com/space/abc/cover.jpg";
        let fetcher = Arc::new(StaticFetcher::new().with_body(url, vec![1u8, 2, 3]));
        let downloader = AssetDownloader::new(fetcher, dir.path());

        let database = SiteDatabase {
            cover: Some(FileObject::File {
                url: url.to_string(),
                expiry_time: None,
            }),
            ..Default::default()
        };
        let report = downloader
            .download_site_assets(&database, &AssetKind::ALL)
            .await;

        assert_eq!(report.downloaded, 1);
        let saved = std::fs::read(dir.path().join("notion/abc/cover.jpg")).unwrap();
        assert_eq!(saved, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_downloads_are_reported_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::new());
        let downloader = AssetDownloader::new(fetcher.clone(), dir.path());

        let report = downloader
            .download_for_posts(
                &[post_with_featured(1, "https://files.example.com/x/y.png")],
                &[AssetKind::FeaturedImage],
            )
            .await;

        assert_eq!(report.failed, vec!["https://files.example.com/x/y.png".to_string()]);
        assert_eq!(fetcher.requests().len(), 1);
    }
}

// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_blog::api::{ContentClient, NotionHttpClient, NotionRepository};
use notion_blog::assets::{AssetDownloader, AssetKind};
use notion_blog::config::{Command, CommandLineInput, NotionCredentials, SiteConfig};
use notion_blog::error::AppError;
use notion_blog::feed::render_feed;
use notion_blog::formatting::compose_post_html;
use notion_blog::og::{EmojiCache, EmojiProvider, OgService};
use notion_blog::remote::{HttpFetcher, RemoteFetcher};
use notion_blog::search::SearchSession;
use notion_blog::server::{self, AppState};
use notion_blog::types::BlockId;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion_blog.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}"
    } else {
        "[{l}] {m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("cannot open log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Runs the blog's commands against one resolved site configuration.
struct Site<'a> {
    config: &'a SiteConfig,
    content: ContentClient,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl<'a> Site<'a> {
    fn connect(
        config: &'a SiteConfig,
        notion: &NotionCredentials,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Result<Self, AppError> {
        let repository: Arc<dyn NotionRepository> =
            Arc::new(NotionHttpClient::new(&notion.api_key)?);
        Ok(Self {
            config,
            content: ContentClient::new(repository, notion.database_id.clone()),
            fetcher,
        })
    }

    async fn run(&self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Serve {
                addr,
                emoji_provider,
            } => self.serve(&addr, emoji_provider).await,
            Command::DownloadAssets { kind } => self.download_assets(&kind).await,
            Command::Render { slug, output } => self.render(&slug, output.as_deref()).await,
            Command::Feed { output } => self.feed(output.as_deref()).await,
            Command::Search { query } => {
                search(self.config, self.fetcher.as_ref(), &query).await;
                Ok(())
            }
        }
    }

    async fn serve(&self, addr: &str, provider: EmojiProvider) -> Result<(), AppError> {
        let og = OgService::new(
            self.content.clone(),
            Arc::clone(&self.fetcher),
            Arc::new(EmojiCache::new()),
        )
        .with_provider(provider);

        let state = AppState {
            content: self.content.clone(),
            og,
            site: self.config.site_url.clone(),
            base_path: self.config.base_path.clone(),
        };
        server::serve(addr, state).await
    }

    async fn download_assets(&self, kinds: &[AssetKind]) -> Result<(), AppError> {
        let kinds = if kinds.is_empty() {
            AssetKind::ALL.to_vec()
        } else {
            kinds.to_vec()
        };
        log::info!(
            "Downloading {} into {}",
            kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            self.config.asset_dir.display()
        );

        let (database, posts) =
            tokio::try_join!(self.content.get_database(), self.content.get_all_posts())?;

        let downloader = AssetDownloader::new(Arc::clone(&self.fetcher), &self.config.asset_dir);
        let report = downloader
            .download_site_assets(&database, &kinds)
            .await
            .merge(downloader.download_for_posts(&posts, &kinds).await);

        println!(
            "✓ {} downloaded, {} skipped, {} failed",
            report.downloaded,
            report.skipped,
            report.failed.len()
        );
        for url in &report.failed {
            eprintln!("⚠️  Failed: {}", url);
        }
        Ok(())
    }

    async fn render(&self, slug: &str, output: Option<&Path>) -> Result<(), AppError> {
        let post = self
            .content
            .get_post_by_slug(slug)
            .await
            .ok_or_else(|| AppError::Render(format!("no published post with slug '{}'", slug)))?;

        let root: BlockId = post.page_id.cast();
        let blocks = self.content.get_all_blocks_by_block_id(&root).await?;
        let html = compose_post_html(&post, &blocks, &self.config.asset_dir)?;
        deliver(output, &html)
    }

    async fn feed(&self, output: Option<&Path>) -> Result<(), AppError> {
        let (database, posts) =
            tokio::try_join!(self.content.get_database(), self.content.get_all_posts())?;
        let xml = render_feed(&self.config.site_url, &self.config.base_path, &database, &posts)?;
        deliver(output, &xml)
    }
}

/// Prints the feed items matching `query`.
async fn search(config: &SiteConfig, fetcher: &dyn RemoteFetcher, query: &str) {
    let mut session = SearchSession::new(&config.site_url);
    session.open(fetcher).await;

    let results = session.filter(query);
    if results.is_empty() {
        println!("No results for '{}'", query.trim());
    }
    for item in results {
        println!("{}\n  {}", item.title, item.link);
        if let Some(description) = &item.description {
            println!("  {}", description);
        }
    }
}

/// Writes `content` to `output`, or to stdout when no file is given.
fn deliver(output: Option<&Path>, content: &str) -> Result<(), AppError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            println!("✓ Saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SiteConfig::resolve(&cli)?;
    let fetcher: Arc<dyn RemoteFetcher> = Arc::new(HttpFetcher::default());

    match &config.notion {
        Some(notion) => {
            let site = Site::connect(&config, notion, fetcher)?;
            site.run(cli.command).await?;
        }
        None => {
            if let Command::Search { query } = &cli.command {
                search(&config, fetcher.as_ref(), query).await;
            }
        }
    }

    Ok(())
}

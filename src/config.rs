// src/config.rs
use crate::assets::AssetKind;
use crate::constants::{DEFAULT_ASSET_DIR, DEFAULT_BASE_PATH, DEFAULT_LISTEN_ADDR, DEFAULT_SITE_URL};
use crate::error::AppError;
use crate::og::EmojiProvider;
use crate::types::{ApiKey, DatabaseId, ValidatedUrl};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the Notion integration secret.
pub const API_SECRET_ENV: &str = "NOTION_API_SECRET";
/// Environment variable holding the posts database ID.
pub const DATABASE_ID_ENV: &str = "DATABASE_ID";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Public origin of the site (e.g., "https://blog.example.com")
    #[arg(long, global = true, default_value = DEFAULT_SITE_URL)]
    pub site: String,

    /// Path the site is mounted under
    #[arg(long, global = true, default_value = DEFAULT_BASE_PATH)]
    pub base_path: String,

    /// Directory that receives localized Notion files
    #[arg(long, global = true, default_value = DEFAULT_ASSET_DIR)]
    pub asset_dir: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve OG images and the RSS feed
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        addr: String,

        /// Emoji set used on post cards
        #[arg(long, value_enum, default_value_t = EmojiProvider::Fluent)]
        emoji_provider: EmojiProvider,
    },

    /// Copy Notion-hosted covers, icons and featured images under the asset directory
    DownloadAssets {
        /// Only download these kinds (repeatable; default: all)
        #[arg(long, value_enum)]
        kind: Vec<AssetKind>,
    },

    /// Render one post as HTML
    Render {
        slug: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the RSS feed
    Feed {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search the site's published feed
    Search { query: String },
}

impl Command {
    /// Whether the command reads from the Notion API. `search` only needs
    /// the public feed.
    pub fn needs_notion(&self) -> bool {
        !matches!(self, Command::Search { .. })
    }
}

/// Credentials for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionCredentials {
    pub api_key: ApiKey,
    pub database_id: DatabaseId,
}

impl NotionCredentials {
    fn resolve_with(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = lookup(API_SECRET_ENV).ok_or_else(|| {
            AppError::MissingConfiguration(format!(
                "{} environment variable not set",
                API_SECRET_ENV
            ))
        })?;
        let database_id = lookup(DATABASE_ID_ENV).ok_or_else(|| {
            AppError::MissingConfiguration(format!(
                "{} environment variable not set",
                DATABASE_ID_ENV
            ))
        })?;

        Ok(NotionCredentials {
            api_key: ApiKey::new(api_key)?,
            database_id: DatabaseId::parse(&database_id)?,
        })
    }
}

/// Resolved site configuration, validated and ready to drive every command.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Present for every command that reads from Notion
    pub notion: Option<NotionCredentials>,
    pub site_url: String,
    /// Always starts and ends with `/`
    pub base_path: String,
    pub asset_dir: PathBuf,
    pub verbose: bool,
}

impl SiteConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Like `resolve`, reading variables through `lookup`.
    pub fn resolve_with(
        cli: &CommandLineInput,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let notion = if cli.command.needs_notion() {
            Some(NotionCredentials::resolve_with(&lookup)?)
        } else {
            None
        };

        let site = ValidatedUrl::parse(cli.site.trim())?;

        Ok(SiteConfig {
            notion,
            site_url: site.as_str().trim_end_matches('/').to_string(),
            base_path: normalize_base_path(&cli.base_path),
            asset_dir: PathBuf::from(&cli.asset_dir),
            verbose: cli.verbose,
        })
    }
}

/// `blog` and `/blog` become `/blog/`; empty becomes `/`.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secret_abcdefghijklmnopqrstuvwxyz";
    const DATABASE: &str = "12345678123456781234567812345678";

    fn parse(args: &[&str]) -> CommandLineInput {
        CommandLineInput::try_parse_from(std::iter::once("notion-blog").chain(args.iter().copied()))
            .unwrap()
    }

    fn env(name: &str) -> Option<String> {
        match name {
            API_SECRET_ENV => Some(SECRET.to_string()),
            DATABASE_ID_ENV => Some(DATABASE.to_string()),
            _ => None,
        }
    }

    #[test]
    fn global_flags_apply_after_the_subcommand() {
        let cli = parse(&["feed", "--site", "https://blog.test/", "--base-path", "notes", "-o", "feed.xml"]);
        let config = SiteConfig::resolve_with(&cli, env).unwrap();

        assert_eq!(config.site_url, "https://blog.test");
        assert_eq!(config.base_path, "/notes/");
        assert_eq!(
            cli.command,
            Command::Feed {
                output: Some(PathBuf::from("feed.xml"))
            }
        );
    }

    #[test]
    fn defaults_cover_a_local_site() {
        let cli = parse(&["serve"]);
        let config = SiteConfig::resolve_with(&cli, env).unwrap();

        assert_eq!(config.site_url, "http://localhost:4321");
        assert_eq!(config.base_path, "/");
        assert_eq!(config.asset_dir, PathBuf::from("public"));
        assert_eq!(
            cli.command,
            Command::Serve {
                addr: DEFAULT_LISTEN_ADDR.to_string(),
                emoji_provider: EmojiProvider::Fluent,
            }
        );
    }

    #[test]
    fn asset_kinds_are_repeatable() {
        let cli = parse(&["download-assets", "--kind", "cover", "--kind", "featured"]);
        assert_eq!(
            cli.command,
            Command::DownloadAssets {
                kind: vec![AssetKind::Cover, AssetKind::FeaturedImage]
            }
        );
    }

    #[test]
    fn search_runs_without_notion_credentials() {
        let cli = parse(&["search", "rust", "--site", "https://blog.test"]);
        let config = SiteConfig::resolve_with(&cli, |_| None).unwrap();

        assert!(config.notion.is_none());
        assert_eq!(config.site_url, "https://blog.test");
    }

    #[test]
    fn notion_commands_carry_credentials() {
        let cli = parse(&["render", "hello"]);
        let config = SiteConfig::resolve_with(&cli, env).unwrap();

        let notion = config.notion.expect("render reads from Notion");
        assert_eq!(notion.api_key.as_str(), SECRET);
    }

    #[test]
    fn missing_secret_is_reported() {
        let cli = parse(&["feed"]);
        let err = SiteConfig::resolve_with(&cli, |name| {
            (name == DATABASE_ID_ENV).then(|| DATABASE.to_string())
        })
        .unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(msg) if msg.contains(API_SECRET_ENV)));
    }

    #[test]
    fn invalid_site_url_is_rejected() {
        let cli = parse(&["feed", "--site", "ftp://blog.test"]);
        assert!(matches!(
            SiteConfig::resolve_with(&cli, env),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn base_paths_are_normalized() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("/blog"), "/blog/");
        assert_eq!(normalize_base_path("blog/"), "/blog/");
    }
}

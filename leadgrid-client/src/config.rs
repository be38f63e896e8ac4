/// Configuration for the LeadGrid client
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `LEADGRID_STORE_URL`: Base URL of the hosted record store (required)
/// - `LEADGRID_STORE_KEY`: API key for the store (required)
/// - `LEADGRID_ACCESS_TOKEN`: Viewer access token (default: the store key)
/// - `LEADGRID_PAGE_SIZE`: Records per page request (default: 1000)
/// - `LEADGRID_MAX_PAGES`: Safety cap on page requests (default: 100)
/// - `LEADGRID_VIEWER_ID`: Authenticated viewer's user id (required)
/// - `LEADGRID_VIEWER_NAME`: Viewer display name (required)
/// - `LEADGRID_VIEWER_ROLE`: Viewer role label (required)
/// - `RUST_LOG`: Log level (default: info)
///
/// The viewer values describe an identity established by the external
/// auth service; nothing here mints or verifies credentials.
///
/// # Example
///
/// ```no_run
/// use leadgrid_client::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("store at {}", config.store.base_url);
/// # Ok(())
/// # }
/// ```

use crate::fetcher::FetcherConfig;
use leadgrid_shared::models::viewer::{Role, Viewer};
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hosted store connection
    pub store: StoreConfig,

    /// Pagination settings
    pub fetch: FetchConfig,

    /// Externally authenticated viewer
    pub viewer: ViewerConfig,
}

/// Hosted store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// REST base URL
    pub base_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Viewer access token for the Authorization header
    pub access_token: String,
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Records per page request
    pub page_size: usize,

    /// Safety cap on page requests per fetch
    pub max_pages: usize,
}

/// The externally authenticated viewer identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// User id
    pub id: Uuid,

    /// Display name (matches the desk label for desk heads)
    pub display_name: String,

    /// Role label as issued by the auth service
    pub role: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or values fail
    /// to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let base_url = env::var("LEADGRID_STORE_URL")
            .map_err(|_| anyhow::anyhow!("LEADGRID_STORE_URL environment variable is required"))?;
        let api_key = env::var("LEADGRID_STORE_KEY")
            .map_err(|_| anyhow::anyhow!("LEADGRID_STORE_KEY environment variable is required"))?;
        let access_token = env::var("LEADGRID_ACCESS_TOKEN").unwrap_or_else(|_| api_key.clone());

        let page_size = env::var("LEADGRID_PAGE_SIZE")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<usize>()?;
        let max_pages = env::var("LEADGRID_MAX_PAGES")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<usize>()?;

        if page_size == 0 {
            anyhow::bail!("LEADGRID_PAGE_SIZE must be greater than zero");
        }
        if max_pages == 0 {
            anyhow::bail!("LEADGRID_MAX_PAGES must be greater than zero");
        }

        let viewer_id = env::var("LEADGRID_VIEWER_ID")
            .map_err(|_| anyhow::anyhow!("LEADGRID_VIEWER_ID environment variable is required"))?
            .parse::<Uuid>()?;
        let display_name = env::var("LEADGRID_VIEWER_NAME")
            .map_err(|_| anyhow::anyhow!("LEADGRID_VIEWER_NAME environment variable is required"))?;
        let role = env::var("LEADGRID_VIEWER_ROLE")
            .map_err(|_| anyhow::anyhow!("LEADGRID_VIEWER_ROLE environment variable is required"))?;

        Ok(Config {
            store: StoreConfig {
                base_url,
                api_key,
                access_token,
            },
            fetch: FetchConfig {
                page_size,
                max_pages,
            },
            viewer: ViewerConfig {
                id: viewer_id,
                display_name,
                role,
            },
        })
    }

    /// The configured viewer with its role label resolved
    ///
    /// Unrecognized labels resolve to a role that sees nothing.
    pub fn viewer(&self) -> Viewer {
        Viewer {
            id: self.viewer.id,
            display_name: self.viewer.display_name.clone(),
            role: Role::parse(&self.viewer.role),
        }
    }

    /// Pagination settings in the fetcher's terms
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            page_size: self.fetch.page_size,
            max_pages: self.fetch.max_pages,
        }
    }
}

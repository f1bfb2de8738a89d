use crate::bots::BotMatcher;
use crate::loader::ContentLoader;
use crate::oauth::OAuthCredentials;
use press_kit_core::SiteConfig;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub loader: Arc<ContentLoader>,
    pub bots: Arc<BotMatcher>,
    pub credentials: Arc<OAuthCredentials>,
    pub http: reqwest::Client,
    /// Present when serving with file watching; pages then carry the reload script.
    pub reload_tx: Option<broadcast::Sender<()>>,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        loader: ContentLoader,
        credentials: OAuthCredentials,
        http: reqwest::Client,
    ) -> Result<Self, regex::Error> {
        let bots = BotMatcher::new(config.metadata.bot_user_agents.as_slice())?;
        Ok(Self {
            config: Arc::new(config),
            loader: Arc::new(loader),
            bots: Arc::new(bots),
            credentials: Arc::new(credentials),
            http,
            reload_tx: None,
        })
    }

    pub fn with_reload(mut self, reload_tx: broadcast::Sender<()>) -> Self {
        self.reload_tx = Some(reload_tx);
        self
    }

    pub fn is_preview(&self) -> bool {
        self.reload_tx.is_some()
    }
}

//! Builds the ordered strategy list from configuration

use super::traits::{FetchingStrategy, SourceKind, Strategy};
use super::{duckduckgo, google_news};
use crate::config::Settings;
use crate::network::HttpClient;
use std::sync::Arc;
use tracing::info;

/// Loader for the built-in source strategies
pub struct SourceLoader;

impl SourceLoader {
    /// Enabled strategies, always in [`SourceKind::ALL`] order
    pub fn load(settings: &Settings, client: &HttpClient) -> Vec<Arc<dyn Strategy>> {
        let mut strategies = Vec::new();

        for kind in SourceKind::ALL {
            let config = match kind {
                SourceKind::NewsFeed => &settings.search.sources.news,
                SourceKind::InstantAnswer => &settings.search.sources.instant,
                SourceKind::GeneralSearch => &settings.search.sources.web,
            };
            if config.disabled {
                info!("Skipping disabled source: {}", kind.settings_key());
                continue;
            }

            let strategy: Arc<dyn Strategy> = match kind {
                SourceKind::NewsFeed => Arc::new(FetchingStrategy::new(
                    google_news::GoogleNews::with_settings(config),
                    client.clone(),
                )),
                SourceKind::InstantAnswer => Arc::new(FetchingStrategy::new(
                    duckduckgo::DuckDuckGoInstant::with_settings(config),
                    client.clone(),
                )),
                SourceKind::GeneralSearch => Arc::new(FetchingStrategy::new(
                    duckduckgo::DuckDuckGo::with_settings(config),
                    client.clone(),
                )),
            };
            info!("Loaded source: {} ({})", strategy.name(), kind.settings_key());
            strategies.push(strategy);
        }

        info!("Loaded {} sources", strategies.len());
        strategies
    }
}

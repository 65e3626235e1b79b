use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::Html;
use serde::Serialize;
use tracing::{instrument, Level};
use url::Url;

use crate::{
    config::Config,
    fetch,
    parse::{LocationLinks, LocationMenu},
    stage::Staging,
    store::Store,
};

/// What one refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Locations whose page parsed and whose export was written.
    pub locations: usize,
    /// Distinct foods handed to the store.
    pub items: usize,
    pub failed_writes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Published {
    locations: usize,
    items: usize,
    failed_writes: usize,
}

/// Scrapes every dining hall, stages the raw pages, then publishes exports and store rows.
#[derive(Debug)]
pub struct Refresher {
    client: Client,
    index_url: Url,
    excluded: Vec<String>,
    pages: Staging,
    exports: Staging,
    store: Store,
}

impl Refresher {
    pub fn new(config: &Config, client: Client, store: Store) -> Self {
        Self {
            client,
            index_url: config.index_url.clone(),
            excluded: config.excluded_locations.clone(),
            pages: Staging::new(&config.staging_dir, "html"),
            exports: Staging::new(&config.output_dir, "json"),
            store,
        }
    }

    #[instrument(skip(self), fields(index = %self.index_url), level = Level::DEBUG)]
    pub async fn refresh(&mut self) -> crate::Result<RefreshReport> {
        let started_at = Utc::now();
        self.stage_pages().await?;
        let published = self.publish().await?;
        let report = RefreshReport {
            started_at,
            finished_at: Utc::now(),
            locations: published.locations,
            items: published.items,
            failed_writes: published.failed_writes,
        };
        log::info!(
            "Refreshed {} locations ({} foods, {} failed writes) in {}ms",
            report.locations,
            report.items,
            report.failed_writes,
            (report.finished_at - report.started_at).num_milliseconds()
        );
        Ok(report)
    }

    /// Replaces the staged pages with a fresh download of every location.
    async fn stage_pages(&self) -> crate::Result<()> {
        let index = fetch::index_page(&self.client, &self.index_url).await?;
        let links = discover(&index, &self.index_url, &self.excluded);
        if links.is_empty() {
            log::warn!("No locations listed on {}", self.index_url);
        } else {
            log::info!("Found {} locations on {}", links.len(), self.index_url);
        }
        let pages = fetch::location_pages(&self.client, &links).await;
        log::info!(
            "Staging {} of {} location pages in {}",
            pages.len(),
            links.len(),
            self.pages.root().display()
        );
        self.pages.replace_all(pages).await?;
        Ok(())
    }

    /// Parses every staged page in key order, writing its export and its store rows.
    async fn publish(&mut self) -> crate::Result<Published> {
        self.exports
            .replace_all(std::iter::empty::<(&str, &[u8])>())
            .await?;
        let mut published = Published::default();
        for (key, html) in self.pages.read_all().await? {
            let menu = match LocationMenu::from_html(&html) {
                Ok(menu) => menu,
                Err(e) => {
                    log::warn!("Skipping staged page {key}: {e}");
                    continue;
                }
            };
            if menu.catalog().is_empty() {
                log::warn!("{} lists no foods", menu.name());
            }
            let export = serde_json::to_string_pretty(menu.export())?;
            self.exports.write(menu.name(), export).await?;

            let summary = self.store.persist(menu.catalog()).await;
            published.locations += 1;
            published.items += menu.catalog().len();
            published.failed_writes += summary.failed;
        }
        Ok(published)
    }

    #[cfg(test)]
    const fn store(&self) -> &Store {
        &self.store
    }
}

fn discover(html: &str, base: &Url, excluded: &[String]) -> LocationLinks {
    let document = Html::parse_document(html);
    LocationLinks::from_html_element(document.root_element(), base, excluded)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        config::{StoreKind, DEFAULT_INDEX_URL},
        fetch::make_client,
        stage::scratch_dir,
    };

    fn config(index_url: &str) -> Config {
        Config {
            addr: "127.0.0.1:3001".parse().unwrap(),
            index_url: index_url.parse().unwrap(),
            staging_dir: scratch_dir("pages"),
            output_dir: scratch_dir("exports"),
            store: StoreKind::Memory,
            accept_invalid_certs: false,
            excluded_locations: vec!["select-access".to_owned()],
        }
    }

    fn refresher(config: &Config) -> Refresher {
        Refresher::new(config, make_client(false).unwrap(), Store::memory())
    }

    async fn cleanup(config: &Config) {
        for dir in [&config.staging_dir, &config.output_dir] {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[test]
    fn test_discover() {
        let html = fs::read_to_string("./src/parse/html_examples/index_page/dining_halls.html").unwrap();
        let base: Url = DEFAULT_INDEX_URL.parse().unwrap();
        let links = discover(&html, &base, &["select-access".to_owned(), "markley".to_owned()]);
        assert_eq!(links.len(), 4);
        assert!(links.iter().all(|l| l.slug() != "markley"));
    }

    #[tokio::test]
    async fn test_publish_staged_pages() {
        let config = config(DEFAULT_INDEX_URL);
        let mut refresher = refresher(&config);
        let html = fs::read_to_string("./src/parse/html_examples/menu_page/dining_hall.html").unwrap();
        refresher
            .pages
            .replace_all([("bursley", html.as_str()), ("closed", "<p>Closed today</p>")])
            .await
            .unwrap();
        // stale export from an earlier run
        refresher.exports.replace_all([("Gone Hall", "[]")]).await.unwrap();

        let published = refresher.publish().await.unwrap();
        assert_eq!(
            published,
            Published {
                locations: 1,
                items: 4,
                failed_writes: 0
            }
        );

        let exports = refresher.exports.read_all().await.unwrap();
        assert_eq!(exports.len(), 1);
        let (key, export) = &exports[0];
        assert_eq!(key, "Bursley");
        let export: serde_json::Value = serde_json::from_str(export).unwrap();
        let entries = export.as_array().unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0][0], "Oatmeal");
        assert_eq!(entries[0][1], serde_json::json!(["breakfast"]));
        assert_eq!(entries[4][1], serde_json::json!([]));

        let names: Vec<_> = refresher
            .store()
            .memory_table("Bursley")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Oatmeal", "Scrambled Eggs", "Tomato Basil Soup", "Cheese Pizza"]
        );
        let oatmeal = &refresher.store().memory_table("Bursley")[0];
        assert!(oatmeal.is_breakfast && oatmeal.is_lunch && oatmeal.is_dinner);
        assert!(!oatmeal.is_brunch);

        // publishing again leaves the same rows
        refresher.publish().await.unwrap();
        assert_eq!(refresher.store().memory_table("Bursley").len(), 4);
        cleanup(&config).await;
    }

    #[tokio::test]
    async fn test_unreachable_index_is_fatal() {
        let config = config("http://127.0.0.1:9/menus/");
        let mut refresher = refresher(&config);
        let err = refresher.refresh().await.unwrap_err();
        assert!(matches!(err, crate::Error::Fetch(_)));
        assert!(!config.staging_dir.exists());
        cleanup(&config).await;
    }
}

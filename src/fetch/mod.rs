use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use futures::future::join_all;
use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

use crate::parse::{LocationLink, LocationLinks};

pub fn make_client(accept_invalid_certs: bool) -> Result<Client, RequestError> {
    Client::builder()
        .danger_accept_invalid_certs(accept_invalid_certs)
        .gzip(true)
        .build()
}

pub async fn index_page(client: &Client, url: &Url) -> Result<String, RequestError> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    response.text().await
}

static RATE_LIMIT: u32 = 20;
static DELAY_JITTER: u64 = 2;
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

#[instrument(skip(client, link), fields(slug = %link.slug()), level = Level::TRACE)]
pub async fn fetch_location_page(client: &Client, link: &LocationLink) -> Result<String, RequestError> {
    let rate_limiter = RATE_LIMITER.get_or_init(|| {
        governor::RateLimiter::direct(governor::Quota::per_second(
            NonZeroU32::new(RATE_LIMIT).unwrap_or(NonZeroU32::MIN),
        ))
    });
    let retry_jitter = governor::Jitter::new(Duration::ZERO, Duration::from_secs(DELAY_JITTER));
    rate_limiter.until_ready_with_jitter(retry_jitter).await;
    let res = client.get(link.url().clone()).send().await?.error_for_status()?;
    let start = std::time::Instant::now();
    let text = res.text().await?;
    log::trace!("Got text of {} in \t {:?}", link.slug(), start.elapsed());
    Ok(text)
}

/// Fetches every location page concurrently. Locations that fail are logged and left out.
pub async fn location_pages<'a>(client: &Client, links: &'a LocationLinks) -> Vec<(&'a str, String)> {
    let pages = join_all(links.iter().map(|link| async move {
        (link, fetch_location_page(client, link).await)
    }))
    .await;
    pages
        .into_iter()
        .filter_map(|(link, page)| match page {
            Ok(html) => {
                log::info!("Fetched menu page for {} ({})", link.title(), link.slug());
                Some((link.slug(), html))
            }
            Err(e) => {
                log::warn!("Error fetching {}: {e}", link.url());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_client() {
        assert!(make_client(true).is_ok());
        assert!(make_client(false).is_ok());
    }

    #[tokio::test]
    async fn test_no_links_fetches_nothing() {
        let client = make_client(false).unwrap();
        let links = LocationLinks::default();
        assert!(location_pages(&client, &links).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_location_is_skipped() {
        let client = make_client(false).unwrap();
        let html = r#"<a class="level_2" href="http://127.0.0.1:9/menus/closed-hall/">Closed</a>"#;
        let links = {
            let doc = scraper::Html::parse_document(html);
            let base: Url = "http://127.0.0.1:9/".parse().unwrap();
            LocationLinks::from_html_element(doc.root_element(), &base, &[])
        };
        assert_eq!(links.len(), 1);
        assert!(location_pages(&client, &links).await.is_empty());
    }
}

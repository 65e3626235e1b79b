use std::slice::Iter;

use url::Url;

use crate::parse::{element_text, Error};
use crate::static_selector;

/// One location listed on the dining halls index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLink {
    slug: String, // ex. bursley
    title: String,
    url: Url,
}

impl LocationLink {
    /// The slug is the last non-empty path segment of the url.
    pub fn from_url(url: Url, title: impl Into<String>) -> Result<Self, Error> {
        let slug = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .ok_or_else(|| Error::html_parse_error("Location url has no path segment to name it by"))?
            .to_owned();
        Ok(Self {
            slug,
            title: title.into(),
            url,
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationLinks(Vec<LocationLink>);

impl LocationLinks {
    /// Collects every `.level_2` link, resolved against `base`. Links without an href, links
    /// whose slug is in `excluded` and repeated slugs are left out.
    pub fn from_html_element(element: scraper::ElementRef, base: &Url, excluded: &[String]) -> Self {
        static_selector!(LOCATION_SELECTOR <- ".level_2");

        let mut links: Vec<LocationLink> = Vec::new();
        for anchor in element.select(&LOCATION_SELECTOR) {
            let Some(href) = anchor.attr("href") else {
                continue;
            };
            let link = match base
                .join(href)
                .map_err(Error::from)
                .and_then(|url| LocationLink::from_url(url, element_text(anchor)))
            {
                Ok(link) => link,
                Err(e) => {
                    log::warn!("Skipping location link {href:?}: {e}");
                    continue;
                }
            };
            if excluded.iter().any(|slug| *slug == link.slug) {
                log::info!("Skipping {} as it matches the exclusion criteria.", link.slug);
                continue;
            }
            if links.iter().any(|l| l.slug == link.slug) {
                continue;
            }
            links.push(link);
        }
        Self(links)
    }

    pub fn iter(&self) -> Iter<LocationLink> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

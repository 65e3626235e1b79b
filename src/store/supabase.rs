use std::fmt;

use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use super::{Error, FoodRecord};

/// A Supabase project reached through its PostgREST endpoint; one table per location.
pub struct Supabase {
    client: Client,
    base: Url,
    key: String,
}

impl fmt::Debug for Supabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supabase")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl Supabase {
    pub fn new(client: Client, url: &str, key: impl Into<String>) -> Result<Self, Error> {
        let base = Url::parse(url)?;
        if base.cannot_be_a_base() {
            return Err(Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            client,
            base,
            key: key.into(),
        })
    }

    pub(super) fn table_url(&self, table: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["rest", "v1", table]);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    pub async fn clear(&self, location: &str) -> Result<(), Error> {
        let request = self
            .client
            .delete(self.table_url(location))
            .query(&[("name", "not.is.null")]);
        let response = self.authorized(request).send().await?;
        check(response).await
    }

    pub async fn upsert(&self, location: &str, record: &FoodRecord) -> Result<(), Error> {
        let request = self
            .client
            .post(self.table_url(location))
            .header("Prefer", "resolution=merge-duplicates")
            .json(record);
        let response = self.authorized(request).send().await?;
        check(response).await
    }
}

async fn check(response: Response) -> Result<(), Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        let supabase = Supabase::new(Client::new(), "https://abc.supabase.co", "key").unwrap();
        assert_eq!(
            supabase.table_url("North Quad").as_str(),
            "https://abc.supabase.co/rest/v1/North%20Quad"
        );
        let supabase = Supabase::new(Client::new(), "https://abc.supabase.co/", "key").unwrap();
        assert_eq!(
            supabase.table_url("Bursley").as_str(),
            "https://abc.supabase.co/rest/v1/Bursley"
        );
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(Supabase::new(Client::new(), "not a url", "key").is_err());
        assert!(Supabase::new(Client::new(), "mailto:dining@umich.edu", "key").is_err());
    }
}

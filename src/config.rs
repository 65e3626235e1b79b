use std::{env, net::SocketAddr, path::PathBuf};

use url::Url;

use crate::error::Error;

pub const DEFAULT_INDEX_URL: &str = "https://dining.umich.edu/menus-locations/dining-halls/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Firestore { project_id: String },
    Supabase { url: String, key: String },
    Local(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub index_url: Url,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
    pub store: StoreKind,
    pub accept_invalid_certs: bool,
    pub excluded_locations: Vec<String>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = get("PORT").unwrap_or_else(|| "3001".to_string());
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| Error::config_error(format!("invalid HOST/PORT {host}:{port}: {e}")))?;

        let index_url = get("MENU_INDEX_URL").unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());
        let index_url = Url::parse(&index_url)
            .map_err(|e| Error::config_error(format!("invalid MENU_INDEX_URL {index_url}: {e}")))?;

        let store = match get("STORE").as_deref() {
            Some(":firestore:") => StoreKind::Firestore {
                project_id: get("FIRESTORE_PROJECT").unwrap_or_else(|| "umich-menu".to_string()),
            },
            Some(":supabase:") => StoreKind::Supabase {
                url: get("SUPABASE_URL")
                    .ok_or_else(|| Error::config_error("STORE=:supabase: needs SUPABASE_URL"))?,
                key: get("SUPABASE_KEY")
                    .ok_or_else(|| Error::config_error("STORE=:supabase: needs SUPABASE_KEY"))?,
            },
            Some(":memory:") => StoreKind::Memory,
            Some(p) => StoreKind::Local(PathBuf::from(p)),
            None => {
                log::warn!("env var STORE not set, using ad-hoc memory store.");
                StoreKind::Memory
            }
        };

        let accept_invalid_certs: bool = match get("ACCEPT_INVALID_CERTS").as_deref() {
            None => true,
            Some(v) => v
                .parse()
                .map_err(|_| Error::config_error(format!("ACCEPT_INVALID_CERTS must be true or false, got {v}")))?,
        };

        let excluded_locations = get("EXCLUDED_LOCATIONS")
            .unwrap_or_else(|| "select-access".to_string())
            .split(',')
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self {
            addr,
            index_url,
            staging_dir: get("STAGING_DIR").map_or_else(|| "dining_halls".into(), PathBuf::from),
            output_dir: get("OUTPUT_DIR").map_or_else(|| "parsed_results_json".into(), PathBuf::from),
            store,
            accept_invalid_certs,
            excluded_locations,
        })
    }
}

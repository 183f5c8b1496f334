use crate::command::Location;
use crate::workflow::config::BotConfig;
use anyhow::{bail, Context};
use growthcore::records::RawDailyRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const NATION_PATH: &str = "/us/daily";
const REGION_PATH: &str = "/states/daily";

/// Pulls daily records from the upstream tracking API.
pub struct HttpSource {
    client: reqwest::Client,
    api_base: String,
}

impl HttpSource {
    pub fn new(api_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, location: &Location) -> String {
        match location {
            Location::Nation => format!("{}{}", self.api_base, NATION_PATH),
            Location::Region(region) => {
                format!("{}{}?state={}", self.api_base, REGION_PATH, region.code)
            }
        }
    }

    async fn fetch(&self, location: &Location) -> anyhow::Result<Vec<RawDailyRecord>> {
        let url = self.url_for(location);
        log::debug!("fetching {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {}", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} answered {}", url, status);
        }

        response
            .json::<Vec<RawDailyRecord>>()
            .await
            .with_context(|| format!("decoding records from {}", url))
    }
}

/// Contents of an offline records file: either one array used for every
/// location, or arrays keyed by location code.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OfflineRecords {
    Shared(Vec<RawDailyRecord>),
    ByLocation(HashMap<String, Vec<RawDailyRecord>>),
}

pub enum RecordSource {
    Http(HttpSource),
    Offline(PathBuf),
}

impl RecordSource {
    pub fn from_config(config: &BotConfig, records: Option<PathBuf>) -> anyhow::Result<Self> {
        match records {
            Some(path) => Ok(RecordSource::Offline(path)),
            None => Ok(RecordSource::Http(HttpSource::new(
                &config.api_base,
                config.request_timeout(),
            )?)),
        }
    }

    pub async fn fetch(&self, location: &Location) -> anyhow::Result<Vec<RawDailyRecord>> {
        match self {
            RecordSource::Http(source) => source.fetch(location).await,
            RecordSource::Offline(path) => {
                let contents = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading records file {}", path.display()))?;
                let records: OfflineRecords = serde_json::from_str(&contents)
                    .with_context(|| format!("parsing records file {}", path.display()))?;
                Ok(match records {
                    OfflineRecords::Shared(records) => records,
                    OfflineRecords::ByLocation(mut by_location) => by_location
                        .remove(location.code())
                        .unwrap_or_default(),
                })
            }
        }
    }
}

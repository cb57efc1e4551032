use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::{ProgramEntry, RiderPoints, RiderProfile, SeasonResults, TeamSeason};
use crate::names;
use crate::parser;
use crate::parser::extract::{points, profile, program, seasons, teams};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} fetching {url}")]
    Status { status: StatusCode, url: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            FetchError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
        }
    }
}

/// Fetches PCS pages and hands them to the parsers.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct PcsClient {
    http: reqwest::Client,
    cfg: Config,
}

impl PcsClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// GET a page body, retrying rate limits and server errors with exponential back-off.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.cfg.max_retries => {
                    let backoff = backoff_delay(self.cfg.base_backoff, attempt);
                    warn!(
                        "{} (attempt {}/{}), backing off {:.1}s",
                        e,
                        attempt + 1,
                        self.cfg.max_retries,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        resp.text().await.map_err(transport)
    }

    pub async fn season_results(&self, rider: &str, season: i32) -> Result<SeasonResults> {
        let url = names::rider_season_url(&self.cfg.base_url, rider, season);
        let html = self.fetch(&url).await?;
        let races = parser::parse_season_results(&html);
        info!("{} races for {} in {}", races.len(), rider, season);
        Ok(races)
    }

    pub async fn program(&self, rider: &str) -> Result<Vec<ProgramEntry>> {
        let html = self.rider_page(rider).await?;
        Ok(program::extract(&html))
    }

    pub async fn active_seasons(&self, rider: &str) -> Result<Vec<i32>> {
        let html = self.rider_page(rider).await?;
        Ok(seasons::extract(&html))
    }

    pub async fn profile(&self, rider: &str) -> Result<RiderProfile> {
        let html = self.rider_page(rider).await?;
        Ok(profile::extract(&html))
    }

    pub async fn team_history(&self, rider: &str) -> Result<Vec<TeamSeason>> {
        let html = self.rider_page(rider).await?;
        Ok(teams::extract(&html))
    }

    pub async fn points(&self, rider: &str) -> Result<RiderPoints> {
        let html = self.rider_page(rider).await?;
        Ok(points::extract(&html))
    }

    /// Result page of one race edition; `None` when PCS has no such page.
    pub async fn race_result_page(&self, race: &str, season: i32) -> Result<Option<String>, FetchError> {
        let url = names::race_result_url(&self.cfg.base_url, race, season);
        match self.fetch(&url).await {
            Ok(html) => Ok(Some(html)),
            Err(e) if e.is_not_found() => {
                debug!("No {} edition in {}", race, season);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn rider_page(&self, rider: &str) -> Result<String> {
        let url = names::rider_url(&self.cfg.base_url, rider);
        Ok(self.fetch(&url).await?)
    }
}

/// `base * 2^attempt`, saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

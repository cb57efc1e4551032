use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::client::PcsClient;
use crate::model::{Rank, NOT_FOUND};
use crate::parser::extract::rank;

/// Season → the rider's result in one race, in the order the seasons were given.
pub type PastResults = IndexMap<i32, String>;

/// Ask `lookup` once per season; a season without an answer reads "not found".
pub fn aggregate<F>(seasons: &[i32], mut lookup: F) -> PastResults
where
    F: FnMut(i32) -> Option<String>,
{
    seasons
        .iter()
        .map(|&season| {
            let result = lookup(season).unwrap_or_else(|| NOT_FOUND.to_string());
            (season, result)
        })
        .collect()
}

/// Lowest numeric place across the seasons; the earlier-listed season wins a tie.
pub fn best_result(results: &PastResults) -> Option<(i32, u64)> {
    results
        .iter()
        .filter_map(|(&season, r)| Rank::parse(r).place().map(|p| (season, p)))
        .fold(None, |best, (season, place)| match best {
            Some((_, b)) if b <= place => best,
            _ => Some((season, place)),
        })
}

/// Fetch the race's result page for every active season, then read the rider's rank from each.
///
/// Fetches run concurrently (bounded by the configured concurrency); a missing
/// edition counts as "not found", any other retrieval failure aborts.
pub async fn fetch_past_results(client: &PcsClient, rider: &str, race: &str) -> Result<PastResults> {
    let seasons = client.active_seasons(rider).await?;
    if seasons.is_empty() {
        info!("No active seasons listed for {}", rider);
        return Ok(PastResults::new());
    }

    let pages = fetch_result_pages(client, race, &seasons).await?;

    let found: HashMap<i32, String> = pages
        .par_iter()
        .filter_map(|(season, html)| {
            let html = html.as_deref()?;
            Some((*season, rank::rider_result(html, rider)))
        })
        .collect();

    Ok(aggregate(&seasons, |season| found.get(&season).cloned()))
}

async fn fetch_result_pages(
    client: &PcsClient,
    race: &str,
    seasons: &[i32],
) -> Result<Vec<(i32, Option<String>)>> {
    let semaphore = Arc::new(Semaphore::new(client.config().concurrency));
    let pb = ProgressBar::new(seasons.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} seasons")?
            .progress_chars("=> "),
    );

    let mut tasks = JoinSet::new();
    for &season in seasons {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let race = race.to_string();
        tasks.spawn(async move {
            let _permit = sem.acquire_owned().await?;
            let page = client.race_result_page(&race, season).await?;
            anyhow::Ok((season, page))
        });
    }

    let mut pages = Vec::with_capacity(seasons.len());
    while let Some(joined) = tasks.join_next().await {
        pages.push(joined??);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(pages)
}

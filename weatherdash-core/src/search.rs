//! Debounced location search.

use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{gateway::WeatherGateway, model::Location};

/// Quiet period after the last keystroke before a lookup is sent.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries this short (after trimming) never reach the network.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Suggestions { query: String, locations: Vec<Location> },
    /// Query too short; suggestions should be hidden.
    Cleared,
    Failed { query: String, message: String },
}

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Consume raw queries and emit one outcome per quiet period.
///
/// Returns when either channel closes. A query still pending when the input
/// closes is dropped.
pub async fn run_search(
    gateway: Arc<dyn WeatherGateway>,
    mut queries: mpsc::Receiver<String>,
    results: mpsc::Sender<SearchOutcome>,
) {
    let mut pending: Option<String> = None;

    loop {
        let Some(query) = pending.take() else {
            match queries.recv().await {
                Some(query) => pending = Some(query),
                None => return,
            }
            continue;
        };

        tokio::select! {
            next = queries.recv() => match next {
                Some(next) => pending = Some(next),
                None => return,
            },
            _ = tokio::time::sleep(DEBOUNCE) => {
                let outcome = lookup(gateway.as_ref(), query).await;
                if results.send(outcome).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn lookup(gateway: &dyn WeatherGateway, query: String) -> SearchOutcome {
    if !is_searchable(&query) {
        return SearchOutcome::Cleared;
    }

    let term = query.trim();
    debug!(query = term, "searching locations");

    match gateway.geocode(term).await {
        Ok(locations) => SearchOutcome::Suggestions { query, locations },
        Err(e) => {
            warn!(error = %e, query = term, "location search failed");
            SearchOutcome::Failed { message: e.user_message(), query }
        }
    }
}

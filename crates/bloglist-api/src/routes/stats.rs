//! Aggregate statistics over all stored blogs.

use axum::extract::State;
use axum::Json;
use bloglist_data::aggregator::{BlogStatistics, StatsAggregator};

use crate::state::AppState;

/// Selections are `null` while the store holds no blogs.
pub async fn overview(State(state): State<AppState>) -> Json<BlogStatistics> {
    let records = state.store.read().await.records();
    Json(StatsAggregator::summarize(&records))
}

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use crate::catalog::{CatalogEntry, catalog};
use crate::metrics::REQUEST_TOTAL;
use crate::models::StatsQuery;
use crate::state::AppState;
use crate::stats::{RatingRecord, StatsSummary};

// Per-question figures for ?tipoUsuario=atleta|clube|arbitro|todos, [] for anything else
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Json<Vec<RatingRecord>> {
    REQUEST_TOTAL.inc();
    Json(state.stats.select(query.tipo_usuario))
}

pub async fn stats_summary_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsSummary> {
    REQUEST_TOTAL.inc();
    Json(state.stats.summarize(query.tipo_usuario))
}

pub async fn catalog_handler() -> Json<Vec<CatalogEntry>> {
    Json(catalog())
}

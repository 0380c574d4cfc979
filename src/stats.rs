use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::catalog::{CategoryFilter, QuestionId, RespondentCategory, Scope};

// Nudge applied before rounding so 4.45 stored as 4.4499.. still goes up
const ROUNDING_EPSILON: f64 = 1e-9;

// Aggregated score for one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRecord {
    #[serde(rename = "pergunta")]
    pub question: QuestionId,
    #[serde(rename = "media")]
    pub average: f64,
    #[serde(rename = "totalAvaliacoes")]
    pub sample_count: u32,
    #[serde(rename = "tipoUsuario", skip_serializing_if = "Option::is_none")]
    pub category: Option<RespondentCategory>,
}

impl RatingRecord {
    // Averages are kept inside the 0..=5 star scale
    pub fn new(
        question: QuestionId,
        average: f64,
        sample_count: u32,
        category: Option<RespondentCategory>,
    ) -> Self {
        Self {
            question,
            average: average.clamp(0.0, 5.0),
            sample_count,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub tipo_usuario: CategoryFilter,
    pub media_geral: Option<f64>,
    pub total_respostas: u32,
    pub perguntas: usize,
}

/// Read-only projection over precomputed per-question figures, one record
/// set for every respondent category plus one across all of them.
pub struct StatsAggregator {
    overall: Vec<RatingRecord>,
    by_category: HashMap<RespondentCategory, Vec<RatingRecord>>,
}

impl StatsAggregator {
    pub fn new(
        overall: Vec<RatingRecord>,
        by_category: HashMap<RespondentCategory, Vec<RatingRecord>>,
    ) -> Self {
        let by_category = by_category
            .into_iter()
            .map(|(category, records)| (category, in_catalog_order(records)))
            .collect();

        Self {
            overall: in_catalog_order(overall),
            by_category,
        }
    }

    // Seeded figures until real submissions are aggregated
    pub fn fixture() -> Self {
        let by_category = RespondentCategory::ALL
            .iter()
            .map(|category| {
                let (averages, count) = match category {
                    RespondentCategory::Atleta => (ATLETA_AVERAGES, 20),
                    RespondentCategory::Clube => (CLUBE_AVERAGES, 15),
                    RespondentCategory::Arbitro => (ARBITRO_AVERAGES, 10),
                };
                (*category, build_records(&averages, count, Some(*category)))
            })
            .collect();

        Self::new(build_records(&TODOS_AVERAGES, 45, None), by_category)
    }

    // Records for one category, or across everyone when `category` is None
    pub fn get_stats(&self, category: Option<RespondentCategory>) -> Vec<RatingRecord> {
        let Some(category) = category else {
            return self.overall.clone();
        };

        match self.by_category.get(&category) {
            Some(records) => records.clone(),
            None => {
                warn!(?category, "No statistics for respondent category");
                Vec::new()
            }
        }
    }

    // Records for a selector as it arrives over HTTP; unknown selects nothing
    pub fn select(&self, filter: CategoryFilter) -> Vec<RatingRecord> {
        match filter.scope() {
            Scope::All => self.get_stats(None),
            Scope::Category(category) => self.get_stats(Some(category)),
            Scope::Unknown => {
                warn!("Unknown respondent category requested");
                Vec::new()
            }
        }
    }

    pub fn summarize(&self, filter: CategoryFilter) -> StatsSummary {
        let records = self.select(filter);

        StatsSummary {
            tipo_usuario: filter,
            media_geral: overall_average(&records),
            total_respostas: records.iter().map(|r| r.sample_count).max().unwrap_or(0),
            perguntas: records.len(),
        }
    }
}

// Mean of the per-question averages, rounded half-up to one decimal
pub fn overall_average(records: &[RatingRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }

    let sum: f64 = records.iter().map(|r| r.average).sum();
    let mean = sum / records.len() as f64;
    Some((mean * 10.0 + ROUNDING_EPSILON).round() / 10.0)
}

fn in_catalog_order(mut records: Vec<RatingRecord>) -> Vec<RatingRecord> {
    records.sort_by_key(|r| QuestionId::ALL.iter().position(|q| *q == r.question));
    records
}

fn build_records(
    averages: &[f64; 10],
    count: u32,
    category: Option<RespondentCategory>,
) -> Vec<RatingRecord> {
    QuestionId::ALL
        .iter()
        .zip(averages)
        .map(|(question, average)| RatingRecord::new(*question, *average, count, category))
        .collect()
}

// Fixture averages, in catalog order
const ATLETA_AVERAGES: [f64; 10] = [4.5, 4.2, 4.7, 4.8, 4.1, 4.4, 4.3, 4.6, 4.7, 4.2];
const CLUBE_AVERAGES: [f64; 10] = [3.8, 3.5, 4.0, 4.2, 3.7, 3.9, 3.6, 3.8, 4.0, 3.7];
const ARBITRO_AVERAGES: [f64; 10] = [4.0, 3.8, 4.2, 4.3, 3.9, 4.1, 3.7, 4.0, 4.1, 3.8];
const TODOS_AVERAGES: [f64; 10] = [4.2, 3.8, 4.5, 4.7, 3.9, 4.3, 3.6, 4.1, 4.4, 3.7];

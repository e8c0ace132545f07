//! KAM performance ranking
//!
//! Every query pulls fresh rollups from the store and rebuilds the
//! projections; nothing is cached between calls. Rankings classify each KAM
//! against the unweighted mean conversion rate of the whole fleet:
//!
//! - top: rate strictly above the mean, highest first
//! - under: rate strictly below the mean, lowest first
//!
//! A KAM sitting exactly on the mean appears in neither list, so a fleet of
//! one never qualifies for either.

use std::cmp::Ordering;
use std::sync::Arc;

use kam_leads_core::{AggregationSource, Clock, Error, KamId, KamPerformance, Ranking, Result};

pub struct PerformanceEngine {
    source: Arc<dyn AggregationSource>,
    clock: Arc<dyn Clock>,
}

impl PerformanceEngine {
    pub fn new(source: Arc<dyn AggregationSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// One entry per KAM, including KAMs with no leads
    pub async fn performance_for_all(&self) -> Result<Vec<KamPerformance>> {
        let performances = self.collect().await?;
        if performances.is_empty() {
            return Err(Error::NoKamsFound);
        }
        Ok(performances)
    }

    pub async fn performance_for(&self, kam_id: KamId) -> Result<KamPerformance> {
        self.collect()
            .await?
            .into_iter()
            .find(|performance| performance.kam_id() == kam_id)
            .ok_or(Error::KamNotFound(kam_id))
    }

    pub async fn top_performing(&self, count: usize) -> Result<Vec<KamPerformance>> {
        self.ranked(Ranking::Top, count).await
    }

    pub async fn under_performing(&self, count: usize) -> Result<Vec<KamPerformance>> {
        self.ranked(Ranking::Under, count).await
    }

    async fn ranked(&self, ranking: Ranking, count: usize) -> Result<Vec<KamPerformance>> {
        if count == 0 {
            return Err(Error::validation("count must be at least 1"));
        }

        let performances = self.collect().await?;
        let ranked = rank(performances, ranking, count)?;

        tracing::debug!(%ranking, count, returned = ranked.len(), "Ranked KAMs");
        Ok(ranked)
    }

    /// All projections stamped with a single computation time
    async fn collect(&self) -> Result<Vec<KamPerformance>> {
        let rollups = self.source.kam_rollups().await?;
        let computed_at = self.clock.now();

        Ok(rollups
            .into_iter()
            .map(|rollup| KamPerformance::from_rollup(rollup, computed_at))
            .collect())
    }
}

/// Unweighted mean conversion rate, `None` for an empty fleet
pub fn mean_conversion_rate(performances: &[KamPerformance]) -> Option<f64> {
    if performances.is_empty() {
        return None;
    }
    let sum: f64 = performances.iter().map(|p| p.conversion_rate()).sum();
    Some(sum / performances.len() as f64)
}

/// Classify against the fleet mean, order, and keep the first `count`
///
/// The sort is stable: KAMs with equal rates keep the order the store
/// returned them in.
pub fn rank(
    performances: Vec<KamPerformance>,
    ranking: Ranking,
    count: usize,
) -> Result<Vec<KamPerformance>> {
    let mean = mean_conversion_rate(&performances).ok_or(Error::NoPerformanceData)?;

    let mut qualifying: Vec<KamPerformance> = performances
        .into_iter()
        .filter(|p| match ranking {
            Ranking::Top => p.conversion_rate() > mean,
            Ranking::Under => p.conversion_rate() < mean,
        })
        .collect();

    if qualifying.is_empty() {
        return Err(Error::NoQualifyingKams(ranking));
    }

    qualifying.sort_by(|a, b| compare(ranking, a, b));
    qualifying.truncate(count);
    Ok(qualifying)
}

fn compare(ranking: Ranking, a: &KamPerformance, b: &KamPerformance) -> Ordering {
    let ascending = a.conversion_rate().total_cmp(&b.conversion_rate());
    match ranking {
        Ranking::Top => ascending.reverse(),
        Ranking::Under => ascending,
    }
}

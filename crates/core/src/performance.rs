//! Per-KAM rollups and the derived performance projection
//!
//! `KamPerformance` is a read-time projection, rebuilt from a rollup on every
//! query. Its rate can only be produced by `from_rollup`, so it always agrees
//! with its counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::KamId;

/// Pre-aggregated per-KAM counts supplied by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KamRollup {
    pub kam_id: KamId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Leads currently assigned to the KAM
    pub total_leads: u32,
    /// Of those, leads in status `CONVERTED`
    pub converted_leads: u32,
}

/// Conversion performance of one KAM
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KamPerformance {
    kam_id: KamId,
    name: String,
    email: String,
    phone: String,
    total_leads: u32,
    converted_leads: u32,
    /// Percentage in `[0, 100]`
    conversion_rate: f64,
    computed_at: DateTime<Utc>,
}

impl KamPerformance {
    pub fn from_rollup(rollup: KamRollup, computed_at: DateTime<Utc>) -> Self {
        let conversion_rate = conversion_rate(rollup.converted_leads, rollup.total_leads);
        Self {
            kam_id: rollup.kam_id,
            name: rollup.name,
            email: rollup.email,
            phone: rollup.phone,
            total_leads: rollup.total_leads,
            converted_leads: rollup.converted_leads,
            conversion_rate,
            computed_at,
        }
    }

    pub fn kam_id(&self) -> KamId {
        self.kam_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn total_leads(&self) -> u32 {
        self.total_leads
    }

    pub fn converted_leads(&self) -> u32 {
        self.converted_leads
    }

    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }
}

/// `converted / total * 100`, or exactly `0.0` when there are no leads
pub fn conversion_rate(converted_leads: u32, total_leads: u32) -> f64 {
    if total_leads > 0 {
        f64::from(converted_leads) / f64::from(total_leads) * 100.0
    } else {
        0.0
    }
}

/// Which side of the fleet average a ranking selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Strictly above the mean, best first
    Top,
    /// Strictly below the mean, worst first
    Under,
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top-performing"),
            Self::Under => f.write_str("under-performing"),
        }
    }
}

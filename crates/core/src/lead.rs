//! Restaurant leads and their status

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ids::{KamId, LeadId};

/// Lead status
///
/// Any status may be overwritten with any other by an explicit update. The
/// only automatic transition is to `InProgress` when an interaction is
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    /// Initial status when a lead is created
    New,
    /// Deal under discussion
    InProgress,
    /// Needs more time to convert
    FollowUp,
    /// Became a customer
    Converted,
    /// Did not convert
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        Self::New,
        Self::InProgress,
        Self::FollowUp,
        Self::Converted,
        Self::Lost,
    ];

    /// Statuses that stay in the call queue
    pub const ACTIVE: [LeadStatus; 3] = [Self::New, Self::InProgress, Self::FollowUp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::FollowUp => "FOLLOW_UP",
            Self::Converted => "CONVERTED",
            Self::Lost => "LOST",
        }
    }

    /// Whether leads in this status still get scheduled calls
    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("Unknown lead status: {}", s)))
    }
}

/// A restaurant lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub address: String,
    pub status: LeadStatus,
    /// Owning KAM, unset until assigned
    pub kam_id: Option<KamId>,
    /// Days between scheduled calls, always positive
    pub call_frequency_days: u32,
    pub next_call_date: DateTime<Utc>,
    pub last_call_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Build a brand-new lead from a validated draft
    ///
    /// Status is always `New` and the first call is due one call interval
    /// after `now`. Fails validation when that date is out of range.
    pub fn new(
        name: &str,
        address: &str,
        call_frequency_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, Error> {
        Ok(Self {
            id: LeadId::new(),
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            status: LeadStatus::New,
            kam_id: None,
            call_frequency_days,
            next_call_date: schedule(now, call_frequency_days)?,
            last_call_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Record a call made at `at` and push the next call one interval out
    ///
    /// The lead is left untouched when the next call date is out of range.
    pub fn mark_called(&mut self, at: DateTime<Utc>) -> Result<(), Error> {
        self.next_call_date = schedule(at, self.call_frequency_days)?;
        self.last_call_date = Some(at);
        self.updated_at = at;
        Ok(())
    }
}

/// `reference + frequency days`, `None` past the representable range
pub fn next_call_after(
    reference: DateTime<Utc>,
    call_frequency_days: u32,
) -> Option<DateTime<Utc>> {
    reference.checked_add_signed(Duration::days(i64::from(call_frequency_days)))
}

fn schedule(reference: DateTime<Utc>, call_frequency_days: u32) -> Result<DateTime<Utc>, Error> {
    next_call_after(reference, call_frequency_days).ok_or_else(|| {
        Error::validation(format!(
            "call_frequency_days too large: {}",
            call_frequency_days
        ))
    })
}

/// Caller input for creating a lead
///
/// A caller-supplied status is accepted on the wire but never honoured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadDraft {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub call_frequency_days: Option<u32>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_wire_tokens() {
        let json = serde_json::to_string(&LeadStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let status: LeadStatus = serde_json::from_str("\"FOLLOW_UP\"").unwrap();
        assert_eq!(status, LeadStatus::FollowUp);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("CONVERTED".parse::<LeadStatus>().unwrap(), LeadStatus::Converted);
        assert_eq!("in_progress".parse::<LeadStatus>().unwrap(), LeadStatus::InProgress);
        assert!(matches!(
            "WON".parse::<LeadStatus>(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_active_statuses() {
        assert!(LeadStatus::New.is_active());
        assert!(LeadStatus::FollowUp.is_active());
        assert!(!LeadStatus::Converted.is_active());
        assert!(!LeadStatus::Lost.is_active());
    }

    #[test]
    fn test_new_lead_schedules_first_call() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let lead = Lead::new(" Spice Garden ", "12 MG Road", 7, t).unwrap();

        assert_eq!(lead.name, "Spice Garden");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.next_call_date, t + Duration::days(7));
        assert!(lead.last_call_date.is_none());
        assert!(lead.kam_id.is_none());
    }

    #[test]
    fn test_mark_called_reschedules() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut lead = Lead::new("Spice Garden", "12 MG Road", 7, t).unwrap();

        let call_at = t + Duration::days(7);
        lead.mark_called(call_at).unwrap();

        assert_eq!(lead.last_call_date, Some(call_at));
        assert_eq!(lead.next_call_date, t + Duration::days(14));
    }

    #[test]
    fn test_schedule_out_of_range() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert!(next_call_after(t, u32::MAX).is_none());
        assert!(matches!(
            Lead::new("Spice Garden", "", 100_000_000, t),
            Err(Error::Validation(_))
        ));

        let mut lead = Lead::new("Spice Garden", "", 7, t).unwrap();
        lead.call_frequency_days = u32::MAX;
        assert!(lead.mark_called(t).is_err());
        assert_eq!(lead.last_call_date, None);
        assert_eq!(lead.next_call_date, t + Duration::days(7));
    }
}

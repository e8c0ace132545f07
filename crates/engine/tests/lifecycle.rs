//! Lead lifecycle scenarios against the in-memory store

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use std::sync::Arc;

use kam_leads_core::{
    Error, FixedClock, InteractionDraft, InteractionId, InteractionType, LeadDraft, LeadId,
    LeadStatus, LeadStore,
};
use kam_leads_engine::LeadLifecycle;
use kam_leads_persistence::InMemoryStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn setup(offset: FixedOffset) -> (LeadLifecycle, Arc<InMemoryStore>, Arc<FixedClock>) {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::new(t0()));
    let lifecycle = LeadLifecycle::new(store.clone(), store.clone(), clock.clone(), offset);
    (lifecycle, store, clock)
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn draft(name: &str, days: u32) -> LeadDraft {
    LeadDraft {
        name: name.to_string(),
        address: "14 Residency Road".to_string(),
        call_frequency_days: Some(days),
        status: None,
    }
}

#[tokio::test]
async fn test_call_reschedules_from_call_time() {
    let (lifecycle, _, clock) = setup(utc());

    let lead = lifecycle.create_lead(draft("Spice Garden", 7)).await.unwrap();
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.next_call_date, t0() + Duration::days(7));

    clock.advance(Duration::days(7));
    let interaction = lifecycle
        .record_interaction(lead.id, InteractionDraft::new(InteractionType::Call))
        .await
        .unwrap();
    assert_eq!(interaction.occurred_at, t0() + Duration::days(7));

    let lead = lifecycle.lead(lead.id).await.unwrap();
    assert_eq!(lead.status, LeadStatus::InProgress);
    assert_eq!(lead.last_call_date, Some(t0() + Duration::days(7)));
    assert_eq!(lead.next_call_date, t0() + Duration::days(14));
}

#[tokio::test]
async fn test_non_call_keeps_schedule() {
    let (lifecycle, _, clock) = setup(utc());
    let lead = lifecycle.create_lead(draft("Dosa Hut", 3)).await.unwrap();

    for kind in [
        InteractionType::Email,
        InteractionType::Meeting,
        InteractionType::Visit,
    ] {
        clock.advance(Duration::hours(5));
        lifecycle
            .record_interaction(lead.id, InteractionDraft::new(kind).with_notes("menu review"))
            .await
            .unwrap();

        let current = lifecycle.lead(lead.id).await.unwrap();
        assert_eq!(current.status, LeadStatus::InProgress);
        assert_eq!(current.next_call_date, lead.next_call_date);
        assert!(current.last_call_date.is_none());
    }

    let history = lifecycle.interactions_for(lead.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].interaction_type, InteractionType::Email);
    assert_eq!(history[2].notes.as_deref(), Some("menu review"));
}

#[tokio::test]
async fn test_any_interaction_reopens_closed_leads() {
    let (lifecycle, _, _) = setup(utc());

    for closed in [LeadStatus::Converted, LeadStatus::Lost] {
        let lead = lifecycle.create_lead(draft("Tandoor House", 5)).await.unwrap();
        lifecycle.set_status(lead.id, closed).await.unwrap();

        lifecycle
            .record_interaction(lead.id, InteractionDraft::new(InteractionType::Email))
            .await
            .unwrap();

        assert_eq!(
            lifecycle.lead(lead.id).await.unwrap().status,
            LeadStatus::InProgress
        );
    }
}

#[tokio::test]
async fn test_caller_time_is_discarded() {
    let (lifecycle, _, _) = setup(utc());
    let lead = lifecycle.create_lead(draft("Chai Point", 2)).await.unwrap();

    let mut interaction_draft = InteractionDraft::new(InteractionType::Call);
    interaction_draft.occurred_at = Some(t0() - Duration::days(30));

    let interaction = lifecycle
        .record_interaction(lead.id, interaction_draft)
        .await
        .unwrap();
    assert_eq!(interaction.occurred_at, t0());
    assert_eq!(lifecycle.interaction(interaction.id).await.unwrap(), interaction);
}

#[tokio::test]
async fn test_create_lead_validation() {
    let (lifecycle, store, _) = setup(utc());

    let mut missing = draft("Biryani Bowl", 7);
    missing.call_frequency_days = None;
    assert!(matches!(
        lifecycle.create_lead(missing).await,
        Err(Error::Validation(_))
    ));

    assert!(matches!(
        lifecycle.create_lead(draft("Biryani Bowl", 0)).await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        lifecycle.create_lead(draft("  ", 7)).await,
        Err(Error::Validation(_))
    ));

    let mut with_status = draft("Biryani Bowl", 7);
    with_status.status = Some(LeadStatus::Converted);
    let lead = lifecycle.create_lead(with_status).await.unwrap();
    assert_eq!(lead.status, LeadStatus::New);

    assert_eq!(store.list_leads().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_out_of_range_frequency_is_rejected() {
    let (lifecycle, store, _) = setup(utc());

    for days in [100_000_000, u32::MAX] {
        assert!(matches!(
            lifecycle.create_lead(draft("Far Future Cafe", days)).await,
            Err(Error::Validation(_))
        ));
    }
    assert!(store.list_leads().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_call_past_date_range_leaves_lead_unchanged() {
    let (lifecycle, store, _) = setup(utc());
    let mut lead = kam_leads_core::Lead::new("Edge Bistro", "", 1, t0()).unwrap();
    lead.call_frequency_days = u32::MAX;
    store.save_lead(&lead).await.unwrap();

    assert!(matches!(
        lifecycle
            .record_interaction(lead.id, InteractionDraft::new(InteractionType::Call))
            .await,
        Err(Error::Validation(_))
    ));
    assert_eq!(lifecycle.lead(lead.id).await.unwrap(), lead);
    assert!(lifecycle.interactions_for(lead.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_overwrite_is_unguarded() {
    let (lifecycle, _, clock) = setup(utc());
    let lead = lifecycle.create_lead(draft("Idli Corner", 4)).await.unwrap();

    clock.advance(Duration::hours(1));
    for status in [
        LeadStatus::Converted,
        LeadStatus::New,
        LeadStatus::Lost,
        LeadStatus::FollowUp,
    ] {
        let updated = lifecycle.set_status(lead.id, status).await.unwrap();
        assert_eq!(updated.status, status);
        assert_eq!(updated.next_call_date, lead.next_call_date);
        assert_eq!(updated.last_call_date, None);
    }
}

#[tokio::test]
async fn test_missing_ids() {
    let (lifecycle, _, _) = setup(utc());
    let missing = LeadId::new();

    assert_eq!(
        lifecycle.set_status(missing, LeadStatus::Lost).await,
        Err(Error::LeadNotFound(missing))
    );
    assert_eq!(
        lifecycle
            .record_interaction(missing, InteractionDraft::new(InteractionType::Call))
            .await,
        Err(Error::LeadNotFound(missing))
    );
    assert_eq!(
        lifecycle.interactions_for(missing).await,
        Err(Error::LeadNotFound(missing))
    );

    let missing_interaction = InteractionId::new();
    assert_eq!(
        lifecycle.interaction(missing_interaction).await,
        Err(Error::InteractionNotFound(missing_interaction))
    );
}

#[tokio::test]
async fn test_due_today_window_and_statuses() {
    let (lifecycle, store, _) = setup(utc());
    let day_start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let seed = |name: &str, next_call: DateTime<Utc>, status: LeadStatus| {
        let mut lead = kam_leads_core::Lead::new(name, "", 1, t0()).unwrap();
        lead.next_call_date = next_call;
        lead.status = status;
        lead
    };

    let due = [
        seed("first second", day_start, LeadStatus::New),
        seed("last second", day_start + Duration::seconds(86_399), LeadStatus::FollowUp),
        seed("midday", day_start + Duration::hours(12), LeadStatus::InProgress),
    ];
    let not_due = [
        seed("yesterday", day_start - Duration::seconds(1), LeadStatus::New),
        seed("tomorrow", day_start + Duration::days(1), LeadStatus::New),
        seed("converted", day_start + Duration::hours(9), LeadStatus::Converted),
        seed("lost", day_start + Duration::hours(9), LeadStatus::Lost),
    ];
    for lead in due.iter().chain(not_due.iter()) {
        store.save_lead(lead).await.unwrap();
    }

    let today = lifecycle.due_today().await.unwrap();
    let mut names: Vec<&str> = today.iter().map(|lead| lead.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["first second", "last second", "midday"]);
}

#[tokio::test]
async fn test_due_today_uses_local_day() {
    // 10:00 UTC is 19:00 in UTC+9; the local day began at 15:00 UTC yesterday
    let (lifecycle, store, _) = setup(FixedOffset::east_opt(9 * 3600).unwrap());

    let mut early =
        kam_leads_core::Lead::new("just after local midnight", "", 1, t0()).unwrap();
    early.next_call_date = Utc.with_ymd_and_hms(2024, 2, 29, 16, 0, 0).unwrap();
    let mut late = kam_leads_core::Lead::new("next local day", "", 1, t0()).unwrap();
    late.next_call_date = Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap();
    store.save_lead(&early).await.unwrap();
    store.save_lead(&late).await.unwrap();

    let today = lifecycle.due_today().await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].id, early.id);
}

#[tokio::test]
async fn test_empty_queue_is_ok() {
    let (lifecycle, _, _) = setup(utc());
    lifecycle.create_lead(draft("Next week", 7)).await.unwrap();
    assert!(lifecycle.due_today().await.unwrap().is_empty());
}

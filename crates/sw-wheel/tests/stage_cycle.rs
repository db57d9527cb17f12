//! Round lifecycle tests with real (paused) timers
//!
//! These run under tokio's paused clock so the full 4.5 s presentation delay
//! elapses instantly while still exercising the in-flight window.

use std::sync::Arc;
use std::time::Duration;

use sw_wheel::{
    CategoryMap, FixedDegrees, MemorySink, RngDegrees, SpinStage, StageMachine, TimingConfig,
    WheelConfig, WheelError, WheelEvent,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn catalog() -> CategoryMap {
    let mut map = CategoryMap::new();
    map.insert(
        "Food",
        vec!["Sushi".into(), "Noodles".into(), "Salad".into()],
    );
    map.insert("Exercise", vec!["Yoga".into(), "Running".into()]);
    map.insert("Study", vec!["Math".into()]);
    map.insert(
        "Relax",
        vec!["Nap".into(), "Walk".into(), "Movie".into(), "Music".into()],
    );
    map
}

fn normal_machine(degrees: &[u32]) -> (StageMachine, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let machine = StageMachine::builder(catalog().into_shared())
        .sink(sink.clone())
        .degrees(FixedDegrees::new(degrees.iter().copied()))
        .config(WheelConfig::default())
        .build();
    (machine, sink)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SINGLE OUTSTANDING SPIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn second_spin_while_spinning_is_rejected() {
    let (machine, _) = normal_machine(&[45, 200]);

    let handle = machine.spin().unwrap();
    let rotation = machine.accumulated_rotation();
    assert_eq!(rotation, 1800 + 45);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(machine.is_spinning());
    assert_eq!(machine.spin().err(), Some(WheelError::SpinInProgress));
    assert_eq!(machine.accumulated_rotation(), rotation);
    assert_eq!(machine.stage(), SpinStage::AwaitingCategorySpin);

    let outcome = handle.settled().await.unwrap().unwrap();
    // 360 - 45 = 315 on a 90 deg wheel -> segment 3
    assert_eq!(outcome.winner, "Relax");
    assert_eq!(machine.stage(), SpinStage::CategoryRevealed);
}

#[tokio::test(start_paused = true)]
async fn reveal_waits_for_spin_and_pause() {
    let (machine, _) = normal_machine(&[0]);
    let handle = machine.spin().unwrap();

    // Wheel has stopped but the reveal pause is still running
    tokio::time::sleep(Duration::from_millis(4200)).await;
    assert_eq!(machine.stage(), SpinStage::AwaitingCategorySpin);
    assert!(machine.selected_category().is_none());

    handle.settled().await.unwrap();
    assert_eq!(machine.selected_category().as_deref(), Some("Food"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// FULL CYCLE
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn full_cycle_emits_one_result() {
    let (machine, sink) = normal_machine(&[91, 300]);

    let first = machine.spin().unwrap().settled().await.unwrap().unwrap();
    // 269 / 90 -> segment 2
    assert_eq!(first.winner, "Study");
    machine.advance().unwrap();
    assert_eq!(machine.accumulated_rotation(), 0);

    let second = machine.spin().unwrap().settled().await.unwrap().unwrap();
    assert_eq!(second.winner, "Math");
    assert_eq!(second.item.as_deref(), Some("Math"));

    let snap = machine.snapshot();
    assert_eq!(snap.stage, SpinStage::ResultRevealed);
    assert_eq!(snap.selected_category.as_deref(), Some("Study"));
    assert_eq!(snap.selected_item.as_deref(), Some("Math"));
    assert_eq!(
        sink.results(),
        vec![("Study".to_string(), "Math".to_string())]
    );

    // Terminal until reset
    assert!(matches!(
        machine.spin(),
        Err(WheelError::InvalidTransition { .. })
    ));
    assert!(machine.advance().is_err());
    assert_eq!(sink.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn random_rounds_pick_from_catalog() {
    let sink = Arc::new(MemorySink::new());
    let machine = StageMachine::builder(catalog().into_shared())
        .sink(sink.clone())
        .degrees(RngDegrees::seeded(2024))
        .config(WheelConfig {
            timing: TimingConfig::turbo(),
            ..WheelConfig::default()
        })
        .build();

    let map = catalog();
    for _ in 0..25 {
        let (category, item) = machine.play_round().await.unwrap();
        let items = map.items(&category).expect("category from catalog");
        assert!(items.contains(&item));
        machine.reset();
    }
    assert_eq!(sink.len(), 25);
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESET AND SNAPSHOTS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn reset_during_spin_discards_completion() {
    let (machine, sink) = normal_machine(&[0, 0, 0]);
    let mut events = machine.subscribe();

    machine.spin().unwrap().settled().await.unwrap();
    machine.advance().unwrap();
    let pending = machine.spin().unwrap();

    tokio::time::sleep(Duration::from_millis(2000)).await;
    machine.reset();
    assert!(!machine.is_spinning());

    assert_eq!(pending.settled().await.unwrap(), None);
    assert_eq!(machine.stage(), SpinStage::AwaitingCategorySpin);
    assert!(machine.selected_category().is_none());
    assert!(machine.selected_item().is_none());
    assert_eq!(machine.accumulated_rotation(), 0);
    assert!(sink.is_empty());

    let mut saw_discard = false;
    while let Ok(event) = events.try_recv() {
        if let WheelEvent::SpinDiscarded { stale_generation } = event.event {
            assert_eq!(stale_generation, 0);
            assert_eq!(event.generation, 1);
            saw_discard = true;
        }
    }
    assert!(saw_discard);

    // A fresh round still works after the discarded spin
    machine.play_round().await.unwrap();
    assert_eq!(sink.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn catalog_edits_during_spin_do_not_change_winner() {
    let (machine, _) = normal_machine(&[91]);
    let handle = machine.spin().unwrap();
    assert_eq!(handle.plan().candidates.len(), 4);

    {
        let mut map = machine.categories().write();
        map.remove_category("Study").unwrap();
        map.add_category("Chores").unwrap();
        map.add_category("Garden").unwrap();
    }

    let outcome = handle.settled().await.unwrap().unwrap();
    assert_eq!(outcome.winner, "Study");
    assert_eq!(machine.selected_category().as_deref(), Some("Study"));

    // The next wheel reads the edited catalog: Study is gone
    machine.advance().unwrap();
    assert!(machine.active_candidates().is_empty());
    assert_eq!(
        machine.spin().err(),
        Some(WheelError::EmptyCandidateList {
            stage: SpinStage::AwaitingItemSpin
        })
    );
}

#[tokio::test(start_paused = true)]
async fn dropped_handle_still_settles() {
    let (machine, _) = normal_machine(&[0]);
    drop(machine.spin().unwrap());

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(machine.stage(), SpinStage::CategoryRevealed);
    assert!(!machine.is_spinning());
}

//! StageMachine: two-stage spin round
//!
//! The machine owns the round state. `spin()` commits the target rotation
//! immediately and hands the reveal to a tokio task that waits out the
//! presentation delay, so the wheel can animate towards a rotation that is
//! already decided. Only one spin is in flight at a time.
//!
//! `reset()` bumps the round generation. A spin that settles after a reset
//! carries the old generation and is dropped without touching state.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use sw_stage::{SpinStage, StageEvent, WheelEvent, WheelKind};

use crate::catalog::{CategoryMap, SharedCategories};
use crate::config::WheelConfig;
use crate::error::{WheelError, WheelResult};
use crate::resolve::{DegreeSource, RngDegrees, resolve_winner, target_rotation};
use crate::sink::{LogSink, ResultSink};

const EVENT_CAPACITY: usize = 64;

/// Read-only view of the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSnapshot {
    pub stage: SpinStage,
    pub accumulated_rotation: u64,
    pub selected_category: Option<String>,
    pub selected_item: Option<String>,
    pub spinning: bool,
    pub generation: u64,
}

/// Everything decided when a spin starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinPlan {
    /// Round generation the spin belongs to
    pub generation: u64,
    /// Stage the spin was started from
    pub from: SpinStage,
    pub wheel: WheelKind,
    /// Random offset in [0, 360)
    pub degree: u32,
    /// Rotation the wheel comes to rest at
    pub target_rotation: u64,
    /// Candidate list snapshot, in segment order
    pub candidates: Vec<String>,
}

/// How a spin settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub wheel: WheelKind,
    pub index: usize,
    pub winner: String,
    /// Stage after the reveal
    pub stage: SpinStage,
    pub rotation: u64,
    pub category: String,
    pub item: Option<String>,
}

/// Handle to an in-flight spin
///
/// Dropping the handle does not cancel the spin; it still settles.
pub struct SpinHandle {
    plan: SpinPlan,
    task: JoinHandle<Option<SpinOutcome>>,
}

impl SpinHandle {
    pub fn plan(&self) -> &SpinPlan {
        &self.plan
    }

    pub fn target_rotation(&self) -> u64 {
        self.plan.target_rotation
    }

    /// Wait for the reveal
    ///
    /// `Ok(None)` means the round was reset before the spin settled.
    pub async fn settled(self) -> WheelResult<Option<SpinOutcome>> {
        self.task
            .await
            .map_err(|e| WheelError::SpinTask(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct RoundState {
    stage: SpinStage,
    rotation: u64,
    category: Option<String>,
    item: Option<String>,
    spinning: bool,
    generation: u64,
}

struct Inner {
    round: Mutex<RoundState>,
    categories: SharedCategories,
    degrees: Mutex<Box<dyn DegreeSource>>,
    sink: Arc<dyn ResultSink>,
    config: WheelConfig,
    events: broadcast::Sender<StageEvent>,
    created: Instant,
}

impl Inner {
    fn emit(&self, event: WheelEvent, stage: SpinStage, generation: u64) {
        let elapsed = self.created.elapsed().as_secs_f64() * 1000.0;
        // No subscribers is fine
        let _ = self
            .events
            .send(StageEvent::new(event, stage, generation, elapsed));
    }

    fn candidates(&self, round: &RoundState) -> Vec<String> {
        let map = self.categories.read();
        match round.stage.wheel() {
            Some(WheelKind::Category) => map.names(),
            Some(WheelKind::Item) => round
                .category
                .as_deref()
                .and_then(|c| map.items(c))
                .map(|items| items.to_vec())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn settle(&self, plan: SpinPlan) -> Option<SpinOutcome> {
        let outcome = {
            let mut round = self.round.lock();
            if round.generation != plan.generation || round.stage != plan.from {
                let (stage, generation) = (round.stage, round.generation);
                drop(round);
                log::debug!(
                    "[Wheel] Discarding spin from generation {}",
                    plan.generation
                );
                self.emit(
                    WheelEvent::SpinDiscarded {
                        stale_generation: plan.generation,
                    },
                    stage,
                    generation,
                );
                return None;
            }

            round.spinning = false;
            let Some((index, winner)) = resolve_winner(plan.target_rotation, &plan.candidates)
            else {
                log::error!("[Wheel] Spin settled with no candidates");
                return None;
            };
            let winner = winner.clone();

            let next = plan.from.after_spin()?;
            match plan.wheel {
                WheelKind::Category => round.category = Some(winner.clone()),
                WheelKind::Item => round.item = Some(winner.clone()),
            }
            round.stage = next;

            SpinOutcome {
                wheel: plan.wheel,
                index,
                winner,
                stage: next,
                rotation: plan.target_rotation,
                category: round.category.clone().unwrap_or_default(),
                item: round.item.clone(),
            }
        };

        match outcome.wheel {
            WheelKind::Category => {
                log::debug!(
                    "[Wheel] Category revealed: {} (segment {})",
                    outcome.winner,
                    outcome.index
                );
                self.emit(
                    WheelEvent::CategoryRevealed {
                        category: outcome.winner.clone(),
                        index: outcome.index,
                    },
                    outcome.stage,
                    plan.generation,
                );
            }
            WheelKind::Item => {
                log::info!(
                    "[Wheel] Result: {} / {}",
                    outcome.category,
                    outcome.winner
                );
                if let Err(e) = self.sink.result_ready(&outcome.category, &outcome.winner) {
                    log::error!("[Wheel] Result sink failed: {}", e);
                }
                self.emit(
                    WheelEvent::ResultReady {
                        category: outcome.category.clone(),
                        item: outcome.winner.clone(),
                        index: outcome.index,
                    },
                    outcome.stage,
                    plan.generation,
                );
            }
        }

        Some(outcome)
    }
}

/// Two-stage spin state machine
///
/// Cheap to clone; clones share the same round.
#[derive(Clone)]
pub struct StageMachine {
    inner: Arc<Inner>,
}

impl StageMachine {
    /// Start building a machine over a shared catalog
    pub fn builder(categories: SharedCategories) -> StageMachineBuilder {
        StageMachineBuilder {
            categories,
            sink: None,
            degrees: None,
            config: WheelConfig::default(),
        }
    }

    /// Machine with default config, entropy RNG and a logging sink
    pub fn new(categories: SharedCategories) -> Self {
        Self::builder(categories).build()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OBSERVABLE STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn stage(&self) -> SpinStage {
        self.inner.round.lock().stage
    }

    pub fn selected_category(&self) -> Option<String> {
        self.inner.round.lock().category.clone()
    }

    pub fn selected_item(&self) -> Option<String> {
        self.inner.round.lock().item.clone()
    }

    /// Visual wheel orientation in degrees
    pub fn accumulated_rotation(&self) -> u64 {
        self.inner.round.lock().rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.inner.round.lock().spinning
    }

    pub fn generation(&self) -> u64 {
        self.inner.round.lock().generation
    }

    pub fn snapshot(&self) -> SpinSnapshot {
        let round = self.inner.round.lock();
        SpinSnapshot {
            stage: round.stage,
            accumulated_rotation: round.rotation,
            selected_category: round.category.clone(),
            selected_item: round.item.clone(),
            spinning: round.spinning,
            generation: round.generation,
        }
    }

    /// Segments of the wheel currently on screen
    pub fn active_candidates(&self) -> Vec<String> {
        let round = self.inner.round.lock();
        self.inner.candidates(&round)
    }

    pub fn categories(&self) -> &SharedCategories {
        &self.inner.categories
    }

    pub fn config(&self) -> &WheelConfig {
        &self.inner.config
    }

    /// Subscribe to stage events
    pub fn subscribe(&self) -> broadcast::Receiver<StageEvent> {
        self.inner.events.subscribe()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COMMANDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin the wheel of the current stage
    ///
    /// Must be called from within a tokio runtime.
    pub fn spin(&self) -> WheelResult<SpinHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| WheelError::SpinTask(e.to_string()))?;

        let plan = {
            let mut round = self.inner.round.lock();
            if round.spinning {
                return Err(WheelError::SpinInProgress);
            }
            let wheel = round.stage.wheel().ok_or(WheelError::InvalidTransition {
                operation: "spin",
                stage: round.stage,
            })?;
            let candidates = self.inner.candidates(&round);
            if candidates.is_empty() {
                return Err(WheelError::EmptyCandidateList { stage: round.stage });
            }

            let degree = self.inner.degrees.lock().next_degree();
            let target = target_rotation(round.rotation, self.inner.config.full_turns(), degree);
            round.rotation = target;
            round.spinning = true;

            SpinPlan {
                generation: round.generation,
                from: round.stage,
                wheel,
                degree,
                target_rotation: target,
                candidates,
            }
        };

        log::debug!(
            "[Wheel] Spin {:?}: {} segments, +{} deg -> {}",
            plan.wheel,
            plan.candidates.len(),
            plan.degree,
            plan.target_rotation
        );
        self.inner.emit(
            WheelEvent::SpinStarted {
                wheel: plan.wheel,
                degree: plan.degree,
                target_rotation: plan.target_rotation,
                segments: plan.candidates.len(),
            },
            plan.from,
            plan.generation,
        );

        let inner = Arc::clone(&self.inner);
        let task_plan = plan.clone();
        let task = runtime.spawn(async move {
            let timing = inner.config.timing.clone();
            if !timing.spin_duration().is_zero() {
                tokio::time::sleep(timing.spin_duration()).await;
            }
            if !timing.reveal_delay().is_zero() {
                tokio::time::sleep(timing.reveal_delay()).await;
            }
            inner.settle(task_plan)
        });

        Ok(SpinHandle { plan, task })
    }

    /// Leave the category reveal for the item wheel
    pub fn advance(&self) -> WheelResult<()> {
        let (category, generation) = {
            let mut round = self.inner.round.lock();
            if round.stage != SpinStage::CategoryRevealed {
                return Err(WheelError::InvalidTransition {
                    operation: "advance",
                    stage: round.stage,
                });
            }
            round.rotation = 0;
            round.stage = SpinStage::AwaitingItemSpin;
            (round.category.clone().unwrap_or_default(), round.generation)
        };

        self.inner.emit(
            WheelEvent::Advanced { category },
            SpinStage::AwaitingItemSpin,
            generation,
        );
        Ok(())
    }

    /// Start a fresh round; any in-flight spin is discarded
    pub fn reset(&self) {
        let (generation, was_spinning) = {
            let mut round = self.inner.round.lock();
            let was_spinning = round.spinning;
            round.generation += 1;
            round.stage = SpinStage::AwaitingCategorySpin;
            round.rotation = 0;
            round.category = None;
            round.item = None;
            round.spinning = false;
            (round.generation, was_spinning)
        };

        if was_spinning {
            log::debug!("[Wheel] Reset with a spin in flight");
        }
        self.inner.emit(
            WheelEvent::Reset,
            SpinStage::AwaitingCategorySpin,
            generation,
        );
    }

    /// Play a whole round from the category wheel to the final result
    ///
    /// Returns `(category, item)`.
    pub async fn play_round(&self) -> WheelResult<(String, String)> {
        if self.stage() != SpinStage::AwaitingCategorySpin {
            return Err(WheelError::InvalidTransition {
                operation: "play a round",
                stage: self.stage(),
            });
        }

        let first = self.spin()?.settled().await?.ok_or_else(discarded)?;
        self.advance()?;
        let second = self.spin()?.settled().await?.ok_or_else(discarded)?;

        Ok((first.winner, second.winner))
    }
}

fn discarded() -> WheelError {
    WheelError::SpinTask("spin discarded by reset".to_string())
}

/// Builder for [`StageMachine`]
pub struct StageMachineBuilder {
    categories: SharedCategories,
    sink: Option<Arc<dyn ResultSink>>,
    degrees: Option<Box<dyn DegreeSource>>,
    config: WheelConfig,
}

impl StageMachineBuilder {
    pub fn sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn degrees(mut self, degrees: impl DegreeSource + 'static) -> Self {
        self.degrees = Some(Box::new(degrees));
        self
    }

    pub fn config(mut self, config: WheelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> StageMachine {
        let degrees = self
            .degrees
            .unwrap_or_else(|| Box::new(RngDegrees::from_seed_option(self.config.seed)));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        StageMachine {
            inner: Arc::new(Inner {
                round: Mutex::new(RoundState::default()),
                categories: self.categories,
                degrees: Mutex::new(degrees),
                sink: self.sink.unwrap_or_else(|| Arc::new(LogSink)),
                config: self.config,
                events,
                created: Instant::now(),
            }),
        }
    }
}

/// Machine over an owned catalog, for quick setups
impl From<CategoryMap> for StageMachine {
    fn from(map: CategoryMap) -> Self {
        Self::new(map.into_shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::FixedDegrees;
    use crate::sink::MemorySink;

    fn abcd() -> CategoryMap {
        let mut map = CategoryMap::new();
        for name in ["A", "B", "C", "D"] {
            map.insert(name, vec![format!("{}1", name), format!("{}2", name)]);
        }
        map
    }

    fn machine(map: CategoryMap, degrees: &[u32]) -> (StageMachine, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let machine = StageMachine::builder(map.into_shared())
            .sink(sink.clone())
            .degrees(FixedDegrees::new(degrees.iter().copied()))
            .config(WheelConfig::instant())
            .build();
        (machine, sink)
    }

    fn assert_selection_matches_stage(m: &StageMachine) {
        let snap = m.snapshot();
        assert_eq!(snap.selected_category.is_some(), snap.stage.has_category());
        assert_eq!(snap.selected_item.is_some(), snap.stage.has_item());
        if snap.stage.is_terminal() {
            assert!(!snap.stage.accepts_spin());
            assert!(m.active_candidates().is_empty());
        }
    }

    #[tokio::test]
    async fn test_selection_tracks_every_stage() {
        let (m, _) = machine(abcd(), &[0, 91]);
        let mut seen = vec![m.stage()];
        assert_selection_matches_stage(&m);

        m.spin().unwrap().settled().await.unwrap();
        seen.push(m.stage());
        assert_selection_matches_stage(&m);

        m.advance().unwrap();
        seen.push(m.stage());
        assert_selection_matches_stage(&m);

        m.spin().unwrap().settled().await.unwrap();
        seen.push(m.stage());
        assert_selection_matches_stage(&m);
        assert!(m.stage().is_terminal());

        m.reset();
        assert_selection_matches_stage(&m);
        assert!(!m.stage().is_terminal());
        assert_eq!(seen, SpinStage::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_initial_state() {
        let (m, _) = machine(abcd(), &[0]);
        let snap = m.snapshot();
        assert_eq!(snap.stage, SpinStage::AwaitingCategorySpin);
        assert_eq!(snap.accumulated_rotation, 0);
        assert!(snap.selected_category.is_none());
        assert!(snap.selected_item.is_none());
        assert!(!snap.spinning);
        assert_eq!(m.active_candidates(), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_category_spin_uses_angle_rule() {
        let (m, _) = machine(abcd(), &[91]);
        let handle = m.spin().unwrap();
        assert_eq!(handle.target_rotation(), 1800 + 91);
        assert_eq!(m.accumulated_rotation(), 1891);
        assert!(m.is_spinning());

        let outcome = handle.settled().await.unwrap().unwrap();
        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.winner, "C");
        assert_eq!(m.stage(), SpinStage::CategoryRevealed);
        assert_eq!(m.selected_category().as_deref(), Some("C"));
        assert!(!m.is_spinning());
    }

    #[tokio::test]
    async fn test_rotation_accumulates_until_advance() {
        let (m, _) = machine(abcd(), &[10]);
        m.spin().unwrap().settled().await.unwrap();
        assert_eq!(m.accumulated_rotation(), 1810);
        assert_eq!(m.active_candidates(), Vec::<String>::new());

        m.advance().unwrap();
        assert_eq!(m.accumulated_rotation(), 0);
        assert_eq!(m.stage(), SpinStage::AwaitingItemSpin);
        // 350 deg reflected lands in segment 3
        assert_eq!(m.active_candidates(), vec!["D1", "D2"]);
    }

    #[tokio::test]
    async fn test_spin_rejected_in_reveal_stages() {
        let (m, _) = machine(abcd(), &[0]);
        m.spin().unwrap().settled().await.unwrap();
        let before = m.snapshot();
        assert_eq!(
            m.spin().err(),
            Some(WheelError::InvalidTransition {
                operation: "spin",
                stage: SpinStage::CategoryRevealed
            })
        );
        assert_eq!(m.snapshot(), before);
    }

    #[tokio::test]
    async fn test_advance_only_from_category_reveal() {
        let (m, _) = machine(abcd(), &[0]);
        assert!(matches!(
            m.advance(),
            Err(WheelError::InvalidTransition {
                operation: "advance",
                ..
            })
        ));
        assert_eq!(m.stage(), SpinStage::AwaitingCategorySpin);
    }

    #[tokio::test]
    async fn test_empty_category_list_rejected() {
        let (m, _) = machine(CategoryMap::new(), &[0]);
        assert_eq!(
            m.spin().err(),
            Some(WheelError::EmptyCandidateList {
                stage: SpinStage::AwaitingCategorySpin
            })
        );
        assert_eq!(m.accumulated_rotation(), 0);
        assert!(!m.is_spinning());
    }

    #[tokio::test]
    async fn test_empty_item_list_rejected() {
        let mut map = CategoryMap::new();
        map.add_category("Empty").unwrap();
        let (m, sink) = machine(map, &[0]);

        m.spin().unwrap().settled().await.unwrap();
        m.advance().unwrap();
        let err = m.spin().err();
        assert_eq!(
            err,
            Some(WheelError::EmptyCandidateList {
                stage: SpinStage::AwaitingItemSpin
            })
        );
        assert_eq!(m.accumulated_rotation(), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_single_segment_wheel() {
        let mut map = CategoryMap::new();
        map.insert("Only", vec!["One".to_string()]);
        let (m, sink) = machine(map, &[0, 123]);

        let (category, item) = m.play_round().await.unwrap();
        assert_eq!((category.as_str(), item.as_str()), ("Only", "One"));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_round() {
        let (m, sink) = machine(abcd(), &[0, 0]);
        m.play_round().await.unwrap();
        assert_eq!(m.stage(), SpinStage::ResultRevealed);

        m.reset();
        let snap = m.snapshot();
        assert_eq!(snap.stage, SpinStage::AwaitingCategorySpin);
        assert_eq!(snap.accumulated_rotation, 0);
        assert!(snap.selected_category.is_none());
        assert!(snap.selected_item.is_none());
        assert_eq!(snap.generation, 1);
        // History belongs to the sink and survives
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_events_follow_round() {
        let (m, _) = machine(abcd(), &[0, 0]);
        let mut rx = m.subscribe();
        m.play_round().await.unwrap();

        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            names.push(event.type_name());
        }
        assert_eq!(
            names,
            vec![
                "spin_started",
                "category_revealed",
                "advanced",
                "spin_started",
                "result_ready"
            ]
        );
    }

    #[test]
    fn test_spin_outside_runtime_is_rejected() {
        let (m, _) = machine(abcd(), &[0]);
        assert!(matches!(m.spin(), Err(WheelError::SpinTask(_))));
        assert!(!m.is_spinning());
    }
}

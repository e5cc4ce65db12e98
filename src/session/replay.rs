use super::event::ReplayEvent;
use crate::draft::Action;
use crate::draft::Side;
use crate::draft::State;
use crate::engine::DraftService;
use crate::engine::Recommendations;
use crate::reranker::Candidate;
use crate::reranker::DraftContext;
use crate::reranker::Reranker;
use crate::reranker::RerankerResult;
use crate::session::DraftMode;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    Playing,
    Paused,
    Complete,
    Stopped,
}

impl ReplayStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Complete => "complete",
            Self::Stopped => "stopped",
        }
    }
}

impl From<u8> for ReplayStatus {
    fn from(n: u8) -> Self {
        match n {
            0 => Self::Playing,
            1 => Self::Paused,
            2 => Self::Complete,
            _ => Self::Stopped,
        }
    }
}

/// control surface the driver keeps while the replay task runs.
/// the event receiver is taken exactly once by the streaming connection.
pub struct ReplayHandle {
    pub id: String,
    pub total_actions: usize,
    pub speed: f64,
    status: Arc<AtomicU8>,
    index: Arc<AtomicUsize>,
    events: std::sync::Mutex<Option<UnboundedReceiver<ReplayEvent>>>,
}

impl ReplayHandle {
    pub fn status(&self) -> ReplayStatus {
        ReplayStatus::from(self.status.load(Ordering::Acquire))
    }
    pub fn index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }
    pub fn pause(&self) {
        let _ = self.status.compare_exchange(
            ReplayStatus::Playing as u8,
            ReplayStatus::Paused as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
    pub fn resume(&self) {
        let _ = self.status.compare_exchange(
            ReplayStatus::Paused as u8,
            ReplayStatus::Playing as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
    pub fn stop(&self) {
        self.status
            .store(ReplayStatus::Stopped as u8, Ordering::Release);
    }
    pub fn take_events(&self) -> Option<UnboundedReceiver<ReplayEvent>> {
        self.events.lock().expect("events lock").take()
    }
}

/// steps a recorded draft forward on a timer, pairing every action with
/// the recommendations computed before it happened and pre-computing the
/// next batch while the clock runs.
pub struct Replay {
    pub id: String,
    base: State,
    actions: Vec<Action>,
    speed: f64,
    delay_seconds: f64,
    score_before: (usize, usize),
    score_after: (usize, usize),
    winner_side: Option<Side>,
    service: Arc<DraftService>,
    /// present only when the session enabled the LLM and asked to wait
    /// for it; best-effort reranks then ride along with each action
    reranker: Option<Arc<Reranker>>,
    status: Arc<AtomicU8>,
    index: Arc<AtomicUsize>,
    tx: UnboundedSender<ReplayEvent>,
}

// construction
impl Replay {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: &str,
        base: State,
        actions: Vec<Action>,
        speed: f64,
        delay_seconds: f64,
        score_before: (usize, usize),
        score_after: (usize, usize),
        winner_side: Option<Side>,
        service: Arc<DraftService>,
        reranker: Option<Arc<Reranker>>,
    ) -> (Self, ReplayHandle) {
        let status = Arc::new(AtomicU8::new(ReplayStatus::Playing as u8));
        let index = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = unbounded_channel();
        let handle = ReplayHandle {
            id: id.to_string(),
            total_actions: actions.len(),
            speed,
            status: status.clone(),
            index: index.clone(),
            events: std::sync::Mutex::new(Some(rx)),
        };
        let replay = Self {
            id: id.to_string(),
            base,
            actions,
            speed: speed.max(0.1),
            delay_seconds,
            score_before,
            score_after,
            winner_side,
            service,
            reranker,
            status,
            index,
            tx,
        };
        (replay, handle)
    }
}

// the session loop
impl Replay {
    pub async fn run(self) {
        if let Err(e) = self.stream().await {
            log::warn!("replay {} halted: {}", self.id, e);
            let _ = self.tx.send(ReplayEvent::Error {
                message: e.to_string(),
            });
        }
    }

    async fn stream(&self) -> anyhow::Result<()> {
        self.send(ReplayEvent::Start {
            session_id: self.id.clone(),
            series_id: self.base.series_id.clone(),
            game_number: self.base.game_number,
            blue: self.base.blue.clone(),
            red: self.base.red.clone(),
            total_actions: self.actions.len(),
            patch: self.base.patch.clone(),
            score_before: self.score_before,
            score_after: self.score_after,
            winner_side: self.winner_side,
        })?;

        // what we would have recommended before the opening action
        let opening = State::at(&self.base, &self.actions, 0);
        let mut pending = match opening.next {
            Some((side, _)) => Some(self.service.recommendations(&opening, side).await),
            None => None,
        };

        while self.index.load(Ordering::Acquire) < self.actions.len() {
            match ReplayStatus::from(self.status.load(Ordering::Acquire)) {
                ReplayStatus::Paused => {
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    continue;
                }
                ReplayStatus::Stopped => return Ok(()),
                _ => {}
            }

            let at = self.index.load(Ordering::Acquire);
            let action = self.actions[at].clone();
            let state = State::at(&self.base, &self.actions, at + 1);
            let recommendations = pending.take();
            let insights = match &recommendations {
                Some(recommendations) => self.rerank(recommendations, at).await,
                None => None,
            };
            pending = match state.next {
                Some((side, _)) => Some(self.service.recommendations(&state, side).await),
                None => None,
            };

            self.send(ReplayEvent::Action {
                action,
                state,
                recommendations,
                insights,
            })?;
            self.index.store(at + 1, Ordering::Release);
            tokio::time::sleep(std::time::Duration::from_secs_f64(
                self.delay_seconds / self.speed,
            ))
            .await;
        }

        self.status
            .store(ReplayStatus::Complete as u8, Ordering::Release);
        self.send(ReplayEvent::Complete {
            state: State::at(&self.base, &self.actions, self.actions.len()),
        })?;
        Ok(())
    }

    /// refine the pending recommendations through the model, against the
    /// state they were generated for. failures fold into the algorithmic
    /// order, never into the stream.
    async fn rerank(&self, recommendations: &Recommendations, at: usize) -> Option<RerankerResult> {
        let reranker = self.reranker.as_ref()?;
        if recommendations.picks.is_empty() && recommendations.bans.is_empty() {
            return None;
        }
        let state = State::at(&self.base, &self.actions, at);
        let side = recommendations.for_team;
        let context = DraftContext {
            phase: state.phase,
            patch: state.patch.clone(),
            our_team: state.team(side).name.clone(),
            enemy_team: state.team(side.flip()).name.clone(),
            our_picks: state.picks(side),
            enemy_picks: state.picks(side.flip()),
            banned: state.all_bans(),
            mode: DraftMode::Normal,
            fearless_blocked: Vec::new(),
        };
        let our_players = state.team(side).players.clone();
        let enemy_players = state.team(side.flip()).players.clone();
        let result = match recommendations.picks.is_empty() {
            false => {
                let candidates = recommendations
                    .picks
                    .iter()
                    .map(Candidate::from)
                    .collect::<Vec<_>>();
                reranker
                    .rerank_picks(&candidates, &context, &our_players, &enemy_players, 5, None)
                    .await
            }
            true => {
                let candidates = recommendations
                    .bans
                    .iter()
                    .map(Candidate::from)
                    .collect::<Vec<_>>();
                reranker
                    .rerank_bans(&candidates, &context, &our_players, &enemy_players, 5, None)
                    .await
            }
        };
        Some(result)
    }

    fn send(&self, event: ReplayEvent) -> anyhow::Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow::anyhow!("replay listener disconnected"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in [
            ReplayStatus::Playing,
            ReplayStatus::Paused,
            ReplayStatus::Complete,
            ReplayStatus::Stopped,
        ] {
            assert!(ReplayStatus::from(status as u8) == status);
        }
    }
}

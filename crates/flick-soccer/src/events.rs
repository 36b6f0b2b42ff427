//! Match notifications for presentation layers.
//!
//! Observers subscribed to the [`EventBus`] are called synchronously as
//! events happen. Every event is also queued so a polling host can drain
//! them once per frame.

use std::collections::VecDeque;

use serde::Serialize;

use crate::state::{Phase, Score};
use crate::team::Team;

/// Events a host stops draining are dropped past this many, oldest first.
const MAX_QUEUED: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    MatchStarted,
    ScoreChanged { score: Score },
    TurnChanged { team: Team },
    MovesChanged { moves_left: u32 },
    GoalScored { team: Team, score: Score },
    MatchEnded { winner: Team, score: Score },
}

pub trait MatchObserver {
    fn on_event(&mut self, event: &MatchEvent);
}

impl<F: FnMut(&MatchEvent)> MatchObserver for F {
    fn on_event(&mut self, event: &MatchEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn MatchObserver>>,
    queue: VecDeque<MatchEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    pub fn publish(&mut self, event: MatchEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        if self.queue.len() == MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<MatchEvent> {
        self.queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("queue", &self.queue)
            .finish()
    }
}

/// Snapshot of everything a HUD shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub score: Score,
    pub turn: Team,
    pub moves_left: u32,
    pub phase: Phase,
    pub winner: Option<Team>,
    /// Input is refused while a restart settles.
    pub input_locked: bool,
    /// The closing sequence is over and a restart will be accepted.
    pub awaiting_restart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn observers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(move |event: &MatchEvent| sink.borrow_mut().push(*event)));

        bus.publish(MatchEvent::MatchStarted);
        bus.publish(MatchEvent::TurnChanged { team: Team::White });

        assert_eq!(
            *seen.borrow(),
            vec![MatchEvent::MatchStarted, MatchEvent::TurnChanged { team: Team::White }]
        );
        assert_eq!(bus.pending(), 2);
        assert_eq!(bus.drain().len(), 2);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn queue_drops_oldest_when_full() {
        let mut bus = EventBus::new();
        for n in 0..(MAX_QUEUED as u32 + 10) {
            bus.publish(MatchEvent::MovesChanged { moves_left: n });
        }
        let events = bus.drain();
        assert_eq!(events.len(), MAX_QUEUED);
        assert_eq!(events[0], MatchEvent::MovesChanged { moves_left: 10 });
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&MatchEvent::GoalScored {
            team: Team::Red,
            score: Score { red: 1, white: 0 },
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"goal_scored","team":"red","score":{"red":1,"white":0}}"#);
    }
}

//! Per-item countdown and the delayed auto-advance.
//!
//! [`Countdown`] is the pure tick arithmetic. [`CountdownTimer`] drives it from
//! a tokio task and reports back over a channel; the engine is the only
//! consumer, so the session itself is never touched from a timer task.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::session::{AdvanceTicket, ItemToken};

/// Result of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time remains.
    Remaining(u32),
    /// This tick reached zero. Returned exactly once.
    Expired,
    /// The countdown already expired earlier.
    Done,
}

/// A countdown from a fixed number of ticks down to zero.
#[derive(Debug, Clone)]
pub struct Countdown {
    token: ItemToken,
    remaining: u32,
    expired: bool,
}

impl Countdown {
    pub fn new(token: ItemToken, ticks: u32) -> Self {
        Self {
            token,
            remaining: ticks,
            expired: false,
        }
    }

    pub fn token(&self) -> ItemToken {
        self.token
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consume one tick.
    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Done;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining)
        }
    }
}

/// Messages from timer tasks to the engine loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One tick elapsed on the item's countdown.
    Tick { token: ItemToken, remaining: u32 },
    /// The item's countdown reached zero.
    Expired { token: ItemToken },
    /// The display delay after a locked item has passed.
    AutoAdvance { ticket: AdvanceTicket },
}

/// Owns the single countdown task and the single pending auto-advance task.
///
/// Starting anything new aborts what was running before, and dropping the
/// timer aborts both.
pub struct CountdownTimer {
    events: UnboundedSender<TimerEvent>,
    countdown: Option<JoinHandle<()>>,
    delayed_advance: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn new(events: UnboundedSender<TimerEvent>) -> Self {
        Self {
            events,
            countdown: None,
            delayed_advance: None,
        }
    }

    /// Start counting `ticks` ticks of length `tick` for the item behind `token`.
    pub fn start(&mut self, token: ItemToken, ticks: u32, tick: Duration) {
        self.cancel_all();

        let events = self.events.clone();
        self.countdown = Some(tokio::spawn(async move {
            let mut countdown = Countdown::new(token, ticks);
            let mut interval = time::interval_at(Instant::now() + tick, tick);
            loop {
                interval.tick().await;
                let event = match countdown.tick() {
                    Tick::Remaining(remaining) => TimerEvent::Tick { token, remaining },
                    Tick::Expired => TimerEvent::Expired { token },
                    Tick::Done => break,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop the countdown, leaving any scheduled advance alone.
    pub fn stop(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }

    /// Send an auto-advance for `ticket` once `delay` has passed.
    pub fn schedule_advance(&mut self, ticket: AdvanceTicket, delay: Duration) {
        if let Some(handle) = self.delayed_advance.take() {
            handle.abort();
        }

        let events = self.events.clone();
        self.delayed_advance = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = events.send(TimerEvent::AutoAdvance { ticket });
        }));
    }

    /// Abort the countdown and any scheduled advance.
    pub fn cancel_all(&mut self) {
        self.stop();
        if let Some(handle) = self.delayed_advance.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a countdown task is alive.
    pub fn is_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, SessionQuestion};
    use crate::session::{Advance, ExamSession, Submission};
    use tokio::sync::mpsc;

    fn two_item_session() -> ExamSession {
        let items = (0..2)
            .map(|_| {
                SessionQuestion::new(
                    Question {
                        text: "Q".into(),
                        image: None,
                        choices: vec!["a".into(), "b".into()],
                        correct: 0,
                    },
                    vec![0, 1],
                )
                .unwrap()
            })
            .collect();
        ExamSession::from_items(items)
    }

    /// Tokens for item 0 and item 1, plus the ticket that led from one to the other.
    fn tokens() -> (ItemToken, ItemToken, AdvanceTicket) {
        let mut session = two_item_session();
        let first = session.active_token().unwrap();
        let Submission::Recorded { ticket, .. } = session.submit_answer(0).unwrap() else {
            panic!("expected a recorded answer");
        };
        let Advance::Next(second) = session.advance(ticket) else {
            panic!("expected next item");
        };
        (first, second, ticket)
    }

    #[test]
    fn countdown_expires_exactly_once() {
        let (token, _, _) = tokens();
        let mut countdown = Countdown::new(token, 3);
        assert_eq!(countdown.tick(), Tick::Remaining(2));
        assert_eq!(countdown.tick(), Tick::Remaining(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Done);
        assert_eq!(countdown.tick(), Tick::Done);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn zero_length_countdown_expires_on_first_tick() {
        let (token, _, _) = tokens();
        let mut countdown = Countdown::new(token, 0);
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.token(), token);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_ticks_down_then_expires() {
        let (token, _, _) = tokens();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(tx);
        let started = Instant::now();

        timer.start(token, 3, Duration::from_secs(1));

        assert_eq!(
            rx.recv().await,
            Some(TimerEvent::Tick {
                token,
                remaining: 2
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(TimerEvent::Tick {
                token,
                remaining: 1
            })
        );
        assert_eq!(rx.recv().await, Some(TimerEvent::Expired { token }));

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_cancels_previous_countdown() {
        let (first, second, _) = tokens();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(tx);

        timer.start(first, 2, Duration::from_secs(1));
        time::sleep(Duration::from_millis(500)).await;
        timer.start(second, 2, Duration::from_secs(1));

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = matches!(event, TimerEvent::Expired { .. });
            seen.push(event);
            if done {
                break;
            }
        }
        assert!(seen.iter().all(|e| match e {
            TimerEvent::Tick { token, .. } | TimerEvent::Expired { token } => *token == second,
            TimerEvent::AutoAdvance { .. } => false,
        }));

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_silences_countdown() {
        let (token, _, _) = tokens();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(tx);

        timer.start(token, 5, Duration::from_secs(1));
        timer.stop();
        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_advance_fires_after_delay() {
        let (_, _, ticket) = tokens();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(tx);
        let started = Instant::now();

        timer.schedule_advance(ticket, Duration::from_millis(1500));
        assert_eq!(rx.recv().await, Some(TimerEvent::AutoAdvance { ticket }));
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_drops_scheduled_advance() {
        let (token, _, ticket) = tokens();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(tx);

        timer.schedule_advance(ticket, Duration::from_millis(1500));
        timer.start(token, 10, Duration::from_secs(1));
        time::sleep(Duration::from_millis(200)).await;
        timer.cancel_all();

        time::sleep(Duration::from_secs(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_timer_cancels_tasks() {
        let (token, _, _) = tokens();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = CountdownTimer::new(tx);

        timer.start(token, 2, Duration::from_secs(1));
        drop(timer);

        assert_eq!(rx.recv().await, None);
    }
}

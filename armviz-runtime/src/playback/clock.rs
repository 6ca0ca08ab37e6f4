use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::runtime::Event;

use super::Epoch;

/// Periodic animation tick source.
///
/// The clock posts a tick event for its epoch on the runtime queue every
/// period. The clock stops when it is dropped.
pub struct AnimationClock {
    epoch: Epoch,
    handle: JoinHandle<()>,
}

impl AnimationClock {
    /// Start a clock on the current runtime.
    pub fn start(period: Duration, epoch: Epoch, tx: mpsc::Sender<Event>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            // First tick completes immediately, the first frame is already shown.
            interval.tick().await;

            loop {
                interval.tick().await;

                if tx.send(Event::Tick { epoch }).await.is_err() {
                    break;
                }
            }
        });

        log::trace!("Animation clock {} started", epoch);

        Self { epoch, handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for AnimationClock {
    fn drop(&mut self) {
        self.handle.abort();
        log::trace!("Animation clock {} stopped", self.epoch);
    }
}

/// Factory for animation clocks feeding the runtime queue.
#[derive(Clone)]
pub struct ClockSource {
    period: Duration,
    tx: mpsc::Sender<Event>,
}

impl ClockSource {
    pub fn new(period: Duration, tx: mpsc::Sender<Event>) -> Self {
        Self { period, tx }
    }

    pub fn start(&self, epoch: Epoch) -> AnimationClock {
        AnimationClock::start(self.period, epoch, self.tx.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clock_ticks_with_epoch() {
        let (tx, mut rx) = mpsc::channel(8);

        let clock = AnimationClock::start(Duration::from_millis(5), 7, tx);

        for _ in 0..3 {
            match rx.recv().await {
                Some(Event::Tick { epoch }) => assert_eq!(epoch, 7),
                other => panic!("unexpected event: {:?}", other),
            }
        }

        assert!(clock.is_running());
    }

    #[tokio::test]
    async fn test_clock_stops_on_drop() {
        let (tx, mut rx) = mpsc::channel(8);

        let clock = ClockSource::new(Duration::from_millis(5), tx).start(1);

        assert!(matches!(rx.recv().await, Some(Event::Tick { epoch: 1 })));

        drop(clock);

        while rx.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_millis(30)).await;

        // Sender is owned by the aborted task, the queue is closed.
        assert!(rx.recv().await.is_none());
    }
}

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{planner::Planner, playback::ClockSource, Config};

mod error;
mod event;
mod session;

pub use self::error::Error;
pub use self::event::Event;
pub use self::session::Session;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

/// Event driven viewer runtime.
///
/// All events are funneled through a single queue and applied to the
/// session in order.
pub struct Runtime {
    session: Session,
    events: (mpsc::Sender<Event>, mpsc::Receiver<Event>),
}

impl Runtime {
    pub fn new(config: &Config, planner: Arc<dyn Planner>) -> Result<Self> {
        let (tx, rx) = mpsc::channel(crate::consts::QUEUE_SIZE_EVENT);

        let clock_source = ClockSource::new(config.playback.tick_interval(), tx.clone());

        let session = Session::new(config, planner, tx.clone(), Some(clock_source))?;

        Ok(Self {
            session,
            events: (tx, rx),
        })
    }

    /// Queue to post events on.
    pub fn event_sender(&self) -> mpsc::Sender<Event> {
        self.events.0.clone()
    }

    /// Post a shutdown event when the process is interrupted.
    pub fn spawn_signal_handler(&self) {
        let tx = self.event_sender();

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::debug!("Received interrupt");

                tx.send(Event::Shutdown).await.ok();
            }
        });
    }

    /// Process events until shutdown.
    pub async fn run(mut self) {
        log::debug!("Starting runtime");

        self.session.render();

        while let Some(event) = self.events.1.recv().await {
            log::trace!("Event: {}", event);

            if !self.session.handle(event) {
                break;
            }
        }

        log::debug!("Runtime stopped");
    }
}

use armviz_core::{LinkLengths, Trajectory};

use crate::playback::{Epoch, Ticket};

/// Runtime event.
///
/// Every user action, timer tick and planner response is delivered to the
/// session as an event. Events are handled one at a time and in order.
#[derive(Debug)]
pub enum Event {
    /// Pointer click on the scene, in canvas coordinates.
    Click { x: f32, y: f32 },
    /// Pointer entered the charts at the given frame.
    HoverEnter(usize),
    /// Pointer moved over the charts to the given frame.
    HoverMove(usize),
    /// Pointer over the chart time axis, in seconds.
    HoverAt(f32),
    /// Pointer left the charts.
    HoverLeave,
    /// Return to the home pose and discard all trajectory state.
    Reset,
    /// Change the link lengths.
    SetLengths(LinkLengths),
    /// Change the planned motion duration in seconds.
    SetDuration(f32),
    /// Log the current read-outs.
    Status,
    /// Animation clock tick.
    Tick { epoch: Epoch },
    /// Planner response for the request with the given ticket.
    Planned {
        ticket: Ticket,
        result: Result<Trajectory, String>,
    },
    /// Stop the runtime.
    Shutdown,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Click { x, y } => write!(f, "Click [{:.1}, {:.1}]", x, y),
            Event::HoverEnter(frame) => write!(f, "HoverEnter {}", frame),
            Event::HoverMove(frame) => write!(f, "HoverMove {}", frame),
            Event::HoverAt(time) => write!(f, "HoverAt {:.3}s", time),
            Event::HoverLeave => write!(f, "HoverLeave"),
            Event::Reset => write!(f, "Reset"),
            Event::SetLengths(lengths) => write!(f, "SetLengths {}", lengths),
            Event::SetDuration(duration) => write!(f, "SetDuration {:.2}s", duration),
            Event::Status => write!(f, "Status"),
            Event::Tick { epoch } => write!(f, "Tick {}", epoch),
            Event::Planned { ticket, result } => match result {
                Ok(trajectory) => write!(f, "Planned {} {}", ticket, trajectory),
                Err(e) => write!(f, "Planned {} failed: {}", ticket, e),
            },
            Event::Shutdown => write!(f, "Shutdown"),
        }
    }
}

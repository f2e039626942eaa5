//=========================================================================
// Frame Collector
//=========================================================================
//
// Core-side collection of frame events with bounded draining and
// shutdown detection.
//
// Architecture:
//   Receiver<FrameEvent> → collect_frame() → deltas → TickControl
//
// Blocks until the driver sends something, then drains what else is
// already queued so a slow frame catches up instead of lagging.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::FrameEvent;

//=== TickControl =========================================================

/// Run loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== FrameCollector ======================================================

/// Collects frame events from the driver channel.
pub(crate) struct FrameCollector {
    receiver: Receiver<FrameEvent>,
    deltas: Vec<f32>,
}

impl FrameCollector {
    pub(crate) fn new(receiver: Receiver<FrameEvent>) -> Self {
        Self {
            receiver,
            deltas: Vec::with_capacity(4),
        }
    }

    /// Waits for the next event and drains the backlog (bounded).
    ///
    /// Deltas received before a `Closed` are kept, so the caller can run
    /// them before exiting.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        const MAX_EVENTS_PER_FRAME: usize = 100;

        self.deltas.clear();

        match self.receiver.recv() {
            Ok(event) => {
                if self.handle_event(event) == TickControl::Exit {
                    return TickControl::Exit;
                }
            }
            Err(_) => return TickControl::Exit,
        }

        let mut drained = 1;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Frame queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Returns the frame deltas collected this round.
    pub(crate) fn deltas(&self) -> &[f32] {
        &self.deltas
    }

    /// Takes the collected deltas, leaving an empty vec.
    pub(crate) fn take_deltas(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.deltas)
    }

    fn handle_event(&mut self, event: FrameEvent) -> TickControl {
        match event {
            FrameEvent::Frame { delta } => {
                self.deltas.push(delta);
                TickControl::Continue
            }
            FrameEvent::Closed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

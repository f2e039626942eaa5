//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types.
//
// Defines the contract between whatever paces the application (a window
// loop, a timer thread, a test) and the single-threaded core.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};

//=== FrameEvent ==========================================================

/// Events sent from the frame driver to the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    /// Run one frame with `delta` seconds elapsed.
    Frame { delta: f32 },

    /// The driver is shutting down.
    Closed,
}

/// Creates the unbounded channel a frame driver feeds.
pub fn frame_channel() -> (Sender<FrameEvent>, Receiver<FrameEvent>) {
    unbounded()
}

//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the external frame driver with the core.
//
// The core never owns a window or a clock. A driver thread sends
// `FrameEvent`s over a crossbeam channel and the application consumes
// them on its own thread.
//
// Components:
// - `interface`: Event types and channel constructor (the contract)
// - `event_collector`: Core-side event collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use interface::{frame_channel, FrameEvent};

//=== Internal API ========================================================

pub(crate) use event_collector::{FrameCollector, TickControl};

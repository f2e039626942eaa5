//=========================================================================
// Global Runtime State
//=========================================================================
//
// Process-wide state owned by one explicit context object instead of
// statics. The application builds a single instance at startup and
// lends it to scenes and registries.
//
//=========================================================================

//=== Module Declarations =================================================

mod runtime_context;

//=== Public API ==========================================================

pub use runtime_context::RuntimeContext;

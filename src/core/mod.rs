//=========================================================================
// Core Systems
//=========================================================================
//
// Internal systems of the application-state and overlay layer.
//
// Architecture:
//   state   - lifecycle states, handlers, state machine
//   dialog  - modal dialog overlay service
//   task    - background init tasks and progress bindings
//   scene   - seam to the host's windowing/scene stack
//   context - shared data passed to state handlers
//
//=========================================================================

//=== Module Declarations =================================================

pub mod context;
pub mod dialog;
pub mod scene;
pub mod state;
pub mod task;

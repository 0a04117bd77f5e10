//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use vesper_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// App facade
pub use crate::app::{App, AppBuilder};

// Context and host hooks
pub use crate::core::context::{AppContext, GameApplication};

// State system
pub use crate::core::state::{
    ApplicationState, LoadingState, StateHandler, StateMachine, StateRequestQueue,
};

// Dialog system
pub use crate::core::dialog::{
    DialogBox, DialogFactory, DialogPane, DialogResult, DialogService, Key,
};

// Scene seam
pub use crate::core::scene::{SceneEffect, WindowService, DIALOG_BG_BLUR};

// Task system
pub use crate::core::task::{InitTask, ProgressBinding, ProgressReporter, TaskExecutor};

//=========================================================================
// Application Context
//=========================================================================
//
// Shared data handed to state handlers during lifecycle hooks.
//
// Contains:
// - state_requests: queue of requested state transitions
// - executor: background task executor
// - app: host-application hooks (reset, init-task supply)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::state::StateRequestQueue;
use crate::core::task::{InitTask, TaskExecutor};

//=== Game Application Hooks ==============================================

/// Host-application operations consumed by the state layer.
///
/// Implemented by the embedding game. `reset` clears game/application
/// data before a (re)load; `create_init_task` produces the background
/// work executed while the loading phase is current.
pub trait GameApplication {
    /// Clears application and game data ahead of initialization.
    fn reset(&mut self);

    /// Builds the background initialization task for the next load.
    fn create_init_task(&mut self) -> InitTask;
}

//=== AppContext ==========================================================

/// Shared context passed to state handlers.
///
/// Handlers receive `&mut AppContext` in every lifecycle hook. The
/// context lives on the logic thread for the lifetime of the app.
pub struct AppContext {
    /// Queue of requested state transitions, drained at tick boundaries.
    pub state_requests: StateRequestQueue,

    /// Background task executor, pumped once per tick.
    pub executor: TaskExecutor,

    /// Host-application hooks.
    pub app: Box<dyn GameApplication>,

    exit: bool,
}

impl AppContext {
    /// Creates a context wrapping the host application.
    pub fn new(app: Box<dyn GameApplication>) -> Self {
        Self {
            state_requests: StateRequestQueue::new(),
            executor: TaskExecutor::new(),
            app,
            exit: false,
        }
    }

    /// Requests app shutdown at the end of the current tick.
    pub fn request_exit(&mut self) {
        self.exit = true;
    }

    /// Returns true if shutdown has been requested.
    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    /// Drains worker messages from running tasks.
    ///
    /// Progress lands in the tasks' bindings; completion callbacks may
    /// push into `state_requests`.
    pub fn pump_tasks(&mut self) {
        let Self {
            executor,
            state_requests,
            ..
        } = self;
        executor.pump(state_requests);
    }
}

//=== Tests ===============================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Host application stub for tests elsewhere in the crate.
    pub(crate) struct NullApp;

    impl GameApplication for NullApp {
        fn reset(&mut self) {}

        fn create_init_task(&mut self) -> InitTask {
            Box::new(|_| {})
        }
    }

    /// Builds a context around [`NullApp`].
    pub(crate) fn test_context() -> AppContext {
        AppContext::new(Box::new(NullApp))
    }

    #[test]
    fn exit_flag_starts_clear() {
        let mut ctx = test_context();
        assert!(!ctx.exit_requested());

        ctx.request_exit();
        assert!(ctx.exit_requested());
    }
}

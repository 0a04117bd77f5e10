//=========================================================================
// Loading State
//=========================================================================
//
// Governs the transition into background initialization.
//
// On entry the previous state decides whether application data is
// reset, then the host's init task is submitted to the executor with
// its progress bound to the loading indicator. Task completion queues
// a transition to Playing.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::task::ProgressBinding;
use super::{ApplicationState, StateHandler};

//=== Loading State =======================================================

/// Handler for [`ApplicationState::Loading`].
///
/// Permitted predecessors are Startup, Intro, MainMenu, GameMenu and
/// Playing. Entering from MainMenu, GameMenu or Playing resets the
/// host application first (a fresh load over existing data); entering
/// from Startup or Intro does not, since no data exists yet.
///
/// # Panics
///
/// `on_enter` panics when invoked with any other predecessor. That is
/// a programming error in the embedding app and is not recoverable at
/// this layer.
pub struct LoadingState {
    progress: ProgressBinding,
}

impl LoadingState {
    /// Creates the handler with a fresh progress binding.
    pub fn new() -> Self {
        Self {
            progress: ProgressBinding::new(),
        }
    }

    /// Returns a handle to the progress value the loading indicator
    /// should display.
    ///
    /// The binding is reset to `0.0` each time loading begins and is
    /// driven to `1.0` by task completion.
    pub fn progress(&self) -> ProgressBinding {
        self.progress.clone()
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHandler for LoadingState {
    fn on_enter(&mut self, prev: ApplicationState, ctx: &mut AppContext) {
        match prev {
            ApplicationState::Startup | ApplicationState::Intro => {
                debug!("Entering Loading from {:?}, no reset needed", prev);
            }

            ApplicationState::MainMenu
            | ApplicationState::GameMenu
            | ApplicationState::Playing => {
                debug!("Entering Loading from {:?}, resetting application", prev);
                ctx.app.reset();
            }

            other => panic!("Entered Loading from illegal state: {:?}", other),
        }

        self.progress.set(0.0);

        let task = ctx.app.create_init_task();
        info!("Starting background init task");

        ctx.executor.submit(task, self.progress.clone(), |requests| {
            requests.push(ApplicationState::Playing);
        });
    }

    // on_exit and on_update are deliberate no-ops (trait defaults).
}

//=== Tests ===============================================================

//=========================================================================
// Application State System
//=========================================================================
//
// Named phases of the application lifecycle with enter/exit/update
// hooks, driven by a state machine that applies queued transitions at
// tick boundaries.
//
// Architecture:
//   StateMachine
//     ├─ handlers: HashMap<ApplicationState, Box<dyn StateHandler>>
//     └─ current: ApplicationState
//
// Flow:
//   update() → StateHandler::on_update()
//   process_requests() → on_exit() / on_enter()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;

//=== Module Declarations =================================================

mod loading;
mod machine;

//=== Public API ==========================================================

pub use loading::LoadingState;
pub use machine::{StateMachine, StateRequestQueue};

//=== Application State ===================================================

/// Named phase of the application lifecycle.
///
/// The machine holds exactly one current state at a time. States are
/// plain tags; behavior lives in the [`StateHandler`] registered for a
/// tag, and a tag without a handler is a valid (inert) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationState {
    /// First phase after process start, before any scene exists.
    Startup,

    /// Intro/splash sequence.
    Intro,

    /// Main menu, shown outside of a running game.
    MainMenu,

    /// In-game menu, shown over a suspended game.
    GameMenu,

    /// Active gameplay.
    Playing,

    /// Background initialization in progress.
    Loading,

    /// Gameplay suspended without a menu.
    Paused,
}

//=== State Handler Trait =================================================

/// Behavior attached to an [`ApplicationState`].
///
/// All hooks have default empty implementations, so a handler only
/// overrides what it needs.
///
/// ```rust
/// # use vesper_engine::prelude::*;
/// struct MainMenu;
///
/// impl StateHandler for MainMenu {
///     fn on_enter(&mut self, prev: ApplicationState, _ctx: &mut AppContext) {
///         // build menu UI, etc.
///         let _ = prev;
///     }
/// }
/// ```
pub trait StateHandler {
    /// Called when this state becomes current.
    ///
    /// `prev` is the state that was current before the transition.
    fn on_enter(&mut self, _prev: ApplicationState, _ctx: &mut AppContext) {}

    /// Called when another state replaces this one.
    fn on_exit(&mut self, _ctx: &mut AppContext) {}

    /// Called every tick while this state is current.
    ///
    /// `tpf` is the time-per-frame in seconds.
    fn on_update(&mut self, _tpf: f64, _ctx: &mut AppContext) {}
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_copy_and_eq() {
        let a = ApplicationState::Loading;
        let b = a;
        assert_eq!(a, b);
        assert_ne!(ApplicationState::Startup, ApplicationState::Playing);
    }
}

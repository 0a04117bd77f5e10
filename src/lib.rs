//=========================================================================
// Vesper Engine — Library Root
//
// Application-state and modal dialog overlay layer for single-threaded
// game UIs.
//
// Responsibilities:
// - Drive the app through named lifecycle states with enter/exit hooks
// - Run background initialization with progress reported to the UI
// - Layer modal dialogs (message/confirm/input/error/progress) over
//   the active scene, with nesting restored in LIFO order
//
// The toolkit itself (scene graph, widgets, rendering, input dispatch)
// stays on the host side of two trait seams: `WindowService` and
// `DialogFactory`.
//
// Typical usage:
// ```no_run
// use vesper_engine::prelude::*;
//
// struct Game;
//
// impl GameApplication for Game {
//     fn reset(&mut self) {}
//     fn create_init_task(&mut self) -> InitTask {
//         Box::new(|reporter| reporter.progress(1.0))
//     }
// }
//
// AppBuilder::new()
//     .build(Box::new(Game))
//     .init(|machine, ctx| {
//         machine.register(ApplicationState::Loading, LoadingState::new());
//         ctx.state_requests.push(ApplicationState::Loading);
//     })
//     .run();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the layer's systems (state machine, dialogs, tasks,
// seams). It is exposed publicly for host-level extensibility, but
// application code will mostly use the top-level `App` facade and the
// prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `app` defines the facade and the fixed-rate tick loop.
//
mod app;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the facade so hosts can `use vesper_engine::{App, AppBuilder};`
// without knowing the internal module structure.
//
pub use app::{App, AppBuilder};

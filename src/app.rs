//=========================================================================
// App Facade
//=========================================================================
//
// Entry point tying the state machine, context and task executor into
// a fixed-rate tick loop.
//
// Architecture:
// ```text
//     AppBuilder  ──build()──>  App  ──run()──>  [tick loop]
//         │                      │
//         └─ with_tps()          └─ init() registers handlers
// ```
//
// Each tick: pump task messages, update the current state handler,
// then apply queued state transitions.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::context::{AppContext, GameApplication};
use crate::core::state::{ApplicationState, StateMachine};

//=== AppBuilder ==========================================================

/// Builder for configuring and constructing an [`App`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Initial state**: [`ApplicationState::Startup`]
///
/// # Examples
///
/// ```no_run
/// use vesper_engine::prelude::*;
///
/// struct Game;
///
/// impl GameApplication for Game {
///     fn reset(&mut self) {}
///     fn create_init_task(&mut self) -> InitTask {
///         Box::new(|reporter| reporter.progress(1.0))
///     }
/// }
///
/// AppBuilder::new()
///     .with_tps(120.0)
///     .build(Box::new(Game))
///     .init(|machine, _ctx| {
///         machine.register(ApplicationState::Loading, LoadingState::new());
///     })
///     .run();
/// ```
pub struct AppBuilder {
    tps: f64,
    initial: ApplicationState,
}

impl AppBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            initial: ApplicationState::Startup,
        }
    }

    /// Sets the target ticks per second for the logic loop.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the state the app starts in.
    ///
    /// Default: [`ApplicationState::Startup`].
    pub fn with_initial_state(mut self, initial: ApplicationState) -> Self {
        self.initial = initial;
        self
    }

    /// Builds the app around the host application's hooks.
    pub fn build(self, app: Box<dyn GameApplication>) -> App {
        info!("Building app (TPS: {}, initial: {:?})", self.tps, self.initial);

        App {
            machine: StateMachine::new(self.initial),
            ctx: AppContext::new(app),
            tps: self.tps,
            started: false,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== App =================================================================

/// Application-state runtime.
///
/// Owns the state machine and the shared context, and drives them at a
/// fixed tick rate. Create via [`AppBuilder`]; register state handlers
/// in [`App::init`]; then either block in [`App::run`] or embed the
/// loop by calling [`App::tick`] yourself.
pub struct App {
    machine: StateMachine,
    ctx: AppContext,
    tps: f64,
    started: bool,
}

impl App {
    //--- Initialization ---------------------------------------------------

    /// Registers state handlers and performs pre-run setup.
    ///
    /// The closure receives the state machine (for handler
    /// registration) and the context (for queueing the first
    /// transition, configuring the executor, etc.).
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut StateMachine, &mut AppContext),
    {
        info!("Initializing app systems");
        init_fn(&mut self.machine, &mut self.ctx);
        self
    }

    //--- Queries ----------------------------------------------------------

    /// Current application state.
    pub fn state(&self) -> ApplicationState {
        self.machine.current()
    }

    /// Shared context, for embedding hosts that drive [`App::tick`].
    pub fn context(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    //--- Execution --------------------------------------------------------

    /// Runs one logic tick.
    ///
    /// Order: pump task messages, update the current state handler,
    /// apply queued state transitions. The first call also fires
    /// `on_enter` on the initial state.
    pub fn tick(&mut self, tpf: f64) {
        if !self.started {
            self.started = true;
            self.machine.start(&mut self.ctx);
        }

        self.ctx.pump_tasks();
        self.machine.update(tpf, &mut self.ctx);
        self.machine.process_requests(&mut self.ctx);
    }

    /// Runs the fixed-timestep loop until exit is requested.
    ///
    /// Blocks the calling thread. Each iteration ticks once and then
    /// sleeps off the remainder of the frame budget.
    pub fn run(mut self) {
        info!("Starting app loop (TPS: {})", self.tps);

        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);

        loop {
            let frame_start = Instant::now();

            self.tick(frame_duration.as_secs_f64());

            if self.ctx.exit_requested() {
                info!("Exit requested, leaving app loop");
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        info!("App shutdown complete");
    }
}

//=== Tests ===============================================================

//=========================================================================
// State Machine
//=========================================================================
//
// Owns state handlers and the current state tag, and applies queued
// transition requests at tick boundaries.
//
// Handlers are stored in a HashMap by state tag so they keep their own
// data between activations. Transitions requested during an update are
// collected in a queue and applied after the update, in FIFO order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use super::{ApplicationState, StateHandler};

//=== State Request Queue =================================================

/// Queue of requested state transitions.
///
/// Handlers and task completions push requests here during a tick; the
/// machine drains the queue at the tick boundary.
pub struct StateRequestQueue {
    queue: Vec<ApplicationState>,
}

impl StateRequestQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition to `state`, applied at the next tick boundary.
    pub fn push(&mut self, state: ApplicationState) {
        self.queue.push(state);
    }

    /// Returns true if no transitions are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all queued transitions, leaving the queue empty.
    pub fn take(&mut self) -> Vec<ApplicationState> {
        std::mem::take(&mut self.queue)
    }
}

impl Default for StateRequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=== State Machine =======================================================

/// Drives the application through its lifecycle states.
///
/// Exactly one state is current at any time. Handlers are registered
/// per state tag; a tag without a handler is a valid inert state (it
/// can still be entered, it just has no hooks).
pub struct StateMachine {
    handlers: HashMap<ApplicationState, Box<dyn StateHandler>>,
    current: ApplicationState,
}

impl StateMachine {
    //--- Construction -----------------------------------------------------

    /// Creates a machine whose current state is `initial`.
    ///
    /// The initial handler's `on_enter` is not invoked until
    /// [`StateMachine::start`] is called.
    pub fn new(initial: ApplicationState) -> Self {
        Self {
            handlers: HashMap::new(),
            current: initial,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a handler for `state`.
    ///
    /// The handler is automatically boxed for storage. Registering a
    /// second handler for the same state replaces the first.
    pub fn register<H>(&mut self, state: ApplicationState, handler: H)
    where
        H: StateHandler + 'static,
    {
        if self.handlers.insert(state, Box::new(handler)).is_some() {
            warn!("Handler for {:?} was already registered and has been replaced", state);
        }
    }

    /// Invokes `on_enter` on the initial state's handler.
    ///
    /// The previous state reported to the handler is the initial state
    /// itself, since nothing preceded it.
    pub fn start(&mut self, context: &mut AppContext) {
        debug!("Starting state machine in {:?}", self.current);
        if let Some(handler) = self.handlers.get_mut(&self.current) {
            handler.on_enter(self.current, context);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the current state tag.
    pub fn current(&self) -> ApplicationState {
        self.current
    }

    //--- Update Loop ------------------------------------------------------

    /// Ticks the current state's handler.
    pub fn update(&mut self, tpf: f64, context: &mut AppContext) {
        if let Some(handler) = self.handlers.get_mut(&self.current) {
            handler.on_update(tpf, context);
        }
    }

    //--- Transition Processing --------------------------------------------

    /// Applies all queued state requests in FIFO order.
    ///
    /// Should be called at the tick boundary after the update. Each
    /// applied transition invokes `on_exit` on the outgoing handler and
    /// `on_enter(prev)` on the incoming one.
    pub fn process_requests(&mut self, context: &mut AppContext) {
        let requested = context.state_requests.take();

        for next in requested {
            self.apply(next, context);
        }
    }

    /// Transitions to `next` immediately, bypassing the queue.
    ///
    /// For host code running outside a tick. Handlers should prefer
    /// queueing requests via [`AppContext::state_requests`].
    pub fn set_state(&mut self, next: ApplicationState, context: &mut AppContext) {
        self.apply(next, context);
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply(&mut self, next: ApplicationState, context: &mut AppContext) {
        if next == self.current {
            warn!("State {:?} is already current, skipping transition", next);
            return;
        }

        debug!("Transitioning {:?} -> {:?}", self.current, next);

        if let Some(handler) = self.handlers.get_mut(&self.current) {
            handler.on_exit(context);
        }

        let prev = self.current;
        self.current = next;

        if let Some(handler) = self.handlers.get_mut(&next) {
            handler.on_enter(prev, context);
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::tests::test_context;

    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Recording Handler ------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Hook {
        Enter(ApplicationState),
        Exit,
        Update,
    }

    struct Recorder {
        log: Rc<RefCell<Vec<(ApplicationState, Hook)>>>,
        tag: ApplicationState,
    }

    impl StateHandler for Recorder {
        fn on_enter(&mut self, prev: ApplicationState, _ctx: &mut AppContext) {
            self.log.borrow_mut().push((self.tag, Hook::Enter(prev)));
        }

        fn on_exit(&mut self, _ctx: &mut AppContext) {
            self.log.borrow_mut().push((self.tag, Hook::Exit));
        }

        fn on_update(&mut self, _tpf: f64, _ctx: &mut AppContext) {
            self.log.borrow_mut().push((self.tag, Hook::Update));
        }
    }

    fn machine_with_recorders(
        initial: ApplicationState,
        tags: &[ApplicationState],
    ) -> (StateMachine, Rc<RefCell<Vec<(ApplicationState, Hook)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = StateMachine::new(initial);
        for &tag in tags {
            machine.register(tag, Recorder { log: log.clone(), tag });
        }
        (machine, log)
    }

    //--- Queue Tests ------------------------------------------------------

    #[test]
    fn queue_is_fifo_and_take_empties() {
        let mut queue = StateRequestQueue::new();
        queue.push(ApplicationState::Loading);
        queue.push(ApplicationState::Playing);
        assert_eq!(queue.len(), 2);

        let taken = queue.take();
        assert_eq!(taken, vec![ApplicationState::Loading, ApplicationState::Playing]);
        assert!(queue.is_empty());
    }

    //--- Machine Tests ----------------------------------------------------

    #[test]
    fn start_enters_initial_state_with_itself_as_prev() {
        let (mut machine, log) = machine_with_recorders(
            ApplicationState::Startup,
            &[ApplicationState::Startup],
        );
        let mut ctx = test_context();

        machine.start(&mut ctx);

        assert_eq!(
            log.borrow().as_slice(),
            &[(ApplicationState::Startup, Hook::Enter(ApplicationState::Startup))]
        );
    }

    #[test]
    fn transition_fires_exit_then_enter_with_prev() {
        let (mut machine, log) = machine_with_recorders(
            ApplicationState::MainMenu,
            &[ApplicationState::MainMenu, ApplicationState::Playing],
        );
        let mut ctx = test_context();

        ctx.state_requests.push(ApplicationState::Playing);
        machine.process_requests(&mut ctx);

        assert_eq!(machine.current(), ApplicationState::Playing);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                (ApplicationState::MainMenu, Hook::Exit),
                (ApplicationState::Playing, Hook::Enter(ApplicationState::MainMenu)),
            ]
        );
    }

    #[test]
    fn same_state_request_is_ignored() {
        let (mut machine, log) = machine_with_recorders(
            ApplicationState::MainMenu,
            &[ApplicationState::MainMenu],
        );
        let mut ctx = test_context();

        ctx.state_requests.push(ApplicationState::MainMenu);
        machine.process_requests(&mut ctx);

        assert_eq!(machine.current(), ApplicationState::MainMenu);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn requests_apply_in_fifo_order() {
        let (mut machine, log) = machine_with_recorders(
            ApplicationState::Startup,
            &[
                ApplicationState::Startup,
                ApplicationState::Intro,
                ApplicationState::MainMenu,
            ],
        );
        let mut ctx = test_context();

        ctx.state_requests.push(ApplicationState::Intro);
        ctx.state_requests.push(ApplicationState::MainMenu);
        machine.process_requests(&mut ctx);

        assert_eq!(machine.current(), ApplicationState::MainMenu);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                (ApplicationState::Startup, Hook::Exit),
                (ApplicationState::Intro, Hook::Enter(ApplicationState::Startup)),
                (ApplicationState::Intro, Hook::Exit),
                (ApplicationState::MainMenu, Hook::Enter(ApplicationState::Intro)),
            ]
        );
    }

    #[test]
    fn unhandled_state_is_still_enterable() {
        let (mut machine, _log) = machine_with_recorders(
            ApplicationState::Startup,
            &[ApplicationState::Startup],
        );
        let mut ctx = test_context();

        // Paused has no registered handler; the tag still becomes current.
        machine.set_state(ApplicationState::Paused, &mut ctx);
        assert_eq!(machine.current(), ApplicationState::Paused);
    }

    #[test]
    fn update_ticks_only_current_handler() {
        let (mut machine, log) = machine_with_recorders(
            ApplicationState::Playing,
            &[ApplicationState::Playing, ApplicationState::MainMenu],
        );
        let mut ctx = test_context();

        machine.update(1.0 / 60.0, &mut ctx);

        assert_eq!(
            log.borrow().as_slice(),
            &[(ApplicationState::Playing, Hook::Update)]
        );
    }
}

//=========================================================================
// Background Task Executor
//=========================================================================
//
// Runs initialization tasks on worker threads and relays their
// progress and completion back to the logic thread.
//
// Architecture:
//   submit() ──spawns──> worker thread ──channel──> pump()
//                                                     ├─ Progress → binding
//                                                     └─ Completed → callback
//
// All bindings and callbacks run on the logic thread; only the task
// closure itself crosses a thread boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::{debug, error};

//=== Internal Dependencies ===============================================

use crate::core::state::StateRequestQueue;

//=== Task Types ==========================================================

/// Work executed on a worker thread.
///
/// The closure receives a [`ProgressReporter`] to publish fractional
/// progress; completion is reported automatically when it returns.
pub type InitTask = Box<dyn FnOnce(&ProgressReporter) + Send + 'static>;

/// Hook invoked on the logic thread when a task completes.
pub type TaskCompletion = Box<dyn FnOnce(&mut StateRequestQueue) + 'static>;

/// Message sent from a worker thread to the executor pump.
enum TaskMessage {
    Progress(f64),
    Completed,
}

//=== Progress Reporter ===================================================

/// Worker-side handle for publishing task progress.
pub struct ProgressReporter {
    tx: Sender<TaskMessage>,
}

impl ProgressReporter {
    /// Publishes fractional progress, clamped to `[0, 1]`.
    ///
    /// Sending is best-effort: if the executor has been dropped the
    /// update is silently discarded.
    pub fn progress(&self, fraction: f64) {
        let _ = self.tx.send(TaskMessage::Progress(fraction.clamp(0.0, 1.0)));
    }

    fn complete(self) {
        let _ = self.tx.send(TaskMessage::Completed);
    }
}

//=== Progress Binding ====================================================

/// Logic-thread observable holding the latest progress value.
///
/// Cloning produces another handle to the same value, so a loading
/// indicator can hold one clone while the executor writes through
/// another. Values stay within `[0, 1]`; a completed task always
/// reads `1.0`.
#[derive(Clone)]
pub struct ProgressBinding {
    value: Rc<Cell<f64>>,
}

impl ProgressBinding {
    /// Creates a binding initialized to `0.0`.
    pub fn new() -> Self {
        Self {
            value: Rc::new(Cell::new(0.0)),
        }
    }

    /// Returns the latest observed progress.
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    pub(crate) fn set(&self, fraction: f64) {
        self.value.set(fraction.clamp(0.0, 1.0));
    }
}

impl Default for ProgressBinding {
    fn default() -> Self {
        Self::new()
    }
}

//=== Task Executor =======================================================

struct RunningTask {
    rx: Receiver<TaskMessage>,
    progress: ProgressBinding,
    on_complete: Option<TaskCompletion>,
    handle: Option<JoinHandle<()>>,
    failed: bool,
}

/// Executes [`InitTask`]s on worker threads.
///
/// [`TaskExecutor::pump`] must be called each tick on the logic thread
/// to apply progress updates and fire completion callbacks.
pub struct TaskExecutor {
    running: Vec<RunningTask>,
    channel_capacity: usize,
}

impl TaskExecutor {
    //--- Construction -----------------------------------------------------

    /// Creates an executor with the default channel capacity (128).
    pub fn new() -> Self {
        Self::with_channel_capacity(128)
    }

    /// Creates an executor with a custom worker channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        Self {
            running: Vec::new(),
            channel_capacity: capacity,
        }
    }

    //--- Submission -------------------------------------------------------

    /// Spawns a worker thread running `task`.
    ///
    /// Progress messages are written into `progress` by the next
    /// [`TaskExecutor::pump`] calls; `on_complete` fires once, on the
    /// logic thread, after the task returns.
    pub fn submit<F>(&mut self, task: InitTask, progress: ProgressBinding, on_complete: F)
    where
        F: FnOnce(&mut StateRequestQueue) + 'static,
    {
        let (tx, rx) = bounded(self.channel_capacity);
        let reporter = ProgressReporter { tx };

        let handle = thread::spawn(move || {
            task(&reporter);
            reporter.complete();
        });

        debug!("Init task submitted ({} now running)", self.running.len() + 1);

        self.running.push(RunningTask {
            rx,
            progress,
            on_complete: Some(Box::new(on_complete)),
            handle: Some(handle),
            failed: false,
        });
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if no tasks are running.
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Returns the number of running tasks.
    pub fn len(&self) -> usize {
        self.running.len()
    }

    //--- Pump -------------------------------------------------------------

    /// Drains worker messages and applies them on the logic thread.
    ///
    /// Progress updates are written into each task's binding.
    /// Completed tasks have their binding forced to `1.0`, their
    /// completion callback invoked with the state-request queue, and
    /// their worker thread joined (the thread has already exited by
    /// the time its completion message is read).
    ///
    /// A worker that disconnects without completing (i.e. panicked) is
    /// logged and dropped; its callback never fires.
    pub fn pump(&mut self, requests: &mut StateRequestQueue) {
        let mut index = 0;

        while index < self.running.len() {
            if Self::drain_messages(&mut self.running[index]) {
                let mut task = self.running.swap_remove(index);
                Self::finish(&mut task, requests);
            } else {
                index += 1;
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Reads all pending messages for one task.
    ///
    /// Returns true when the task is finished (completed or failed).
    fn drain_messages(task: &mut RunningTask) -> bool {
        loop {
            match task.rx.try_recv() {
                Ok(TaskMessage::Progress(fraction)) => task.progress.set(fraction),
                Ok(TaskMessage::Completed) => return true,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => {
                    error!("Init task worker disconnected before completing");
                    task.failed = true;
                    return true;
                }
            }
        }
    }

    fn finish(task: &mut RunningTask, requests: &mut StateRequestQueue) {
        if !task.failed {
            task.progress.set(1.0);

            if let Some(on_complete) = task.on_complete.take() {
                on_complete(requests);
            }
        }

        if let Some(handle) = task.handle.take() {
            if let Err(e) = handle.join() {
                error!("Init task thread panicked: {:?}", e);
            }
        }
    }
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

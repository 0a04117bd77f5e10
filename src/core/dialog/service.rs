//=========================================================================
// Dialog Service
//=========================================================================
//
// Shows and closes modal dialogs over the active scene.
//
// One dialog is visible at a time. Requesting a dialog while another
// is showing saves the visible one on a stack; closing restores the
// most recently saved dialog. The overlay surface itself is pushed
// once, when the first dialog opens, and popped when the last closes.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::scene::{SceneEffect, WindowService, DIALOG_BG_BLUR};
use crate::core::task::ProgressBinding;
use super::{DialogFactory, DialogPane, DialogResult, Key};

//=== Dialog Titles =======================================================

const TITLE_MESSAGE: &str = "Message";
const TITLE_CONFIRM: &str = "Confirm";
const TITLE_INPUT: &str = "Input";
const TITLE_ERROR: &str = "Error";
const TITLE_CUSTOM: &str = "Dialog";
const TITLE_PROGRESS: &str = "Progress";

//=== Dialog Data =========================================================

type DialogHandler = Box<dyn FnOnce(DialogResult)>;
type InputFilter = Box<dyn Fn(&str) -> bool>;

/// A dialog's full state: what the window shows plus how it reacts.
///
/// Saved on the stack when a nested dialog takes over the window, and
/// restored verbatim when the nested dialog closes.
struct DialogData {
    title: String,
    pane: DialogPane,
    handler: Option<DialogHandler>,
    filter: Option<InputFilter>,
}

//=== Dialog Box Handle ===================================================

/// Handle to a programmatically closable dialog.
///
/// Returned by [`DialogService::show_progress`]; redeemed with
/// [`DialogService::close_box`]. Not constructible outside this module,
/// so every handle corresponds to a dialog the service opened.
pub struct DialogBox {
    _private: (),
}

//=== Dialog Service ======================================================

/// Modal dialog overlay manager.
///
/// Built over two host seams: a [`WindowService`] for the overlay
/// surface and scene effect, and a [`DialogFactory`] for content.
///
/// # Nesting
///
/// `show_*` while a dialog is visible saves the visible dialog;
/// `close` (or a submitted result) restores it. Saved dialogs come
/// back in exact reverse order of saving.
pub struct DialogService {
    window: Option<DialogData>,
    stack: Vec<DialogData>,
    scene: Box<dyn WindowService>,
    factory: Box<dyn DialogFactory>,
    saved_effect: Option<SceneEffect>,
}

impl DialogService {
    //--- Construction -----------------------------------------------------

    /// Creates the service over the host's window and factory seams.
    pub fn new(scene: Box<dyn WindowService>, factory: Box<dyn DialogFactory>) -> Self {
        Self {
            window: None,
            stack: Vec::new(),
            scene,
            factory,
            saved_effect: None,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true while a dialog is visible.
    pub fn is_showing(&self) -> bool {
        self.window.is_some()
    }

    /// Title of the visible dialog, if any.
    pub fn title(&self) -> Option<&str> {
        self.window.as_ref().map(|data| data.title.as_str())
    }

    /// Content of the visible dialog, if any.
    pub fn pane(&self) -> Option<&DialogPane> {
        self.window.as_ref().map(|data| &data.pane)
    }

    /// Number of dialogs saved beneath the visible one.
    pub fn saved_count(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if the overlay should consume `key`.
    ///
    /// Focus traversal stays inside the dialog while one is showing.
    pub fn consumes_key(&self, key: Key) -> bool {
        self.is_showing() && key.is_traversal()
    }

    //--- Core Show/Close --------------------------------------------------

    /// Replaces the window content with a new dialog.
    ///
    /// If a dialog is already showing its state is saved first; the
    /// overlay is only pushed (and the scene blurred) for the first
    /// dialog.
    fn show(&mut self, title: &str, pane: DialogPane, handler: DialogHandler, filter: Option<InputFilter>) {
        if let Some(current) = self.window.take() {
            debug!("Dialog '{}' requested while '{}' is showing, saving it", title, current.title);
            self.stack.push(current);
        } else {
            self.open_in_scene();
        }

        self.window = Some(DialogData {
            title: title.to_string(),
            pane,
            handler: Some(handler),
            filter,
        });

        self.scene.request_focus();
    }

    /// Closes the visible dialog.
    ///
    /// Restores the most recently saved dialog if any; otherwise pops
    /// the overlay and restores the scene's prior effect.
    pub fn close(&mut self) {
        if self.window.take().is_none() {
            warn!("close() called while no dialog is showing");
            return;
        }

        match self.stack.pop() {
            Some(saved) => {
                debug!("Restoring saved dialog '{}'", saved.title);
                self.window = Some(saved);
            }
            None => self.close_in_scene(),
        }
    }

    /// Delivers the user's response to the visible dialog.
    ///
    /// Input values are checked against the dialog's filter first; a
    /// rejected value leaves the dialog open and the handler unfired.
    /// Otherwise the dialog is closed and then the handler runs, so a
    /// handler that opens another dialog sees a consistent stack.
    pub fn submit(&mut self, result: DialogResult) {
        let Some(active) = self.window.as_mut() else {
            warn!("Result submitted while no dialog is showing");
            return;
        };

        if let DialogResult::Input(value) = &result {
            if let Some(filter) = &active.filter {
                if !filter(value) {
                    debug!("Input rejected by filter, dialog stays open");
                    return;
                }
            }
        }

        let handler = active.handler.take();
        self.close();

        match handler {
            Some(handler) => handler(result),
            None => debug!("Dialog closed without a registered handler"),
        }
    }

    //--- Typed Wrappers ---------------------------------------------------

    /// Message box with no follow-up action.
    pub fn show_message(&mut self, message: &str) {
        self.show_message_with(message, || {});
    }

    /// Message box invoking `callback` once acknowledged.
    pub fn show_message_with<F>(&mut self, message: &str, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let pane = self.factory.message_dialog(message);
        self.show(TITLE_MESSAGE, pane, Box::new(move |_| callback()), None);
    }

    /// Yes/no confirmation box.
    pub fn show_confirmation<F>(&mut self, message: &str, callback: F)
    where
        F: FnOnce(bool) + 'static,
    {
        let pane = self.factory.confirmation_dialog(message);
        let handler: DialogHandler = Box::new(move |result| match result {
            DialogResult::Confirmed(answer) => callback(answer),
            other => warn!("Confirmation dialog got unexpected result {:?}", other),
        });
        self.show(TITLE_CONFIRM, pane, handler, None);
    }

    /// Input box accepting any value.
    pub fn show_input<F>(&mut self, message: &str, callback: F)
    where
        F: FnOnce(String) + 'static,
    {
        self.show_input_filtered(message, |_| true, callback);
    }

    /// Input box that only accepts values passing `filter`.
    pub fn show_input_filtered<P, F>(&mut self, message: &str, filter: P, callback: F)
    where
        P: Fn(&str) -> bool + 'static,
        F: FnOnce(String) + 'static,
    {
        let pane = self.factory.input_dialog(message);
        let handler: DialogHandler = Box::new(move |result| match result {
            DialogResult::Input(value) => callback(value),
            other => warn!("Input dialog got unexpected result {:?}", other),
        });
        self.show(TITLE_INPUT, pane, handler, Some(Box::new(filter)));
    }

    /// Input box with a cancel button; `None` means cancelled.
    pub fn show_input_with_cancel<P, F>(&mut self, message: &str, filter: P, callback: F)
    where
        P: Fn(&str) -> bool + 'static,
        F: FnOnce(Option<String>) + 'static,
    {
        let pane = self.factory.input_dialog_with_cancel(message);
        let handler: DialogHandler = Box::new(move |result| match result {
            DialogResult::Input(value) => callback(Some(value)),
            DialogResult::Cancelled => callback(None),
            other => warn!("Input dialog got unexpected result {:?}", other),
        });
        self.show(TITLE_INPUT, pane, handler, Some(Box::new(filter)));
    }

    /// Error box rendering `error`'s display text.
    pub fn show_error(&mut self, error: &dyn std::error::Error) {
        self.show_error_message(&error.to_string(), || {});
    }

    /// Error box with explicit text and follow-up action.
    pub fn show_error_message<F>(&mut self, message: &str, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let pane = self.factory.error_dialog(message);
        self.show(TITLE_ERROR, pane, Box::new(move |_| callback()), None);
    }

    /// Dialog wrapping caller-supplied content.
    pub fn show_custom<F>(&mut self, message: &str, content: DialogPane, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let pane = self.factory.custom_dialog(message, content);
        self.show(TITLE_CUSTOM, pane, Box::new(move |_| callback()), None);
    }

    /// Indeterminate progress box.
    ///
    /// The box has no buttons; the caller closes it by redeeming the
    /// returned handle with [`DialogService::close_box`].
    pub fn show_progress(&mut self, message: &str) -> DialogBox {
        let pane = self.factory.progress_dialog_indeterminate(message);
        self.show(TITLE_PROGRESS, pane, Box::new(|_| {}), None);
        DialogBox { _private: () }
    }

    /// Progress box bound to `progress`, with a completion action.
    ///
    /// The host submits a result (typically [`DialogResult::Ack`]) when
    /// the observed work finishes; `callback` then runs.
    pub fn show_progress_bound<F>(&mut self, message: &str, progress: &ProgressBinding, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let pane = self.factory.progress_dialog(message, progress);
        self.show(TITLE_PROGRESS, pane, Box::new(move |_| callback()), None);
    }

    /// Closes the dialog belonging to `handle`.
    ///
    /// This closes the topmost dialog: a handle should be redeemed
    /// before stacking further dialogs over its box.
    pub fn close_box(&mut self, handle: DialogBox) {
        let DialogBox { _private: () } = handle;
        self.close();
    }

    //--- Internal Helpers -------------------------------------------------

    fn open_in_scene(&mut self) {
        self.saved_effect = self.scene.effect();
        self.scene.set_effect(Some(DIALOG_BG_BLUR));
        self.scene.push_overlay();
        debug!("Dialog overlay pushed");
    }

    fn close_in_scene(&mut self) {
        self.scene.set_effect(self.saved_effect.take());
        self.scene.pop_overlay();
        debug!("Dialog overlay popped");
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Scene Mock -------------------------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    enum SceneCall {
        Push,
        Pop,
        Effect(Option<SceneEffect>),
        Focus,
    }

    struct FakeScene {
        calls: Rc<RefCell<Vec<SceneCall>>>,
        effect: Option<SceneEffect>,
    }

    impl WindowService for FakeScene {
        fn push_overlay(&mut self) {
            self.calls.borrow_mut().push(SceneCall::Push);
        }

        fn pop_overlay(&mut self) {
            self.calls.borrow_mut().push(SceneCall::Pop);
        }

        fn effect(&self) -> Option<SceneEffect> {
            self.effect
        }

        fn set_effect(&mut self, effect: Option<SceneEffect>) {
            self.effect = effect;
            self.calls.borrow_mut().push(SceneCall::Effect(effect));
        }

        fn request_focus(&mut self) {
            self.calls.borrow_mut().push(SceneCall::Focus);
        }
    }

    //--- Factory Mock -----------------------------------------------------

    /// Produces panes tagged with the dialog kind and message, so tests
    /// can verify which content the window holds.
    struct FakeFactory;

    fn tag(pane: &DialogPane) -> &str {
        pane.downcast_ref::<String>().expect("test pane holds a String")
    }

    impl DialogFactory for FakeFactory {
        fn message_dialog(&mut self, message: &str) -> DialogPane {
            DialogPane::new(format!("message:{message}"))
        }

        fn confirmation_dialog(&mut self, message: &str) -> DialogPane {
            DialogPane::new(format!("confirm:{message}"))
        }

        fn input_dialog(&mut self, message: &str) -> DialogPane {
            DialogPane::new(format!("input:{message}"))
        }

        fn input_dialog_with_cancel(&mut self, message: &str) -> DialogPane {
            DialogPane::new(format!("input-cancel:{message}"))
        }

        fn error_dialog(&mut self, message: &str) -> DialogPane {
            DialogPane::new(format!("error:{message}"))
        }

        fn custom_dialog(&mut self, message: &str, content: DialogPane) -> DialogPane {
            DialogPane::new(format!("custom:{message}:{}", tag(&content)))
        }

        fn progress_dialog(&mut self, message: &str, _progress: &ProgressBinding) -> DialogPane {
            DialogPane::new(format!("progress:{message}"))
        }

        fn progress_dialog_indeterminate(&mut self, message: &str) -> DialogPane {
            DialogPane::new(format!("progress-ind:{message}"))
        }
    }

    fn service() -> (DialogService, Rc<RefCell<Vec<SceneCall>>>) {
        service_with_effect(None)
    }

    fn service_with_effect(
        effect: Option<SceneEffect>,
    ) -> (DialogService, Rc<RefCell<Vec<SceneCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let scene = FakeScene {
            calls: calls.clone(),
            effect,
        };
        (
            DialogService::new(Box::new(scene), Box::new(FakeFactory)),
            calls,
        )
    }

    //--- Overlay Lifecycle ------------------------------------------------

    #[test]
    fn first_show_blurs_and_pushes_overlay() {
        let (mut dialogs, calls) = service();

        dialogs.show_message("hello");

        assert!(dialogs.is_showing());
        assert_eq!(dialogs.title(), Some("Message"));
        assert_eq!(
            calls.borrow().as_slice(),
            &[
                SceneCall::Effect(Some(DIALOG_BG_BLUR)),
                SceneCall::Push,
                SceneCall::Focus,
            ]
        );
    }

    #[test]
    fn last_close_restores_effect_and_pops_overlay() {
        let (mut dialogs, calls) = service_with_effect(Some(SceneEffect::Dim { amount: 0.3 }));

        dialogs.show_message("hello");
        dialogs.close();

        assert!(!dialogs.is_showing());

        let calls = calls.borrow();
        let n = calls.len();
        assert_eq!(calls[n - 1], SceneCall::Pop);
        // Prior effect comes back exactly as saved.
        assert_eq!(
            calls[n - 2],
            SceneCall::Effect(Some(SceneEffect::Dim { amount: 0.3 }))
        );
    }

    #[test]
    fn nested_dialogs_share_one_overlay() {
        let (mut dialogs, calls) = service();

        dialogs.show_message("a");
        dialogs.show_message("b");
        dialogs.close();
        dialogs.close();

        let calls = calls.borrow();
        let pushes = calls.iter().filter(|c| **c == SceneCall::Push).count();
        let pops = calls.iter().filter(|c| **c == SceneCall::Pop).count();
        assert_eq!(pushes, 1);
        assert_eq!(pops, 1);
    }

    //--- Stack LIFO Property ----------------------------------------------

    #[test]
    fn close_restores_saved_dialogs_in_reverse_order() {
        let (mut dialogs, _calls) = service();

        dialogs.show_message("first");
        dialogs.show_error_message("second", || {});
        dialogs.show_input("third", |_| {});

        assert_eq!(dialogs.saved_count(), 2);
        assert_eq!(dialogs.title(), Some("Input"));
        assert_eq!(tag(dialogs.pane().unwrap()), "input:third");

        dialogs.close();
        assert_eq!(dialogs.title(), Some("Error"));
        assert_eq!(tag(dialogs.pane().unwrap()), "error:second");

        dialogs.close();
        assert_eq!(dialogs.title(), Some("Message"));
        assert_eq!(tag(dialogs.pane().unwrap()), "message:first");

        dialogs.close();
        assert!(!dialogs.is_showing());
        assert_eq!(dialogs.saved_count(), 0);
    }

    //--- Submit Semantics -------------------------------------------------

    #[test]
    fn confirmation_delivers_answer_after_close() {
        let (mut dialogs, _calls) = service();
        let answer = Rc::new(RefCell::new(None));
        let sink = answer.clone();

        dialogs.show_confirmation("sure?", move |yes| {
            *sink.borrow_mut() = Some(yes);
        });
        dialogs.submit(DialogResult::Confirmed(true));

        assert!(!dialogs.is_showing());
        assert_eq!(*answer.borrow(), Some(true));
    }

    #[test]
    fn submit_on_nested_dialog_restores_the_saved_one() {
        let (mut dialogs, _calls) = service();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        dialogs.show_message("base");
        dialogs.show_input("name?", move |value| sink.borrow_mut().push(value));

        dialogs.submit(DialogResult::Input("almas".into()));

        // The saved dialog is visible again and the callback ran.
        assert_eq!(dialogs.title(), Some("Message"));
        assert_eq!(seen.borrow().as_slice(), &["almas".to_string()]);
    }

    #[test]
    fn filtered_input_rejects_and_stays_open() {
        let (mut dialogs, _calls) = service();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        dialogs.show_input_filtered(
            "age?",
            |value| value.chars().all(|c| c.is_ascii_digit()),
            move |value| sink.borrow_mut().push(value),
        );

        dialogs.submit(DialogResult::Input("not a number".into()));
        assert!(dialogs.is_showing());
        assert!(seen.borrow().is_empty());

        dialogs.submit(DialogResult::Input("42".into()));
        assert!(!dialogs.is_showing());
        assert_eq!(seen.borrow().as_slice(), &["42".to_string()]);
    }

    #[test]
    fn cancel_maps_to_none() {
        let (mut dialogs, _calls) = service();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        dialogs.show_input_with_cancel("name?", |_| true, move |value| {
            sink.borrow_mut().push(value);
        });
        dialogs.submit(DialogResult::Cancelled);

        assert_eq!(seen.borrow().as_slice(), &[None::<String>]);
    }

    #[test]
    fn submit_without_dialog_is_tolerated() {
        let (mut dialogs, calls) = service();

        dialogs.submit(DialogResult::Ack);
        dialogs.close();

        assert!(calls.borrow().is_empty());
    }

    //--- Progress Boxes ---------------------------------------------------

    #[test]
    fn progress_box_closes_via_handle() {
        let (mut dialogs, _calls) = service();

        let handle = dialogs.show_progress("Loading assets");
        assert_eq!(dialogs.title(), Some("Progress"));

        dialogs.close_box(handle);
        assert!(!dialogs.is_showing());
    }

    #[test]
    fn bound_progress_box_fires_callback_on_submit() {
        let (mut dialogs, _calls) = service();
        let done = Rc::new(RefCell::new(false));
        let sink = done.clone();
        let progress = ProgressBinding::new();

        dialogs.show_progress_bound("Loading", &progress, move || {
            *sink.borrow_mut() = true;
        });
        dialogs.submit(DialogResult::Ack);

        assert!(*done.borrow());
    }

    //--- Key Confinement --------------------------------------------------

    #[test]
    fn traversal_keys_consumed_only_while_showing() {
        let (mut dialogs, _calls) = service();

        assert!(!dialogs.consumes_key(Key::Tab));

        dialogs.show_message("hello");
        assert!(dialogs.consumes_key(Key::Tab));
        assert!(dialogs.consumes_key(Key::Up));
        assert!(!dialogs.consumes_key(Key::Enter));

        dialogs.close();
        assert!(!dialogs.consumes_key(Key::Tab));
    }

    //--- Error Rendering --------------------------------------------------

    #[test]
    fn error_value_renders_display_text() {
        use std::fmt;

        #[derive(Debug)]
        struct LoadError;

        impl fmt::Display for LoadError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "level data corrupt")
            }
        }

        impl std::error::Error for LoadError {}

        let (mut dialogs, _calls) = service();
        dialogs.show_error(&LoadError);

        assert_eq!(dialogs.title(), Some("Error"));
        assert_eq!(tag(dialogs.pane().unwrap()), "error:level data corrupt");
    }

    #[test]
    fn custom_dialog_wraps_content() {
        let (mut dialogs, _calls) = service();

        let content = DialogPane::new(String::from("settings-form"));
        dialogs.show_custom("Options", content, || {});

        assert_eq!(dialogs.title(), Some("Dialog"));
        assert_eq!(tag(dialogs.pane().unwrap()), "custom:Options:settings-form");
    }
}

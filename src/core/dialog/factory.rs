//=========================================================================
// Dialog Content Factory
//=========================================================================
//
// Seam through which toolkit-specific dialog content is built.
//
// The overlay service never inspects content; it stores and restores
// opaque panes. Panes are type-erased so any toolkit widget tree fits
// behind the same interface.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::task::ProgressBinding;

//=== Dialog Pane =========================================================

/// Opaque dialog content.
///
/// Wraps whatever widget tree the host's [`DialogFactory`] produced.
/// The renderer recovers the concrete type via
/// [`DialogPane::downcast_ref`].
pub struct DialogPane {
    inner: Box<dyn Any>,
}

impl DialogPane {
    /// Wraps toolkit content into an opaque pane.
    pub fn new<T: 'static>(content: T) -> Self {
        Self {
            inner: Box::new(content),
        }
    }

    /// Recovers the concrete content type, if it matches.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Mutable variant of [`DialogPane::downcast_ref`].
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut::<T>()
    }
}

//=== Dialog Factory Trait ================================================

/// Builds toolkit-specific content for each dialog kind.
///
/// Implemented by the host against its widget toolkit. Button wiring is
/// the host's job: a button activation must end up as a
/// [`DialogService::submit`](crate::core::dialog::DialogService::submit)
/// call with the appropriate [`DialogResult`](crate::core::dialog::DialogResult).
pub trait DialogFactory {
    /// Message box with a single acknowledge button.
    fn message_dialog(&mut self, message: &str) -> DialogPane;

    /// Yes/no confirmation box.
    fn confirmation_dialog(&mut self, message: &str) -> DialogPane;

    /// Single-line input box with an accept button.
    fn input_dialog(&mut self, message: &str) -> DialogPane;

    /// Input box with an additional cancel button.
    fn input_dialog_with_cancel(&mut self, message: &str) -> DialogPane;

    /// Error box. `message` carries the rendered error text.
    fn error_dialog(&mut self, message: &str) -> DialogPane;

    /// Wraps caller-supplied content with a message and close button.
    fn custom_dialog(&mut self, message: &str, content: DialogPane) -> DialogPane;

    /// Progress box displaying the bound fraction.
    fn progress_dialog(&mut self, message: &str, progress: &ProgressBinding) -> DialogPane;

    /// Progress box with an indeterminate indicator.
    fn progress_dialog_indeterminate(&mut self, message: &str) -> DialogPane;
}

//=== Tests ===============================================================

//=========================================================================
// Scene Service Seam
//=========================================================================
//
// Boundary to the host toolkit's windowing and scene-stack facilities.
//
// The overlay layer never touches the scene graph directly. It asks the
// host to push/pop a modal overlay surface and to apply a full-scene
// visual effect while a dialog is up. Everything behind this trait
// (widgets, rendering, focus handling) belongs to the toolkit.
//
//=========================================================================

//=== Scene Effect ========================================================

/// Full-scene visual effect applied to the active scene.
///
/// Dialogs blur the scene behind the overlay; the previous effect is
/// saved and restored when the last dialog closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEffect {
    /// Box blur over the whole scene.
    BoxBlur {
        width: f64,
        height: f64,
        iterations: u32,
    },

    /// Uniform darkening of the scene, `amount` in `[0, 1]`.
    Dim { amount: f64 },
}

/// Blur applied behind the dialog overlay.
pub const DIALOG_BG_BLUR: SceneEffect = SceneEffect::BoxBlur {
    width: 5.0,
    height: 5.0,
    iterations: 3,
};

//=== Window Service Trait ================================================

/// Windowing/scene-stack operations consumed by the dialog overlay.
///
/// Implemented by the host application against its toolkit. The overlay
/// layer calls these in a fixed pattern: save effect, set blur, push
/// overlay, focus, then on final close: restore effect, pop overlay.
pub trait WindowService {
    /// Displays the modal overlay surface above the active scene.
    fn push_overlay(&mut self);

    /// Removes the modal overlay surface.
    fn pop_overlay(&mut self);

    /// Returns the effect currently applied to the active scene, if any.
    fn effect(&self) -> Option<SceneEffect>;

    /// Applies (or clears, with `None`) a full-scene effect.
    fn set_effect(&mut self, effect: Option<SceneEffect>);

    /// Moves keyboard focus into the overlay content.
    fn request_focus(&mut self);
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_blur_parameters() {
        match DIALOG_BG_BLUR {
            SceneEffect::BoxBlur {
                width,
                height,
                iterations,
            } => {
                assert_eq!(width, 5.0);
                assert_eq!(height, 5.0);
                assert_eq!(iterations, 3);
            }
            _ => panic!("dialog background effect should be a box blur"),
        }
    }

    #[test]
    fn effects_compare_by_value() {
        let a = SceneEffect::Dim { amount: 0.5 };
        let b = SceneEffect::Dim { amount: 0.5 };
        assert_eq!(a, b);
        assert_ne!(a, DIALOG_BG_BLUR);
    }
}

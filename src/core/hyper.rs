//! src/core/hyper.rs
//!
//! Hyper-key chord emulation
//!
//! Turns one physical key into a chord generator with tap/hold
//! disambiguation. Holding the key stands in for the whole chord;
//! tapping it alone fires a fallback action instead. The temporal
//! disambiguation itself runs inside the daemon; this module only
//! compiles the data that drives it (wildcard optional matching, the
//! alone-action, and the lazy flag).
//!
//! The emulator also emits an inverse manipulator so the source key's
//! native meaning stays reachable while the emulation is active: the
//! fallback's own key pressed together with the full chord maps back to
//! the source key plus a restore modifier.

use crate::core::types::{ActionTarget, KeyIdentifier, Manipulator, ModifierFlag, TriggerSpec};
use crate::core::validator::ValidationError;

/// Synthesizes chord-emitting manipulators from a single source key.
///
/// # Example
///
/// ```
/// use karabiner_chord_compiler::core::hyper::HyperKeyEmulator;
/// use karabiner_chord_compiler::core::types::{ActionTarget, ModifierFlag};
///
/// let manipulators = HyperKeyEmulator::new(
///     "caps_lock",
///     vec![
///         ModifierFlag::RightShift,
///         ModifierFlag::RightCommand,
///         ModifierFlag::RightOption,
///         ModifierFlag::RightControl,
///     ],
///     ActionTarget::key("escape"),
/// )
/// .lazy(true)
/// .manipulators()?;
///
/// assert_eq!(manipulators.len(), 2);
/// # Ok::<(), karabiner_chord_compiler::core::validator::ValidationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct HyperKeyEmulator {
    /// The physical key being repurposed
    source: KeyIdentifier,
    /// Target chord, in declaration order; the head flag doubles as the
    /// held key code
    chord: Vec<ModifierFlag>,
    /// Fired when the key is tapped alone
    fallback: ActionTarget,
    /// Defer the fallback until key-up so a chord in progress suppresses it
    lazy: bool,
    /// Modifier added by the inverse manipulator when restoring the
    /// source key's native meaning
    restore_modifier: ModifierFlag,
}

impl HyperKeyEmulator {
    /// Creates an emulator for `source` producing `chord`, with `fallback`
    /// as the tap action.
    pub fn new(
        source: impl Into<KeyIdentifier>,
        chord: Vec<ModifierFlag>,
        fallback: ActionTarget,
    ) -> Self {
        Self {
            source: source.into(),
            chord,
            fallback,
            lazy: false,
            restore_modifier: ModifierFlag::LeftControl,
        }
    }

    /// Sets the lazy flag: the fallback is deferred until key-up, so the
    /// alone branch is suppressed entirely when another key joins the hold.
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Overrides the modifier carried by the inverse manipulator.
    pub fn restore_with(mut self, modifier: ModifierFlag) -> Self {
        self.restore_modifier = modifier;
        self
    }

    /// Compiles the emulation into manipulators.
    ///
    /// The primary manipulator matches the source key with wildcard
    /// optionality, so unrelated modifier combinations pass through to
    /// chord emission unchanged instead of re-triggering the fallback.
    /// When the fallback is a key remap, a second, inverse manipulator
    /// maps fallback-key + chord back to the source key plus the restore
    /// modifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyChord` for an empty chord and
    /// `ValidationError::UnsidedChordHead` when the first chord flag has
    /// no concrete key code of its own.
    pub fn manipulators(&self) -> Result<Vec<Manipulator>, ValidationError> {
        let head = *self.chord.first().ok_or(ValidationError::EmptyChord)?;
        if !head.is_sided() {
            return Err(ValidationError::UnsidedChordHead(head));
        }

        let chord_hold = ActionTarget::key_with(head.name(), self.chord[1..].to_vec());

        let primary = Manipulator {
            trigger: TriggerSpec::bare(self.source.clone()).with_optional_any(),
            action: chord_hold,
            alone_action: Some(self.fallback.clone()),
            lazy: self.lazy,
        };

        let mut manipulators = vec![primary];

        // Fallback-key + chord restores the source key's literal effect
        if let ActionTarget::RemapKey { key, .. } = &self.fallback {
            let inverse = Manipulator::new(
                TriggerSpec::new(key.clone(), self.chord.clone()),
                ActionTarget::key_with(self.source.clone(), vec![self.restore_modifier]),
            );
            manipulators.push(inverse);
        }

        Ok(manipulators)
    }
}

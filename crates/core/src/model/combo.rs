use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical encoding of a simultaneous key press.
///
/// Lowercase tokens joined by `+`, modifiers first in the fixed order
/// ctrl, alt, meta, shift, then the primary key: `"ctrl+arrowright"`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combo(String);

impl Combo {
    /// Creates a combo from a catalog literal such as `"ctrl+x"`.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.to_ascii_lowercase())
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the individual tokens of the combo.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split('+')
    }
}

impl fmt::Debug for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Combo({})", self.0)
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded physical key event: modifier flags plus an optional primary key.
///
/// The primary key is `None` when the event carried only modifiers (for
/// example a bare Shift press); such chords do not normalize to a combo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
    pub key: Option<String>,
}

impl KeyChord {
    /// Creates a chord with only a primary key.
    #[must_use]
    pub fn of(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Returns true when the chord has no resolvable primary key.
    #[must_use]
    pub fn is_modifier_only(&self) -> bool {
        self.key.as_deref().is_none_or(|k| k.trim().is_empty())
    }

    /// Normalizes the chord into its canonical combo.
    ///
    /// Modifier tokens are emitted in the fixed order ctrl, alt, meta, shift
    /// regardless of physical press order; the primary key is lowercased.
    /// Returns `None` for bare-modifier chords.
    #[must_use]
    pub fn normalize(&self) -> Option<Combo> {
        let key = self.key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        let key = key.to_lowercase();

        let mut tokens: Vec<&str> = Vec::with_capacity(5);
        if self.ctrl {
            tokens.push("ctrl");
        }
        if self.alt {
            tokens.push("alt");
        }
        if self.meta {
            tokens.push("meta");
        }
        if self.shift {
            tokens.push("shift");
        }
        tokens.push(&key);

        Some(Combo(tokens.join("+")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_orders_modifiers_canonically() {
        let chord = KeyChord::of("ArrowRight").with_shift().with_ctrl();
        assert_eq!(chord.normalize().unwrap().as_str(), "ctrl+shift+arrowright");
    }

    #[test]
    fn normalize_lowercases_primary_key() {
        let chord = KeyChord::of("F").with_ctrl();
        assert_eq!(chord.normalize().unwrap().as_str(), "ctrl+f");
    }

    #[test]
    fn normalize_single_modifier_and_key() {
        let chord = KeyChord::of("ArrowRight").with_ctrl();
        assert_eq!(chord.normalize().unwrap().as_str(), "ctrl+arrowright");
    }

    #[test]
    fn bare_modifier_chord_does_not_normalize() {
        let chord = KeyChord {
            shift: true,
            ..KeyChord::default()
        };
        assert!(chord.is_modifier_only());
        assert_eq!(chord.normalize(), None);
    }

    #[test]
    fn full_modifier_order_is_ctrl_alt_meta_shift() {
        let chord = KeyChord::of("k")
            .with_shift()
            .with_meta()
            .with_alt()
            .with_ctrl();
        assert_eq!(chord.normalize().unwrap().as_str(), "ctrl+alt+meta+shift+k");
    }

    #[test]
    fn combo_equality_against_catalog_literal() {
        let typed = KeyChord::of("Enter").with_shift().normalize().unwrap();
        assert_eq!(typed, Combo::new("shift+enter"));
    }
}

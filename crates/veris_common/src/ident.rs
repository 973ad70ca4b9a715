//! Interned names and Verilog identifier validation.
//!
//! Every name in a design (modules, ports, signals, state constants) flows
//! through the [`Interner`], so the CST can hold copyable [`Ident`] handles
//! instead of owned strings. [`is_valid_identifier`] checks the Verilog
//! lexical rules for names that arrive from outside the lexer, such as state
//! names edited in the FSM canvas.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// Returns `true` if `s` is lexically a Verilog identifier: a leading
/// ASCII letter or underscore, then letters, digits, underscores, or `$`.
///
/// This mirrors what the lexer accepts. Names produced by parsing are valid
/// by construction; this check is for names supplied by an embedding editor,
/// which can contain anything.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

/// A handle to an interned name.
///
/// The wrapped `u32` indexes into the [`Interner`] that produced it, so two
/// handles from the same interner are equal exactly when their text is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Builds an `Ident` from its raw index. Meant for deserialization and
    /// for tests that fabricate trees; real handles come from
    /// [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The raw index of this handle.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: the wrapped `u32` always fits in `usize` on the platforms veris
// targets, and `try_from_usize` rejects anything that cannot round-trip.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Deduplicating name storage shared across an analysis session.
///
/// Backed by [`lasso::ThreadedRodeo`], so a session can run analyses on
/// independent inputs from several threads against one interner.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns `s`, reusing the existing handle when the text was seen
    /// before.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the text behind a handle.
    ///
    /// # Panics
    ///
    /// Panics when the handle came from a different interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        assert!(is_valid_identifier("clk"));
        assert!(is_valid_identifier("_reset_n"));
        assert!(is_valid_identifier("STATE_IDLE"));
        assert!(is_valid_identifier("data$out"));
        assert!(is_valid_identifier("s101"));
    }

    #[test]
    fn invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2bad"));
        assert!(!is_valid_identifier("has space"));
        assert!(!is_valid_identifier("$display"));
        assert!(!is_valid_identifier("state-1"));
        assert!(!is_valid_identifier("über"));
    }

    #[test]
    fn keywords_are_lexically_identifiers() {
        // Keyword-ness is the lexer's concern; lexically "module" is fine.
        assert!(is_valid_identifier("module"));
    }

    #[test]
    fn interning_deduplicates() {
        let interner = Interner::new();
        let a = interner.get_or_intern("next_state");
        let b = interner.get_or_intern("next_state");
        let c = interner.get_or_intern("current_state");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "next_state");
        assert_eq!(interner.resolve(c), "current_state");
    }

    #[test]
    fn raw_roundtrip() {
        let id = Ident::from_raw(7);
        assert_eq!(id.as_raw(), 7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<Ident>(&json).unwrap(), id);
    }
}

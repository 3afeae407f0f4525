//! Glyph ramps: brightness-ordered character sets.

use std::fmt;

use crate::error::ValidationError;

/// Standard ASCII density ramp (10 levels).
/// Characters ordered from darkest (space) to brightest (@).
/// Works well on dark terminals.
pub const STANDARD_CHARSET: &str = " .:-=+*#%@";

/// Fine-grained ASCII ramp (70 levels) for large outputs.
pub const DETAILED_CHARSET: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Block character set (5 levels) using Unicode shades.
pub const BLOCKS_CHARSET: &str = " ░▒▓█";

/// Minimal character set (4 levels).
/// Clean, less noisy look.
pub const MINIMAL_CHARSET: &str = " .:#";

/// Built-in ramp presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Standard ASCII density ramp (10 levels)
    #[default]
    Standard,
    /// Paul Bourke's 70-level ramp
    Detailed,
    /// Unicode shade blocks (5 levels)
    Blocks,
    /// Minimal ramp (4 levels)
    Minimal,
}

impl CharSet {
    /// Characters of this preset, darkest first.
    pub fn chars(&self) -> &'static str {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Detailed => DETAILED_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Detailed => "detailed",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }

    /// Look up a preset by name, as written in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(CharSet::Standard),
            "detailed" => Some(CharSet::Detailed),
            "blocks" => Some(CharSet::Blocks),
            "minimal" => Some(CharSet::Minimal),
            _ => None,
        }
    }

    pub fn ramp(&self) -> Ramp {
        Ramp(self.chars().chars().collect())
    }
}

/// A non-empty, brightness-ascending sequence of glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp(Vec<char>);

impl Ramp {
    /// Build a ramp from a string, one glyph per `char`.
    pub fn new(chars: &str) -> Result<Self, ValidationError> {
        if chars.is_empty() {
            return Err(ValidationError::EmptyRamp);
        }
        Ok(Self(chars.chars().collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Darkest glyph.
    pub fn first(&self) -> char {
        self.0[0]
    }

    /// Brightest glyph.
    pub fn last(&self) -> char {
        self.0[self.0.len() - 1]
    }

    pub fn get(&self, index: usize) -> char {
        self.0[index.min(self.0.len() - 1)]
    }

    pub fn as_slice(&self) -> &[char] {
        &self.0
    }
}

impl Default for Ramp {
    fn default() -> Self {
        CharSet::Standard.ramp()
    }
}

impl fmt::Display for Ramp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

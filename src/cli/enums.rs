//! CLI enum types for character set and filter options.

use clap::ValueEnum;

use crate::ascii;

/// ASCII character set for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Detailed,
    Blocks,
    Minimal,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => ascii::CharSet::Standard,
            CharacterSet::Detailed => ascii::CharSet::Detailed,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
            CharacterSet::Minimal => ascii::CharSet::Minimal,
        }
    }
}

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterArg {
    #[default]
    Nearest,
    Bilinear,
}

impl From<FilterArg> for ascii::Filter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::Nearest => ascii::Filter::Nearest,
            FilterArg::Bilinear => ascii::Filter::Bilinear,
        }
    }
}

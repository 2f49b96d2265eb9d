//! Source-span tokens and the locator boundary
//!
//! Positions are opaque to this layer: translators obtain them from a
//! [`Locator`] and attach them to nodes and entities, but never compute
//! them here. The bundled [`LineColumnLocator`] is a plain passthrough for
//! front ends that already track line/column spans; richer locator services
//! live outside this crate.

use serde::Serialize;
use std::fmt;

/// A source span from (first_line, first_col) to (last_line, last_col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub first_line: u32,
    pub first_col: u32,
    pub last_line: u32,
    pub last_col: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.first_line, self.first_col, self.last_line, self.last_col
        )
    }
}

/// External service converting raw source coordinates into span tokens
pub trait Locator {
    fn make_location(
        &self,
        first_line: u32,
        first_col: u32,
        last_line: u32,
        last_col: u32,
    ) -> Position;
}

/// Passthrough locator for front ends that track line/column directly
#[derive(Debug, Default, Clone, Copy)]
pub struct LineColumnLocator;

impl Locator for LineColumnLocator {
    fn make_location(
        &self,
        first_line: u32,
        first_col: u32,
        last_line: u32,
        last_col: u32,
    ) -> Position {
        Position {
            first_line,
            first_col,
            last_line,
            last_col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_locator() {
        let pos = LineColumnLocator.make_location(1, 4, 2, 9);
        assert_eq!(pos.to_string(), "1:4-2:9");
    }
}

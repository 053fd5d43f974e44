//! Source locations, carried by every AST node for error reporting.

/// A single point in a source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Position {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A span between two positions.
///
/// Generated terms (produced by a transformer rather than read from source)
/// reuse the location of the statement that produced them, matching the
/// original's practice of threading `location` through every rewrite.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub begin: Position,
    pub end: Position,
}

impl Location {
    pub fn new(begin: Position, end: Position) -> Self {
        Location { begin, end }
    }

    /// A degenerate location for a single point, used by generated nodes.
    pub fn at(pos: Position) -> Self {
        Location {
            end: pos.clone(),
            begin: pos,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.begin.line == self.end.line {
            if self.begin.column == self.end.column {
                write!(
                    f,
                    "{}:{}:{}",
                    self.begin.file, self.begin.line, self.begin.column
                )
            } else {
                write!(
                    f,
                    "{}:{}:{}-{}",
                    self.begin.file, self.begin.line, self.begin.column, self.end.column
                )
            }
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.begin.file,
                self.begin.line,
                self.begin.column,
                self.end.line,
                self.end.column
            )
        }
    }
}

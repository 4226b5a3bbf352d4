#![forbid(unsafe_code)]

pub mod location {
    use serde::Serialize;
    use std::sync::Arc;

    /// A region of source text, 1-based. `end_column` is exclusive.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
    pub struct SourceLocation {
        pub line: usize,
        pub column: usize,
        pub end_line: usize,
        pub end_column: usize,
        pub filename: Arc<str>,
    }

    impl SourceLocation {
        pub fn new(filename: Arc<str>, line: usize, column: usize, end_column: usize) -> Self {
            Self {
                line,
                column,
                end_line: line,
                end_column,
                filename,
            }
        }

        /// A location with no file and position 1:1, for values built outside the parser.
        pub fn unknown() -> Self {
            Self::new(Arc::from("<unknown>"), 1, 1, 2)
        }

        /// Smallest location covering both `self` and `other`.
        pub fn to(&self, other: &SourceLocation) -> SourceLocation {
            let (end_line, end_column) = if (other.end_line, other.end_column)
                > (self.end_line, self.end_column)
            {
                (other.end_line, other.end_column)
            } else {
                (self.end_line, self.end_column)
            };
            SourceLocation {
                line: self.line,
                column: self.column,
                end_line,
                end_column,
                filename: self.filename.clone(),
            }
        }

        /// Width of the underline drawn for this location on its first line.
        pub fn width(&self) -> usize {
            if self.end_line == self.line {
                self.end_column.saturating_sub(self.column).max(1)
            } else {
                1
            }
        }
    }

    impl std::fmt::Display for SourceLocation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        }
    }
}

pub mod ast;
mod display;

#[cfg(test)]
mod tests {
    use super::location::SourceLocation;
    use std::sync::Arc;

    #[test]
    fn width_is_at_least_one() {
        let loc = SourceLocation::new(Arc::from("t.vic"), 3, 5, 5);
        assert_eq!(loc.width(), 1);
        let loc = SourceLocation::new(Arc::from("t.vic"), 3, 5, 9);
        assert_eq!(loc.width(), 4);
    }

    #[test]
    fn to_covers_both_ends() {
        let a = SourceLocation::new(Arc::from("t.vic"), 1, 1, 4);
        let b = SourceLocation::new(Arc::from("t.vic"), 2, 3, 7);
        let c = a.to(&b);
        assert_eq!((c.line, c.column, c.end_line, c.end_column), (1, 1, 2, 7));
        assert_eq!(c.to_string(), "t.vic:1:1");
    }
}

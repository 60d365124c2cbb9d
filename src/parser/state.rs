use std::fmt;
use std::rc::Rc;

/// A (line, column) location in the source text, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: i32,
    pub column: i32,
}

impl Position {
    /// Marks results that were never anchored to real input.
    pub const NULL: Position = Position {
        line: -1,
        column: -1,
    };

    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    pub fn is_null(&self) -> bool {
        self.line < 0
    }

    /// Position after reading `c`.
    pub fn advance(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// A window into the source text.
///
/// Cloning is cheap: the text is shared and only the byte range and
/// position are copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    source: Rc<str>,
    start: usize,
    end: usize,
    position: Position,
}

impl Input {
    pub fn new(text: &str) -> Self {
        Self {
            source: Rc::from(text),
            start: 0,
            end: text.len(),
            position: Position::start(),
        }
    }

    /// The unconsumed text.
    pub fn rest(&self) -> &str {
        &self.source[self.start..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of characters left.
    pub fn len(&self) -> usize {
        self.rest().chars().count()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Consume one character, returning it with the remaining input.
    pub fn advance(&self) -> Option<(char, Input)> {
        let c = self.peek()?;
        let next = Input {
            source: Rc::clone(&self.source),
            start: self.start + c.len_utf8(),
            end: self.end,
            position: self.position.advance(c),
        };
        Some((c, next))
    }

    /// Byte range of this window within its source text.
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Whether both windows look into the same source text.
    pub fn same_source(&self, other: &Input) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
    }

    /// The part of this window that lies before `suffix` begins.
    pub fn up_to(&self, suffix: &Input) -> Input {
        Input {
            source: Rc::clone(&self.source),
            start: self.start,
            end: suffix.start.clamp(self.start, self.end),
            position: self.position,
        }
    }

    /// Split after `chars` characters into (prefix, suffix). The prefix ends
    /// where the suffix begins, so a parser run on it cannot look past the cut.
    pub fn split_at(&self, chars: usize) -> (Input, Input) {
        let mut suffix = self.clone();
        for _ in 0..chars {
            match suffix.advance() {
                Some((_, next)) => suffix = next,
                None => break,
            }
        }
        (self.up_to(&suffix), suffix)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rest())
    }
}

/// A successful match: the payload, where it started, and what is left.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub position: Position,
    pub remainder: Input,
}

impl<T> Parsed<T> {
    pub fn new(value: T, position: Position, remainder: Input) -> Self {
        Self {
            value,
            position,
            remainder,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            position: self.position,
            remainder: self.remainder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub expected: Option<String>,
    pub found: Option<String>,
    pub position: Position,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            expected: None,
            found: None,
            position: Position::NULL,
        }
    }

    pub fn end_of_input() -> Self {
        Self::new("reached end of input string")
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.found, &self.expected) {
            (Some(found), Some(expected)) => {
                write!(f, "{found} does not match expected {expected}")?
            }
            (None, Some(expected)) => write!(f, "{}, expected {expected}", self.message)?,
            _ => f.write_str(&self.message)?,
        }
        if !self.position.is_null() {
            write!(f, " at {}", self.position)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<Parsed<T>, ParseError>;

/// Accessors mirroring the match-result vocabulary used throughout the grammar.
pub trait MatchResult<T> {
    fn success(&self) -> bool;

    fn failed(&self) -> bool {
        !self.success()
    }

    fn value(&self) -> Option<&T>;

    fn remainder(&self) -> Option<&Input>;
}

impl<T> MatchResult<T> for ParseResult<T> {
    fn success(&self) -> bool {
        self.is_ok()
    }

    fn value(&self) -> Option<&T> {
        self.as_ref().ok().map(|parsed| &parsed.value)
    }

    fn remainder(&self) -> Option<&Input> {
        self.as_ref().ok().map(|parsed| &parsed.remainder)
    }
}

pub trait Parser<T>: Sized {
    fn parse(&self, input: Input) -> ParseResult<T>;
}

// Allow closures to be parsers
impl<T, F: Fn(Input) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, input: Input) -> ParseResult<T> {
        self(input)
    }
}

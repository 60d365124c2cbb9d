use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use super::state::{Input, ParseError, ParseResult, Parsed, Parser};

type ParserFn<T> = Rc<dyn Fn(Input) -> ParseResult<T>>;
type Combiner<T> = Rc<dyn Fn(T, T) -> T>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |input| parser.parse(input)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, input: Input) -> ParseResult<T> {
        (self.parser)(input)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other on the remainder, merging both values with `combine`
    pub fn then_with<U: 'static, V: 'static, F>(
        self,
        other: BoxedParser<U>,
        combine: F,
    ) -> BoxedParser<V>
    where
        F: Fn(T, U) -> V + 'static,
    {
        BoxedParser::new(move |input: Input| {
            let a = self.parse(input)?;
            let b = other.parse(a.remainder)?;
            Ok(Parsed::new(combine(a.value, b.value), a.position, b.remainder))
        })
    }

    /// Sequence: parse self then other, return (T, U)
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        self.then_with(other, |a, b| (a, b))
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.then_with(other, |a, _| a)
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.then_with(other, |_, b| b)
    }

    /// Both: run self and other on the same input (logical AND). The
    /// remainder is the one left by `other`.
    pub fn both<U: 'static, V: 'static, F>(
        self,
        other: BoxedParser<U>,
        combine: F,
    ) -> BoxedParser<V>
    where
        F: Fn(T, U) -> V + 'static,
    {
        BoxedParser::new(move |input: Input| {
            let a = self.parse(input.clone())?;
            let b = other.parse(input)?;
            Ok(Parsed::new(combine(a.value, b.value), a.position, b.remainder))
        })
    }

    /// Map: transform result
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |input: Input| Ok(self.parse(input)?.map(&f)))
    }

    /// Replace the value of a successful match
    pub fn replace<U: Clone + 'static>(self, value: U) -> BoxedParser<U> {
        self.map(move |_| value.clone())
    }

    /// Map with a fallible transformation; an `Err` turns the match into a
    /// failure anchored at the start of the match.
    pub fn try_map<U: 'static, F>(self, f: F) -> BoxedParser<U>
    where
        F: Fn(T) -> Result<U, String> + 'static,
    {
        BoxedParser::new(move |input: Input| {
            let parsed = self.parse(input)?;
            match f(parsed.value) {
                Ok(value) => Ok(Parsed::new(value, parsed.position, parsed.remainder)),
                Err(msg) => Err(ParseError::new(msg).at(parsed.position)),
            }
        })
    }

    /// Choice: try self, if fails try other on the original input
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |input: Input| match self.parse(input.clone()) {
            Ok(a) => Ok(a),
            Err(_) => other.parse(input),
        })
    }

    /// Add a label to this parser for better error messages
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        self.map_err(move |mut err| {
            err.expected = Some(name.to_string());
            err
        })
    }

    /// Rewrite the diagnostic of a failed match
    pub fn map_err<F: Fn(ParseError) -> ParseError + 'static>(self, f: F) -> BoxedParser<T> {
        BoxedParser::new(move |input: Input| self.parse(input).map_err(&f))
    }

    /// Succeed only if nothing is left over
    pub fn consume_all(self) -> BoxedParser<T> {
        BoxedParser::new(move |input: Input| {
            let parsed = self.parse(input)?;
            if parsed.remainder.is_empty() {
                Ok(parsed)
            } else {
                Err(ParseError::new("unexpected trailing input")
                    .expected("end of input")
                    .found(format!("{:?}", parsed.remainder.rest()))
                    .at(parsed.remainder.position()))
            }
        })
    }
}

// === Memoization ===

/// Results of one parser keyed by the byte range of the window it ran on.
///
/// Entries are only valid for a single source text; the table empties itself
/// as soon as a window from a different text comes through.
pub struct Memo<T> {
    source: Option<Input>,
    entries: HashMap<(usize, usize), ParseResult<T>>,
}

/// A memo table shared by every copy of a parser
pub type MemoTable<T> = Rc<RefCell<Memo<T>>>;

impl<T: Clone> Memo<T> {
    pub fn table() -> MemoTable<T> {
        Rc::new(RefCell::new(Memo::default()))
    }

    fn lookup(&mut self, input: &Input) -> Option<ParseResult<T>> {
        let known = matches!(&self.source, Some(source) if source.same_source(input));
        if !known {
            self.entries.clear();
            self.source = Some(input.clone());
            return None;
        }
        self.entries.get(&input.span()).cloned()
    }

    fn store(&mut self, input: &Input, result: ParseResult<T>) {
        self.entries.insert(input.span(), result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            source: None,
            entries: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<T: Clone + 'static> BoxedParser<T> {
    /// Run the parser at most once per input window, replaying the stored
    /// result afterwards
    pub fn memoize(self, memo: MemoTable<T>) -> BoxedParser<T> {
        BoxedParser::new(move |input: Input| {
            let cached = memo.borrow_mut().lookup(&input);
            if let Some(result) = cached {
                return result;
            }
            let result = self.parse(input.clone());
            memo.borrow_mut().store(&input, result.clone());
            result
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Constant parsers ===

/// Succeed without consuming, producing a fresh value each time
pub fn always_with<T: 'static, F: Fn() -> T + 'static>(f: F) -> BoxedParser<T> {
    BoxedParser::new(move |input: Input| Ok(Parsed::new(f(), input.position(), input)))
}

/// Succeed without consuming
pub fn always<T: Clone + 'static>(value: T) -> BoxedParser<T> {
    always_with(move || value.clone())
}

/// Fail without consuming
pub fn fail<T: 'static>(message: &'static str) -> BoxedParser<T> {
    BoxedParser::new(move |input: Input| Err(ParseError::new(message).at(input.position())))
}

/// Negative lookahead: succeeds without consuming when `parser` fails
pub fn not<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<()> {
    BoxedParser::new(move |input: Input| match parser.parse(input.clone()) {
        Ok(parsed) => Err(ParseError::new("unexpected match")
            .found(format!("{:?}", parsed_text(&input, &parsed.remainder)))
            .at(input.position())),
        Err(_) => Ok(Parsed::new((), input.position(), input)),
    })
}

fn parsed_text<'a>(input: &'a Input, remainder: &Input) -> &'a str {
    let rest = input.rest();
    &rest[..rest.len() - remainder.rest().len()]
}

// === Binary combinators ===

pub fn sequence<T: 'static, U: 'static, V: 'static, F>(
    a: BoxedParser<T>,
    b: BoxedParser<U>,
    combine: F,
) -> BoxedParser<V>
where
    F: Fn(T, U) -> V + 'static,
{
    a.then_with(b, combine)
}

pub fn alternative<T: 'static>(a: BoxedParser<T>, b: BoxedParser<T>) -> BoxedParser<T> {
    a.or(b)
}

pub fn both<T: 'static, U: 'static, V: 'static, F>(
    a: BoxedParser<T>,
    b: BoxedParser<U>,
    combine: F,
) -> BoxedParser<V>
where
    F: Fn(T, U) -> V + 'static,
{
    a.both(b, combine)
}

/// `a` followed by `b`, or else just `a`, or else just `b`
pub fn inclusive_or<T: 'static, F>(
    a: BoxedParser<T>,
    b: BoxedParser<T>,
    combine: F,
) -> BoxedParser<T>
where
    F: Fn(T, T) -> T + 'static,
{
    sequence(a.clone(), b.clone(), combine) | a | b
}

// === N-ary combinators ===

/// Sequence over a list, right-folding the values with `combine`
pub fn chain<T: 'static, F>(parsers: Vec<BoxedParser<T>>, combine: F) -> BoxedParser<T>
where
    F: Fn(T, T) -> T + 'static,
{
    fold_chain(parsers, Rc::new(combine))
}

fn fold_chain<T: 'static>(
    mut parsers: Vec<BoxedParser<T>>,
    combine: Combiner<T>,
) -> BoxedParser<T> {
    match parsers.len() {
        0 => fail("empty chain"),
        1 => parsers.remove(0),
        _ => {
            let first = parsers.remove(0);
            let rest = fold_chain(parsers, Rc::clone(&combine));
            first.then_with(rest, move |a, b| combine(a, b))
        }
    }
}

/// Sequence over a list, keeping only the value at `index` (the last one
/// when `index` is out of range)
pub fn select_chain<T: 'static>(mut parsers: Vec<BoxedParser<T>>, index: usize) -> BoxedParser<T> {
    match parsers.len() {
        0 => fail("empty chain"),
        1 => parsers.remove(0),
        _ => {
            let first = parsers.remove(0);
            if index == 0 {
                first.skip(select_chain(parsers, 0))
            } else {
                first.skip_left(select_chain(parsers, index - 1))
            }
        }
    }
}

/// Ordered choice over a list; the first success wins
pub fn alternative_chain<T: 'static>(mut parsers: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    match parsers.len() {
        0 => fail("empty alternative"),
        1 => parsers.remove(0),
        _ => {
            let first = parsers.remove(0);
            first | alternative_chain(parsers)
        }
    }
}

// === Repetition ===

/// Optional: parse zero or one
pub fn zero_or_one<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    (parser >> Some) | always_with(|| None)
}

/// One or more occurrences, folded with `combine`
pub fn one_or_more_with<T: 'static, F>(parser: BoxedParser<T>, combine: F) -> BoxedParser<T>
where
    F: Fn(T, T) -> T + 'static,
{
    repeat(parser, Rc::new(combine))
}

fn repeat<T: 'static>(parser: BoxedParser<T>, combine: Combiner<T>) -> BoxedParser<T> {
    BoxedParser::new(move |input: Input| {
        let step = Rc::clone(&combine);
        let more = parser
            .clone()
            .then_with(repeat(parser.clone(), Rc::clone(&combine)), move |a, b| step(a, b));
        (more | parser.clone()).parse(input)
    })
}

/// Zero or more occurrences, folded with `combine`; `T::default()` when none match
pub fn zero_or_more_with<T: Default + 'static, F>(
    parser: BoxedParser<T>,
    combine: F,
) -> BoxedParser<T>
where
    F: Fn(T, T) -> T + 'static,
{
    one_or_more_with(parser, combine) | always_with(T::default)
}

/// Parse one or more occurrences
pub fn one_or_more<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    one_or_more_with(parser >> |item| vec![item], concat_vec)
}

/// Parse zero or more occurrences
pub fn zero_or_more<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    zero_or_more_with(parser >> |item| vec![item], concat_vec)
}

fn concat_vec<T>(mut head: Vec<T>, tail: Vec<T>) -> Vec<T> {
    head.extend(tail);
    head
}

/// Repeat `item` until `stop` matches. `stop`'s value is folded into the result.
pub fn zero_or_more_until<T: 'static, F>(
    item: BoxedParser<T>,
    stop: BoxedParser<T>,
    combine: F,
) -> BoxedParser<T>
where
    F: Fn(T, T) -> T + 'static,
{
    until(item, stop, Rc::new(combine))
}

/// Like [`zero_or_more_until`], but `item` must match at least once
pub fn one_or_more_until<T: 'static, F>(
    item: BoxedParser<T>,
    stop: BoxedParser<T>,
    combine: F,
) -> BoxedParser<T>
where
    F: Fn(T, T) -> T + 'static,
{
    let combine: Combiner<T> = Rc::new(combine);
    let step = Rc::clone(&combine);
    item.clone()
        .then_with(until(item, stop, combine), move |a, b| step(a, b))
}

fn until<T: 'static>(
    item: BoxedParser<T>,
    stop: BoxedParser<T>,
    combine: Combiner<T>,
) -> BoxedParser<T> {
    BoxedParser::new(move |input: Input| {
        let step = Rc::clone(&combine);
        let more = item.clone().then_with(
            until(item.clone(), stop.clone(), Rc::clone(&combine)),
            move |a, b| step(a, b),
        );
        (stop.clone() | more).parse(input)
    })
}

// === Search ===

/// Find the first split point (shortest prefix first) where `right` matches
/// the suffix and `left` consumes the whole prefix.
///
/// Split points run from one character up to one short of the full input,
/// so both sides always get at least one character. The order decides which
/// operand grouping wins and must stay shortest-first.
pub fn backtracking_search<T: 'static, U: 'static, V: 'static, F>(
    left: BoxedParser<T>,
    right: BoxedParser<U>,
    combine: F,
) -> BoxedParser<V>
where
    F: Fn(T, U) -> V + 'static,
{
    let left = left.consume_all();
    BoxedParser::new(move |input: Input| {
        let mut suffix = input.clone();
        while let Some((_, next)) = suffix.advance() {
            suffix = next;
            if suffix.is_empty() {
                break;
            }
            let Ok(b) = right.parse(suffix.clone()) else {
                continue;
            };
            if let Ok(a) = left.parse(input.up_to(&suffix)) {
                return Ok(Parsed::new(combine(a.value, b.value), a.position, b.remainder));
            }
        }
        Err(ParseError::new("no split point matches both operands").at(input.position()))
    })
}

use bumpalo::collections::Vec as BumpVec;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char as token,
    combinator::{
        iterator,
        value,
    },
    sequence::{
        delimited,
        preceded,
    },
    IResult,
    Parser,
};
use nom_supreme::{
    error::ErrorTree,
    ParserExt,
};
use thiserror::Error;
use tracing::instrument;

use crate::ast::{
    assignment::{
        AssignmentList,
        OwnershipConflict,
    },
    ASTAllocator,
};

pub mod assignment;
pub mod comments;
pub mod identifiers;
pub mod value;

use self::comments::parse_comment;

#[derive(Debug, Error)]
#[error("Errors parsing assignments: {errors:#}")]
pub struct ChunkParseError {
    pub errors: ErrorTree<LfParseError>,
}

impl ChunkParseError {
    /// The location the parser got furthest to before failing, along with what it
    /// expected there.
    pub fn primary(&self) -> Option<(&LfParseError, String)> {
        furthest_error(&self.errors)
    }
}

fn furthest_error(tree: &ErrorTree<LfParseError>) -> Option<(&LfParseError, String)> {
    match tree {
        ErrorTree::Base { location, kind } => Some((location, kind.to_string())),
        ErrorTree::Stack { base, .. } => furthest_error(base),
        ErrorTree::Alt(siblings) => siblings
            .iter()
            .filter_map(furthest_error)
            .max_by_key(|(location, _)| location.offset),
    }
}

#[cfg(feature = "rendered-errors")]
impl ChunkParseError {
    pub fn build_report(&self) -> ariadne::Report<std::ops::Range<usize>> {
        use ariadne::{
            Label,
            Report,
            ReportKind,
        };

        let (start, label) = self
            .primary()
            .map(|(location, label)| (location.offset, label))
            .unwrap_or_else(|| (0, self.errors.to_string()));

        Report::build(ReportKind::Error, (), start)
            .with_message("Failed to parse assignments")
            .with_label(Label::new(start..start + 1).with_message(label))
            .finish()
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyntaxError {
    #[error("Malformed number")]
    MalformedNumber,
    #[error("Integer constant can't fit in integer")]
    IntegerConstantTooLarge,
    #[error("Keyword cannot be used as identifier")]
    KeywordAsIdent,
    #[error("Unrecognized escape sequence")]
    InvalidEscapeSequence,
    #[error(transparent)]
    Containment(#[from] OwnershipConflict),
}

// Newline, carriage return, tab, space
pub const LF_WHITESPACE: &[u8] = b"\n\r\t ";

pub type Span<'a> = nom_locate::LocatedSpan<&'a [u8]>;
pub type InternalParseError<'a> = nom_supreme::error::ErrorTree<Span<'a>>;
pub type ParseResult<'a, T> = IResult<Span<'a>, T, InternalParseError<'a>>;

#[derive(Debug, Error, Clone, PartialEq)]
pub struct LfParseError {
    line: u32,
    column: usize,
    offset: usize,
    text: String,
}

impl LfParseError {
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Byte offset from the start of the input.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> From<Span<'a>> for LfParseError {
    fn from(err: Span<'a>) -> Self {
        Self {
            line: err.location_line(),
            column: err.get_utf8_column(),
            offset: err.location_offset(),
            text: String::from_utf8_lossy(err.get_line_beginning()).to_string(),
        }
    }
}

impl std::fmt::Display for LfParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "line: {}, column: {} \n\t {}",
            self.line, self.column, self.text
        ))
    }
}

#[macro_export]
macro_rules! final_parser {
    ($input:expr => $parser:expr) => {
        ::nom_supreme::final_parser::final_parser($parser)($input)
            .map_err(|e: $crate::parsing::InternalParseError| {
                e.map_locations($crate::parsing::LfParseError::from)
            })
            .map_err(|errors| $crate::parsing::ChunkParseError { errors })
    };
}

pub trait Parse<'chunk>: Sized {
    fn parse<'src>(input: Span<'src>, alloc: &'chunk ASTAllocator) -> ParseResult<'src, Self>;
}

/// Zero or more `parser` matches separated by `sep_parser`, collected in source order.
pub(crate) fn build_separated_list0<'chunk, 'src, P, S, O1, O2>(
    alloc: &'chunk ASTAllocator,
    mut parser: P,
    mut sep_parser: S,
) -> impl FnMut(Span<'src>) -> ParseResult<'src, BumpVec<'chunk, O1>>
where
    P: Parser<Span<'src>, O1, InternalParseError<'src>>,
    S: Parser<Span<'src>, O2, InternalParseError<'src>>,
    O1: 'chunk,
{
    move |input| {
        let mut list = alloc.new_vec();

        let (input, first) = match parser.parse(input) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => return Ok((input, list)),
            Err(e) => return Err(e),
        };
        list.push(first);

        let mut iter = iterator(
            input,
            preceded(|input| sep_parser.parse(input), |input| parser.parse(input)),
        );

        for next in &mut iter {
            list.push(next);
        }

        iter.finish().map(|(remain, ())| (remain, list))
    }
}

pub(crate) fn comma(input: Span) -> ParseResult<()> {
    value((), delimited(lf_whitespace0, token(','), lf_whitespace0))(input)
}

pub fn lf_whitespace0(mut input: Span) -> ParseResult<()> {
    loop {
        input = match alt((
            value((), take_while1(|c| LF_WHITESPACE.contains(&c))).context("whitespace"),
            parse_comment,
        ))(input)
        {
            Err(nom::Err::Error(_)) => return Ok((input, ())),
            Err(e) => return Err(e),
            Ok((input, _)) => input,
        }
    }
}

/// Parse a complete source text consisting of one assignment list, either bare
/// (`a = 1, b = 2`) or parenthesized (`(a = 1, b = 2)`).
#[instrument(level = "trace", name = "assignments", skip(input, alloc), fields(src_bytes = input.len()))]
pub fn parse_assignments<'src, 'chunk>(
    input: &'src str,
    alloc: &'chunk ASTAllocator,
) -> Result<AssignmentList<'chunk>, ChunkParseError> {
    final_parser!(
    Span::new(input.as_bytes()) =>
                delimited(
                lf_whitespace0,
                |input| AssignmentList::parse(input, alloc),
                lf_whitespace0,
            ))
}

pub fn is_keyword(span: Span) -> bool {
    matches!(
        *span,
        b"action"
            | b"const"
            | b"day"
            | b"days"
            | b"deadline"
            | b"False"
            | b"false"
            | b"federated"
            | b"hour"
            | b"hours"
            | b"import"
            | b"input"
            | b"logical"
            | b"main"
            | b"min"
            | b"mins"
            | b"msec"
            | b"msecs"
            | b"mutable"
            | b"new"
            | b"nsec"
            | b"nsecs"
            | b"output"
            | b"physical"
            | b"preamble"
            | b"reaction"
            | b"reactor"
            | b"sec"
            | b"secs"
            | b"shutdown"
            | b"startup"
            | b"state"
            | b"target"
            | b"timer"
            | b"True"
            | b"true"
            | b"usec"
            | b"usecs"
            | b"week"
            | b"weeks"
    )
}

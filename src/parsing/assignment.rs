use nom::{
    branch::alt,
    character::complete::char as token,
    combinator::{
        cut,
        map,
        map_res,
    },
    sequence::{
        delimited,
        pair,
    },
};
use nom_supreme::ParserExt;
use tracing::instrument;

use crate::{
    ast::{
        assignment::{
            Assignment,
            AssignmentList,
        },
        value::Value,
    },
    parsing::{
        build_separated_list0,
        comma,
        identifiers::parse_identifier,
        lf_whitespace0,
        ASTAllocator,
        Parse,
        ParseResult,
        Span,
        SyntaxError,
    },
};

impl<'chunk> Parse<'chunk> for &'chunk Assignment<'chunk> {
    #[instrument(level = "trace", name = "assignment", skip(input, alloc))]
    fn parse<'src>(input: Span<'src>, alloc: &'chunk ASTAllocator) -> ParseResult<'src, Self> {
        map(
            pair(
                |input| parse_identifier(input, alloc),
                delimited(
                    delimited(lf_whitespace0, token('='), lf_whitespace0),
                    cut(|input| parse_rhs(input, alloc)),
                    lf_whitespace0,
                ),
            ),
            |(lhs, rhs)| Assignment::from_parts(lhs, rhs, alloc),
        )(input)
    }
}

/// A single value, or a parenthesized and possibly empty list of values.
fn parse_rhs<'src, 'chunk>(
    input: Span<'src>,
    alloc: &'chunk ASTAllocator,
) -> ParseResult<'src, &'chunk [Value]> {
    alt((
        map(
            delimited(
                pair(token('('), lf_whitespace0),
                build_separated_list0(alloc, |input| Value::parse(input, alloc), comma),
                pair(lf_whitespace0, cut(token(')'))),
            ),
            |values| values.into_bump_slice(),
        )
        .context("value list"),
        map(
            |input| Value::parse(input, alloc),
            |value| alloc.alloc_slice_copy(&[value]),
        ),
    ))(input)
}

fn parse_sequence<'src, 'chunk>(
    input: Span<'src>,
    alloc: &'chunk ASTAllocator,
) -> ParseResult<'src, AssignmentList<'chunk>> {
    map_res(
        build_separated_list0(alloc, |input| <&Assignment>::parse(input, alloc), comma),
        // Parsed nodes start out detached. A conflict here means a `Parse` impl handed
        // back a node that is already in some list.
        |children| AssignmentList::try_from_iter(alloc, children).map_err(SyntaxError::from),
    )(input)
}

impl<'chunk> Parse<'chunk> for AssignmentList<'chunk> {
    #[instrument(level = "trace", name = "assignment_list", skip(input, alloc))]
    fn parse<'src>(input: Span<'src>, alloc: &'chunk ASTAllocator) -> ParseResult<'src, Self> {
        alt((
            delimited(
                pair(token('('), lf_whitespace0),
                |input| parse_sequence(input, alloc),
                pair(lf_whitespace0, cut(token(')'))),
            )
            .context("parenthesized assignments"),
            (|input| parse_sequence(input, alloc)).context("assignments"),
        ))(input)
    }
}

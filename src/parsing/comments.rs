use nom::{
    branch::alt,
    bytes::complete::{
        tag,
        take_till,
        take_until,
    },
    combinator::{
        cut,
        value,
    },
    sequence::{
        pair,
        preceded,
    },
};

use crate::parsing::{
    ParseResult,
    Span,
};

/// `// ...` and `# ...` run to the end of the line, `/* ... */` may span lines.
pub fn parse_comment(input: Span) -> ParseResult<()> {
    alt((
        value(
            (),
            preceded(tag("/*"), cut(pair(take_until("*/"), tag("*/")))),
        ),
        value(
            (),
            preceded(
                alt((tag("//"), tag("#"))),
                take_till(|c| c == b'\r' || c == b'\n'),
            ),
        ),
    ))(input)
}

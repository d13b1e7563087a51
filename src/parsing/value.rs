use atoi::atoi;
use nom::{
    branch::alt,
    bytes::complete::{
        tag,
        take,
        take_till,
        take_until,
    },
    character::complete::{
        char as token,
        digit0,
        digit1,
        one_of,
    },
    combinator::{
        cut,
        map,
        map_opt,
        map_res,
        opt,
        recognize,
        value,
    },
    sequence::{
        pair,
        preceded,
        terminated,
        tuple,
    },
    Slice,
};
use nom_supreme::ParserExt;
use tracing::instrument;

use crate::{
    ast::{
        constant_string::ConstantString,
        value::{
            Time,
            TimeUnit,
            Value,
        },
    },
    parsing::{
        identifiers::{
            parse_identifier,
            raw_identifier,
        },
        lf_whitespace0,
        ASTAllocator,
        Parse,
        ParseResult,
        Span,
        SyntaxError,
    },
};

impl<'chunk> Parse<'chunk> for Value {
    #[instrument(level = "trace", name = "value", skip(input, alloc))]
    fn parse<'src>(input: Span<'src>, alloc: &'chunk ASTAllocator) -> ParseResult<'src, Self> {
        alt((
            map(parse_code, Value::Code).context("code block"),
            map(parse_string, Value::String).context("string"),
            map(parse_time, Value::Time).context("time"),
            map(parse_float, Value::Float).context("float"),
            map(parse_integer, Value::Int).context("integer"),
            map(parse_bool, Value::Bool).context("boolean"),
            map(|input| parse_identifier(input, alloc), Value::Parameter).context("parameter"),
        ))(input)
    }
}

pub fn parse_bool(input: Span) -> ParseResult<bool> {
    map_opt(raw_identifier, |word: Span| match *word {
        b"true" | b"True" => Some(true),
        b"false" | b"False" => Some(false),
        _ => None,
    })(input)
}

pub fn parse_float(input: Span) -> ParseResult<f64> {
    map_res(
        recognize(tuple((
            opt(token('-')),
            digit0,
            // Either a mandatory decimal part with an optional exponent, or a mandatory
            // exponent. Anything else is an integer.
            alt((
                value(
                    (),
                    pair(
                        pair(token('.'), digit0),
                        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
                    ),
                ),
                value((), tuple((one_of("eE"), opt(one_of("+-")), digit1))),
            )),
        ))),
        |float_str: Span| {
            std::str::from_utf8(*float_str)
                .map_err(|_| SyntaxError::MalformedNumber)?
                .parse::<f64>()
                .ok()
                .filter(|float| float.is_finite())
                .ok_or(SyntaxError::MalformedNumber)
        },
    )(input)
}

pub fn parse_integer(input: Span) -> ParseResult<i64> {
    map_res(recognize(pair(opt(token('-')), digit1)), |num_str: Span| {
        atoi::<i64>(*num_str).ok_or(SyntaxError::IntegerConstantTooLarge)
    })(input)
}

pub fn parse_time_unit(input: Span) -> ParseResult<TimeUnit> {
    map_opt(raw_identifier, |word: Span| match *word {
        b"nsec" | b"nsecs" => Some(TimeUnit::Nsec),
        b"usec" | b"usecs" => Some(TimeUnit::Usec),
        b"msec" | b"msecs" => Some(TimeUnit::Msec),
        b"sec" | b"secs" => Some(TimeUnit::Sec),
        b"min" | b"mins" => Some(TimeUnit::Min),
        b"hour" | b"hours" => Some(TimeUnit::Hour),
        b"day" | b"days" => Some(TimeUnit::Day),
        b"week" | b"weeks" => Some(TimeUnit::Week),
        _ => None,
    })(input)
}

/// `<digits> <unit>`, e.g. `10 msec`.
pub fn parse_time(input: Span) -> ParseResult<Time> {
    map(
        pair(
            terminated(
                map_res(digit1, |digits: Span| {
                    atoi::<u64>(*digits).ok_or(SyntaxError::IntegerConstantTooLarge)
                }),
                lf_whitespace0,
            ),
            parse_time_unit,
        ),
        |(magnitude, unit)| Time { magnitude, unit },
    )(input)
}

/// A verbatim target-language block, `{= ... =}`.
pub fn parse_code(input: Span) -> ParseResult<ConstantString> {
    preceded(
        tag("{="),
        cut(terminated(
            map(take_until("=}"), |body: Span| ConstantString::new(body.to_vec())),
            tag("=}"),
        )),
    )(input)
}

pub fn parse_string(input: Span) -> ParseResult<ConstantString> {
    alt((
        preceded(token('\''), parse_remaining_quoted_string::<b'\''>),
        preceded(token('"'), parse_remaining_quoted_string::<b'"'>),
    ))(input)
}

/// Expects the opening delimiter to have been consumed already.
fn parse_remaining_quoted_string<const DELIMITER: u8>(input: Span) -> ParseResult<ConstantString> {
    let mut output = Vec::default();

    let mut remain = input;
    loop {
        let (pending, consumed) = take_till(|c: u8| c == DELIMITER || c == b'\\')(remain)?;
        remain = pending;

        output.extend_from_slice(*consumed);

        if remain.starts_with(&[DELIMITER]) {
            return Ok((remain.slice(1..), ConstantString::new(output)));
        }

        let (pending, escaped) = alt((
            value(b'\n', tag(r#"\n"#)),
            value(b'\r', tag(r#"\r"#)),
            value(b'\t', tag(r#"\t"#)),
            value(b'\0', tag(r#"\0"#)),
            value(b'\\', tag(r#"\\"#)),
            value(b'"', tag(r#"\""#)),
            value(b'\'', tag(r#"\'"#)),
            preceded(
                token('\\'),
                cut(map_res(take(1usize), |_: Span| {
                    Err::<u8, _>(SyntaxError::InvalidEscapeSequence)
                })),
            ),
        ))(remain)?;
        remain = pending;

        output.push(escaped);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        parse_code,
        parse_float,
        parse_string,
        parse_time,
    };
    use crate::{
        ast::value::{
            Time,
            TimeUnit,
            Value,
        },
        parsing::{
            ASTAllocator,
            Parse,
            Span,
        },
    };

    #[test]
    pub fn parses_int() -> anyhow::Result<()> {
        let src = "-42";

        let alloc = ASTAllocator::default();
        let (remain, result) = Value::parse(Span::new(src.as_bytes()), &alloc)?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(result, Value::Int(-42));

        Ok(())
    }

    #[test]
    pub fn rejects_int_overflow() {
        let src = "9223372036854775808";

        let alloc = ASTAllocator::default();
        assert!(Value::parse(Span::new(src.as_bytes()), &alloc).is_err());
    }

    #[test]
    pub fn parses_floats() -> anyhow::Result<()> {
        let alloc = ASTAllocator::default();

        for (src, expected) in [("1.5", 1.5), ("-0.25", -0.25), ("1e-7", 1e-7), ("2.", 2.0)] {
            let (remain, result) = Value::parse(Span::new(src.as_bytes()), &alloc)?;
            assert_eq!(std::str::from_utf8(*remain)?, "");
            assert_eq!(result, Value::Float(expected));
        }

        Ok(())
    }

    #[test]
    pub fn rejects_overflowing_float() -> anyhow::Result<()> {
        let src = "1e400";

        assert!(parse_float(Span::new(src.as_bytes())).is_err());

        let alloc = ASTAllocator::default();
        let (remain, result) = Value::parse(Span::new(src.as_bytes()), &alloc)?;
        assert_eq!(std::str::from_utf8(*remain)?, "e400");
        assert_eq!(result, Value::Int(1));

        Ok(())
    }

    #[test]
    pub fn parses_bools() -> anyhow::Result<()> {
        let alloc = ASTAllocator::default();

        for (src, expected) in [("true", true), ("False", false)] {
            let (remain, result) = Value::parse(Span::new(src.as_bytes()), &alloc)?;
            assert_eq!(std::str::from_utf8(*remain)?, "");
            assert_eq!(result, Value::Bool(expected));
        }

        Ok(())
    }

    #[test]
    pub fn parses_parameter_reference() -> anyhow::Result<()> {
        let src = "trueish";

        let alloc = ASTAllocator::default();
        let (remain, result) = Value::parse(Span::new(src.as_bytes()), &alloc)?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(result, Value::Parameter("trueish".into()));

        Ok(())
    }

    #[test]
    pub fn parses_time() -> anyhow::Result<()> {
        let src = "100 msecs";

        let (remain, result) = parse_time(Span::new(src.as_bytes()))?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(
            result,
            Time {
                magnitude: 100,
                unit: TimeUnit::Msec
            }
        );

        Ok(())
    }

    #[test]
    pub fn int_followed_by_other_word_is_not_time() -> anyhow::Result<()> {
        let src = "5 seconds";

        let alloc = ASTAllocator::default();
        let (remain, result) = Value::parse(Span::new(src.as_bytes()), &alloc)?;

        assert_eq!(std::str::from_utf8(*remain)?, " seconds");
        assert_eq!(result, Value::Int(5));

        Ok(())
    }

    #[test]
    pub fn parses_string_escapes() -> anyhow::Result<()> {
        let src = r#""a\"b\n" rest"#;

        let (remain, result) = parse_string(Span::new(src.as_bytes()))?;

        assert_eq!(std::str::from_utf8(*remain)?, " rest");
        assert_eq!(result, "a\"b\n");

        Ok(())
    }

    #[test]
    pub fn parses_single_quoted_string() -> anyhow::Result<()> {
        let src = r#"'say "hi"'"#;

        let (remain, result) = parse_string(Span::new(src.as_bytes()))?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(result, "say \"hi\"");

        Ok(())
    }

    #[test]
    pub fn rejects_unknown_escape() {
        let src = r#""\q""#;

        assert!(matches!(
            parse_string(Span::new(src.as_bytes())),
            Err(nom::Err::Failure(_))
        ));
    }

    #[test]
    pub fn parses_code_block() -> anyhow::Result<()> {
        let src = "{= new Foo(1, 2) =}";

        let (remain, result) = parse_code(Span::new(src.as_bytes()))?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(result, " new Foo(1, 2) ");

        Ok(())
    }

    #[test]
    pub fn rejects_unclosed_code_block() {
        let src = "{= foo";

        assert!(matches!(
            parse_code(Span::new(src.as_bytes())),
            Err(nom::Err::Failure(_))
        ));
    }
}

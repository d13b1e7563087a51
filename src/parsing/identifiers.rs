use nom::{
    bytes::complete::{
        take_while,
        take_while_m_n,
    },
    combinator::{
        map_res,
        recognize,
    },
    sequence::pair,
};
use nom_supreme::ParserExt;

use crate::{
    ast::identifiers::Ident,
    parsing::{
        is_keyword,
        ASTAllocator,
        ParseResult,
        Span,
        SyntaxError,
    },
};

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Recognizes `[A-Za-z_][A-Za-z0-9_]*` without checking for reserved words.
pub(crate) fn raw_identifier(input: Span) -> ParseResult<Span> {
    recognize(pair(
        take_while_m_n(1, 1, is_ident_start),
        take_while(is_ident_continue),
    ))(input)
}

pub(crate) fn parse_identifier<'src, 'chunk>(
    input: Span<'src>,
    _alloc: &'chunk ASTAllocator,
) -> ParseResult<'src, Ident> {
    map_res(raw_identifier.context("identifier"), |raw_ident| {
        if is_keyword(raw_ident) {
            Err(SyntaxError::KeywordAsIdent)
        } else {
            Ok(Ident::new_from_slice(*raw_ident))
        }
    })(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::parse_identifier;
    use crate::parsing::{
        ASTAllocator,
        Span,
    };

    #[test]
    pub(crate) fn parses_ident() -> anyhow::Result<()> {
        let ident = "_";

        let alloc = ASTAllocator::default();
        let (remain, ident) = parse_identifier(Span::new(ident.as_bytes()), &alloc)?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(ident, "_".into());

        Ok(())
    }

    #[test]
    pub(crate) fn parses_ident_with_underscores() -> anyhow::Result<()> {
        let ident = "bank_index2 =";

        let alloc = ASTAllocator::default();
        let (remain, ident) = parse_identifier(Span::new(ident.as_bytes()), &alloc)?;

        assert_eq!(std::str::from_utf8(*remain)?, " =");
        assert_eq!(ident, "bank_index2".into());

        Ok(())
    }

    #[test]
    pub(crate) fn parses_ident_rejects_num_start() {
        let ident = "9a";

        let alloc = ASTAllocator::default();
        assert!(parse_identifier(Span::new(ident.as_bytes()), &alloc).is_err());
    }

    #[test]
    pub(crate) fn parses_ident_rejects_keyword() {
        let ident = "reactor";

        let alloc = ASTAllocator::default();
        assert!(parse_identifier(Span::new(ident.as_bytes()), &alloc).is_err());
    }

    #[test]
    pub(crate) fn parses_ident_keyword_prefix() -> anyhow::Result<()> {
        let ident = "newValue";

        let alloc = ASTAllocator::default();
        let (remain, ident) = parse_identifier(Span::new(ident.as_bytes()), &alloc)?;

        assert_eq!(std::str::from_utf8(*remain)?, "");
        assert_eq!(ident, "newValue".into());

        Ok(())
    }
}

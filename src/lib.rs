//! Syntax tree nodes for assignment groups such as the parameter list of a reactor
//! instantiation (`(width = 4, period = 10 msec)`), and a parser producing them.

pub mod ast;
pub mod parsing;

pub use self::{
    ast::{
        assignment::{
            Assignment,
            AssignmentList,
            OwnershipConflict,
        },
        constant_string::ConstantString,
        identifiers::Ident,
        value::{
            Time,
            TimeUnit,
            Value,
        },
        ASTAllocator,
        ListId,
    },
    parsing::{
        parse_assignments,
        ChunkParseError,
        LfParseError,
        SyntaxError,
    },
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        parse_assignments,
        ASTAllocator,
    };

    #[test]
    fn parses_with_comments() -> anyhow::Result<()> {
        let src = "
            // leading
            ( a = 1, /* inline */ b = 2 ) # trailing
        ";
        let alloc = ASTAllocator::default();
        let list = parse_assignments(src, &alloc)?;

        assert_eq!(list.to_string(), "(a = 1, b = 2)");

        Ok(())
    }

    #[test]
    fn reports_trailing_garbage() {
        let alloc = ASTAllocator::default();
        let err = parse_assignments("a = 1 ]", &alloc);

        assert!(err.is_err());
    }
}

use crate::ast::{
    constant_string::ConstantString,
    identifiers::Ident,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    Nsec,
    Usec,
    Msec,
    Sec,
    Min,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Nsec => "nsec",
            TimeUnit::Usec => "usec",
            TimeUnit::Msec => "msec",
            TimeUnit::Sec => "sec",
            TimeUnit::Min => "min",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    pub magnitude: u64,
    pub unit: TimeUnit,
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// The right hand side of an assignment, or one element of a parenthesized value list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A reference to a parameter of the enclosing reactor.
    Parameter(Ident),
    Time(Time),
    Int(i64),
    Float(f64),
    Bool(bool),
    String(ConstantString),
    /// Verbatim target-language code between `{=` and `=}`.
    Code(ConstantString),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Parameter(ident) => write!(f, "{}", ident),
            Value::Time(time) => write!(f, "{}", time),
            Value::Int(i) => write!(f, "{}", i),
            // Parsed floats are finite, and their Debug form always keeps a fractional
            // part or an exponent.
            Value::Float(float) => write!(f, "{:?}", float),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => {
                f.write_str("\"")?;
                for c in String::from_utf8_lossy(s.data()).chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        '\0' => f.write_str("\\0")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            Value::Code(code) => write!(f, "{{={}=}}", String::from_utf8_lossy(code.data())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        Time,
        TimeUnit,
        Value,
    };

    #[test]
    fn renders_floats_as_floats() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn renders_escaped_strings() {
        assert_eq!(
            Value::String("say \"hi\"\n".into()).to_string(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn renders_code_and_time() {
        assert_eq!(Value::Code(" foo(); ".into()).to_string(), "{= foo(); =}");
        assert_eq!(
            Value::Time(Time {
                magnitude: 10,
                unit: TimeUnit::Msec
            })
            .to_string(),
            "10 msec"
        );
    }
}

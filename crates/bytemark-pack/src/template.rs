//! `%`-placeholder substitution for building descriptors.
//!
//! Registered parametric types expand a template against caller arguments
//! before the result is parsed as a descriptor: `%d`/`%u` take an integer,
//! `%x` an integer rendered as lowercase hex, `%s` a string, and `%%` is a
//! literal percent sign. Placeholders consume arguments left to right;
//! surplus arguments are ignored.

use std::fmt::Write;

use crate::error::PackError;

/// An argument to a parametric type or template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Str(String),
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Int(i64::from(v))
    }
}

impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Arg::Int(i64::from(v))
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_owned())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

/// Expands `template` by substituting `args` into its placeholders.
pub fn substitute(template: &str, args: &[Arg]) -> Result<String, PackError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    let mut next = 0usize;
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let place = chars.next().ok_or(PackError::DanglingPercent)?;
        if place == '%' {
            out.push('%');
            continue;
        }
        if !matches!(place, 'd' | 'u' | 'x' | 's') {
            return Err(PackError::BadPlaceholder(place));
        }
        let arg = args.get(next).ok_or(PackError::MissingArg(place))?;
        next += 1;
        match (place, arg) {
            ('d', Arg::Int(v)) => {
                let _ = write!(out, "{v}");
            }
            ('u', Arg::Int(v)) if *v >= 0 => {
                let _ = write!(out, "{v}");
            }
            ('x', Arg::Int(v)) if *v >= 0 => {
                let _ = write!(out, "{v:x}");
            }
            ('s', Arg::Str(v)) => out.push_str(v),
            _ => return Err(PackError::BadArg(place)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_int() {
        assert_eq!(substitute("c%d", &[Arg::Int(16)]).unwrap(), "c16");
        assert_eq!(substitute("i%u", &[Arg::Int(2)]).unwrap(), "i2");
        assert_eq!(substitute("%d%d", &[Arg::Int(1), Arg::Int(2)]).unwrap(), "12");
    }

    #[test]
    fn test_substitute_hex_and_str() {
        assert_eq!(substitute("%x", &[Arg::Int(255)]).unwrap(), "ff");
        assert_eq!(
            substitute("%s %s", &[Arg::from("I2"), Arg::from("c4")]).unwrap(),
            "I2 c4"
        );
    }

    #[test]
    fn test_substitute_literal_percent() {
        assert_eq!(substitute("100%%", &[]).unwrap(), "100%");
        assert_eq!(substitute("%%%d", &[Arg::Int(3)]).unwrap(), "%3");
    }

    #[test]
    fn test_substitute_ignores_surplus_args() {
        assert_eq!(substitute("c4", &[Arg::Int(9)]).unwrap(), "c4");
    }

    #[test]
    fn test_substitute_errors() {
        assert_eq!(substitute("c%d", &[]), Err(PackError::MissingArg('d')));
        assert_eq!(
            substitute("c%d", &[Arg::from("four")]),
            Err(PackError::BadArg('d'))
        );
        assert_eq!(
            substitute("%u", &[Arg::Int(-1)]),
            Err(PackError::BadArg('u'))
        );
        assert_eq!(
            substitute("%x", &[Arg::Int(-1)]),
            Err(PackError::BadArg('x'))
        );
        assert_eq!(
            substitute("%q", &[Arg::Int(1)]),
            Err(PackError::BadPlaceholder('q'))
        );
        assert_eq!(substitute("trailing%", &[]), Err(PackError::DanglingPercent));
    }
}

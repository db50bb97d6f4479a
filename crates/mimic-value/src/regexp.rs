//! Regular expression values.
//!
//! A regexp carries its source pattern and flag string verbatim plus the
//! compiled program. The `i`/`m`/`s` flags are translated to inline flags
//! at compile time; `g` and `y` only affect how callers drive `lastIndex`,
//! which lives as a non-enumerable own data property of the object part so
//! that property-level copying picks it up like any other own property.

use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::error::{ValueError, ValueResult};
use crate::object::{GraphObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::value::Value;

const VALID_FLAGS: &str = "dgimsuvy";

/// A regular expression value.
pub struct RegExpValue {
    object: Rc<GraphObject>,
    source: String,
    flags: String,
    program: Regex,
}

impl RegExpValue {
    /// Compile `source` with a flag string drawn from `dgimsuvy`.
    pub fn new(source: &str, flags: &str) -> ValueResult<Self> {
        validate_flags(flags)?;
        let program = Regex::new(&format!("{}{}", inline_flag_prefix(flags), source))?;
        Ok(Self {
            object: Rc::new(fresh_object()),
            source: source.to_string(),
            flags: flags.to_string(),
            program,
        })
    }

    /// The source pattern.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flag string.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// `true` when the `g` flag is set.
    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }

    /// The object part holding `lastIndex` and extra own properties.
    pub fn object(&self) -> &Rc<GraphObject> {
        &self.object
    }

    /// Current `lastIndex`.
    pub fn last_index(&self) -> u64 {
        self.object
            .get(&PropertyKey::string("lastIndex"))
            .and_then(|v| v.as_number())
            .map_or(0, |n| n as u64)
    }

    /// Replace `lastIndex`.
    pub fn set_last_index(&self, index: u64) {
        self.object
            .set(PropertyKey::string("lastIndex"), Value::number(index as f64));
    }

    /// Test the pattern against `input`.
    pub fn is_match(&self, input: &str) -> bool {
        self.program.is_match(input)
    }

    /// First match in `input` as a byte range.
    pub fn find(&self, input: &str) -> Option<(usize, usize)> {
        self.program.find(input).map(|m| (m.start(), m.end()))
    }

    /// Fresh instance with the same source, flags, and compiled program,
    /// and a reset property table (`lastIndex` back to 0).
    pub fn duplicate(&self) -> Self {
        Self {
            object: Rc::new(fresh_object()),
            source: self.source.clone(),
            flags: self.flags.clone(),
            program: self.program.clone(),
        }
    }
}

impl fmt::Debug for RegExpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Object part of a regexp: only `lastIndex` as an own data property,
/// writable but hidden from enumeration.
fn fresh_object() -> GraphObject {
    let object = GraphObject::new(None);
    object.define_property(
        PropertyKey::string("lastIndex"),
        PropertyDescriptor::data_with_attrs(
            Value::number(0.0),
            PropertyAttributes {
                writable: true,
                enumerable: false,
                configurable: false,
            },
        ),
    );
    object
}

fn validate_flags(flags: &str) -> ValueResult<()> {
    for (i, ch) in flags.char_indices() {
        if !VALID_FLAGS.contains(ch) {
            return Err(ValueError::InvalidRegExpFlag(ch));
        }
        if flags[..i].contains(ch) {
            return Err(ValueError::DuplicateRegExpFlag(ch));
        }
    }
    Ok(())
}

/// Translate the flags that change matching semantics into an inline
/// prefix the engine understands.
fn inline_flag_prefix(flags: &str) -> String {
    let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
    if inline.is_empty() {
        String::new()
    } else {
        format!("(?{inline})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_matches() {
        let re = RegExpValue::new("fo+", "g").unwrap();
        assert!(re.is_match("foo"));
        assert_eq!(re.find("a foo"), Some((2, 5)));
        assert!(re.is_global());
    }

    #[test]
    fn case_insensitive_flag_applies() {
        let re = RegExpValue::new("abc", "i").unwrap();
        assert!(re.is_match("xABCx"));
    }

    #[test]
    fn rejects_unknown_and_duplicate_flags() {
        assert!(matches!(
            RegExpValue::new("a", "q"),
            Err(ValueError::InvalidRegExpFlag('q'))
        ));
        assert!(matches!(
            RegExpValue::new("a", "gg"),
            Err(ValueError::DuplicateRegExpFlag('g'))
        ));
    }

    #[test]
    fn bad_pattern_propagates_compile_error() {
        assert!(matches!(
            RegExpValue::new("(unclosed", ""),
            Err(ValueError::RegExpSyntax(_))
        ));
    }

    #[test]
    fn duplicate_shares_behavior_with_fresh_last_index() {
        let re = RegExpValue::new("x", "g").unwrap();
        re.set_last_index(5);

        let copy = re.duplicate();
        assert_eq!(copy.source(), "x");
        assert_eq!(copy.flags(), "g");
        assert!(copy.is_match("x"));
        assert_eq!(copy.last_index(), 0);
        assert_eq!(re.last_index(), 5);
    }
}

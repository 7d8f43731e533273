//! Lexical legality of names and string values.
//!
//! All checks are whole-value: a string is either legal in its entirety or
//! it is not. Graphical characters are the printable ASCII range
//! `0x21..=0x7E`; names and nominals further exclude the delimiters
//! `( ) < > , "` since those structure the textual form of a predicate.

use lazy_static::lazy_static;
use regex::Regex;

// graphical characters minus ( ) < > , "
macro_rules! name_char {
    () => {
        r#"[\x21\x23-\x27\x2A\x2B\x2D-\x3B\x3D\x3F-\x7E]"#
    };
}

lazy_static! {
    static ref PREDICATE_NAME: Regex = Regex::new(concat!("^", name_char!(), "+$")).unwrap();
    static ref FARG_NAME: Regex = Regex::new(concat!("^<", name_char!(), "+>$")).unwrap();
    static ref NOMINAL: Regex = Regex::new(concat!(
        "^",
        name_char!(),
        "(?:(?:",
        name_char!(),
        "| )*",
        name_char!(),
        ")?$"
    ))
    .unwrap();
    static ref QUERY_VARIABLE: Regex = Regex::new(concat!(r"^\?", name_char!(), "+$")).unwrap();
    static ref QUOTE_STRING: Regex = Regex::new(r#"^[\x20\x21\x23-\x7E]*$"#).unwrap();
    static ref TEXT_STRING: Regex = Regex::new(r"^[\x00-\x07\x09-\x7F]*$").unwrap();
}

pub fn is_legal_predicate_name(name: &str) -> bool {
    PREDICATE_NAME.is_match(name)
}

/// Formal argument names are bracketed, as in `<onset>`.
pub fn is_legal_farg_name(name: &str) -> bool {
    FARG_NAME.is_match(name)
}

pub fn is_legal_nominal(value: &str) -> bool {
    NOMINAL.is_match(value)
}

pub fn is_legal_quote_string(value: &str) -> bool {
    QUOTE_STRING.is_match(value)
}

pub fn is_legal_text_string(value: &str) -> bool {
    TEXT_STRING.is_match(value)
}

pub fn is_legal_query_variable(value: &str) -> bool {
    QUERY_VARIABLE.is_match(value)
}

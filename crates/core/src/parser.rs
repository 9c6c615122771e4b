//! Command Parser
//!
//! Turns free-text commands into a [`ParsedIntent`]. The grammar is a small,
//! fixed set of shapes:
//!
//! ```text
//! email <recipient> cc <cc> about <content>
//! email <recipient> about <content>
//! email <recipient-token> <content>
//! message <recipient> about <content>
//! ```
//!
//! The email grammar has two branches. When a ` cc ` delimiter is present the
//! ` about ` delimiter is mandatory; without it, ` about ` is optional and the
//! first word is taken as the recipient. Input is trimmed and lower-cased
//! before matching, and every delimiter binds to its first occurrence.

use crate::error::ParseError;
use crate::intent::ParsedIntent;
use regex::Regex;
use std::sync::LazyLock;

const EMAIL_KEYWORD: &str = "email";
const MESSAGE_KEYWORD: &str = "message";
const CC_DELIMITER: &str = " cc ";

static EMAIL_WITH_CC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<recipient>.*?) cc (?P<cc>.*?) about (?P<content>.*)$")
        .expect("valid email-with-cc pattern")
});

static EMAIL_ABOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<recipient>.*?) about(?: (?P<content>.*))?$")
        .expect("valid email-about pattern")
});

static EMAIL_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(?P<recipient>\S+)\s+(?P<content>.+)$").expect("valid bare email pattern")
});

static MESSAGE_ABOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<recipient>.*?) about (?P<content>.*)$").expect("valid message pattern")
});

/// Parses a raw command into a typed intent.
///
/// Never panics on user input; every malformed shape is reported as
/// [`ParseError::InvalidFormat`] and unknown leading keywords as
/// [`ParseError::UnsupportedType`].
pub fn parse(text: &str) -> Result<ParsedIntent, ParseError> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ParseError::InvalidFormat);
    }

    if let Some(rest) = strip_keyword(&normalized, EMAIL_KEYWORD) {
        parse_email(rest)
    } else if let Some(rest) = strip_keyword(&normalized, MESSAGE_KEYWORD) {
        parse_message(rest)
    } else {
        Err(ParseError::UnsupportedType)
    }
}

/// Strips `keyword` only when it is a whole word.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    text.strip_prefix(keyword)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn parse_email(rest: &str) -> Result<ParsedIntent, ParseError> {
    let (recipient, cc, content) = if rest.contains(CC_DELIMITER) {
        let caps = EMAIL_WITH_CC
            .captures(rest)
            .ok_or(ParseError::InvalidFormat)?;
        (
            slot(&caps, "recipient"),
            Some(slot(&caps, "cc")).filter(|cc| !cc.is_empty()),
            slot(&caps, "content"),
        )
    } else if let Some(caps) = EMAIL_ABOUT.captures(rest) {
        (slot(&caps, "recipient"), None, slot(&caps, "content"))
    } else {
        let caps = EMAIL_BARE.captures(rest).ok_or(ParseError::InvalidFormat)?;
        (slot(&caps, "recipient"), None, slot(&caps, "content"))
    };

    if recipient.is_empty() || content.is_empty() {
        return Err(ParseError::InvalidFormat);
    }
    Ok(ParsedIntent::email(recipient, cc, content))
}

fn parse_message(rest: &str) -> Result<ParsedIntent, ParseError> {
    let caps = MESSAGE_ABOUT
        .captures(rest)
        .ok_or(ParseError::InvalidFormat)?;
    let recipient = slot(&caps, "recipient");
    if recipient.is_empty() {
        return Err(ParseError::InvalidFormat);
    }
    Ok(ParsedIntent::message(recipient, slot(&caps, "content")))
}

fn slot(caps: &regex::Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

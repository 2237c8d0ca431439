//! Message storage for exceptions.
//!
//! Exception text frequently embeds caller input (an unparseable date string,
//! a rejected value). Owned text is zeroized when the message drops; borrowed
//! text is assumed static and left alone.

use std::borrow::Cow;
use std::fmt;
use zeroize::Zeroize;

/// Human-readable exception text.
///
/// Accepts `&'static str` without allocating and `String` for formatted
/// messages. Owned buffers are cleared on drop.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Message {
    value: Cow<'static, str>,
}

impl Message {
    /// The text itself.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value.as_ref()
    }

    /// Whether the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Whether the text lives in an owned (zeroized-on-drop) buffer.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self.value, Cow::Owned(_))
    }
}

impl From<&'static str> for Message {
    fn from(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }
}

impl From<Cow<'static, str>> for Message {
    fn from(value: Cow<'static, str>) -> Self {
        Self { value }
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Message {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Message {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl Zeroize for Message {
    fn zeroize(&mut self) {
        if let Cow::Owned(ref mut s) = self.value {
            s.zeroize();
        }
    }
}

impl Drop for Message {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroizes_owned_text() {
        let mut message = Message::from(String::from("10/21/19"));
        assert!(message.is_owned());

        message.zeroize();

        assert_eq!(message.as_str(), "");
    }

    #[test]
    fn leaves_static_text_alone() {
        let mut message = Message::from("static");
        assert!(!message.is_owned());

        message.zeroize();

        assert_eq!(message, "static");
    }

    #[test]
    fn empty_message_is_allowed() {
        let message = Message::from("");
        assert!(message.is_empty());
        assert_eq!(message.to_string(), "");
    }

    #[test]
    fn debug_quotes_text() {
        let message = Message::from(String::from("bad \"input\""));
        assert_eq!(format!("{message:?}"), r#""bad \"input\"""#);
    }
}

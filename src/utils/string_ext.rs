//! String helpers for request fields

/// Drop empty or whitespace-only optional strings, keeping other values untouched
///
/// # Example
/// ```ignore
/// let reply_to = non_blank(req.reply_to);
/// // equivalent to:
/// // req.reply_to.filter(|s| !s.trim().is_empty())
/// ```
#[inline]
pub fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_blank())
}

pub trait StringExt {
    /// True for empty or whitespace-only strings
    fn is_blank(&self) -> bool;

    /// Length in characters, not bytes
    fn char_count(&self) -> usize;
}

impl StringExt for str {
    #[inline]
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }

    #[inline]
    fn char_count(&self) -> usize {
        self.chars().count()
    }
}

impl StringExt for String {
    #[inline]
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }

    #[inline]
    fn char_count(&self) -> usize {
        self.as_str().char_count()
    }
}

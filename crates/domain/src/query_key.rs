use super::RecordType;
use compact_str::CompactString;
use std::fmt;

/// Query Identity: the `(name, record type)` pair a cache entry is stored under.
///
/// Names are normalised to lowercase ASCII with a trailing dot, so the key
/// derived from a client question and the key derived from the question echoed
/// by the upstream resolver compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: CompactString,
    pub record_type: RecordType,
}

impl QueryKey {
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            name: normalize_name(name),
            record_type,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

/// Lowercases a domain name and makes it fully qualified.
///
/// The empty name and `"."` both denote the root.
pub fn normalize_name(name: &str) -> CompactString {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." {
        return CompactString::const_new(".");
    }

    let mut normalized = CompactString::with_capacity(trimmed.len() + 1);
    for ch in trimmed.chars() {
        normalized.push(ch.to_ascii_lowercase());
    }
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}

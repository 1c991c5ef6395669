//! Path pattern parsing, normalization and structural matching.
//!
//! A pattern is a `/`-delimited template. Each segment is one of:
//!
//! | Source text | Segment | Matches |
//! |---|---|---|
//! | `*` | [`Segment::SingleWildcard`] | any single path segment |
//! | `**` | [`Segment::DoubleWildcard`] | a lazy span of path segments |
//! | `{name}` | [`Segment::Placeholder`] | any single path segment, bound under `name` |
//! | `*.json` | [`Segment::PrefixWildcard`] | any segment ending in `.json` |
//! | anything else | [`Segment::Literal`] | exactly that text |
//!
//! Literal segments are compared by string equality. No part of a pattern is
//! ever interpreted as a regular expression.

// Hot path: matching runs once per registered pattern per request.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum number of bound placeholders before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Placeholder bindings produced by a successful match, in pattern order.
///
/// Names are `Arc<str>` shared with the compiled pattern so that binding
/// only clones a pointer; values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Pattern that matches every path regardless of its segments.
const MATCH_ALL: &str = "/*";

/// One compiled segment of a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must equal the path segment exactly
    Literal(String),
    /// `*`
    SingleWildcard,
    /// `**`
    DoubleWildcard,
    /// `{name}`
    Placeholder(Arc<str>),
    /// `*suffix`: the path segment must end with `suffix`
    PrefixWildcard(String),
}

impl Segment {
    /// Compile one raw pattern segment.
    ///
    /// Never fails: text that is not a recognised wildcard form is a literal.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "*" => Segment::SingleWildcard,
            "**" => Segment::DoubleWildcard,
            _ if raw.len() >= 2 && raw.starts_with('{') && raw.ends_with('}') => {
                Segment::Placeholder(Arc::from(&raw[1..raw.len() - 1]))
            }
            _ => match raw.strip_prefix('*') {
                Some(suffix) => Segment::PrefixWildcard(suffix.to_owned()),
                None => Segment::Literal(raw.to_owned()),
            },
        }
    }

    /// Single-segment test used by the matcher.
    ///
    /// Both wildcards and placeholders accept any segment here; the span
    /// semantics of `**` are handled by [`Pattern::matches`].
    #[inline]
    #[must_use]
    pub fn touches(&self, segment: &str) -> bool {
        match self {
            Segment::SingleWildcard | Segment::DoubleWildcard | Segment::Placeholder(_) => true,
            Segment::PrefixWildcard(suffix) => segment.ends_with(suffix.as_str()),
            Segment::Literal(text) => text == segment,
        }
    }

    /// Whether this segment is anything other than a literal.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::SingleWildcard => f.write_str("*"),
            Segment::DoubleWildcard => f.write_str("**"),
            Segment::Placeholder(name) => write!(f, "{{{name}}}"),
            Segment::PrefixWildcard(suffix) => write!(f, "*{suffix}"),
        }
    }
}

/// A normalized, compiled path template.
///
/// The raw normalized text is kept alongside the compiled segments because
/// resolution order is defined on the text (see [`super::table::PatternRegistry`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Normalize `raw` and compile it into segments.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = normalize_path(raw);
        let segments = raw.split('/').map(Segment::parse).collect();
        Self { raw, segments }
    }

    /// The normalized pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all placeholders, in order of appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_ref()),
            _ => None,
        })
    }

    /// Structural match of `path` against this pattern.
    ///
    /// Returns the placeholder bindings on success. The walk follows these rules:
    ///
    /// - `/*` matches every path.
    /// - A pattern with more segments than the path never matches.
    /// - `**` succeeds immediately when it is the last pattern segment or the
    ///   walk has reached the last path segment. Otherwise it consumes one path
    ///   segment, first probing the next pattern segment against the next path
    ///   segment; only a successful probe moves the pattern past the `**`.
    /// - Any other segment must touch the current path segment. The last
    ///   pattern segment only succeeds on the last path segment.
    /// - There is no backtracking.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<ParamVec> {
        let mut params = ParamVec::new();
        if self.raw == MATCH_ALL {
            return Some(params);
        }

        let parts: SmallVec<[&str; 16]> = path.split('/').collect();
        let pattern = &self.segments;
        if pattern.len() > parts.len() {
            return None;
        }

        let (mut i, mut j) = (0usize, 0usize);
        loop {
            let segment = &pattern[i];
            let part = parts[j];

            if *segment == Segment::DoubleWildcard {
                if i + 1 == pattern.len() || j + 1 == parts.len() {
                    return Some(params);
                }
                if pattern[i + 1].touches(parts[j + 1]) {
                    i += 1;
                }
                j += 1;
                continue;
            }

            if !segment.touches(part) {
                return None;
            }
            if let Segment::Placeholder(name) = segment {
                params.push((Arc::clone(name), part.to_owned()));
            }

            let pattern_done = i + 1 == pattern.len();
            let path_done = j + 1 == parts.len();
            match (pattern_done, path_done) {
                (true, true) => return Some(params),
                // Either the path outlived the pattern, or a `**` probe left
                // pattern segments with no path segments to consume them.
                (true, false) | (false, true) => return None,
                (false, false) => {
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    /// Convenience wrapper around [`Pattern::matches`].
    #[inline]
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.matches(path).is_some()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Lexical path cleaning.
///
/// Collapses repeated separators, drops `.` elements, resolves `..` against
/// the preceding element and strips any trailing slash. A rooted path never
/// climbs above `/`; an unrooted one keeps leading `..` elements. The empty
/// string cleans to `.`.
///
/// ```
/// use globrouter::router::normalize_path;
///
/// assert_eq!(normalize_path("/a//b/./c/../"), "/a/b");
/// assert_eq!(normalize_path("/../x"), "/x");
/// assert_eq!(normalize_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let rooted = raw.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in raw.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => {
            let mut out = String::with_capacity(joined.len() + 1);
            out.push('/');
            out.push_str(&joined);
            out
        }
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}

use super::error::ConfigError;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// File name pattern searched for when none is given.
pub const DEFAULT_CONFIG_PATTERN: &str = "globrouter-application.*";

/// Compile a shell-style file name glob into an anchored regex.
///
/// `*` matches any run of characters, `?` a single character and `[...]` a
/// character class (`[!...]` or `[^...]` negates, `a-z` is a range). A `]`
/// directly after the opening bracket is literal. Everything else is literal.
///
/// # Errors
///
/// [`ConfigError::InvalidPattern`] if the resulting expression is invalid,
/// e.g. an unterminated class.
pub fn compile_glob(pattern: &str) -> Result<Regex, ConfigError> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            '[' => {
                let negated = chars.next_if(|&n| n == '!' || n == '^').is_some();
                let mut body = Vec::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' && !body.is_empty() {
                        closed = true;
                        break;
                    }
                    body.push(inner);
                }
                expr.push('[');
                if negated {
                    expr.push('^');
                }
                push_class_body(&mut expr, &body);
                // An unclosed class stays open and fails to compile below.
                if closed {
                    expr.push(']');
                }
            }
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

// Everything in a glob class is literal except `-` between two single
// characters. Regex class syntax (`&&`, `--`, `~~`, nesting) is escaped.
fn push_class_body(expr: &mut String, body: &[char]) {
    let (mut dash_open, mut after_range) = (false, false);
    for (n, &c) in body.iter().enumerate() {
        let is_range = c == '-'
            && !after_range
            && n > 0
            && n + 1 < body.len()
            && body[n - 1] != '-'
            && body[n + 1] != '-';
        if !is_range && matches!(c, '\\' | '[' | ']' | '^' | '&' | '~' | '-') {
            expr.push('\\');
        }
        expr.push(c);
        after_range = dash_open;
        dash_open = is_range;
    }
}

// Files of a directory come before its sub-directories, each group by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Locates application files in a directory tree.
///
/// Every file returned is remembered; later searches skip it, so repeated
/// calls walk through all matching files one by one.
///
/// ```rust,no_run
/// use globrouter::config::{ConfigDiscovery, DEFAULT_CONFIG_PATTERN};
///
/// let mut discovery = ConfigDiscovery::new();
/// let path = discovery.find(".", DEFAULT_CONFIG_PATTERN)?;
/// println!("using {}", path.display());
/// # Ok::<(), globrouter::config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigDiscovery {
    used: HashSet<PathBuf>,
}

impl ConfigDiscovery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First not-yet-used file under `root` whose name matches `pattern`.
    ///
    /// Unreadable directories are skipped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPattern`] or [`ConfigError::NotFound`].
    pub fn find(&mut self, root: impl AsRef<Path>, pattern: &str) -> Result<PathBuf, ConfigError> {
        let root = root.as_ref();
        let matcher = compile_glob(pattern)?;

        let found = WalkDir::new(root)
            .sort_by(files_first)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
            .find(|path| {
                let name_matches = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| matcher.is_match(n));
                name_matches && !self.used.contains(path)
            });

        match found {
            Some(path) => {
                debug!(path = %path.display(), pattern = %pattern, "Config file discovered");
                self.used.insert(path.clone());
                Ok(path)
            }
            None => Err(ConfigError::NotFound {
                root: root.to_path_buf(),
                pattern: pattern.to_string(),
            }),
        }
    }

    /// Files handed out so far.
    pub fn used(&self) -> impl Iterator<Item = &Path> {
        self.used.iter().map(PathBuf::as_path)
    }
}

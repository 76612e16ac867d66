//! Routing of raw tokens to the matcher that handles them.

/// The handler chosen for a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'t> {
    /// `--<name>`
    Long(&'t str),
    /// `-<name>`
    Short(&'t str),
    /// Anything else, including a bare `-` or `--`.
    DefaultArg(&'t str),
}

/// Classify one token. Only the token itself is inspected.
pub fn classify(token: &str) -> Route<'_> {
    if token.len() >= 3 {
        if let Some(name) = token.strip_prefix("--") {
            return Route::Long(name);
        }
    }
    if token.len() >= 2 && !token.starts_with("--") {
        if let Some(name) = token.strip_prefix('-') {
            return Route::Short(name);
        }
    }
    Route::DefaultArg(token)
}

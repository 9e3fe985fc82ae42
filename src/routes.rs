// Route path constants - single source of truth for all API paths

/// The hierarchy root. Root-level metadata keys have no path remainder, so
/// the wildcard route alone cannot cover them.
pub const ROOT: &str = "/";
/// Everything below the root: the remainder is the key relative to the
/// served node.
pub const BLOB: &str = "/{*path}";

/// Logical identity of a cached response.
///
/// Identifiers made of ASCII alphanumerics, `-`, `_` and `.` map to a file of
/// the same name, which keeps cache directories readable while debugging.
/// Anything else is content-addressed with BLAKE3 so arbitrary identities
/// can never escape the cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    logical: String,
}

const MAX_READABLE_LEN: usize = 128;

impl CacheKey {
    pub fn new(logical: impl Into<String>) -> Self {
        Self { logical: logical.into() }
    }

    /// Key for a request scoped to one resource, e.g. `search-<table id>`.
    pub fn scoped(scope: &str, id: &str) -> Self {
        Self::new(format!("{scope}-{id}"))
    }

    pub fn logical(&self) -> &str {
        &self.logical
    }

    /// File name of the entry inside the cache directory.
    pub fn file_name(&self) -> String {
        if is_readable(&self.logical) {
            format!("{}.json", self.logical)
        } else {
            let digest = blake3::hash(self.logical.as_bytes());
            format!("{}.json", &digest.to_hex()[..32])
        }
    }
}

fn is_readable(logical: &str) -> bool {
    !logical.is_empty()
        && logical.len() <= MAX_READABLE_LEN
        && !logical.starts_with('.')
        && logical.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

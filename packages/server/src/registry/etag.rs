use common::ContentHash;
use dashmap::DashSet;

/// Issues content fingerprints and remembers every tag it has handed out.
///
/// Membership is not scoped to a resource: a tag issued for one path answers
/// `contains` for a request on any other path.
#[derive(Default)]
pub struct EtagRegistry {
    issued: DashSet<String>,
}

impl EtagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint `buf` as `"{len}-{sha256}"`, prefixed with `W/` when `weak`.
    pub fn generate(buf: &[u8], weak: bool) -> String {
        let prefix = if weak { "W/" } else { "" };
        format!("{prefix}\"{}-{}\"", buf.len(), ContentHash::compute(buf))
    }

    pub fn add(&self, tag: impl Into<String>) {
        self.issued.insert(tag.into());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.issued.contains(tag)
    }

    /// Generate a weak tag for `buf`, record it, and return it.
    pub fn issue(&self, buf: &[u8]) -> String {
        let tag = Self::generate(buf, true);
        self.add(tag.clone());
        tag
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

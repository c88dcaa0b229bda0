use serde::{Deserialize, Serialize};

/// Strongly typed ID for stored documents.
///
/// The server hands these out as database row ids in scan responses and
/// expects the raw integer back in the `/matches/{id}` path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl DocumentId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        DocumentId(id)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! API route constants for the docmatch backend.
//!
//! Paths are unversioned and rooted at the server base URL; cookie-based
//! session credentials ride along on every request.

use docmatch_model::DocumentId;

/// Authentication endpoints
pub mod auth {
    /// User registration
    pub const REGISTER: &str = "/auth/register";
    /// User login
    pub const LOGIN: &str = "/auth/login";
    /// User logout
    pub const LOGOUT: &str = "/auth/logout";
}

/// User endpoints
pub mod user {
    /// Current session profile; 401 means anonymous, not an error
    pub const PROFILE: &str = "/user/profile";
}

/// Document scanning
pub mod scan {
    /// Multipart upload + scan, field name `document`
    pub const SCAN: &str = "/scan";
}

/// Credit workflow
pub mod credits {
    /// Submit a credit top-up request
    pub const REQUEST: &str = "/credits/request";
}

/// Admin-only endpoints
pub mod admin {
    /// Pending credit requests listing
    pub const CREDIT_REQUESTS: &str = "/admin/credit-requests";
    /// Usage analytics
    pub const ANALYTICS: &str = "/admin/analytics";

    /// Approve one pending credit request
    pub fn approve_path(request_id: i64) -> String {
        format!("/admin/credit-requests/{request_id}/approve")
    }

    /// Reject one pending credit request
    pub fn reject_path(request_id: i64) -> String {
        format!("/admin/credit-requests/{request_id}/reject")
    }
}

/// Ranked similarity list for a previously scanned document
pub fn matches_path(document_id: DocumentId) -> String {
    format!("/matches/{document_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterized_paths_embed_raw_ids() {
        assert_eq!(matches_path(DocumentId(17)), "/matches/17");
        assert_eq!(admin::approve_path(3), "/admin/credit-requests/3/approve");
        assert_eq!(admin::reject_path(3), "/admin/credit-requests/3/reject");
    }
}

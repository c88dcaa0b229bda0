use crate::error::{ModelError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outbound body for `/credits/request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRequest {
    pub requested_credits: u32,
}

impl CreditRequest {
    /// A request for zero credits is meaningless; reject it before it ever
    /// reaches the wire.
    pub fn new(requested_credits: u32) -> Result<Self> {
        if requested_credits == 0 {
            return Err(ModelError::InvalidCreditAmount(requested_credits));
        }
        Ok(Self { requested_credits })
    }
}

/// Generic `{message}` acknowledgement body used by several endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

/// One row of the admin pending-requests listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCreditRequest {
    pub id: i64,
    pub username: String,
    pub requested_credits: u32,
    pub request_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_rejected_locally() {
        assert!(CreditRequest::new(0).is_err());
        assert_eq!(
            CreditRequest::new(10).unwrap(),
            CreditRequest {
                requested_credits: 10
            }
        );
    }

    #[test]
    fn pending_request_parses_iso_dates() {
        let row: PendingCreditRequest = serde_json::from_str(
            r#"{
                "id": 3,
                "username": "bob",
                "requested_credits": 15,
                "request_date": "2025-04-01T09:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(row.username, "bob");
        assert_eq!(row.request_date.to_rfc3339(), "2025-04-01T09:30:00+00:00");
    }
}

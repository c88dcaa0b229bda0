use serde::{Deserialize, Serialize};

/// Scan volume for one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanActivity {
    pub username: String,
    pub scan_day: String,
    pub scan_count: u64,
}

/// Frequency of one document topic across all scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub scan_count: u64,
}

/// One row of the top-users table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUser {
    pub username: String,
    pub total_scans: u64,
    pub total_credits_used: u64,
}

/// Aggregate credit usage figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditStats {
    pub total_credits_used: u64,
    pub avg_credits_used: f64,
    pub approved_credits: u64,
    pub pending_credits: u64,
}

/// The `/admin/analytics` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub scans_per_user: Vec<ScanActivity>,
    pub common_topics: Vec<TopicCount>,
    pub top_users: Vec<TopUser>,
    pub credit_stats: CreditStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_payload() {
        let report: AnalyticsReport = serde_json::from_str(
            r#"{
                "scans_per_user": [
                    {"username": "alice", "scan_day": "2025-04-01", "scan_count": 4}
                ],
                "common_topics": [
                    {"topic": "invoices", "scan_count": 9}
                ],
                "top_users": [
                    {"username": "alice", "total_scans": 40, "total_credits_used": 38}
                ],
                "credit_stats": {
                    "total_credits_used": 120,
                    "avg_credits_used": 6.3,
                    "approved_credits": 80,
                    "pending_credits": 25
                }
            }"#,
        )
        .unwrap();
        assert_eq!(report.scans_per_user[0].scan_count, 4);
        assert_eq!(report.common_topics[0].topic, "invoices");
        assert_eq!(report.credit_stats.pending_credits, 25);
    }
}

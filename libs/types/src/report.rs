//! Per-domain comparison statuses and report rendering
//!
//! The report is the engine's only output: an ordered list of domain
//! statuses plus a textual rendering, one line per mismatching domain,
//! suitable for pasting straight into diff tooling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of comparing one domain across the two datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    FullMatch,
    SizeMismatch,
    ValuesMismatch,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchResult::FullMatch => "full match",
            MatchResult::SizeMismatch => "mismatching number of elements",
            MatchResult::ValuesMismatch => "mismatching values",
        };
        f.write_str(label)
    }
}

/// Canonical JSON dump used as the equality form for every record type.
pub fn canonical_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}

/// Comparison result for one domain, including both sides' rendered
/// contents for human diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainStatus {
    pub key: &'static str,
    pub result: MatchResult,
    pub core_len: usize,
    pub datanode_len: usize,
    pub core_dump: String,
    pub datanode_dump: String,
}

impl DomainStatus {
    pub fn is_match(&self) -> bool {
        self.result == MatchResult::FullMatch
    }

    /// Render the status as a single diagnostic line.
    pub fn render(&self) -> String {
        format!(
            "key={}, matchResult={}, coreLength={}, datanodeLength={}, coreResult={}, datanodeResult={}",
            self.key,
            self.result,
            self.core_len,
            self.datanode_len,
            self.core_dump,
            self.datanode_dump,
        )
    }
}

/// Ordered per-domain statuses for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    statuses: Vec<DomainStatus>,
}

impl Report {
    pub fn new(statuses: Vec<DomainStatus>) -> Self {
        Self { statuses }
    }

    pub fn statuses(&self) -> &[DomainStatus] {
        &self.statuses
    }

    /// Overall success: every domain reported a full match.
    pub fn success(&self) -> bool {
        self.statuses.iter().all(DomainStatus::is_match)
    }

    /// Render the mismatching domains, one line each, in report order.
    pub fn render_failures(&self) -> String {
        self.statuses
            .iter()
            .filter(|s| !s.is_match())
            .map(DomainStatus::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(key: &'static str, result: MatchResult) -> DomainStatus {
        DomainStatus {
            key,
            result,
            core_len: 2,
            datanode_len: 3,
            core_dump: "[1,2]".into(),
            datanode_dump: "[1,2,3]".into(),
        }
    }

    #[test]
    fn test_match_result_labels() {
        assert_eq!(MatchResult::FullMatch.to_string(), "full match");
        assert_eq!(
            MatchResult::SizeMismatch.to_string(),
            "mismatching number of elements"
        );
        assert_eq!(MatchResult::ValuesMismatch.to_string(), "mismatching values");
    }

    #[test]
    fn test_status_line_shape() {
        let line = status("orders", MatchResult::SizeMismatch).render();
        assert_eq!(
            line,
            "key=orders, matchResult=mismatching number of elements, \
             coreLength=2, datanodeLength=3, coreResult=[1,2], datanodeResult=[1,2,3]"
        );
    }

    #[test]
    fn test_report_success_requires_all_domains() {
        let passing = Report::new(vec![
            status("accounts", MatchResult::FullMatch),
            status("orders", MatchResult::FullMatch),
        ]);
        assert!(passing.success());

        let failing = Report::new(vec![
            status("accounts", MatchResult::FullMatch),
            status("orders", MatchResult::ValuesMismatch),
        ]);
        assert!(!failing.success());
    }

    #[test]
    fn test_render_failures_only_lists_mismatches() {
        let report = Report::new(vec![
            status("accounts", MatchResult::FullMatch),
            status("orders", MatchResult::SizeMismatch),
            status("markets", MatchResult::ValuesMismatch),
        ]);
        let text = report.render_failures();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("key=orders, "));
        assert!(lines[1].starts_with("key=markets, "));
    }

    #[test]
    fn test_render_failures_empty_on_full_match() {
        let report = Report::new(vec![status("accounts", MatchResult::FullMatch)]);
        assert!(report.render_failures().is_empty());
    }
}

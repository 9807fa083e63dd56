//! Diagnostics collected while applying a parameter list.
//!
//! Applying is best effort: unknown keys are ignored and parameters whose
//! case doesn't fit their field are skipped, leaving the field untouched.
//! `ApplyReport` records what happened so callers can surface schema drift
//! instead of losing it silently. Nested applies are merged in with a dotted
//! key prefix (`sub_request.name`, `requests.0.name`).

use crate::error::ApplyIssue;

/// A parameter that was skipped because its value didn't fit the field
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// Dotted path of the parameter
    pub key: String,
    /// Why it was skipped
    pub issue: ApplyIssue,
}

/// Outcome of one `apply` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    applied: Vec<String>,
    unknown: Vec<String>,
    rejected: Vec<Rejected>,
}

impl ApplyReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter written to its field
    pub fn record_applied(&mut self, key: &str) {
        self.applied.push(key.to_string());
    }

    /// Record a parameter whose key matches no field
    pub fn record_unknown(&mut self, key: &str) {
        log::debug!("ignoring parameter `{key}`: no such field");
        self.unknown.push(key.to_string());
    }

    /// Record a parameter skipped because its value didn't fit
    pub fn record_rejected(&mut self, key: &str, issue: ApplyIssue) {
        log::debug!("ignoring parameter `{key}`: {issue}");
        self.rejected.push(Rejected {
            key: key.to_string(),
            issue,
        });
    }

    /// Merge the report of a nested apply, prefixing its keys with `prefix.`
    pub fn absorb(&mut self, prefix: &str, nested: ApplyReport) {
        let scoped = |key: String| format!("{prefix}.{key}");
        self.applied.extend(nested.applied.into_iter().map(scoped));
        self.unknown.extend(nested.unknown.into_iter().map(scoped));
        self.rejected
            .extend(nested.rejected.into_iter().map(|r| Rejected {
                key: scoped(r.key),
                issue: r.issue,
            }));
    }

    /// Keys written to their fields, in application order
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Keys that matched no field
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    /// Parameters skipped because their values didn't fit
    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    /// Check if every parameter was applied
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty() && self.rejected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    #[test]
    fn test_records() {
        let mut report = ApplyReport::new();
        assert!(report.is_clean());

        report.record_applied("name");
        assert!(report.is_clean());

        report.record_unknown("legacy");
        report.record_rejected(
            "duration",
            ApplyIssue::KindMismatch {
                expected: Kind::Int,
                found: Kind::String,
            },
        );
        assert!(!report.is_clean());
        assert_eq!(report.applied(), ["name"]);
        assert_eq!(report.unknown(), ["legacy"]);
        assert_eq!(report.rejected()[0].key, "duration");
    }

    #[test]
    fn test_absorb_prefixes_nested_keys() {
        let mut nested = ApplyReport::new();
        nested.record_applied("name");
        nested.record_unknown("colour");

        let mut report = ApplyReport::new();
        report.record_applied("sub_request");
        report.absorb("sub_request", nested);

        assert_eq!(report.applied(), ["sub_request", "sub_request.name"]);
        assert_eq!(report.unknown(), ["sub_request.colour"]);
    }
}

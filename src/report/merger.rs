use std::collections::HashSet;
use crate::report::finding::Finding;

/// Deduplicate and sort findings
pub fn merge_findings(mut findings: Vec<Finding>) -> Vec<Finding> {
    // Deduplicate by exact text, keeping the first occurrence
    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert(f.clone()));

    // Stable sort by first line number; ties keep encounter order
    findings.sort_by_key(Finding::line_key);

    findings
}

use bidgate_common::config::CategoryScope;
use bidgate_core::admission::{AdmissionReport, Decision};
use bidgate_core::conditions::{ConditionSource, ResolvedCondition};
use colored::*;

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn condition_to_detail(condition: &ResolvedCondition) -> Detail {
    let source = match condition.source {
        ConditionSource::Configured => "configured".color(colors::ALLOWED),
        ConditionSource::Default => "default".color(colors::SEPARATOR),
    };
    let value = format!(
        "{} {} {}",
        condition.value.to_string().color(colors::ACCENT).bold(),
        format!("({source})").normal(),
        condition.name.describe().color(colors::TEXT_DEFAULT)
    );
    (condition.name.to_string(), value.normal())
}

/// `count / cap`, or `-` when the check never ran.
fn usage(count: Option<u64>, cap: Option<i64>) -> ColoredString {
    match (count, cap) {
        (Some(count), Some(cap)) => format!("{count} / {cap}").normal(),
        (Some(count), None) => count.to_string().normal(),
        _ => "-".color(colors::SEPARATOR),
    }
}

pub fn report_to_details(report: &AdmissionReport) -> Vec<Detail> {
    let scope = match report.category_scope {
        CategoryScope::Category => "Category",
        CategoryScope::CategoryWindow => "Category (window)",
    };
    let quota = report.quota.map(|q| i64::try_from(q).unwrap_or(i64::MAX));
    let score = report
        .trust_score
        .map_or_else(|| "-".color(colors::SEPARATOR), |s| s.to_string().color(colors::ACCENT));

    vec![
        ("Active".to_string(), usage(report.active_and_future, report.max_active)),
        ("Trust score".to_string(), score),
        ("Overlapping".to_string(), usage(report.overlapping, quota)),
        (scope.to_string(), usage(report.in_category, report.max_per_category)),
    ]
}

/// Label and color for the final line.
pub fn decision_label(decision: &Decision) -> (&'static str, Color, String) {
    match decision {
        Decision::Allowed => ("ALLOWED", colors::ALLOWED, "the listing may be created".to_string()),
        Decision::Denied(reason) => ("DENIED", colors::DENIED, format!("{reason} [{}]", reason.code())),
    }
}

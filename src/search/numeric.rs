//! Numeric filter clauses.
//!
//! The grammar is restricted to `attribute operator number`, e.g.
//! `chordCount>=3`. Clauses are combined with AND. A clause that does not
//! parse is ignored; a well-formed clause naming an unknown attribute
//! rejects every record.

use crate::models::VideoRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::warn;

static CLAUSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(<=|>=|!=|<|>|=)\s*(-?(?:\d+(?:\.\d*)?|\.\d+))\s*$")
        .expect("numeric clause pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Comparator {
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "=")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
}

impl Comparator {
    pub fn compare(&self, left: f64, right: f64) -> bool {
        match self {
            Comparator::Less => left < right,
            Comparator::LessOrEqual => left <= right,
            Comparator::Greater => left > right,
            Comparator::GreaterOrEqual => left >= right,
            Comparator::Equal => left == right,
            Comparator::NotEqual => left != right,
        }
    }
}

/// A parsed `attribute operator number` clause
#[derive(Debug, Clone, PartialEq)]
pub struct NumericClause {
    pub attribute: String,
    pub comparator: Comparator,
    pub value: f64,
}

impl NumericClause {
    pub fn parse(clause: &str) -> Option<Self> {
        let captures = CLAUSE_PATTERN.captures(clause)?;
        let comparator = Comparator::from_str(&captures[2]).ok()?;
        let value = captures[3].parse::<f64>().ok()?;

        Some(Self {
            attribute: captures[1].to_string(),
            comparator,
            value,
        })
    }

    pub fn matches(&self, record: &VideoRecord) -> bool {
        numeric_value(record, &self.attribute)
            .map(|left| self.comparator.compare(left, self.value))
            .unwrap_or(false)
    }
}

/// Numeric attributes available to filters
pub fn numeric_value(record: &VideoRecord, attribute: &str) -> Option<f64> {
    match attribute {
        "chordCount" => Some(record.chord_count as f64),
        "publish" => Some(record.entry.publish as f64),
        "baritone" => Some(if record.entry.baritone { 1.0 } else { 0.0 }),
        "loop_start" => record.entry.loop_start,
        "loop_end" => record.entry.loop_end,
        _ => None,
    }
}

/// Parse clauses, logging and dropping the ones that do not fit the grammar
pub fn parse_clauses(clauses: &[String]) -> Vec<NumericClause> {
    clauses
        .iter()
        .filter_map(|clause| {
            let parsed = NumericClause::parse(clause);
            if parsed.is_none() {
                warn!(clause = %clause, "Ignoring unparseable numeric filter");
            }
            parsed
        })
        .collect()
}

/// Keep records satisfying every parseable clause
pub fn apply_numeric_filters<'a>(
    records: Vec<&'a VideoRecord>,
    clauses: &[String],
) -> Vec<&'a VideoRecord> {
    let parsed = parse_clauses(clauses);
    if parsed.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| parsed.iter().all(|clause| clause.matches(record)))
        .collect()
}

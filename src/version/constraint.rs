//! Comma-separated version constraints.
//!
//! An expression such as `>=5.0,<5.6` is a conjunction of clauses. Parsing is
//! strict: one clause that is not `<op><version>` rejects the whole
//! expression, and [`evaluate`] turns any rejection into a non-match.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::{parse_version, Version};

static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(>=|<=|>|<|=)\s*v?(\d+\.\d+(?:\.\d+)?)$").expect("clause pattern is valid")
});

/// Comparison operator of a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Self::Eq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Why an expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The expression contained no clauses at all.
    #[error("empty constraint expression")]
    Empty,

    /// A clause did not match `<op><major.minor[.patch]>`.
    #[error("unrecognized constraint clause: {clause:?}")]
    InvalidClause { clause: String },
}

/// One `<op> <version>` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub op: Op,
    pub version: Version,
}

impl Clause {
    /// Whether `candidate` satisfies this clause.
    pub fn holds(&self, candidate: &Version) -> bool {
        match self.op {
            Op::Eq => candidate == &self.version,
            Op::Lt => candidate < &self.version,
            Op::Le => candidate <= &self.version,
            Op::Gt => candidate > &self.version,
            Op::Ge => candidate >= &self.version,
        }
    }
}

impl FromStr for Clause {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConstraintError::InvalidClause {
            clause: s.to_string(),
        };
        let caps = CLAUSE_RE.captures(s).ok_or_else(invalid)?;
        let op = Op::from_symbol(&caps[1]).ok_or_else(invalid)?;
        let version = parse_version(&caps[2]).map_err(|_| invalid())?;
        Ok(Self { op, version })
    }
}

/// A conjunction of clauses, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintExpr {
    clauses: Vec<Clause>,
}

impl ConstraintExpr {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether `candidate` satisfies every clause.
    pub fn matches(&self, candidate: &Version) -> bool {
        self.clauses.iter().all(|c| c.holds(candidate))
    }
}

impl FromStr for ConstraintExpr {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clauses = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Clause::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if clauses.is_empty() {
            return Err(ConstraintError::Empty);
        }
        Ok(Self { clauses })
    }
}

impl fmt::Display for ConstraintExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .clauses
            .iter()
            .map(|c| format!("{}{}", c.op.symbol(), c.version))
            .collect();
        write!(f, "{}", rendered.join(","))
    }
}

/// Evaluate `expression` against `version`, failing closed.
///
/// Returns `false` for unparseable or empty expressions.
pub fn evaluate(version: &Version, expression: &str) -> bool {
    match expression.parse::<ConstraintExpr>() {
        Ok(expr) => expr.matches(version),
        Err(e) => {
            tracing::debug!("Constraint {:?} rejected: {}", expression, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V531: Version = Version::new(5, 3, 1);

    #[test]
    fn range_within_bounds() {
        assert!(evaluate(&V531, ">=5.0,<5.6"));
    }

    #[test]
    fn range_outside_bounds() {
        assert!(!evaluate(&V531, ">=5.4,<5.6"));
        assert!(!evaluate(&V531, ">=4.4,<5.3"));
    }

    #[test]
    fn whitespace_and_v_prefix_accepted() {
        assert!(evaluate(&V531, " >= v5.0 , < 6.0 "));
    }

    #[test]
    fn each_operator_agrees_with_ordering() {
        let cases = [
            ("=5.3.1", true),
            ("=5.3", false),
            ("<5.3.1", false),
            ("<5.4", true),
            ("<=5.3.1", true),
            ("<=5.3", false),
            (">5.3", true),
            (">5.3.1", false),
            (">=5.3.1", true),
            (">=5.3.2", false),
        ];
        for (expr, expected) in cases {
            assert_eq!(evaluate(&V531, expr), expected, "expression {expr}");
        }
    }

    #[test]
    fn unknown_clause_fails_whole_expression() {
        // first clause holds, second is unparseable
        assert!(!evaluate(&V531, ">=5.0,^5.3"));
        assert!(!evaluate(&V531, "~5.3"));
        assert!(!evaluate(&V531, "==5.3.1"));
        assert!(!evaluate(&V531, ">=5.0,latest"));
    }

    #[test]
    fn empty_expression_is_not_satisfied() {
        assert!(!evaluate(&V531, ""));
        assert!(!evaluate(&V531, " , "));
        assert_eq!("".parse::<ConstraintExpr>(), Err(ConstraintError::Empty));
    }

    #[test]
    fn parse_reports_offending_clause() {
        let err = ">=5.0, ^5.3".parse::<ConstraintExpr>().unwrap_err();
        assert_eq!(
            err,
            ConstraintError::InvalidClause {
                clause: "^5.3".into()
            }
        );
    }

    #[test]
    fn display_normalizes_clauses() {
        let expr: ConstraintExpr = ">= v5.0 ,<5.6".parse().unwrap();
        assert_eq!(expr.to_string(), ">=5.0.0,<5.6.0");
        assert_eq!(expr.clauses().len(), 2);
    }
}

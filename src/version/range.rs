// src/version/range.rs
// npm-style semantic version range grammar: comparators, caret/tilde,
// wildcards, hyphen ranges, space-separated conjunctions and || groups.
use semver::Version;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid semantic version range: '{0}'")]
pub struct RangeParseError(String);

/// A parsed range expression: one or more `||`-separated alternatives,
/// each a conjunction of comparators that must all hold.
#[derive(Debug, Clone)]
pub struct RangeSet {
    alternatives: Vec<Conjunction>,
}

#[derive(Debug, Clone)]
struct Conjunction {
    comparators: Vec<Comparator>,
}

/// How many components a version inside a range expression actually spelled
/// out. Partial versions widen caret/tilde and hyphen upper bounds, so the
/// distinction survives zero-padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Major,
    Minor,
    Full,
}

#[derive(Debug, Clone)]
enum Comparator {
    Exact(Version),
    Caret(Version, Precision),
    Tilde(Version, Precision),
    Gt(Version),
    Gte(Version),
    Lt(Version),
    Lte(Version),
    /// `*`, `x`, or an expression reduced to no numeric components.
    Any,
    /// `1` or `1.x`: any version within the major.
    Major(u64),
    /// `1.2` or `1.2.x`: any version within the major.minor.
    MajorMinor(u64, u64),
    /// `1.0.0 - 2.0.0`: inclusive, except that a partial upper bound is
    /// exclusive at the next component (`1.0.0 - 2.3` allows 2.3.5).
    Hyphen {
        from: Version,
        to: Version,
        to_precision: Precision,
    },
}

impl RangeSet {
    /// Parse a range expression. Empty input is rejected.
    pub fn parse(expr: &str) -> Result<Self, RangeParseError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(RangeParseError(expr.to_string()));
        }

        let mut alternatives = Vec::new();
        for group in expr.split("||") {
            let group = group.trim();
            if group.is_empty() {
                return Err(RangeParseError(expr.to_string()));
            }
            alternatives.push(
                Conjunction::parse(group).ok_or_else(|| RangeParseError(expr.to_string()))?,
            );
        }

        Ok(Self { alternatives })
    }

    /// True when `version` satisfies at least one alternative.
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(version))
    }
}

impl Conjunction {
    fn parse(group: &str) -> Option<Self> {
        let comparators: Option<Vec<Comparator>> = split_comparators(group)
            .into_iter()
            .map(|tok| Comparator::parse(&tok))
            .collect();
        let comparators = comparators?;
        if comparators.is_empty() {
            return None;
        }
        Some(Self { comparators })
    }

    fn matches(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }
}

/// Split a conjunction on whitespace, re-joining `a - b` hyphen ranges and
/// `>= 1.2.3` detached operators into single tokens.
fn split_comparators(group: &str) -> Vec<String> {
    const OPERATORS: [&str; 7] = [">=", "<=", ">", "<", "^", "~", "="];

    let tokens: Vec<&str> = group.split_whitespace().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens.get(i + 1) == Some(&"-") && i + 2 < tokens.len() {
            out.push(format!("{} - {}", tokens[i], tokens[i + 2]));
            i += 3;
        } else if OPERATORS.contains(&tokens[i]) && i + 1 < tokens.len() {
            out.push(format!("{}{}", tokens[i], tokens[i + 1]));
            i += 2;
        } else {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }
    out
}

impl Comparator {
    fn parse(token: &str) -> Option<Self> {
        if let Some((from, to)) = token.split_once(" - ") {
            let (from, _) = parse_loose(from.trim())?;
            let (to, to_precision) = parse_loose(to.trim())?;
            return Some(Comparator::Hyphen {
                from,
                to,
                to_precision,
            });
        }

        if let Some(rest) = token.strip_prefix(">=") {
            Some(Comparator::Gte(parse_loose(rest.trim())?.0))
        } else if let Some(rest) = token.strip_prefix("<=") {
            Some(Comparator::Lte(parse_loose(rest.trim())?.0))
        } else if let Some(rest) = token.strip_prefix('>') {
            Some(Comparator::Gt(parse_loose(rest.trim())?.0))
        } else if let Some(rest) = token.strip_prefix('<') {
            Some(Comparator::Lt(parse_loose(rest.trim())?.0))
        } else if let Some(rest) = token.strip_prefix('^') {
            let (base, precision) = parse_loose(rest.trim())?;
            Some(Comparator::Caret(base, precision))
        } else if let Some(rest) = token.strip_prefix('~') {
            let (base, precision) = parse_loose(rest.trim())?;
            Some(Comparator::Tilde(base, precision))
        } else if let Some(rest) = token.strip_prefix('=') {
            Some(Comparator::Exact(parse_loose(rest.trim())?.0))
        } else {
            Self::parse_bare(token)
        }
    }

    /// A bare token is an exact version, or a wildcard/partial form that
    /// widens into a range (`*`, `1`, `1.x`, `1.2`, `1.2.x`).
    fn parse_bare(token: &str) -> Option<Self> {
        let stripped = strip_v(token);
        if let Ok(version) = Version::parse(stripped) {
            return Some(Comparator::Exact(version));
        }

        let parts: Vec<&str> = stripped.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return None;
        }

        let mut numeric = Vec::new();
        for part in &parts {
            if is_wildcard(part) {
                break;
            }
            numeric.push(part.parse::<u64>().ok()?);
        }

        match numeric.as_slice() {
            [] if parts.iter().all(|p| is_wildcard(p)) => Some(Comparator::Any),
            [] => None,
            [major] => Some(Comparator::Major(*major)),
            [major, minor] => Some(Comparator::MajorMinor(*major, *minor)),
            [major, minor, patch] => {
                Some(Comparator::Exact(Version::new(*major, *minor, *patch)))
            }
            _ => None,
        }
    }

    fn matches(&self, v: &Version) -> bool {
        match self {
            Comparator::Exact(e) => v == e,
            Comparator::Caret(base, precision) => {
                if v < base {
                    return false;
                }
                // ^1.2.3 -> <2.0.0; ^0.2.3 -> <0.3.0; ^0.0.3 -> <0.0.4.
                // Partials pin only what they spell out: ^0 -> <1.0.0,
                // ^0.0 -> <0.1.0.
                if base.major != 0 {
                    v.major == base.major
                } else if *precision == Precision::Major {
                    v.major == 0
                } else if base.minor != 0 || *precision == Precision::Minor {
                    v.major == 0 && v.minor == base.minor
                } else {
                    v.major == 0 && v.minor == 0 && v.patch == base.patch
                }
            }
            Comparator::Tilde(base, precision) => {
                // ~1.2.3 -> <1.3.0; ~1 -> <2.0.0
                v >= base
                    && v.major == base.major
                    && (*precision == Precision::Major || v.minor == base.minor)
            }
            Comparator::Gt(b) => v > b,
            Comparator::Gte(b) => v >= b,
            Comparator::Lt(b) => v < b,
            Comparator::Lte(b) => v <= b,
            Comparator::Any => true,
            Comparator::Major(major) => v.major == *major,
            Comparator::MajorMinor(major, minor) => v.major == *major && v.minor == *minor,
            Comparator::Hyphen {
                from,
                to,
                to_precision,
            } => {
                if v < from {
                    return false;
                }
                match to_precision {
                    Precision::Full => v <= to,
                    Precision::Minor => *v < Version::new(to.major, to.minor + 1, 0),
                    Precision::Major => *v < Version::new(to.major + 1, 0, 0),
                }
            }
        }
    }
}

fn is_wildcard(part: &str) -> bool {
    part.eq_ignore_ascii_case("x") || part == "*"
}

fn strip_v(s: &str) -> &str {
    s.strip_prefix('v').or_else(|| s.strip_prefix('V')).unwrap_or(s)
}

/// Parse a version appearing inside a range expression, padding partial
/// versions with zeros and truncating at a wildcard component. Reports how
/// many components were actually given so callers can keep partial
/// semantics.
fn parse_loose(input: &str) -> Option<(Version, Precision)> {
    let s = strip_v(input.trim());
    if s.is_empty() {
        return None;
    }
    if let Ok(version) = Version::parse(s) {
        return Some((version, Precision::Full));
    }

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut numeric = Vec::new();
    for part in &parts {
        if is_wildcard(part) {
            break;
        }
        numeric.push(part.parse::<u64>().ok()?);
    }

    match numeric.as_slice() {
        [major] => Some((Version::new(*major, 0, 0), Precision::Major)),
        [major, minor] => Some((Version::new(*major, *minor, 0), Precision::Minor)),
        [major, minor, patch] => {
            Some((Version::new(*major, *minor, *patch), Precision::Full))
        }
        _ => None,
    }
}

/// True when `expr` is a syntactically valid range. Never panics; empty and
/// malformed input report `false`.
pub fn is_valid_range(expr: &str) -> bool {
    RangeSet::parse(expr).is_ok()
}

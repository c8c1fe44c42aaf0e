use std::cell::OnceCell;
use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::model::ColumnKind;

// ---------------------------------------------------------------------------
// Filter expression language
// ---------------------------------------------------------------------------
//
//   expr    := orGroup ("," orGroup)*     all groups must hold
//   orGroup := clause ("|" clause)*       any clause may hold
//   clause  := ["!"] text
//
// Text columns test case-insensitive containment. Numeric and date columns
// additionally accept `<=`, `>=`, `<`, `>`, `=` followed by an operand; a
// clause without an operator falls back to containment on the raw text.

/// Why an operand or a cell could not be turned into a comparable value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperandError {
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("'{0}' is not a recognised date")]
    InvalidDate(String),
}

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessOrEqual,
    GreaterOrEqual,
    Less,
    Greater,
    Equal,
}

impl Comparison {
    /// Two-character operators come first so `<=` is never read as `<`.
    const OPERATORS: [(&'static str, Comparison); 5] = [
        ("<=", Comparison::LessOrEqual),
        (">=", Comparison::GreaterOrEqual),
        ("<", Comparison::Less),
        (">", Comparison::Greater),
        ("=", Comparison::Equal),
    ];

    /// Split a leading operator off `clause`, returning it with the remainder.
    pub fn strip(clause: &str) -> Option<(Comparison, &str)> {
        Self::OPERATORS
            .iter()
            .find_map(|(symbol, op)| clause.strip_prefix(symbol).map(|rest| (*op, rest)))
    }

    /// Whether `cell <op> target` holds given `cell.cmp(target)`.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::LessOrEqual => ordering != Ordering::Greater,
            Comparison::GreaterOrEqual => ordering != Ordering::Less,
            Comparison::Less => ordering == Ordering::Less,
            Comparison::Greater => ordering == Ordering::Greater,
            Comparison::Equal => ordering == Ordering::Equal,
        }
    }
}

// ---------------------------------------------------------------------------
// Comparable values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Instant(NaiveDateTime),
}

impl Value {
    /// Parse `text` the way cells of `kind` are compared. Text columns are
    /// never compared relationally; they are treated as numeric here.
    pub fn parse(text: &str, kind: ColumnKind) -> Result<Value, OperandError> {
        match kind {
            ColumnKind::Date => parse_instant(text).map(Value::Instant),
            ColumnKind::Numeric | ColumnKind::Text => parse_number(text).map(Value::Number),
        }
    }

    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Instant(a), Value::Instant(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Finite decimal number, surrounding whitespace ignored.
pub fn parse_number(text: &str) -> Result<f64, OperandError> {
    let s = text.trim();
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(OperandError::InvalidNumber(s.to_string())),
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [(&str, YearAt); 3] = [
    ("%Y-%m-%d", YearAt::Start),
    ("%Y/%m/%d", YearAt::Start),
    ("%m/%d/%Y", YearAt::End),
];

/// Where the year sits in a date form. chrono's `%Y` takes one to four
/// digits, so the year is checked for exactly four before parsing.
#[derive(Debug, Clone, Copy)]
enum YearAt {
    Start,
    End,
}

impl YearAt {
    fn has_full_year(self, s: &str) -> bool {
        let digits = match self {
            YearAt::Start => s.bytes().take_while(u8::is_ascii_digit).count(),
            YearAt::End => s.bytes().rev().take_while(u8::is_ascii_digit).count(),
        };
        digits == 4
    }
}

/// Parse a calendar date (or date and time) into a comparable instant.
/// Dates without a time of day are taken at midnight.
pub fn parse_instant(text: &str) -> Result<NaiveDateTime, OperandError> {
    let s = text.trim();

    if YearAt::Start.has_full_year(s) {
        if let Some(dt) = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return Ok(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .filter(|(_, year)| year.has_full_year(s))
        .find_map(|(fmt, _)| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| parse_long_form(s))
        .or_else(|| parse_partial(s))
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| OperandError::InvalidDate(s.to_string()))
}

/// Long dates as the listing page prints them: `Dec. 23, 2017`,
/// `Sept. 3, 2017`, `March 1, 2018`.
fn parse_long_form(s: &str) -> Option<NaiveDate> {
    if !YearAt::End.has_full_year(s) {
        return None;
    }
    let (month, rest) = s.split_once(' ')?;
    let month = month.trim_end_matches('.');
    let month = if month.eq_ignore_ascii_case("sept") {
        "Sep"
    } else {
        month
    };
    let normalized = format!("{month} {}", rest.trim());

    ["%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}

/// `YYYY` (January 1st) or `YYYY-MM` (first of the month).
fn parse_partial(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once('-').unwrap_or((s, "1"));
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if month.is_empty() || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

// ---------------------------------------------------------------------------
// Cell text with lazily derived forms
// ---------------------------------------------------------------------------

/// One cell under evaluation. The uppercase text and the parsed value are
/// computed at most once, however many clauses look at them.
struct CellText<'a> {
    raw: &'a str,
    kind: ColumnKind,
    upper: OnceCell<String>,
    value: OnceCell<Option<Value>>,
}

impl<'a> CellText<'a> {
    fn new(raw: &'a str, kind: ColumnKind) -> Self {
        CellText {
            raw,
            kind,
            upper: OnceCell::new(),
            value: OnceCell::new(),
        }
    }

    fn upper(&self) -> &str {
        self.upper.get_or_init(|| self.raw.to_uppercase())
    }

    fn value(&self) -> Option<&Value> {
        self.value
            .get_or_init(|| match Value::parse(self.raw, self.kind) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::trace!("cell not comparable: {e}");
                    None
                }
            })
            .as_ref()
    }
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Test {
    /// Empty clause or operator with nothing after it.
    Always,
    /// Operand that could not be parsed.
    Never,
    /// Uppercased needle.
    Contains(String),
    Compare(Comparison, Value),
}

/// One atomic test inside a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    negated: bool,
    test: Test,
}

impl Clause {
    pub fn parse(raw: &str, kind: ColumnKind) -> Clause {
        let raw = raw.trim();
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, raw),
        };

        if body.is_empty() {
            return Clause {
                negated: false,
                test: Test::Always,
            };
        }

        let operator = if kind.is_comparable() {
            Comparison::strip(body)
        } else {
            None
        };

        let test = match operator {
            Some((op, operand)) => {
                let operand = operand.trim();
                if operand.is_empty() {
                    Test::Always
                } else {
                    match Value::parse(operand, kind) {
                        Ok(value) => Test::Compare(op, value),
                        Err(e) => {
                            log::debug!("clause '{raw}' can never match: {e}");
                            Test::Never
                        }
                    }
                }
            }
            None => Test::Contains(body.to_uppercase()),
        };

        Clause { negated, test }
    }

    /// True when the clause holds for every possible cell.
    pub fn is_vacuous(&self) -> bool {
        self.test == Test::Always
    }

    fn matches(&self, cell: &CellText<'_>) -> bool {
        match &self.test {
            Test::Always => true,
            Test::Never => false,
            Test::Contains(needle) => self.negated != cell.upper().contains(needle.as_str()),
            // A cell that does not parse is not comparable, negated or not.
            Test::Compare(op, target) => cell
                .value()
                .and_then(|v| v.compare(target))
                .is_some_and(|ordering| self.negated != op.holds(ordering)),
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// A parsed predicate expression for one column: an AND of OR-groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    kind: ColumnKind,
    groups: Vec<Vec<Clause>>,
}

impl Expression {
    /// Parse the raw text of a search input. Never fails: malformed pieces
    /// degrade to a permissive or never-matching clause.
    pub fn parse(text: &str, kind: ColumnKind) -> Expression {
        let text = text.trim();
        let groups = if text.is_empty() {
            Vec::new()
        } else {
            text.split(',')
                .map(|group| group.split('|').map(|c| Clause::parse(c, kind)).collect())
                .collect()
        };
        Expression { kind, groups }
    }

    /// True when every row passes regardless of its cell text.
    pub fn matches_everything(&self) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(Clause::is_vacuous))
    }

    /// Evaluate against one cell's text.
    pub fn matches(&self, cell: &str) -> bool {
        let cell = CellText::new(cell, self.kind);
        self.groups
            .iter()
            .all(|group| group.iter().any(|clause| clause.matches(&cell)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(expr: &str, cell: &str) -> bool {
        Expression::parse(expr, ColumnKind::Text).matches(cell)
    }

    fn numeric(expr: &str, cell: &str) -> bool {
        Expression::parse(expr, ColumnKind::Numeric).matches(cell)
    }

    fn date(expr: &str, cell: &str) -> bool {
        Expression::parse(expr, ColumnKind::Date).matches(cell)
    }

    #[test]
    fn test_empty_expression_matches_everything() {
        for kind in [ColumnKind::Text, ColumnKind::Numeric, ColumnKind::Date] {
            let expr = Expression::parse("   ", kind);
            assert!(expr.matches_everything());
            assert!(expr.matches(""));
            assert!(expr.matches("anything"));
        }
    }

    #[test]
    fn test_text_substring_is_case_insensitive() {
        assert!(text("beatles", "The Beatles"));
        assert!(text("BEAT", "the beatles"));
        assert!(!text("stones", "The Beatles"));
    }

    #[test]
    fn test_text_and_with_negation() {
        let expr = "rock, !metal";
        assert!(text(expr, "Classic Rock"));
        assert!(!text(expr, "Rock, Heavy Metal"));
        assert!(!text(expr, "Jazz"));
    }

    #[test]
    fn test_text_or_groups() {
        let expr = "jazz | blues";
        assert!(text(expr, "Jazz"));
        assert!(text(expr, "Delta Blues"));
        assert!(!text(expr, "Rock"));
    }

    #[test]
    fn test_text_ignores_operators() {
        assert!(!text(">2010", "2015"));
        assert!(text(">2010", "Album >2010 edition"));
    }

    #[test]
    fn test_bare_bang_is_vacuous() {
        for kind in [ColumnKind::Text, ColumnKind::Numeric, ColumnKind::Date] {
            let expr = Expression::parse("!", kind);
            assert!(expr.matches_everything());
            assert!(expr.matches("whatever"));
            assert!(expr.matches(""));
        }
    }

    #[test]
    fn test_whitespace_is_trimmed_everywhere() {
        assert!(text("  !  metal  ,  rock ", "Rock"));
        assert!(numeric(" >=  4 ,  <= 5 ", "4.5"));
    }

    #[test]
    fn test_numeric_or_range() {
        let expr = ">2010 | <1970";
        assert!(numeric(expr, "2015"));
        assert!(numeric(expr, "1965"));
        assert!(!numeric(expr, "1990"));
        assert!(!numeric(expr, "2010"));
        assert!(!numeric(expr, "1970"));
    }

    #[test]
    fn test_numeric_closed_range() {
        let expr = ">=4,<=5";
        assert!(numeric(expr, "4"));
        assert!(numeric(expr, "4.5"));
        assert!(numeric(expr, "5.0"));
        assert!(!numeric(expr, "3.9"));
        assert!(!numeric(expr, "5.1"));
    }

    #[test]
    fn test_two_char_operators_win_over_prefixes() {
        assert_eq!(Comparison::strip("<=4"), Some((Comparison::LessOrEqual, "4")));
        assert_eq!(Comparison::strip(">=4"), Some((Comparison::GreaterOrEqual, "4")));
        assert_eq!(Comparison::strip("<4"), Some((Comparison::Less, "4")));
        assert_eq!(Comparison::strip("=4"), Some((Comparison::Equal, "4")));
        assert_eq!(Comparison::strip("4"), None);
    }

    #[test]
    fn test_numeric_equality_and_negation() {
        assert!(numeric("=3", "3.0"));
        assert!(!numeric("=3", "3.5"));
        assert!(numeric("!=3", "3.5"));
        assert!(!numeric("!=3", "3"));
        assert!(numeric("!>2000", "1999"));
    }

    #[test]
    fn test_operator_with_empty_operand_matches_all() {
        assert!(numeric(">", "1990"));
        assert!(numeric("<=   ", "not a number"));
        assert!(date(">", ""));
        assert!(Expression::parse(">=", ColumnKind::Numeric).matches_everything());
    }

    #[test]
    fn test_unparseable_operand_never_matches() {
        assert!(!numeric(">abc", "1990"));
        assert!(!numeric("!>abc", "1990"));
        assert!(!date("<someday", "2020-01-01"));
    }

    #[test]
    fn test_unparseable_cell_is_not_comparable() {
        assert!(!numeric(">2000", ""));
        assert!(!numeric(">2000", "unknown"));
        assert!(!numeric("!>2000", "unknown"));
    }

    #[test]
    fn test_numeric_without_operator_falls_back_to_substring() {
        assert!(numeric("19", "1969"));
        assert!(!numeric("20", "1969"));
        assert!(numeric("196 | >2010", "1969"));
    }

    #[test]
    fn test_date_after() {
        let expr = ">2023-01-01";
        assert!(date(expr, "2023-06-15"));
        assert!(!date(expr, "2023-01-01"));
        assert!(!date(expr, "2022-12-31"));
        assert!(!date(expr, ""));
        assert!(!date(expr, "never"));
    }

    #[test]
    fn test_date_cells_in_page_format() {
        assert!(date(">=2017-12-01", "Dec. 23, 2017"));
        assert!(date("<2018", "Sept. 3, 2017"));
        assert!(date("=2018-03-01", "March 1, 2018"));
        assert!(date("=2017-05-05", "May 5, 2017"));
    }

    #[test]
    fn test_parse_instant_forms() {
        let jan_first = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_instant("2023-01-01").unwrap(), jan_first);
        assert_eq!(parse_instant("2023/01/01").unwrap(), jan_first);
        assert_eq!(parse_instant("01/01/2023").unwrap(), jan_first);
        assert_eq!(parse_instant("2023").unwrap(), jan_first);
        assert_eq!(parse_instant("2023-01").unwrap(), jan_first);
        assert_eq!(parse_instant("Jan. 1, 2023").unwrap(), jan_first);
        assert_eq!(parse_instant("January 1, 2023").unwrap(), jan_first);
        assert!(parse_instant("2023-01-01T08:30").unwrap() > jan_first);
        assert!(matches!(
            parse_instant("soon"),
            Err(OperandError::InvalidDate(_))
        ));
        assert!(parse_instant("2023-13").is_err());
    }

    #[test]
    fn test_parse_instant_rejects_short_years() {
        for text in ["12/25/99", "1/2/03", "99-12-25", "99/12/25", "Dec. 23, 99", "23-06-01 10:00"] {
            assert!(parse_instant(text).is_err(), "{text} should not parse");
        }
        assert!(!date("<2000-01-01", "12/25/99"));
        assert!(!date("<2000-01-01", "1/2/03"));
        assert!(date("<2000-01-01", "12/25/1999"));
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number(" 4.5 "), Ok(4.5));
        assert!(parse_number("inf").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("").is_err());
    }

    #[test]
    fn test_date_comparison_with_time_of_day() {
        assert!(date(">2023-01-01", "2023-01-01 10:00"));
        assert!(!date(">2023-01-01 12:00", "2023-01-01"));
    }

    #[test]
    fn test_empty_group_is_permissive() {
        assert!(text("rock,,", "Rock"));
        assert!(text("metal|", "Rock"));
    }
}

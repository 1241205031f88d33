//! Recording date extraction from video titles
//!
//! Titles are matched against the configured strftime patterns in order,
//! each as a strict parse of the whole title. When none match, one lenient
//! scan looks for date-like fragments anywhere in the title. Missing
//! components in a lenient result are taken from a reference date.

use chrono::{Datelike, NaiveDate};
use chrono::format::ParseErrorKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// Year assumed by strict patterns that carry no year component
const PATTERN_DEFAULT_YEAR: i32 = 1900;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").unwrap());

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})\b").unwrap());

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[a-z]+|\d+(?:st|nd|rd|th)?").unwrap());

/// Parses recording dates out of free-text titles
#[derive(Debug, Clone)]
pub struct TitleDateParser {
    patterns: Vec<String>,
    reference: NaiveDate,
}

impl TitleDateParser {
    /// Create a parser with an ordered pattern list, using today (UTC) as the
    /// reference date for lenient parses
    pub fn new(patterns: Vec<String>) -> Self {
        Self::with_reference(patterns, crate::time::now().date_naive())
    }

    /// Create a parser with an explicit reference date
    pub fn with_reference(patterns: Vec<String>, reference: NaiveDate) -> Self {
        Self { patterns, reference }
    }

    /// Configured patterns in priority order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Extract a date from `title`
    ///
    /// Returns `None` when neither a pattern nor the lenient scan finds a date.
    pub fn parse(&self, title: &str) -> Option<NaiveDate> {
        if title.trim().is_empty() {
            return None;
        }

        self.patterns
            .iter()
            .find_map(|pattern| parse_exact(title, pattern))
            .or_else(|| parse_fuzzy(title, self.reference))
    }

    /// Decide the stored `recording_date` for a freshly fetched video
    ///
    /// The upload date stands in when the title yields nothing and the
    /// fallback is enabled.
    pub fn recording_date(
        &self,
        title: &str,
        upload_date: NaiveDate,
        use_upload_date_fallback: bool,
    ) -> Option<String> {
        match self.parse(title) {
            Some(date) => Some(date.format("%Y-%m-%d").to_string()),
            None if use_upload_date_fallback => Some(upload_date.format("%Y-%m-%d").to_string()),
            None => None,
        }
    }
}

/// Strict parse of the complete title against one strftime pattern
pub fn parse_exact(title: &str, pattern: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(title, pattern) {
        Ok(date) => Some(date),
        Err(e) if e.kind() == ParseErrorKind::NotEnough && !has_year_specifier(pattern) => {
            let padded_title = format!("{} {}", title, PATTERN_DEFAULT_YEAR);
            let padded_pattern = format!("{} %Y", pattern);
            NaiveDate::parse_from_str(&padded_title, &padded_pattern).ok()
        }
        Err(_) => None,
    }
}

fn has_year_specifier(pattern: &str) -> bool {
    ["%Y", "%y", "%G", "%g", "%C", "%F", "%D", "%x", "%s"]
        .iter()
        .any(|spec| pattern.contains(spec))
}

/// Lenient scan for a date anywhere in `title`
///
/// Recognizes numeric forms (`2015-03-15`, `03/15/2015`, `3.15.15`) first,
/// then English month names with an adjacent day and any four-digit year.
/// Components the title lacks come from `reference`.
pub fn parse_fuzzy(title: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(title) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = NUMERIC_DATE.captures(title) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = expand_year(&caps[3])?;
        // Month first unless that cannot be a month
        let (month, day) = if first > 12 && second <= 12 {
            (second, first)
        } else {
            (first, second)
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    let tokens: Vec<&str> = TOKEN.find_iter(title).map(|m| m.as_str()).collect();

    let year = tokens.iter().find_map(|token| {
        if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
            token.parse::<i32>().ok()
        } else {
            None
        }
    });

    let month_at = tokens
        .iter()
        .enumerate()
        .find_map(|(idx, token)| month_from_name(token).map(|month| (idx, month)));

    let (month, day) = match month_at {
        Some((idx, month)) => {
            let after = tokens.get(idx + 1).and_then(|t| day_from_token(t));
            let before = idx
                .checked_sub(1)
                .and_then(|prev| tokens.get(prev))
                .and_then(|t| day_from_token(t));
            (month, after.or(before))
        }
        None if year.is_some() => (reference.month(), None),
        None => return None,
    };

    let year = year.unwrap_or(reference.year());
    // A borrowed day is clamped to the month's length (Sep 31 -> Sep 30)
    let day = match day {
        Some(day) => day,
        None => reference.day().min(days_in_month(year, month)?),
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

fn expand_year(text: &str) -> Option<i32> {
    let value: i32 = text.parse().ok()?;
    if text.len() == 2 {
        // Fixed pivot: 00-69 -> 20xx, 70-99 -> 19xx, independent of today
        Some(if value < 70 { 2000 + value } else { 1900 + value })
    } else {
        Some(value)
    }
}

fn month_from_name(token: &str) -> Option<u32> {
    let month = match token.to_ascii_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn day_from_token(token: &str) -> Option<u32> {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    digits.parse::<u32>().ok().filter(|day| (1..=31).contains(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parser(patterns: &[&str]) -> TitleDateParser {
        TitleDateParser::with_reference(
            patterns.iter().map(|p| p.to_string()).collect(),
            ymd(2024, 6, 10),
        )
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        // "03/04/2015" is valid under both patterns
        let us_first = parser(&["%m/%d/%Y", "%d/%m/%Y"]);
        let eu_first = parser(&["%d/%m/%Y", "%m/%d/%Y"]);

        assert_eq!(us_first.parse("03/04/2015"), Some(ymd(2015, 3, 4)));
        assert_eq!(eu_first.parse("03/04/2015"), Some(ymd(2015, 4, 3)));
    }

    #[test]
    fn test_pattern_must_match_whole_title() {
        assert_eq!(parse_exact("03/15/2015 Disney trip", "%m/%d/%Y"), None);
        assert_eq!(parse_exact("03/15/2015", "%m/%d/%Y"), Some(ymd(2015, 3, 15)));
    }

    #[test]
    fn test_pattern_with_month_name() {
        assert_eq!(
            parse_exact("March 3, 2020", "%B %d, %Y"),
            Some(ymd(2020, 3, 3))
        );
    }

    #[test]
    fn test_pattern_without_year_defaults_to_1900() {
        assert_eq!(parse_exact("March 15", "%B %d"), Some(ymd(1900, 3, 15)));
    }

    #[test]
    fn test_invalid_calendar_date_rejected_by_pattern() {
        assert_eq!(parse_exact("02/30/2015", "%m/%d/%Y"), None);
    }

    #[test]
    fn test_empty_title_has_no_date() {
        assert_eq!(parser(&["%m/%d/%Y"]).parse(""), None);
        assert_eq!(parser(&[]).parse("   "), None);
    }

    #[test]
    fn test_not_a_date_without_patterns() {
        assert_eq!(parser(&[]).parse("not a date"), None);
    }

    #[test]
    fn test_fuzzy_fallback_month_name() {
        assert_eq!(parser(&[]).parse("March 3, 2020"), Some(ymd(2020, 3, 3)));
    }

    #[test]
    fn test_fuzzy_fallback_used_when_patterns_fail() {
        let p = parser(&["%m/%d/%Y"]);
        assert_eq!(
            p.parse("Walking Disney World - July 4th 2015"),
            Some(ymd(2015, 7, 4))
        );
    }

    #[test]
    fn test_fuzzy_day_before_month() {
        assert_eq!(parser(&[]).parse("Vlog 15 March 2016"), Some(ymd(2016, 3, 15)));
    }

    #[test]
    fn test_fuzzy_iso_date_in_text() {
        assert_eq!(
            parser(&[]).parse("Abandoned mall 2014-11-02 exploring"),
            Some(ymd(2014, 11, 2))
        );
    }

    #[test]
    fn test_fuzzy_numeric_us_date_in_text() {
        assert_eq!(parser(&[]).parse("Daily vlog 8/21/13"), Some(ymd(2013, 8, 21)));
        assert_eq!(parser(&[]).parse("Daily vlog 21.8.2013"), Some(ymd(2013, 8, 21)));
    }

    #[test]
    fn test_fuzzy_fills_missing_components_from_reference() {
        let p = parser(&[]);
        // Year only
        assert_eq!(p.parse("Best of 2015"), Some(ymd(2015, 6, 10)));
        // Month and day only
        assert_eq!(p.parse("Halloween Oct 31st"), Some(ymd(2024, 10, 31)));
    }

    #[test]
    fn test_fuzzy_borrowed_day_clamped_to_month_length() {
        let end_of_january = TitleDateParser::with_reference(Vec::new(), ymd(2024, 1, 31));
        assert_eq!(end_of_january.parse("Vlog September 2015"), Some(ymd(2015, 9, 30)));
        assert_eq!(end_of_january.parse("Disney February 2015"), Some(ymd(2015, 2, 28)));
        assert_eq!(end_of_january.parse("Disney February 2016"), Some(ymd(2016, 2, 29)));

        let leap_day = TitleDateParser::with_reference(Vec::new(), ymd(2024, 2, 29));
        assert_eq!(leap_day.parse("Best of 2015"), Some(ymd(2015, 2, 28)));

        let mid_month = TitleDateParser::with_reference(Vec::new(), ymd(2024, 1, 10));
        assert_eq!(mid_month.parse("Vlog September 2015"), Some(ymd(2015, 9, 10)));
    }

    #[test]
    fn test_fuzzy_explicit_day_not_clamped() {
        let p = TitleDateParser::with_reference(Vec::new(), ymd(2024, 1, 10));
        assert_eq!(p.parse("September 31 2015"), None);
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(expand_year("69"), Some(2069));
        assert_eq!(expand_year("70"), Some(1970));
        assert_eq!(expand_year("2015"), Some(2015));
    }

    #[test]
    fn test_fuzzy_ignores_lone_small_numbers() {
        assert_eq!(parser(&[]).parse("Road trip part 2"), None);
    }

    #[test]
    fn test_fuzzy_month_names_are_whole_words() {
        // "Marathon" must not read as "Mar"
        assert_eq!(parser(&[]).parse("Marathon day"), None);
    }

    #[test]
    fn test_recording_date_fallback_policy() {
        let p = parser(&[]);
        let upload = ymd(2019, 1, 2);

        assert_eq!(
            p.recording_date("March 3, 2020", upload, true).as_deref(),
            Some("2020-03-03")
        );
        assert_eq!(
            p.recording_date("no date here", upload, true).as_deref(),
            Some("2019-01-02")
        );
        assert_eq!(p.recording_date("no date here", upload, false), None);
    }
}

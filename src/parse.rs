//! Access-log line grammar.
//!
//! One line of the fixed format:
//!
//! ```text
//! [METHOD] /path, status=CODE, time=FLOATms user-agent=AGENT
//! ```
//!
//! Parsing is all-or-nothing: a line either matches the whole grammar and
//! yields a [`LogRecord`], or it yields `None`. Malformed lines are never an
//! error; callers decide whether to count rejects.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anchored at the line start. The user-agent capture is greedy and keeps
/// any trailing characters, including inner whitespace.
static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\w+)\]\s+([^,]+),\s+status=(\d+),\s+time=([0-9.]+)ms\s+user-agent=(.+)")
        .expect("log line regex is valid")
});

/// One parsed log line. Produced per match and consumed immediately by the
/// aggregate store; never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    /// Leading digit of the status string followed by "xx", e.g. "4xx".
    /// Derived from the captured text, not the integer, so short or odd
    /// status strings keep their literal leading character.
    pub status_class: String,
    pub latency_ms: f64,
    pub user_agent: String,
}

/// Parse a single line (already stripped of its newline).
///
/// Returns `None` for any deviation from the grammar: missing field, wrong
/// field order, non-numeric status or time. The numeric captures are digit
/// runs by construction, but `time` may still contain a second dot
/// (`1.2.3`), which fails float parsing and is treated as a non-match.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let caps = LINE_RE.captures(line.trim())?;

    let status_text = &caps[3];
    let status: u16 = status_text.parse().ok()?;
    let latency_ms: f64 = caps[4].parse().ok()?;
    let status_class = format!("{}xx", &status_text[..1]);

    Some(LogRecord {
        method: caps[1].to_string(),
        path: caps[2].to_string(),
        status,
        status_class,
        latency_ms,
        user_agent: caps[5].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_line() {
        let rec = parse_line("[GET] /api/users, status=200, time=15.3ms user-agent=TestAgent/1.0")
            .expect("line should match");
        assert_eq!(rec.method, "GET");
        assert_eq!(rec.path, "/api/users");
        assert_eq!(rec.status, 200);
        assert_eq!(rec.status_class, "2xx");
        assert_eq!(rec.latency_ms, 15.3);
        assert_eq!(rec.user_agent, "TestAgent/1.0");
    }

    #[test]
    fn user_agent_is_greedy() {
        let rec = parse_line("[POST] /a, status=500, time=1ms user-agent=Mozilla/5.0 (X11; Linux)")
            .unwrap();
        assert_eq!(rec.user_agent, "Mozilla/5.0 (X11; Linux)");
    }

    #[test]
    fn status_class_is_string_prefix() {
        // Short status codes keep their literal leading digit.
        let rec = parse_line("[GET] /x, status=42, time=0.5ms user-agent=a").unwrap();
        assert_eq!(rec.status, 42);
        assert_eq!(rec.status_class, "4xx");
    }

    #[test]
    fn integer_time_accepted() {
        let rec = parse_line("[GET] /x, status=301, time=7ms user-agent=a").unwrap();
        assert_eq!(rec.latency_ms, 7.0);
        assert_eq!(rec.status_class, "3xx");
    }

    #[test]
    fn malformed_lines_do_not_match() {
        for bad in [
            "",
            "plain noise",
            "GET /api/users, status=200, time=15.3ms user-agent=a", // no brackets
            "[GET] /api/users status=200, time=15.3ms user-agent=a", // missing comma
            "[GET] /api/users, status=abc, time=15.3ms user-agent=a", // non-numeric status
            "[GET] /api/users, status=200, time=fastms user-agent=a", // non-numeric time
            "[GET] /api/users, status=200, time=1.2.3ms user-agent=a", // double dot
            "[GET] /api/users, status=200, time=15.3ms", // missing user-agent
            "[GET] /api/users, time=15.3ms status=200, user-agent=a", // wrong order
        ] {
            assert!(parse_line(bad).is_none(), "should not match: {bad:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        // The original trims the line before matching.
        assert!(parse_line("  [GET] /x, status=200, time=1ms user-agent=a\t").is_some());
    }
}

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // eg. "HTTP/1.1 200 OK", ASCII whitespace only
    static ref STATUS_LINE: Regex =
        Regex::new(r"^HTTP/[0-9.]+[\t\n\f\r ]+([0-9]+)[\t\n\f\r ]+(.*)$").expect("status line regex");
}

/// A parsed `HTTP/<version> <code> <reason phrase>` line
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StatusLine<'a> {
    pub code: u16,
    pub reason: &'a str,
}

impl StatusLine<'_> {
    /// `None` for codes outside of what HTTP allows, eg. 42
    pub fn status_code(&self) -> Option<http::StatusCode> {
        http::StatusCode::from_u16(self.code).ok()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

pub fn parse_status_line(line: &str) -> Option<StatusLine<'_>> {
    let caps = STATUS_LINE.captures(line)?;
    let code = caps.get(1)?.as_str().parse::<u16>().ok()?;
    let reason = caps.get(2)?.as_str();
    Some(StatusLine { code, reason })
}

/// True for a 2xx status line, false for anything else,
/// including a line that can't be parsed.
pub fn status_ok(line: &str) -> bool {
    match parse_status_line(line) {
        Some(status) => status.is_success(),
        None => {
            tracing::debug!(status = line, "unparsable status line");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_statuses() {
        assert!(status_ok("HTTP/1.1 200 OK"));
        assert!(status_ok("HTTP/1.0 201 Created"));
        assert!(status_ok("HTTP/2 204 No Content"));
        assert!(status_ok("HTTP/1.1 299 "));
    }

    #[test]
    fn error_statuses() {
        assert!(!status_ok("HTTP/1.1 404 Not Found"));
        assert!(!status_ok("HTTP/1.1 199 Whatever"));
        assert!(!status_ok("HTTP/1.1 300 Multiple Choices"));
        assert!(!status_ok("HTTP/1.1 500 Internal Server Error"));
    }

    #[test]
    fn garbage_is_not_ok() {
        assert!(!status_ok("garbage"));
        assert!(!status_ok(""));
        assert!(!status_ok("HTTP/1.1 200"));
        assert!(!status_ok("HTTPS/1.1 200 OK"));
        assert!(!status_ok(" HTTP/1.1 200 OK"));
        assert!(!status_ok("HTTP/1.1 OK 200"));
        // does not fit in an integer
        assert!(!status_ok("HTTP/1.1 99999999999999999999 OK"));
        // non-ASCII spaces do not separate the fields
        assert!(!status_ok("HTTP/1.1\u{00A0}200\u{2003}OK"));
        assert!(!status_ok("HTTP/1.1 200\u{3000}OK"));
    }

    #[test]
    fn odd_reason_phrase_is_accepted() {
        let status = parse_status_line("HTTP/1.1   207\t  Multi  Status ✓").unwrap();
        assert_eq!(status.code, 207);
        assert_eq!(status.reason, "Multi  Status ✓");
        assert!(status.is_success());
    }

    #[test]
    fn status_code() {
        let status = parse_status_line("HTTP/1.1 404 Not Found").unwrap();
        assert_eq!(status.status_code(), Some(http::StatusCode::NOT_FOUND));
        let status = parse_status_line("HTTP/1.1 42 Odd").unwrap();
        assert_eq!(status.code, 42);
        assert_eq!(status.status_code(), None);
    }
}

//! Liveness verdicts and error presentation for probe results.

use std::error::Error as _;
use std::fmt;

use serde::Serialize;

use crate::models::ProbeResult;

/// Whether a target is considered alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Up,
    Down,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Up => f.write_str("UP"),
            Verdict::Down => f.write_str("DOWN"),
        }
    }
}

/// `Up` iff the final status code is in `[200, 300)`.
///
/// A status of 0 (no response at all) is `Down`, as are redirects that were
/// not followed to completion.
pub fn classify(result: &ProbeResult) -> Verdict {
    verdict_for_status(result.status_code)
}

pub(crate) fn verdict_for_status(status_code: u16) -> Verdict {
    if (200..300).contains(&status_code) {
        Verdict::Up
    } else {
        Verdict::Down
    }
}

/// Message to show for a failed result, if any.
///
/// A non-empty `error` string always wins. Otherwise the structured `err` is
/// unwrapped exactly one level to its immediate cause, falling back to `err`
/// itself when it has no cause.
pub fn present_error(result: &ProbeResult) -> Option<String> {
    if !result.error.is_empty() {
        return Some(result.error.clone());
    }
    let err = result.err.as_ref()?;
    Some(match err.source() {
        Some(cause) => cause.to_string(),
        None => err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ProbeError;
    use crate::models::{ProbeResult, Target};
    use std::time::Duration;

    fn result_with_status(status_code: u16) -> ProbeResult {
        let mut result = ProbeResult::failed(
            &Target::new("example.com"),
            "GET",
            Duration::from_millis(1),
            ProbeError::Cancelled,
        );
        result.status_code = status_code;
        result.error.clear();
        result.err = None;
        result
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(&result_with_status(0)), Verdict::Down);
        assert_eq!(classify(&result_with_status(199)), Verdict::Down);
        assert_eq!(classify(&result_with_status(200)), Verdict::Up);
        assert_eq!(classify(&result_with_status(204)), Verdict::Up);
        assert_eq!(classify(&result_with_status(299)), Verdict::Up);
        assert_eq!(classify(&result_with_status(300)), Verdict::Down);
        assert_eq!(classify(&result_with_status(404)), Verdict::Down);
        assert_eq!(classify(&result_with_status(503)), Verdict::Down);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Up.to_string(), "UP");
        assert_eq!(Verdict::Down.to_string(), "DOWN");
    }

    #[test]
    fn test_present_error_none_on_success() {
        assert_eq!(present_error(&result_with_status(200)), None);
    }

    #[test]
    fn test_present_error_prefers_error_string() {
        let mut result = result_with_status(0);
        result.error = "coarse".to_string();
        result.err = Some(ProbeError::Cancelled);
        assert_eq!(present_error(&result).as_deref(), Some("coarse"));
    }

    #[test]
    fn test_present_error_unwraps_one_level() {
        let mut result = result_with_status(0);
        result.err = Some(ProbeError::InvalidUrl {
            url: "http://[::1".to_string(),
            source: url::ParseError::InvalidIpv6Address,
        });
        assert_eq!(
            present_error(&result),
            Some(url::ParseError::InvalidIpv6Address.to_string())
        );
    }

    #[test]
    fn test_present_error_falls_back_to_top_level() {
        let mut result = result_with_status(0);
        result.err = Some(ProbeError::Cancelled);
        assert_eq!(present_error(&result).as_deref(), Some("probe cancelled"));
    }
}

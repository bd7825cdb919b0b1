//! Target normalization and URL validation.
//!
//! Raw targets arrive as bare hosts, `host:port` pairs, or full URLs. Before
//! probing, each one gets a scheme: ports 80 and 8080 are treated as
//! plaintext, everything else defaults to HTTPS.

use log::warn;
use url::Url;

use crate::error_handling::ProbeError;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Placeholder scheme used only to parse `host[:port]` inputs.
///
/// Not a special scheme, so the parser keeps an explicit
/// `:80` or `:443` instead of dropping it as the scheme default.
const PARSE_SCHEME: &str = "probe";

/// Maximum URL length (2048 characters), matching common browser and server
/// limits. Only enforced outside unsafe mode.
const MAX_URL_LENGTH: usize = 2048;

/// Ports that are probed over plaintext HTTP when the input has no scheme.
const PLAINTEXT_PORTS: &[u16] = &[80, 8080];

/// Adds a scheme to a raw target if it does not already have one.
///
/// - Inputs starting with `http://` or `https://` (case-sensitive) are
///   returned unchanged, so the function is idempotent.
/// - Otherwise the input is parsed as `host[:port][/path]`. An explicit port
///   of exactly 80 or 8080 gets `http://`; any other port, or no port, gets
///   `https://`.
/// - Inputs that do not parse are logged and returned unchanged; probing them
///   later fails with a URL error instead of crashing here.
///
/// # Examples
///
/// ```
/// use probe_status::resolve_scheme;
///
/// assert_eq!(resolve_scheme("example.com"), "https://example.com");
/// assert_eq!(resolve_scheme("example.com:8080"), "http://example.com:8080");
/// assert_eq!(resolve_scheme("http://example.com"), "http://example.com");
/// ```
pub fn resolve_scheme(raw: &str) -> String {
    if raw.starts_with(HTTP_PREFIX) || raw.starts_with(HTTPS_PREFIX) {
        return raw.to_string();
    }

    match explicit_port(raw) {
        Ok(Some(port)) if PLAINTEXT_PORTS.contains(&port) => format!("{HTTP_PREFIX}{raw}"),
        Ok(_) => format!("{HTTPS_PREFIX}{raw}"),
        Err(e) => {
            warn!("input {raw:?} is not a valid url: {e}");
            raw.to_string()
        }
    }
}

/// Parses `raw` as an authority (plus optional path) and returns its explicit port.
pub(crate) fn explicit_port(raw: &str) -> Result<Option<u16>, url::ParseError> {
    let parsed = Url::parse(&format!("{PARSE_SCHEME}://{raw}"))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed.port()),
        _ => Err(url::ParseError::EmptyHost),
    }
}

/// Validates a resolved target before any network I/O.
///
/// The URL must parse and use the http or https scheme. Outside unsafe mode it
/// must also fit within `MAX_URL_LENGTH`.
///
/// # Errors
///
/// Returns `ProbeError::InvalidUrl` or `ProbeError::UnsupportedUrl`. Neither
/// is retried.
pub fn validate_target_url(url: &str, unsafe_mode: bool) -> Result<Url, ProbeError> {
    if !unsafe_mode && url.len() > MAX_URL_LENGTH {
        return Err(ProbeError::UnsupportedUrl {
            url: url.chars().take(50).collect(),
            reason: format!("exceeds maximum length ({} > {MAX_URL_LENGTH})", url.len()),
        });
    }

    let parsed = Url::parse(url).map_err(|source| ProbeError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ProbeError::UnsupportedUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Resolves a `Location` header against the URL that produced it.
///
/// - Absolute http(s) locations are used as-is.
/// - Path-relative forms (`/x`, `./x`, `?q`, `#f`, or empty) are joined to `current`.
/// - Anything else without a scheme goes through [`resolve_scheme`] first.
///
/// # Errors
///
/// Returns a non-retriable `ProbeError` when the location cannot be turned
/// into an http(s) URL.
pub fn resolve_location(current: &Url, location: &str) -> Result<Url, ProbeError> {
    let location = location.trim();

    let lower = location.to_ascii_lowercase();
    if lower.starts_with(HTTP_PREFIX) || lower.starts_with(HTTPS_PREFIX) {
        return validate_target_url(location, true);
    }

    if location.is_empty() || location.starts_with(['/', '.', '?', '#']) {
        return current
            .join(location)
            .map_err(|source| ProbeError::InvalidUrl {
                url: location.to_string(),
                source,
            });
    }

    if location.contains("://") {
        return Err(ProbeError::UnsupportedUrl {
            url: location.to_string(),
            reason: "redirect to a non-http scheme".to_string(),
        });
    }

    let resolved = resolve_scheme(location);
    validate_target_url(&resolved, true).or_else(|_| {
        current
            .join(location)
            .map_err(|source| ProbeError::InvalidUrl {
                url: location.to_string(),
                source,
            })
    })
}

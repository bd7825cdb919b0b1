//! TLS certificate capture.
//!
//! The HTTP client is built with `tls_info(true)`, so every response on a TLS
//! connection carries the peer's leaf certificate. This module parses it with
//! `x509-parser` and reports:
//! - the not-after timestamp
//! - a certificate error string (expired, not yet valid, wrong host)
//!
//! The client accepts invalid certificates so that misconfigured hosts still
//! return a status code; the problems are reported here instead.

mod extract;

use chrono::{DateTime, Utc};

use crate::models::TlsCertificateInfo;

use extract::{extract_certificate_names, host_matches, validity_problem};

/// Captures certificate details from a response, if it came over TLS.
///
/// Returns `None` for plaintext responses or when the TLS backend did not
/// expose a peer certificate.
pub fn capture_tls_info(response: &reqwest::Response) -> Option<TlsCertificateInfo> {
    let info = response.extensions().get::<reqwest::tls::TlsInfo>()?;
    let der = info.peer_certificate()?;
    let host = response.url().host_str();
    Some(inspect_certificate(der, host, Utc::now()))
}

/// Parses a DER certificate and checks it against `host` at time `now`.
///
/// Parse failures are reported through the `error` field, never as a panic or
/// a probe failure.
pub fn inspect_certificate(der: &[u8], host: Option<&str>, now: DateTime<Utc>) -> TlsCertificateInfo {
    let cert = match x509_parser::parse_x509_certificate(der) {
        Ok((_, cert)) => cert,
        Err(e) => {
            log::debug!("Failed to parse peer certificate: {e}");
            return TlsCertificateInfo {
                not_after: None,
                error: format!("failed to parse peer certificate: {e}"),
            };
        }
    };

    let validity = cert.validity();
    let not_before = DateTime::<Utc>::from_timestamp(validity.not_before.timestamp(), 0);
    let not_after = DateTime::<Utc>::from_timestamp(validity.not_after.timestamp(), 0);

    let mut problems = Vec::new();
    if let Some(problem) = validity_problem(not_before, not_after, now) {
        problems.push(problem);
    }
    if let Some(host) = host {
        let names = extract_certificate_names(&cert);
        if !host_matches(host, &names) {
            log::debug!("Certificate names {:?} do not cover {host}", names.dns);
            problems.push(format!("certificate is not valid for {host}"));
        }
    }

    TlsCertificateInfo {
        not_after,
        error: problems.join("; "),
    }
}

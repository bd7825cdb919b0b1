//! Certificate field extraction and checks.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};

/// Names a certificate is valid for.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CertificateNames {
    /// DNS names from the SAN extension (or the subject CN when there is no SAN)
    pub dns: Vec<String>,
    /// IP addresses from the SAN extension
    pub ips: Vec<IpAddr>,
}

/// Extracts Subject Alternative Names from an X.509 certificate.
///
/// DNS names and IP addresses are kept; other name types are ignored. When
/// the certificate carries no SAN extension at all, the subject common names
/// are used instead.
pub(crate) fn extract_certificate_names(cert: &X509Certificate<'_>) -> CertificateNames {
    let mut names = CertificateNames::default();
    let mut saw_san = false;

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            saw_san = true;
            for general_name in &san.general_names {
                match general_name {
                    GeneralName::DNSName(dns_name) => names.dns.push(dns_name.to_string()),
                    GeneralName::IPAddress(bytes) => {
                        if let Some(ip) = ip_from_bytes(bytes) {
                            names.ips.push(ip);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if !saw_san {
        names.dns.extend(
            cert.subject()
                .iter_common_name()
                .filter_map(|cn| cn.as_str().ok())
                .map(str::to_string),
        );
    }

    names
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        _ => None,
    }
}

/// Describes why a certificate is outside its validity window at `now`.
pub(crate) fn validity_problem(
    not_before: Option<DateTime<Utc>>,
    not_after: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<String> {
    if let Some(not_after) = not_after {
        if now > not_after {
            return Some(format!("certificate expired at {}", not_after.to_rfc3339()));
        }
    }
    if let Some(not_before) = not_before {
        if now < not_before {
            return Some(format!(
                "certificate is not valid before {}",
                not_before.to_rfc3339()
            ));
        }
    }
    None
}

/// Whether `host` is covered by the certificate names.
///
/// Matching is case-insensitive. A wildcard (`*.example.com`) covers exactly
/// one extra label. IP hosts only match IP SAN entries.
pub(crate) fn host_matches(host: &str, names: &CertificateNames) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<IpAddr>() {
        return names.ips.contains(&ip);
    }

    let host = host.trim_end_matches('.').to_ascii_lowercase();
    names.dns.iter().any(|pattern| {
        let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();
        match pattern.strip_prefix("*.") {
            Some(suffix) => host
                .split_once('.')
                .is_some_and(|(label, rest)| !label.is_empty() && rest == suffix),
            None => pattern == host,
        }
    })
}

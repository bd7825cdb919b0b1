//! User-Agent selection.
//!
//! Probes either send the fixed `user_agent` from the options or, with
//! `randomize_user_agent`, a freshly picked browser-like User-Agent on every
//! attempt so that repeated probes do not share one fingerprint.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::ProbeOptions;

/// Recent stable Chrome major versions
const CHROME_VERSIONS: &[&str] = &[
    "131.0.0.0", "130.0.0.0", "129.0.0.0", "128.0.0.0", "127.0.0.0",
];

/// Recent Firefox versions
const FIREFOX_VERSIONS: &[&str] = &["133.0", "132.0", "131.0", "128.0"];

/// Platform tokens as they appear inside the User-Agent parentheses
const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

/// Generates a Chrome User-Agent string for the given platform and version.
pub fn generate_user_agent(platform: &str, chrome_version: &str) -> String {
    format!(
        "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{chrome_version} Safari/537.36"
    )
}

/// Generates a Firefox User-Agent string for the given platform and version.
pub fn generate_firefox_user_agent(platform: &str, firefox_version: &str) -> String {
    format!("Mozilla/5.0 ({platform}; rv:{firefox_version}) Gecko/20100101 Firefox/{firefox_version}")
}

/// Picks a random browser User-Agent.
pub fn random_user_agent() -> String {
    let mut rng = rand::rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    if rng.random_bool(0.25) {
        let version = FIREFOX_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(FIREFOX_VERSIONS[0]);
        generate_firefox_user_agent(platform, version)
    } else {
        let version = CHROME_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CHROME_VERSIONS[0]);
        generate_user_agent(platform, version)
    }
}

/// User-Agent for the next attempt under `options`.
pub fn user_agent_for_attempt(options: &ProbeOptions) -> String {
    if options.randomize_user_agent {
        random_user_agent()
    } else {
        options.user_agent.clone()
    }
}

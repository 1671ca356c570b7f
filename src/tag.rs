use once_cell::sync::Lazy;
use regex::Regex;

static RELEASE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+$").expect("valid release tag pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Trusted,
    Risky,
}

/// Release tags of the form `vMAJOR.MINOR.PATCH` are trusted; everything
/// else (`latest`, branch tags, raw digests) is risky and requires
/// confirmation before deployment.
pub fn classify(reference: &str) -> Classification {
    if RELEASE_TAG.is_match(reference) {
        Classification::Trusted
    } else {
        Classification::Risky
    }
}

// src/version/coerce.rs
// Loose extraction of a semantic version from arbitrary text.
use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

// First run of up to three dot-separated numeric components anywhere in the
// input. Digit runs are capped at 16 so absurd inputs cannot overflow.
static COERCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?")
        .expect("coerce pattern is valid")
});

/// Coerce a loose version string into the closest `semver::Version`.
///
/// Tolerates leading non-numeric text (`v1.2.3`, `release-2.1`), partial
/// versions (`1.2` becomes `1.2.0`), and trailing pre-release or build
/// metadata, which is dropped. Returns `None` when the input contains no
/// extractable numeric component.
pub fn coerce(input: &str) -> Option<Version> {
    let caps = COERCE_PATTERN.captures(input)?;

    let component = |idx: usize| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_full_version() {
        assert_eq!(coerce("1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn coerces_v_prefix() {
        assert_eq!(coerce("v1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn coerces_partial_versions() {
        assert_eq!(coerce("1"), Some(Version::new(1, 0, 0)));
        assert_eq!(coerce("1.2"), Some(Version::new(1, 2, 0)));
    }

    #[test]
    fn drops_prerelease_and_build_metadata() {
        assert_eq!(coerce("1.2.3-beta"), Some(Version::new(1, 2, 3)));
        assert_eq!(coerce("1.2.3-rc.1+build.5"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn coerces_embedded_version() {
        assert_eq!(coerce("release-2.1"), Some(Version::new(2, 1, 0)));
        assert_eq!(coerce("abc123"), Some(Version::new(123, 0, 0)));
    }

    #[test]
    fn rejects_input_without_digits() {
        assert_eq!(coerce("not-a-version"), None);
        assert_eq!(coerce(""), None);
    }
}

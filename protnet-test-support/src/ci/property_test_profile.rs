//! Property-test run profile read from the environment.
//!
//! Every protnet property suite reads the same two overrides, so a CI job can
//! raise the case count or enable forking for all of them at once.

use std::env;

/// Environment variable overriding the number of proptest cases.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable toggling proptest process forking.
pub const PROTNET_PBT_FORK_ENV_KEY: &str = "PROTNET_PBT_FORK";

/// Case count and fork setting for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads the overrides, falling back to the given defaults when a
    /// variable is unset or unparsable.
    ///
    /// # Examples
    ///
    /// ```
    /// use protnet_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: read_override(PROGTEST_CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: read_override(PROTNET_PBT_FORK_ENV_KEY, parse_switch).unwrap_or(default_fork),
        }
    }

    /// Number of cases per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn read_override<T>(key: &'static str, parse: fn(&str) -> Result<T, String>) -> Option<T> {
    let raw = env::var(key).ok()?;
    match parse(&raw) {
        Ok(value) => Some(value),
        Err(reason) => {
            tracing::warn!(env = key, raw = %raw, reason = %reason, "ignoring invalid property-test override");
            None
        }
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be positive".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("not a case count: {error}")),
    }
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("`{other}` is not a boolean switch")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use rstest::rstest;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets or clears a variable and restores it on drop.
    struct ScopedVar {
        key: &'static str,
        previous: Option<String>,
    }

    impl ScopedVar {
        fn new(key: &'static str, value: Option<&str>) -> Self {
            let previous = env::var(key).ok();
            Self::apply(key, value);
            Self { key, previous }
        }

        fn apply(key: &'static str, value: Option<&str>) {
            // SAFETY: every test touching the environment holds ENV_LOCK.
            unsafe {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }

    impl Drop for ScopedVar {
        fn drop(&mut self) {
            Self::apply(self.key, self.previous.as_deref());
        }
    }

    fn load_with(cases: Option<&str>, fork: Option<&str>, defaults: (u32, bool)) -> ProptestRunProfile {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _cases = ScopedVar::new(PROGTEST_CASES_ENV_KEY, cases);
        let _fork = ScopedVar::new(PROTNET_PBT_FORK_ENV_KEY, fork);
        ProptestRunProfile::load(defaults.0, defaults.1)
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let profile = load_with(None, None, (48, false));
        assert_eq!(profile, ProptestRunProfile { cases: 48, fork: false });
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 512 ", 512)]
    fn accepts_case_overrides(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(load_with(Some(raw), None, (48, false)).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("many")]
    fn ignores_invalid_case_overrides(#[case] raw: &str) {
        assert_eq!(load_with(Some(raw), None, (48, false)).cases(), 48);
    }

    #[rstest]
    #[case("on", false, true)]
    #[case("TRUE", false, true)]
    #[case("0", true, false)]
    #[case("no", true, false)]
    #[case("perhaps", true, true)]
    #[case("", false, false)]
    fn reads_fork_switch(#[case] raw: &str, #[case] default: bool, #[case] expected: bool) {
        assert_eq!(load_with(None, Some(raw), (48, default)).fork(), expected);
    }
}

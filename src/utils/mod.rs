/// Get environment variable with GREENROOM_ prefix, falling back to the
/// unprefixed version.
///
/// Checks `GREENROOM_{key}` first, then `{key}` for compatibility with
/// standard environment variable naming.
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("GREENROOM_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_wins_over_fallback() {
        std::env::set_var("GREENROOM_UTILS_TEST_VAR", "prefixed");
        std::env::set_var("UTILS_TEST_VAR", "plain");
        assert_eq!(
            get_env_with_prefix("UTILS_TEST_VAR"),
            Some("prefixed".to_string())
        );
        std::env::remove_var("GREENROOM_UTILS_TEST_VAR");

        assert_eq!(
            get_env_with_prefix("UTILS_TEST_VAR"),
            Some("plain".to_string())
        );
        std::env::remove_var("UTILS_TEST_VAR");

        assert_eq!(get_env_with_prefix("UTILS_TEST_MISSING"), None);
    }
}

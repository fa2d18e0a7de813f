//! Process environment loading.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

use digest_core::Config;

/// Load `.env` from the working directory or its parents, if there is one.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn config_from_process() -> Config {
    Config::resolve(&collect_vars(std::env::vars_os()))
}

/// Non-UTF-8 variables cannot be any of ours; skip them instead of panicking.
fn collect_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_vars_feeds_the_resolver() {
        let vars = vec![
            (OsString::from("HOT_BOARDS"), OsString::from("60076, 74934")),
            (OsString::from("HOT_LIMIT"), OsString::from("3")),
        ];
        let config = Config::resolve(&collect_vars(vars));
        assert_eq!(config.hot_boards, vec!["60076", "74934"]);
        assert_eq!(config.hot_limit, 3);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_values_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from("COLD_BOARDS"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from("COLD_LIMIT"), OsString::from("4")),
        ];
        let map = collect_vars(vars);
        assert!(!map.contains_key("COLD_BOARDS"));
        assert_eq!(map.get("COLD_LIMIT").map(String::as_str), Some("4"));
    }
}

//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// `separator`-delimited values, trimmed, empties dropped.
    fn get_list(&self, section: &str, key: &str, separator: char) -> Vec<String> {
        self.get_string(section, key)
            .map(|raw| {
                raw.split(separator)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

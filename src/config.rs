//! Share-link configuration.
//!
//! A share URL is `<base_url>#<moves>`. Anything pasted back in may be a full
//! URL or a bare move string; only the text after the last `#` is decoded.

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub base_url: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl LinkConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn share_url(&self, moves: &str) -> String {
        let base = fragment_base(&self.base_url);
        format!("{base}#{moves}")
    }
}

/// The move string carried by `text`: its fragment if it has one, otherwise
/// the whole (trimmed) text.
pub fn fragment_of(text: &str) -> &str {
    let text = text.trim();
    match text.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => text,
    }
}

fn fragment_base(base_url: &str) -> &str {
    match base_url.split_once('#') {
        Some((base, _)) => base,
        None => base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::{fragment_of, LinkConfig, DEFAULT_BASE_URL};

    #[test]
    fn share_url_appends_the_fragment() {
        let config = LinkConfig::new("https://chess.test/play");
        assert_eq!(config.share_url("mC0K"), "https://chess.test/play#mC0K");
        assert_eq!(config.share_url(""), "https://chess.test/play#");
        assert_eq!(LinkConfig::default().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn stale_fragment_in_base_url_is_replaced() {
        let config = LinkConfig::new("https://chess.test/play#old");
        assert_eq!(config.share_url("mC"), "https://chess.test/play#mC");
    }

    #[test]
    fn fragment_is_taken_after_the_last_hash() {
        assert_eq!(fragment_of("https://chess.test/play#mC0K"), "mC0K");
        assert_eq!(fragment_of("a#b#mC"), "mC");
        assert_eq!(fragment_of("  mC0K\n"), "mC0K");
        assert_eq!(fragment_of("https://chess.test/play#"), "");
        assert_eq!(fragment_of(""), "");
    }
}

use std::sync::LazyLock;

use regex::Regex;

use crate::config::REPLACEMENT;

static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)@\w+").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://[^\s)>\]]+").unwrap());

/// Rewrite every mention and every http/https link in `text` to the fixed
/// replacement token. The URL pass runs on the output of the mention pass.
/// Empty input comes back unchanged.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_mentions = MENTION.replace_all(text, REPLACEMENT);
    URL.replace_all(&without_mentions, REPLACEMENT).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_mention() {
        assert_eq!(
            sanitize("ping @alice and @Bob_99"),
            format!("ping {REPLACEMENT} and {REPLACEMENT}")
        );
    }

    #[test]
    fn replaces_every_url() {
        assert_eq!(
            sanitize("see https://example.com/a and HTTP://other.io"),
            format!("see {REPLACEMENT} and {REPLACEMENT}")
        );
    }

    #[test]
    fn url_stops_at_closing_delimiters() {
        assert_eq!(
            sanitize("(https://a.io) <https://b.io> [https://c.io]"),
            format!("({REPLACEMENT}) <{REPLACEMENT}> [{REPLACEMENT}]")
        );
    }

    #[test]
    fn mixed_mentions_and_urls() {
        assert_eq!(
            sanitize("contact @joe at https://x.co"),
            format!("contact {REPLACEMENT} at {REPLACEMENT}")
        );
    }

    #[test]
    fn empty_input_is_unchanged() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn text_without_matches_is_unchanged() {
        assert_eq!(sanitize("plain text, no handles"), "plain text, no handles");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let once = sanitize("contact @joe at https://x.co");
        assert_eq!(sanitize(&once), once);
    }
}

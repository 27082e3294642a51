//! Share links: `{base}#/open?token={token}`.

/// Hash route a share link opens.
pub const OPEN_ROUTE: &str = "#/open";

/// Build the link a recipient opens.
///
/// `base_url` is the deployed origin plus path. Any fragment on it is
/// dropped, as is a trailing `/`.
pub fn share_url(base_url: &str, token: &str) -> String {
    let base = base_url.split('#').next().unwrap_or_default();
    let base = base.trim_end_matches('/');
    format!("{base}{OPEN_ROUTE}?token={token}")
}

/// Pull the token out of pasted text: a full share link, a bare
/// `#/open?token=...` fragment, or a bare token.
///
/// Returns `None` when nothing token-shaped is found.
pub fn token_from_link(text: &str) -> Option<&str> {
    let text = text.trim();
    let candidate = match text.find("token=") {
        Some(idx) => {
            let rest = &text[idx + "token=".len()..];
            let end = rest
                .find(|c: char| c == '&' || c == '#' || c.is_whitespace())
                .unwrap_or(rest.len());
            &rest[..end]
        }
        None => text,
    };
    let valid = !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'='));
    valid.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_link_from_base() {
        assert_eq!(
            share_url("https://cards.example/echo", "abc_-"),
            "https://cards.example/echo#/open?token=abc_-"
        );
    }

    #[test]
    fn drops_trailing_slash_and_fragment() {
        assert_eq!(
            share_url("https://cards.example/#/boxes", "t"),
            "https://cards.example#/open?token=t"
        );
    }

    #[test]
    fn extracts_token_from_full_link() {
        let link = "https://cards.example/echo#/open?token=eyJ2IjoxfQ";
        assert_eq!(token_from_link(link), Some("eyJ2IjoxfQ"));
    }

    #[test]
    fn extracts_token_followed_by_other_params() {
        assert_eq!(
            token_from_link("  #/open?token=abc&utm=sms \n"),
            Some("abc")
        );
    }

    #[test]
    fn accepts_bare_token() {
        assert_eq!(token_from_link("eyJ2IjoxfQ"), Some("eyJ2IjoxfQ"));
    }

    #[test]
    fn rejects_text_without_token() {
        assert_eq!(token_from_link("hello there"), None);
        assert_eq!(token_from_link(""), None);
        assert_eq!(token_from_link("#/open?token="), None);
    }

    #[test]
    fn link_round_trip() {
        let url = share_url("https://cards.example", "eyJ2IjoxfQ");
        assert_eq!(token_from_link(&url), Some("eyJ2IjoxfQ"));
    }
}

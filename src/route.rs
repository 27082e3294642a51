//! Hash routes: `#/boxes`, `#/box/<id>`, `#/compose?pack=&card=&t=`,
//! `#/open?token=`, `#/about`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Pack shelf. Also the route for an empty hash.
    Boxes,
    /// Card gallery of one pack.
    Box { pack: String },
    Compose {
        pack: String,
        card: String,
        /// Message template to prefill.
        template: Option<String>,
    },
    /// `token` is `None` when the recipient still has to paste a link.
    Open { token: Option<String> },
    About,
    NotFound { path: String },
}

impl Route {
    pub fn parse(hash: &str) -> Self {
        let raw = hash.strip_prefix('#').unwrap_or(hash);
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let params = QueryParams::parse(query);

        match parts.first().copied().unwrap_or("boxes") {
            "boxes" => Route::Boxes,
            "box" => match parts.get(1).map(|id| percent_decode(id)) {
                Some(pack) if !pack.is_empty() => Route::Box { pack },
                _ => Route::not_found(&parts),
            },
            "compose" => match (params.get("pack"), params.get("card")) {
                (Some(pack), Some(card)) => Route::Compose {
                    pack: pack.to_string(),
                    card: card.to_string(),
                    template: params.get("t").map(str::to_string),
                },
                _ => Route::not_found(&parts),
            },
            "open" => Route::Open {
                token: params.get("token").map(str::to_string),
            },
            "about" => Route::About,
            _ => Route::not_found(&parts),
        }
    }

    fn not_found(parts: &[&str]) -> Self {
        Route::NotFound {
            path: format!("/{}", parts.join("/")),
        }
    }

    /// The fragment that navigates to this route.
    pub fn to_hash(&self) -> String {
        match self {
            Route::Boxes => "#/boxes".to_string(),
            Route::Box { pack } => format!("#/box/{}", percent_encode(pack)),
            Route::Compose {
                pack,
                card,
                template,
            } => {
                let mut hash = format!(
                    "#/compose?pack={}&card={}",
                    percent_encode(pack),
                    percent_encode(card)
                );
                if let Some(t) = template {
                    hash.push_str("&t=");
                    hash.push_str(&percent_encode(t));
                }
                hash
            }
            Route::Open { token: Some(token) } => format!("#/open?token={token}"),
            Route::Open { token: None } => "#/open".to_string(),
            Route::About => "#/about".to_string(),
            Route::NotFound { path } => format!("#{path}"),
        }
    }
}

/// Decoded `key=value` pairs of a query string. Empty values count as
/// absent; the first occurrence of a key wins.
struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(key), percent_decode(value))
            })
            .collect();
        Self(pairs)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Form-style decoding: `+` is a space, `%XX` a byte. Malformed escapes are
/// kept literally.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    (*byte? as char).to_digit(16).map(|d| d as u8)
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

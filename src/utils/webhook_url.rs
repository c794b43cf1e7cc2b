use url::Url;

/// PLEX rejects webhook URLs longer than this.
pub const PLEX_WEBHOOK_URL_LIMIT: usize = 512;

pub const TOKEN_PARAM: &str = "token";

/// Scheme, host and path of `url`. Used as the OAuth `redirect_uri`, which
/// must be identical between the authorize step and the token exchange.
pub fn strip_query(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base
}

pub fn build_webhook_url(base: &Url, token: &str) -> Url {
    let mut webhook_url = strip_query(base);
    webhook_url
        .query_pairs_mut()
        .append_pair(TOKEN_PARAM, token);
    webhook_url
}

pub fn token_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
}

pub fn exceeds_plex_limit(url: &Url) -> bool {
    url.as_str().len() > PLEX_WEBHOOK_URL_LIMIT
}

use askama::Template;
use url::Url;

use crate::utils::error::Result;
use crate::utils::webhook_url::{exceeds_plex_limit, PLEX_WEBHOOK_URL_LIMIT};

#[derive(Template)]
#[template(path = "authorize.html")]
struct AuthorizePage<'a> {
    authorize_url: &'a str,
}

#[derive(Template)]
#[template(path = "webhook_url.html")]
struct WebhookUrlPage<'a> {
    webhook_url: &'a str,
    too_long: bool,
    url_length: usize,
    limit: usize,
}

pub fn render_authorize_page(authorize_url: &Url) -> Result<String> {
    Ok(AuthorizePage {
        authorize_url: authorize_url.as_str(),
    }
    .render()?)
}

pub fn render_webhook_url_page(webhook_url: &Url) -> Result<String> {
    Ok(WebhookUrlPage {
        webhook_url: webhook_url.as_str(),
        too_long: exceeds_plex_limit(webhook_url),
        url_length: webhook_url.as_str().len(),
        limit: PLEX_WEBHOOK_URL_LIMIT,
    }
    .render()?)
}

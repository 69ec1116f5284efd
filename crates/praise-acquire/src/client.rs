use crate::page;
use crate::types::AcquiredSong;
use anyhow::{Context, Result};
use scraper::{Html, Selector};

pub const DEFAULT_BASE_URL: &str = "https://www.praise.org.uk";

/// A logged-in session against the song-book site.
///
/// The site keeps the login in a cookie, so one client is reused for the
/// login and every later search and page fetch.
pub struct PraiseClient {
    client: reqwest::Client,
    base_url: String,
}

impl PraiseClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("praise/0.1 (openlyrics export tool)")
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn site(&self) -> &str {
        self.base_url
            .split("://")
            .nth(1)
            .unwrap_or(&self.base_url)
    }

    /// Log in with the account form. The form is protected by a nonce that
    /// has to be read from the login page first.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/my-account/", self.base_url);
        tracing::info!(url = %url, user = %username, "Logging in");

        let html = self.fetch_page(&url).await?;
        let nonce = login_nonce(&html)?;

        let form = [
            ("username", username),
            ("password", password),
            ("woocommerce-login-nonce", nonce.as_str()),
            ("login", "Log in"),
        ];
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .context("Failed to post login form")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for login at {url}");
        tracing::debug!(status = %status, "Login form accepted");
        Ok(())
    }

    /// Search for a song by its song-book number and return the URL of the
    /// first result.
    pub async fn find_song(&self, number: &str) -> Result<String> {
        let url = format!("{}/?s={number}&post_type=hymn", self.base_url);
        tracing::info!(url = %url, "Searching");
        let html = self.fetch_page(&url).await?;
        first_search_result(&html).with_context(|| format!("No search result for song {number}"))
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch page")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        response.text().await.context("Failed to read response body")
    }

    /// Search, fetch and extract one song. Returns the raw HTML alongside the
    /// extracted data so callers can cache it.
    pub async fn acquire_song(&self, number: &str) -> Result<(AcquiredSong, String)> {
        let url = self.find_song(number).await?;
        tracing::info!(url = %url, number = %number, "Fetching song page");
        let html = self.fetch_page(&url).await?;
        tracing::info!(bytes = html.len(), "Received HTML");

        let song = page::extract_song(&html, number, &url, self.site())?;
        Ok((song, html))
    }
}

fn login_nonce(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("input#woocommerce-login-nonce").expect("valid selector");
    document
        .select(&sel)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .context("Login page has no woocommerce-login-nonce input")
}

fn first_search_result(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("table.search-results tr td a").expect("valid selector");
    document
        .select(&sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

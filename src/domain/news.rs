//! News headlines for a ticker.

pub const DEFAULT_NEWS_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsArticle {
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub link: Option<String>,
}

impl NewsArticle {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No Title")
    }

    pub fn display_publisher(&self) -> &str {
        self.publisher.as_deref().unwrap_or("")
    }

    /// The article link when it is an http(s) URL, otherwise `"#"`.
    pub fn display_link(&self) -> &str {
        match self.link.as_deref() {
            Some(link) if is_web_url(link) => link,
            _ => "#",
        }
    }
}

fn is_web_url(link: &str) -> bool {
    let lower = link.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

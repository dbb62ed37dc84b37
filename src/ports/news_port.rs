//! News headline access port trait.

use crate::domain::error::TickerdashError;
use crate::domain::news::NewsArticle;

pub trait NewsPort {
    /// At most `limit` recent articles for `symbol`, newest first.
    fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>, TickerdashError>;
}

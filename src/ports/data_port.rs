//! Price history access port trait.

use crate::domain::error::TickerdashError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::Period;

pub trait DataPort {
    /// Daily bars for `symbol` over `period`, oldest first.
    ///
    /// An unknown symbol yields an empty vector, not an error.
    fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<OhlcvBar>, TickerdashError>;
}

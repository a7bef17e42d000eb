//! Optional report sections that do not involve the completion API:
//! PageSpeed Insights metrics and a readability score of the page text.

pub mod pagespeed;
pub mod readability;

pub use pagespeed::{PageSpeedClient, PageSpeedError, PageSpeedReport};
pub use readability::{Readability, ReadabilityScore, analyze_readability};

// Job pool: sourcing (live scrape or fallback), caching, and skill matching.

pub mod cache;
pub mod fallback;
pub mod handlers;
pub mod matcher;
pub mod scraper;
pub mod title_skills;

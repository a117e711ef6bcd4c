//! Process-wide job cache with a fixed TTL.
//!
//! Refreshes are single-flight: a dedicated refresh lock is held across the
//! fetch, so requests arriving mid-scrape wait for it and reuse the result
//! instead of scraping again. The cached list sits behind a separate,
//! briefly-held `RwLock`, so status reads never wait on the network.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::jobs::fallback::{fallback_jobs, is_fallback_only};
use crate::jobs::scraper::{JobSource, ScrapeQuery};
use crate::models::job::JobPosting;

struct CachedJobs {
    jobs: Vec<JobPosting>,
    fetched_at: Instant,
    updated_at: DateTime<Utc>,
}

/// Snapshot of the cache for status reporting.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub cache_age_minutes: u64,
    pub is_fresh: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub jobs_count: usize,
    pub cache_duration_minutes: u64,
}

pub struct JobCache {
    refresh: Mutex<()>,
    slot: RwLock<Option<CachedJobs>>,
    ttl: Duration,
}

impl JobCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            refresh: Mutex::new(()),
            slot: RwLock::new(None),
            ttl,
        }
    }

    async fn fresh_jobs(&self) -> Option<Vec<JobPosting>> {
        let slot = self.slot.read().await;
        let cached = slot.as_ref()?;
        let age = cached.fetched_at.elapsed();
        if cached.jobs.is_empty() || age >= self.ttl {
            return None;
        }
        debug!("Using cached jobs (cached {} min ago)", age.as_secs() / 60);
        Some(cached.jobs.clone())
    }

    /// Returns cached jobs while they are fresh and non-empty, otherwise
    /// scrapes synchronously. An empty scrape is replaced by the fallback list.
    pub async fn get_or_refresh(
        &self,
        source: &dyn JobSource,
        query: &ScrapeQuery,
        force_refresh: bool,
    ) -> Vec<JobPosting> {
        if !force_refresh {
            if let Some(jobs) = self.fresh_jobs().await {
                return jobs;
            }
        }

        let _refreshing = self.refresh.lock().await;
        // another request may have refreshed while this one waited
        if !force_refresh {
            if let Some(jobs) = self.fresh_jobs().await {
                return jobs;
            }
        }

        info!("Scraping fresh jobs from {} source", source.name());
        let scraped = source.fetch(query).await;
        let is_fallback = scraped.is_empty() || is_fallback_only(&scraped);
        let jobs = if scraped.is_empty() {
            warn!("Scraping returned no jobs, using fallback list");
            fallback_jobs()
        } else {
            info!("Got {} fresh jobs", scraped.len());
            scraped
        };

        self.store(jobs, is_fallback).await
    }

    /// Installs `jobs` as the current cache contents.
    pub async fn replace(&self, jobs: Vec<JobPosting>, is_fallback: bool) -> Vec<JobPosting> {
        self.store(jobs, is_fallback).await
    }

    async fn store(&self, jobs: Vec<JobPosting>, is_fallback: bool) -> Vec<JobPosting> {
        let jobs = stamp(jobs, is_fallback);
        *self.slot.write().await = Some(CachedJobs {
            jobs: jobs.clone(),
            fetched_at: Instant::now(),
            updated_at: Utc::now(),
        });
        jobs
    }

    /// Never waits on an in-flight refresh. Before the first fetch the cache
    /// reports age 0 and counts as fresh.
    pub async fn status(&self) -> CacheStatus {
        let slot = self.slot.read().await;
        let cache_duration_minutes = self.ttl.as_secs() / 60;

        match slot.as_ref() {
            Some(cached) => {
                let age = cached.fetched_at.elapsed();
                CacheStatus {
                    cache_age_minutes: age.as_secs() / 60,
                    is_fresh: age < self.ttl,
                    last_updated: Some(cached.updated_at),
                    jobs_count: cached.jobs.len(),
                    cache_duration_minutes,
                }
            }
            None => CacheStatus {
                cache_age_minutes: 0,
                is_fresh: true,
                last_updated: None,
                jobs_count: 0,
                cache_duration_minutes,
            },
        }
    }
}

fn stamp(mut jobs: Vec<JobPosting>, is_fallback: bool) -> Vec<JobPosting> {
    let now = Utc::now();
    for job in &mut jobs {
        job.scraped_at = Some(now);
        job.is_fallback = is_fallback;
    }
    jobs
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source that returns a fixed list, counts calls, and can be slow.
    pub(crate) struct CountingSource {
        pub calls: AtomicUsize,
        pub jobs: Vec<JobPosting>,
        pub delay: Duration,
    }

    impl CountingSource {
        pub(crate) fn new(jobs: Vec<JobPosting>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                jobs,
                delay: Duration::ZERO,
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch(&self, _query: &ScrapeQuery) -> Vec<JobPosting> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.jobs.clone()
        }
    }

    fn query() -> ScrapeQuery {
        ScrapeQuery {
            keywords: "software developer".to_string(),
            location: String::new(),
            max_jobs: 25,
        }
    }

    fn one_job() -> Vec<JobPosting> {
        vec![JobPosting {
            title: "Rust Engineer".to_string(),
            company: "Oxide".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            required_skills: vec!["rust".to_string()],
            link: String::new(),
            scraped_at: None,
            is_fallback: false,
        }]
    }

    #[tokio::test]
    async fn test_fresh_cache_is_reused() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let source = CountingSource::new(one_job());

        let first = cache.get_or_refresh(&source, &query(), false).await;
        let second = cache.get_or_refresh(&source, &query(), false).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(first, second);
        assert!(first[0].scraped_at.is_some());
        assert!(!first[0].is_fallback);
    }

    #[tokio::test]
    async fn test_force_refresh_scrapes_again() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let source = CountingSource::new(one_job());

        cache.get_or_refresh(&source, &query(), false).await;
        cache.get_or_refresh(&source, &query(), true).await;

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_cache_is_refreshed() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let source = CountingSource::new(one_job());

        cache.get_or_refresh(&source, &query(), false).await;
        tokio::time::advance(Duration::from_secs(1799)).await;
        cache.get_or_refresh(&source, &query(), false).await;
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.get_or_refresh(&source, &query(), false).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_scrape_uses_marked_fallback() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let source = CountingSource::new(Vec::new());

        let jobs = cache.get_or_refresh(&source, &query(), false).await;
        assert_eq!(jobs.len(), 12);
        assert!(jobs.iter().all(|j| j.is_fallback && j.scraped_at.is_some()));

        // fallback list is non-empty, so it is served from cache afterwards
        cache.get_or_refresh(&source, &query(), false).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_scrape_once() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let mut source = CountingSource::new(one_job());
        source.delay = Duration::from_secs(5);

        let q = query();
        let (a, b) = tokio::join!(
            cache.get_or_refresh(&source, &q, false),
            cache.get_or_refresh(&source, &q, false),
        );

        assert_eq!(source.calls(), 1);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_status_before_first_fetch() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let status = cache.status().await;
        assert_eq!(status.jobs_count, 0);
        assert!(status.last_updated.is_none());
        assert!(status.is_fresh);
        assert_eq!(status.cache_age_minutes, 0);
        assert_eq!(status.cache_duration_minutes, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_does_not_wait_for_refresh() {
        let cache = Arc::new(JobCache::new(Duration::from_secs(1800)));
        let mut source = CountingSource::new(one_job());
        source.delay = Duration::from_secs(30);
        let source = Arc::new(source);

        let refresh = tokio::spawn({
            let cache = cache.clone();
            let source = source.clone();
            async move { cache.get_or_refresh(source.as_ref(), &query(), false).await }
        });
        while source.calls() == 0 {
            tokio::task::yield_now().await;
        }

        let started = Instant::now();
        let status = cache.status().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(status.jobs_count, 0);

        refresh.await.unwrap();
        assert_eq!(cache.status().await.jobs_count, 1);
    }

    #[tokio::test]
    async fn test_fallback_only_scrape_is_marked() {
        let cache = JobCache::new(Duration::from_secs(1800));
        let source = CountingSource::new(fallback_jobs());

        let jobs = cache.get_or_refresh(&source, &query(), false).await;
        assert_eq!(jobs.len(), 12);
        assert!(jobs.iter().all(|j| j.is_fallback));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_age_in_minutes() {
        let cache = JobCache::new(Duration::from_secs(1800));
        cache.replace(one_job(), false).await;

        tokio::time::advance(Duration::from_secs(5 * 60 + 30)).await;
        let status = cache.status().await;
        assert_eq!(status.cache_age_minutes, 5);
        assert!(status.is_fresh);
        assert_eq!(status.jobs_count, 1);

        tokio::time::advance(Duration::from_secs(30 * 60)).await;
        assert!(!cache.status().await.is_fresh);
    }
}

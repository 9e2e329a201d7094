//! Cached catalog of current exhibits.
//!
//! The catalog is fetched lazily on first read and memoized for the lifetime of
//! the process. There is no refresh: exhibit listings change slowly and a
//! skill process is short-lived.

use std::future::Future;
use std::sync::Arc;

use chrono::Datelike;
use thiserror::Error;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::listing::{ExhibitRecord, ListingError, RawListing};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("listings request failed: {0}")]
    Request(String),
    #[error("listings response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Upstream provider of raw listing entries.
pub trait ListingsSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawListing>, FeedError>> + Send;
}

#[derive(Debug, Clone)]
enum CatalogState {
    Unfetched,
    Fetched(Arc<[ExhibitRecord]>),
}

/// Exhibit records sorted by end date, fetched once.
#[derive(Debug)]
pub struct ExhibitCatalog<S> {
    source: S,
    clock: Arc<dyn Clock>,
    state: CatalogState,
}

impl<S: ListingsSource> ExhibitCatalog<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            state: CatalogState::Unfetched,
        }
    }

    #[cfg(test)]
    fn state(&self) -> &CatalogState {
        &self.state
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    /// Current listings sorted ascending by end date.
    ///
    /// The first successful call fetches from the source; later calls return the
    /// same cached sequence. A failed fetch, or any entry whose end date does not
    /// parse, fails the whole call and leaves the catalog unfetched.
    pub async fn current_listings(&mut self) -> Result<Arc<[ExhibitRecord]>, CatalogError> {
        if let CatalogState::Fetched(records) = &self.state {
            debug!(count = records.len(), "serving cached listings");
            return Ok(Arc::clone(records));
        }

        let raw = self.source.fetch().await?;
        let year = self.clock.now().year();
        let mut records = raw
            .iter()
            .map(|entry| ExhibitRecord::from_raw(entry, year))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(ExhibitRecord::end_date);

        let records: Arc<[ExhibitRecord]> = records.into();
        info!(count = records.len(), "fetched exhibit listings");
        self.state = CatalogState::Fetched(Arc::clone(&records));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct StubSource {
        entries: Mutex<Vec<RawListing>>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                entries: Mutex::new(
                    entries
                        .iter()
                        .map(|(title, meta1)| RawListing {
                            title: (*title).to_string(),
                            meta1: (*meta1).to_string(),
                        })
                        .collect(),
                ),
                ..Default::default()
            }
        }
    }

    impl ListingsSource for StubSource {
        async fn fetch(&self) -> Result<Vec<RawListing>, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FeedError::Request("connection refused".to_string()));
            }
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    fn clock() -> Arc<dyn Clock> {
        let now = NaiveDate::from_ymd_opt(2016, 2, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Arc::new(FixedClock(now))
    }

    #[tokio::test]
    async fn sorts_by_end_date() {
        let source = StubSource::with(&[
            ("Late", "Through May 1, 2016"),
            ("Early", "Through March 1"),
            ("Middle", "Through April 10, 2016"),
        ]);
        let mut catalog = ExhibitCatalog::new(source, clock());

        let records = catalog.current_listings().await.unwrap();
        let titles: Vec<_> = records.iter().map(ExhibitRecord::title).collect();
        assert_eq!(titles, vec!["Early", "Middle", "Late"]);
        assert_eq!(
            records[0].end_date(),
            NaiveDate::from_ymd_opt(2016, 3, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn fetches_exactly_once() {
        let source = StubSource::with(&[("Only", "Through March 1, 2016")]);
        let mut catalog = ExhibitCatalog::new(source, clock());
        assert!(matches!(catalog.state(), CatalogState::Unfetched));

        let first = catalog.current_listings().await.unwrap();
        // Upstream changes after the first read are not observed.
        catalog
            .source()
            .entries
            .lock()
            .unwrap()
            .push(RawListing {
                title: "New".to_string(),
                meta1: "Through June 1, 2016".to_string(),
            });
        let second = catalog.current_listings().await.unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 1);
        assert!(matches!(catalog.state(), CatalogState::Fetched(_)));
    }

    #[tokio::test]
    async fn malformed_entry_fails_whole_fetch() {
        let source = StubSource::with(&[
            ("Good", "Through March 1, 2016"),
            ("Bad", "Ongoing"),
        ]);
        let mut catalog = ExhibitCatalog::new(source, clock());

        let err = catalog.current_listings().await.unwrap_err();
        assert!(matches!(err, CatalogError::Listing(_)));
        assert!(matches!(catalog.state(), CatalogState::Unfetched));
    }

    #[tokio::test]
    async fn feed_failure_is_retried_on_next_read() {
        let mut source = StubSource::with(&[("Good", "Through March 1, 2016")]);
        source.fail = true;
        let mut catalog = ExhibitCatalog::new(source, clock());

        let err = catalog.current_listings().await.unwrap_err();
        assert!(matches!(err, CatalogError::Feed(FeedError::Request(_))));
        assert!(catalog.current_listings().await.is_err());
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 2);
    }
}

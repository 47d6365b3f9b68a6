//! Asynchronous holiday loading for a single view
//!
//! At most one fetch is in flight. Requesting another year aborts the
//! previous task and bumps the generation; outcomes carrying an older
//! generation are dropped, so the last requested year always wins.
//! Dropping the loader aborts whatever is still running.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::HolidayError;
use crate::holidays::{Holiday, HolidaySet, HolidaySource};

/// Resolved holidays of a year, ready to be applied to the view
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayUpdate {
    pub year: i32,
    /// Empty when the fetch failed
    pub holidays: HolidaySet,
    /// Reason of a failed fetch, shown to the user as a notice
    pub error: Option<String>,
}

struct FetchOutcome {
    generation: u64,
    year: i32,
    result: Result<Vec<Holiday>, HolidayError>,
}

struct InFlight {
    generation: u64,
    year: i32,
    handle: JoinHandle<()>,
}

pub struct HolidayLoader {
    source: Arc<dyn HolidaySource>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl HolidayLoader {
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        HolidayLoader {
            source,
            tx,
            rx,
            generation: 0,
            in_flight: None,
        }
    }

    /// Start fetching the holidays of `year`, superseding any pending fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, year: i32) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch_holidays(year).await;
            // The receiver lives as long as the loader
            let _ = tx.send(FetchOutcome {
                generation,
                year,
                result,
            });
        });

        tracing::debug!(year, generation, "Requested holidays");
        self.in_flight = Some(InFlight {
            generation,
            year,
            handle,
        });
        generation
    }

    /// Year of the fetch still in flight
    pub fn pending_year(&self) -> Option<i32> {
        self.in_flight.as_ref().map(|f| f.year)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Abort the pending fetch; its outcome will never be applied
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(
                year = in_flight.year,
                generation = in_flight.generation,
                "Cancelling holiday fetch"
            );
            in_flight.handle.abort();
        }
    }

    /// Non-blocking: the current fetch's update if it has resolved
    pub fn try_next(&mut self) -> Option<HolidayUpdate> {
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(update) = self.accept(outcome) {
                return Some(update);
            }
        }
        None
    }

    /// Wait for the current fetch to resolve; `None` when nothing is pending
    pub async fn next(&mut self) -> Option<HolidayUpdate> {
        loop {
            if self.in_flight.is_none() {
                return None;
            }
            let outcome = self.rx.recv().await?;
            if let Some(update) = self.accept(outcome) {
                return Some(update);
            }
        }
    }

    fn accept(&mut self, outcome: FetchOutcome) -> Option<HolidayUpdate> {
        let current = self.in_flight.as_ref().map(|f| f.generation);
        if current != Some(outcome.generation) {
            tracing::debug!(
                year = outcome.year,
                generation = outcome.generation,
                "Discarding stale holiday result"
            );
            return None;
        }
        self.in_flight = None;

        let update = match outcome.result {
            Ok(holidays) => HolidayUpdate {
                year: outcome.year,
                holidays: HolidaySet::from_holidays(outcome.year, &holidays),
                error: None,
            },
            Err(e) => {
                tracing::warn!(year = outcome.year, error = %e, "Holiday fetch failed, assuming none");
                HolidayUpdate {
                    year: outcome.year,
                    holidays: HolidaySet::from_holidays(outcome.year, &[]),
                    error: Some(e.to_string()),
                }
            }
        };
        Some(update)
    }
}

impl Drop for HolidayLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    type Gate = oneshot::Sender<Result<Vec<Holiday>, HolidayError>>;

    /// Source whose fetches resolve only when the test opens their gate
    #[derive(Default)]
    pub(crate) struct GatedSource {
        waiting: Mutex<HashMap<i32, oneshot::Receiver<Result<Vec<Holiday>, HolidayError>>>>,
        pub(crate) finished: AtomicBool,
    }

    impl GatedSource {
        pub(crate) fn gate(&self, year: i32) -> Gate {
            let (tx, rx) = oneshot::channel();
            self.waiting.lock().unwrap().insert(year, rx);
            tx
        }
    }

    #[async_trait]
    impl HolidaySource for GatedSource {
        async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
            let rx = self.waiting.lock().unwrap().remove(&year);
            let result = match rx {
                Some(rx) => rx.await.unwrap_or_else(|_| {
                    Err(HolidayError::ConnectionFailed {
                        year,
                        reason: "gate dropped".to_string(),
                    })
                }),
                None => Ok(Vec::new()),
            };
            self.finished.store(true, Ordering::SeqCst);
            result
        }
    }

    pub(crate) fn holiday(date: &str) -> Holiday {
        Holiday {
            date: date.to_string(),
            name: String::new(),
        }
    }

    #[tokio::test]
    async fn test_resolves_requested_year() {
        let source = Arc::new(GatedSource::default());
        let gate = source.gate(2024);
        let mut loader = HolidayLoader::new(source.clone());

        loader.request(2024);
        assert_eq!(loader.pending_year(), Some(2024));
        gate.send(Ok(vec![holiday("2024-05-01")])).unwrap();

        let update = loader.next().await.unwrap();
        assert_eq!(update.year, 2024);
        assert!(update.holidays.contains_str("2024-05-01"));
        assert!(update.error.is_none());
        assert!(!loader.is_loading());
        assert!(loader.next().await.is_none());
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let source = Arc::new(GatedSource::default());
        let gate_2023 = source.gate(2023);
        let gate_2024 = source.gate(2024);
        let mut loader = HolidayLoader::new(source.clone());

        loader.request(2023);
        loader.request(2024);

        let _ = gate_2023.send(Ok(vec![holiday("2023-05-01")]));
        gate_2024.send(Ok(vec![holiday("2024-05-01")])).unwrap();

        let update = loader.next().await.unwrap();
        assert_eq!(update.year, 2024);
        assert!(!update.holidays.contains_str("2023-05-01"));
        assert!(loader.try_next().is_none());
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let source = Arc::new(GatedSource::default());
        let _gate = source.gate(2024);
        let mut loader = HolidayLoader::new(source.clone());

        let first = loader.request(2023);
        loader.request(2024);

        // An outcome of the superseded request that slipped through
        loader
            .tx
            .send(FetchOutcome {
                generation: first,
                year: 2023,
                result: Ok(vec![holiday("2023-05-01")]),
            })
            .unwrap();

        assert!(loader.try_next().is_none());
        assert_eq!(loader.pending_year(), Some(2024));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_set_with_notice() {
        let source = Arc::new(GatedSource::default());
        let gate = source.gate(2024);
        let mut loader = HolidayLoader::new(source.clone());

        loader.request(2024);
        gate.send(Err(HolidayError::BadStatus {
            year: 2024,
            status: 500,
        }))
        .unwrap();

        let update = loader.next().await.unwrap();
        assert_eq!(update.year, 2024);
        assert!(update.holidays.is_empty());
        assert!(update.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_drop_aborts_pending_fetch() {
        let source = Arc::new(GatedSource::default());
        let gate = source.gate(2024);
        let mut loader = HolidayLoader::new(source.clone());

        loader.request(2024);
        tokio::task::yield_now().await;
        drop(loader);

        let _ = gate.send(Ok(vec![holiday("2024-05-01")]));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!source.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_discards_result() {
        let source = Arc::new(GatedSource::default());
        let gate = source.gate(2024);
        let mut loader = HolidayLoader::new(source.clone());

        loader.request(2024);
        loader.cancel();
        let _ = gate.send(Ok(vec![holiday("2024-05-01")]));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(loader.try_next().is_none());
        assert!(loader.next().await.is_none());
    }
}

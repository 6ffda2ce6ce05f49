//! Per-page fetch pipeline.
//!
//! Every page owns one [`PageView`]: its own [`CsvSource`], its own
//! normalizer, and its own [`LoadState`]. Nothing is shared between pages,
//! so the same feed may be fetched once per page visited.
//!
//! A fetch cannot be cancelled. Instead each [`PageView::refresh`] takes a
//! generation number, and its result is only applied if that generation is
//! still current and the view has not been torn down.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use showcase_feed::CsvSource;
use tracing::{error, info, warn};

use crate::facet::FacetSet;
use crate::filter::{Selection, filter_view};
use crate::load_state::LoadState;
use crate::normalize::Normalizer;

// ---------------------------------------------------------------------------
// Page data
// ---------------------------------------------------------------------------

/// Everything a settled, successful fetch produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageData<R> {
    pub records: Vec<R>,
    pub facets: FacetSet,
}

impl<R> PageData<R> {
    /// No record survived normalization.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The records a consumer should render for a facet selection and search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView<R> {
    pub facets: FacetSet,
    /// Facet value actually applied, `None` when unrestricted.
    pub selection: Option<String>,
    pub records: Vec<R>,
    /// Record count before filtering.
    pub total: usize,
}

impl<R> FilteredView<R> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How a [`PageView::refresh`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The outcome became the page's state.
    Applied,
    /// The view was torn down or refreshed again before the outcome arrived.
    Discarded,
}

// ---------------------------------------------------------------------------
// PageView
// ---------------------------------------------------------------------------

struct Slot<R> {
    state: LoadState<PageData<R>>,
    generation: u64,
    torn_down: bool,
}

struct Inner<N: Normalizer> {
    source: CsvSource,
    normalizer: N,
    slot: Mutex<Slot<N::Record>>,
}

/// One page's ingestion pipeline. Cheap to clone; clones share state.
pub struct PageView<N: Normalizer> {
    inner: Arc<Inner<N>>,
}

impl<N: Normalizer> Clone for PageView<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Normalizer> PageView<N> {
    /// A fresh view in `Loading`. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(source: CsvSource, normalizer: N) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                normalizer,
                slot: Mutex::new(Slot {
                    state: LoadState::Loading,
                    generation: 0,
                    torn_down: false,
                }),
            }),
        }
    }

    pub fn normalizer(&self) -> &N {
        &self.inner.normalizer
    }

    fn slot(&self) -> MutexGuard<'_, Slot<N::Record>> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch, normalize and settle.
    ///
    /// The state goes back to `Loading` immediately, dropping any previous
    /// snapshot. Exactly one request is issued.
    pub async fn refresh(&self) -> Settled {
        let domain = self.inner.normalizer.name();
        let generation = {
            let mut slot = self.slot();
            if slot.torn_down {
                warn!(domain, "refresh on a torn-down view ignored");
                return Settled::Discarded;
            }
            slot.generation += 1;
            slot.state = LoadState::Loading;
            slot.generation
        };

        let outcome = match self.inner.source.fetch_rows().await {
            Ok(rows) => {
                let normalizer = &self.inner.normalizer;
                let records = normalizer.normalize(&rows);
                let facets = normalizer.facets(&records);
                info!(
                    domain,
                    rows = rows.len(),
                    records = records.len(),
                    facets = facets.len(),
                    "page data ready"
                );
                LoadState::Ready(PageData { records, facets })
            }
            Err(e) => {
                error!(domain, error = %e, "feed load failed");
                LoadState::Error(self.inner.normalizer.failure_message(&e))
            }
        };

        let mut slot = self.slot();
        if slot.torn_down || slot.generation != generation {
            warn!(
                domain,
                generation,
                current = slot.generation,
                torn_down = slot.torn_down,
                "discarding stale fetch result"
            );
            return Settled::Discarded;
        }
        slot.state = outcome;
        Settled::Applied
    }

    /// Mark the view dead. Results arriving afterwards are dropped.
    pub fn teardown(&self) {
        self.slot().torn_down = true;
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState<PageData<N::Record>> {
        self.slot().state.clone()
    }

    /// Filter the loaded records. Never touches the network.
    pub fn view(
        &self,
        selection: &Selection,
        search: Option<&str>,
    ) -> LoadState<FilteredView<N::Record>> {
        let slot = self.slot();
        match &slot.state {
            LoadState::Loading => LoadState::Loading,
            LoadState::Error(message) => LoadState::Error(message.clone()),
            LoadState::Ready(data) => {
                let applied = selection.resolve(&data.facets);
                let records = filter_view(&data.records, applied, search)
                    .into_iter()
                    .cloned()
                    .collect();
                LoadState::Ready(FilteredView {
                    facets: data.facets.clone(),
                    selection: applied.map(str::to_string),
                    records,
                    total: data.records.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use showcase_shared::FeedSettings;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::normalize::{AnnouncementNormalizer, PrizeNormalizer, ProjectNormalizer};

    fn fixture() -> String {
        std::fs::read_to_string("../../../fixtures/csv/showcase.csv").expect("read csv fixture")
    }

    fn source_for(server: &MockServer) -> CsvSource {
        let settings = FeedSettings {
            url: Url::parse(&format!("{}/sheet.csv", server.uri())).unwrap(),
            timeout_secs: 10,
        };
        CsvSource::new(&settings).unwrap()
    }

    async fn serve(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn starts_loading_and_settles_ready() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(200).set_body_string(fixture())).await;

        let page = PageView::new(source_for(&server), ProjectNormalizer::default());
        assert!(page.state().is_loading());
        assert!(page.view(&Selection::Default, None).is_loading());

        assert_eq!(page.refresh().await, Settled::Applied);

        let state = page.state();
        let data = state.ready().unwrap();
        assert_eq!(data.records.len(), 3);
        assert_eq!(data.facets.values(), ["2022", "2021"]);

        let view = page.view(&Selection::Default, None);
        let view = view.ready().unwrap();
        assert_eq!(view.selection.as_deref(), Some("2022"));
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.total, 3);

        let all = page.view(&Selection::All, Some("drone"));
        assert_eq!(all.ready().unwrap().records.len(), 1);
    }

    #[tokio::test]
    async fn zero_rows_is_empty_ready_not_error() {
        let server = MockServer::start().await;
        serve(
            &server,
            ResponseTemplate::new(200).set_body_string("Scheme,Team No,Project Title\r\n"),
        )
        .await;

        let page = PageView::new(source_for(&server), PrizeNormalizer);
        page.refresh().await;

        let state = page.state();
        let data = state.ready().unwrap();
        assert!(data.is_empty());
        assert!(data.facets.is_empty());
        assert_eq!(data.facets.default_selection(), None);

        let view = page.view(&Selection::Default, None);
        let view = view.ready().unwrap();
        assert!(view.is_empty());
        assert_eq!(view.selection, None);
    }

    #[tokio::test]
    async fn transport_failure_becomes_user_message() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(500)).await;

        let page = PageView::new(source_for(&server), ProjectNormalizer::default());
        assert_eq!(page.refresh().await, Settled::Applied);

        assert_eq!(
            page.state().error(),
            Some("Failed to load project data. Please try again later.")
        );
        assert!(page.view(&Selection::All, None).is_error());
    }

    #[tokio::test]
    async fn malformed_body_uses_parse_message() {
        let server = MockServer::start().await;
        serve(
            &server,
            ResponseTemplate::new(200).set_body_bytes(vec![b'a', b',', 0xff, b'\n']),
        )
        .await;

        let page = PageView::new(source_for(&server), AnnouncementNormalizer);
        page.refresh().await;

        assert_eq!(
            page.state().error(),
            Some("The announcements feed could not be read. Please try again later.")
        );
    }

    #[tokio::test]
    async fn result_after_teardown_is_discarded() {
        let server = MockServer::start().await;
        serve(
            &server,
            ResponseTemplate::new(200)
                .set_body_string(fixture())
                .set_delay(Duration::from_millis(300)),
        )
        .await;

        let page = PageView::new(source_for(&server), AnnouncementNormalizer);
        let task = {
            let page = page.clone();
            tokio::spawn(async move { page.refresh().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        page.teardown();

        assert_eq!(task.await.unwrap(), Settled::Discarded);
        assert!(page.state().is_loading());
        assert_eq!(page.refresh().await, Settled::Discarded);
    }

    #[tokio::test]
    async fn newer_refresh_supersedes_older() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(300)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        serve(&server, ResponseTemplate::new(200).set_body_string(fixture())).await;

        let page = PageView::new(source_for(&server), PrizeNormalizer);
        let slow = {
            let page = page.clone();
            tokio::spawn(async move { page.refresh().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(page.refresh().await, Settled::Applied);
        assert_eq!(slow.await.unwrap(), Settled::Discarded);

        let state = page.state();
        assert_eq!(state.ready().unwrap().records.len(), 3);
    }

    #[tokio::test]
    async fn refresh_from_ready_drops_back_to_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        serve(
            &server,
            ResponseTemplate::new(200)
                .set_body_string(fixture())
                .set_delay(Duration::from_millis(300)),
        )
        .await;

        let page = PageView::new(source_for(&server), PrizeNormalizer);
        page.refresh().await;
        assert!(page.state().is_ready());

        let second = {
            let page = page.clone();
            tokio::spawn(async move { page.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(page.state().is_loading());
        assert!(page.view(&Selection::All, None).is_loading());

        assert_eq!(second.await.unwrap(), Settled::Applied);
        assert!(page.state().is_ready());
    }

    #[tokio::test]
    async fn refresh_from_error_drops_back_to_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        serve(
            &server,
            ResponseTemplate::new(200)
                .set_body_string(fixture())
                .set_delay(Duration::from_millis(300)),
        )
        .await;

        let page = PageView::new(source_for(&server), AnnouncementNormalizer);
        page.refresh().await;
        assert!(page.state().is_error());

        let second = {
            let page = page.clone();
            tokio::spawn(async move { page.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(page.state().is_loading());
        assert!(page.view(&Selection::Default, None).is_loading());

        assert_eq!(second.await.unwrap(), Settled::Applied);
        assert_eq!(page.state().ready().unwrap().records.len(), 3);
    }

    #[tokio::test]
    async fn each_refresh_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture()))
            .expect(2)
            .mount(&server)
            .await;

        let page = PageView::new(source_for(&server), AnnouncementNormalizer);
        page.refresh().await;
        page.refresh().await;

        assert_eq!(page.state().ready().unwrap().records.len(), 3);
    }
}

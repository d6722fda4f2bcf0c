//! Cancellation and effect mapping through the public `Store` API.

use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use vitrine_core::{Effect, EffectId, Reducer, SmallVec, delay, smallvec};
use vitrine_runtime::{Store, StoreConfig, StoreError};

const DEBOUNCE: EffectId = EffectId::new("debounce");
const SEARCH: EffectId = EffectId::new("search");

#[derive(Debug, Clone, PartialEq)]
enum Search {
    Typed(String),
    Fire,
    Results(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Page {
    Search(Search),
    Leave,
}

#[derive(Debug, Default)]
struct PageState {
    query: String,
    searches: Vec<String>,
    results: usize,
}

#[derive(Debug, Clone)]
struct SearchReducer;

impl Reducer for SearchReducer {
    type State = PageState;
    type Action = Search;
    type Environment = Duration;

    fn reduce(
        &self,
        state: &mut PageState,
        action: Search,
        debounce: &Duration,
    ) -> SmallVec<[Effect<Search>; 4]> {
        match action {
            Search::Typed(query) => {
                state.query = query;
                smallvec![delay! { duration: *debounce, action: Search::Fire }.cancellable(DEBOUNCE)]
            },
            Search::Fire => {
                state.searches.push(state.query.clone());
                let hits = state.query.len();
                smallvec![Effect::Sequential(vec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Some(Search::Results(hits))
                }))])
                .cancellable(SEARCH)]
            },
            Search::Results(hits) => {
                state.results = hits;
                SmallVec::new()
            },
        }
    }
}

#[derive(Debug, Clone)]
struct PageReducer;

impl Reducer for PageReducer {
    type State = PageState;
    type Action = Page;
    type Environment = Duration;

    fn reduce(
        &self,
        state: &mut PageState,
        action: Page,
        env: &Duration,
    ) -> SmallVec<[Effect<Page>; 4]> {
        match action {
            Page::Search(action) => SearchReducer
                .reduce(state, action, env)
                .into_iter()
                .map(|effect| effect.map(Page::Search))
                .collect(),
            Page::Leave => smallvec![Effect::merge(vec![
                Effect::Cancel(DEBOUNCE),
                Effect::Cancel(SEARCH),
            ])],
        }
    }
}

fn store() -> Store<PageState, Page, Duration, PageReducer> {
    vitrine_testing::init_test_tracing();
    Store::with_config(
        PageState::default(),
        PageReducer,
        Duration::from_millis(300),
        StoreConfig::default().with_shutdown_timeout(Duration::from_secs(1)),
    )
}

fn typed(query: &str) -> Page {
    Page::Search(Search::Typed(query.to_string()))
}

#[tokio::test(start_paused = true)]
async fn test_typing_debounces_to_last_query() {
    let store = store();

    assert_ok!(store.send(typed("c")).await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_ok!(store.send(typed("ce")).await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let mut last = assert_ok!(store.send(typed("cep")).await);

    last.wait().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.state(|s| s.searches.clone()).await, vec!["cep".to_string()]);
    assert_eq!(store.state(|s| s.results).await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_reaches_work_nested_in_sequence() {
    let store = store();

    assert_ok!(store.send(typed("01310")).await);
    tokio::time::sleep(Duration::from_millis(320)).await;
    assert!(store.in_flight(&SEARCH) > 0);

    assert_ok!(store.send(Page::Leave).await);
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(store.state(|s| s.searches.len()).await, 1);
    assert_eq!(store.state(|s| s.results).await, 0);
    assert_eq!(store.in_flight(&SEARCH), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mapped_actions_are_broadcast() {
    let store = store();
    let mut actions = store.subscribe_actions();

    assert_ok!(store.send(typed("sp")).await);

    let fired = assert_ok!(actions.recv().await);
    assert_eq!(fired, Page::Search(Search::Fire));
    let results = assert_ok!(actions.recv().await);
    assert_eq!(results, Page::Search(Search::Results(2)));
}

#[tokio::test(start_paused = true)]
async fn test_handle_timeout_while_debounce_pending() {
    let store = store();

    let mut handle = assert_ok!(store.send(typed("rio")).await);

    assert!(matches!(
        handle.wait_with_timeout(Duration::from_millis(100)).await,
        Err(StoreError::Timeout)
    ));
    assert_ok!(handle.wait_with_timeout(Duration::from_secs(1)).await);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_after_leave_drains() {
    let store = store();

    assert_ok!(store.send(typed("bh")).await);
    assert_ok!(store.send(Page::Leave).await);

    assert_ok!(store.shutdown_default().await);
    assert_err!(store.send(typed("poa")).await);
}

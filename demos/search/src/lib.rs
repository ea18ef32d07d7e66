//! # Search Demo
//!
//! GitHub repository search demonstrating the two patterns the architecture
//! exists for:
//!
//! - **Supersede**: typing a new query truncates the previous query's
//!   in-flight request by racing it against the next `UpdateQuery` on the
//!   action channel.
//! - **State-guarded effects**: `LoadNextPage` consults the current state
//!   (via the mutation context) to avoid duplicate page loads.

use futures::StreamExt;
use reactor_rust_core::{EffectError, MutationContext, MutationStream, Reactor, mutation};

/// Search state rendered by the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// The query currently being searched
    pub query: Option<String>,
    /// Matched repository names (`owner/repo`)
    pub repos: Vec<String>,
    /// Next page to load, if any
    pub next_page: Option<u32>,
    /// Whether a next-page request is in flight
    pub is_loading_next_page: bool,
}

/// User intents from the search view.
#[derive(Debug, Clone)]
pub enum SearchAction {
    /// The query text changed
    UpdateQuery(Option<String>),
    /// The list scrolled near its end
    LoadNextPage,
}

/// State-change instructions produced by search effects.
#[derive(Debug, Clone)]
pub enum SearchMutation {
    /// Record the active query
    SetQuery(Option<String>),
    /// Replace the result list
    SetRepos(Vec<String>, Option<u32>),
    /// Append a page to the result list
    AppendRepos(Vec<String>, Option<u32>),
    /// Flip the next-page loading flag
    SetLoadingNextPage(bool),
}

/// The search view's reactor, backed by the GitHub search API.
#[derive(Debug, Clone)]
pub struct SearchReactor {
    client: reqwest::Client,
}

impl SearchReactor {
    /// Create a reactor with its own HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    fn url_for(query: Option<&str>, page: u32) -> Option<String> {
        let query = query?;
        if query.is_empty() {
            return None;
        }
        Some(format!(
            "https://api.github.com/search/repositories?q={query}&page={page}"
        ))
    }

    /// One page of search results: repository names plus the next page
    /// number (`None` once results run dry).
    async fn search(
        client: reqwest::Client,
        query: Option<String>,
        page: u32,
    ) -> (Vec<String>, Option<u32>) {
        let Some(url) = Self::url_for(query.as_deref(), page) else {
            return (Vec::new(), None);
        };
        match Self::fetch_page(client, &url).await {
            Ok(repos) => {
                let next_page = if repos.is_empty() { None } else { Some(page + 1) };
                (repos, next_page)
            }
            Err(error) => {
                // Rate limits and network failures degrade to an empty
                // result, mirroring an empty search.
                tracing::warn!(%error, url, "github search failed");
                (Vec::new(), None)
            }
        }
    }

    async fn fetch_page(client: reqwest::Client, url: &str) -> Result<Vec<String>, EffectError> {
        let response = client
            .get(url)
            .header("User-Agent", "reactor-rust-search-demo")
            .send()
            .await
            .map_err(EffectError::other)?;
        let json: serde_json::Value = response.json().await.map_err(EffectError::other)?;

        let repos = json
            .get("items")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("full_name"))
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Ok(repos)
    }

    fn is_update_query(action: &SearchAction) -> bool {
        matches!(action, SearchAction::UpdateQuery(_))
    }

    /// Resolves when the next `UpdateQuery` arrives; used to truncate the
    /// in-flight request it supersedes.
    fn next_update_query(
        ctx: &MutationContext<SearchAction, SearchState>,
    ) -> futures::future::BoxFuture<'static, ()> {
        let mut actions = ctx.actions();
        Box::pin(async move {
            while let Some(action) = actions.recv().await {
                if Self::is_update_query(&action) {
                    break;
                }
            }
        })
    }
}

impl Default for SearchReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactor for SearchReactor {
    type Action = SearchAction;
    type Mutation = SearchMutation;
    type State = SearchState;

    fn initial_state(&self) -> SearchState {
        SearchState::default()
    }

    fn mutate(
        &self,
        action: SearchAction,
        ctx: &MutationContext<SearchAction, SearchState>,
    ) -> MutationStream<SearchMutation> {
        match action {
            SearchAction::UpdateQuery(query) => {
                let client = self.client.clone();
                let request_query = query.clone();
                mutation::concat(vec![
                    // 1) record the query
                    mutation::just(SearchMutation::SetQuery(query)),
                    // 2) call the API and replace repos, unless a newer
                    //    query supersedes this one first
                    mutation::from_future(async move {
                        let (repos, next_page) = Self::search(client, request_query, 1).await;
                        Ok(SearchMutation::SetRepos(repos, next_page))
                    })
                    .take_until(Self::next_update_query(ctx))
                    .boxed(),
                ])
            }

            SearchAction::LoadNextPage => {
                let state = ctx.current_state();
                // Prevent duplicate requests while one is in flight.
                if state.is_loading_next_page {
                    return mutation::empty();
                }
                let Some(page) = state.next_page else {
                    return mutation::empty();
                };

                let client = self.client.clone();
                let query = state.query;
                mutation::concat(vec![
                    mutation::just(SearchMutation::SetLoadingNextPage(true)),
                    mutation::from_future(async move {
                        let (repos, next_page) = Self::search(client, query, page).await;
                        Ok(SearchMutation::AppendRepos(repos, next_page))
                    })
                    .take_until(Self::next_update_query(ctx))
                    .boxed(),
                    mutation::just(SearchMutation::SetLoadingNextPage(false)),
                ])
            }
        }
    }

    fn reduce(&self, state: SearchState, mutation: SearchMutation) -> SearchState {
        match mutation {
            SearchMutation::SetQuery(query) => SearchState { query, ..state },
            SearchMutation::SetRepos(repos, next_page) => {
                SearchState { repos, next_page, ..state }
            }
            SearchMutation::AppendRepos(mut repos, next_page) => {
                let mut all = state.repos;
                all.append(&mut repos);
                SearchState { repos: all, next_page, ..state }
            }
            SearchMutation::SetLoadingNextPage(is_loading_next_page) => {
                SearchState { is_loading_next_page, ..state }
            }
        }
    }
}

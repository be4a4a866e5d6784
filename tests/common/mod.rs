#![allow(dead_code)]

//! In-memory repositories and app builders for router-level tests.

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::Layer;

use ironlink::application::services::{AuthService, LinkService, StatsService};
use ironlink::domain::entities::{Click, Link, LinkPatch, NewClick, NewLink, User};
use ironlink::domain::rate_limiter::RateLimiter;
use ironlink::domain::repositories::{
    ApiToken, ClickRepository, LinkRepository, TokenRepository,
};
use ironlink::error::{AppError, SLUG_UNIQUE_CONSTRAINT};
use ironlink::infrastructure::cache::NullCache;
use ironlink::infrastructure::geo::{GeoLocation, GeoLocator};
use ironlink::routes::router;
use ironlink::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";
pub const PEER_IP: &str = "127.0.0.1";
pub const ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Default)]
pub struct Store {
    next_id: i64,
    pub users: Vec<User>,
    pub tokens: Vec<ApiToken>,
    pub links: Vec<Link>,
    pub clicks: Vec<Click>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type SharedStore = Arc<Mutex<Store>>;

fn slug_conflict() -> AppError {
    AppError::conflict(
        "Resource already exists",
        json!({ "constraint": SLUG_UNIQUE_CONSTRAINT }),
    )
}

pub struct MemoryLinkRepository {
    store: SharedStore,
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut store = self.store.lock().unwrap();
        if store.links.iter().any(|l| l.slug == new_link.slug) {
            return Err(slug_conflict());
        }
        let id = store.next_id();
        let mut link = Link::new(id, new_link.user_id, new_link.slug, new_link.long_url, Utc::now());
        link.title = new_link.title;
        link.description = new_link.description;
        store.links.push(link.clone());
        Ok(link)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.store.lock().unwrap().links.iter().any(|l| l.slug == slug))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(store.links.iter().find(|l| l.slug == slug).cloned())
    }

    async fn find_for_owner(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .links
            .iter()
            .find(|l| l.id == id && l.is_owned_by(user_id))
            .cloned())
    }

    async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let store = self.store.lock().unwrap();
        let mut links: Vec<Link> = store
            .links
            .iter()
            .filter(|l| l.is_owned_by(user_id))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: LinkPatch,
    ) -> Result<Option<Link>, AppError> {
        let mut store = self.store.lock().unwrap();
        if let Some(slug) = &patch.slug
            && store.links.iter().any(|l| &l.slug == slug && l.id != id)
        {
            return Err(slug_conflict());
        }
        let Some(link) = store
            .links
            .iter_mut()
            .find(|l| l.id == id && l.is_owned_by(user_id))
        else {
            return Ok(None);
        };
        patch.apply_to(link, Utc::now());
        Ok(Some(link.clone()))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError> {
        let mut store = self.store.lock().unwrap();
        let Some(pos) = store
            .links
            .iter()
            .position(|l| l.id == id && l.is_owned_by(user_id))
        else {
            return Ok(None);
        };
        let link = store.links.remove(pos);
        store.clicks.retain(|c| c.link_id != link.id);
        Ok(Some(link))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MemoryClickRepository {
    store: SharedStore,
}

impl MemoryClickRepository {
    fn newest_first(&self, link_id: i64) -> Vec<Click> {
        let store = self.store.lock().unwrap();
        let mut clicks: Vec<Click> = store
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));
        clicks
    }
}

#[async_trait]
impl ClickRepository for MemoryClickRepository {
    async fn record_click(&self, click: NewClick) -> Result<Click, AppError> {
        let mut store = self.store.lock().unwrap();
        let Some(pos) = store.links.iter().position(|l| l.id == click.link_id) else {
            return Err(AppError::bad_request(
                "Referenced resource does not exist",
                json!({ "link_id": click.link_id }),
            ));
        };
        store.links[pos].click_count += 1;
        let id = store.next_id();
        let click = click.into_click(id, Utc::now());
        store.clicks.push(click.clone());
        Ok(click)
    }

    async fn list_clicks(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        Ok(self.newest_first(link_id))
    }

    async fn recent_clicks(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let mut clicks = self.newest_first(link_id);
        clicks.truncate(limit.max(0) as usize);
        Ok(clicks)
    }
}

pub struct MemoryTokenRepository {
    store: SharedStore,
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        let store = self.store.lock().unwrap();
        let Some(token) = store
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
        else {
            return Ok(None);
        };
        Ok(store.users.iter().find(|u| u.id == token.user_id).cloned())
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut store = self.store.lock().unwrap();
        if let Some(token) = store.tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let token = ApiToken {
            id,
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        store.tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self, user_id: Option<i64>) -> Result<Vec<ApiToken>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .tokens
            .iter()
            .filter(|t| user_id.is_none_or(|id| t.user_id == id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(store.tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let store = self.store.lock().unwrap();
        Ok(store.tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut store = self.store.lock().unwrap();
        match store.tokens.iter_mut().find(|t| t.id == id) {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found("Token not found", json!({ "id": id }))),
        }
    }
}

/// Locates every address in one fixed place.
pub struct FixedGeoLocator;

#[async_trait]
impl GeoLocator for FixedGeoLocator {
    async fn locate(&self, _ip: std::net::IpAddr) -> Option<GeoLocation> {
        Some(GeoLocation {
            country: Some("DE".to_string()),
            city: Some("Berlin".to_string()),
        })
    }
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` does.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = format!("{PEER_IP}:12345").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: SharedStore,
}

impl TestApp {
    /// Registers a user and returns it with a fresh bearer token.
    pub async fn seed_user(&self, email: &str) -> (User, String) {
        let user = {
            let mut store = self.store.lock().unwrap();
            let id = store.next_id();
            let user = User {
                id,
                email: email.to_string(),
                name: None,
                created_at: Utc::now(),
            };
            store.users.push(user.clone());
            user
        };
        let (raw, _) = self
            .state
            .auth_service
            .issue_token(user.id, "test", None)
            .await
            .unwrap();
        (user, raw)
    }

    /// Stores a link directly, bypassing validation and rate limits.
    pub fn seed_link(&self, owner_id: i64, slug: &str, url: &str) -> Link {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let link = Link::new(id, owner_id, slug.to_string(), url.to_string(), Utc::now());
        store.links.push(link.clone());
        link
    }

    /// Stores a click with an explicit timestamp.
    pub fn seed_click(&self, link_id: i64, at: DateTime<Utc>, referer: Option<&str>, country: Option<&str>) {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let click = NewClick {
            link_id,
            referer: referer.map(str::to_string),
            country: country.map(str::to_string),
            ..Default::default()
        }
        .into_click(id, at);
        store.clicks.push(click);
        if let Some(link) = store.links.iter_mut().find(|l| l.id == link_id) {
            link.click_count += 1;
        }
    }

    pub fn link(&self, id: i64) -> Option<Link> {
        self.store.lock().unwrap().links.iter().find(|l| l.id == id).cloned()
    }

    pub fn clicks_for(&self, link_id: i64) -> Vec<Click> {
        self.store
            .lock()
            .unwrap()
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect()
    }
}

pub fn create_test_state(store: SharedStore) -> AppState {
    let link_repo: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository {
        store: store.clone(),
    });
    let click_repo: Arc<dyn ClickRepository> = Arc::new(MemoryClickRepository {
        store: store.clone(),
    });
    let token_repo: Arc<dyn TokenRepository> = Arc::new(MemoryTokenRepository { store });

    AppState {
        link_service: Arc::new(LinkService::new(link_repo)),
        stats_service: Arc::new(StatsService::new(click_repo)),
        auth_service: Arc::new(AuthService::new(token_repo, TEST_SECRET.to_string())),
        rate_limiter: Arc::new(RateLimiter::new()),
        cache: Arc::new(NullCache),
        geo: Arc::new(FixedGeoLocator),
        public_base_url: BASE_URL.to_string(),
        behind_proxy: true,
        admin_emails: Arc::new(HashSet::from([ADMIN_EMAIL.to_string()])),
    }
}

/// Full application router over in-memory storage, with a fixed peer address.
pub fn spawn_app() -> TestApp {
    let store = SharedStore::default();
    let state = create_test_state(store.clone());
    let app = router(state.clone()).layer(MockConnectInfoLayer);

    TestApp {
        server: TestServer::new(app).unwrap(),
        state,
        store,
    }
}

//! Shared test harness: in-memory repositories and cache behind the real
//! router, so handler tests run without PostgreSQL or Redis.

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use shortly::config::AppConfig;
use shortly::domain::email_job::EmailJob;
use shortly::domain::entities::{
    NewShortUrl, NewUser, ShortUrl, ShortUrlPatch, User, UserPatch,
};
use shortly::domain::repositories::{
    UrlListQuery, UrlRepository, UserListQuery, UserRepository,
};
use shortly::error::AppError;
use shortly::infrastructure::cache::{CacheResult, CacheService};
use shortly::routes::create_router;
use shortly::state::AppState;

pub const TEST_BASE_URL: &str = "http://localhost:8080";

#[derive(Default)]
pub struct InMemoryUrlRepository {
    urls: Mutex<Vec<ShortUrl>>,
    next_id: AtomicI64,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Inserts a link directly, bypassing the API. For test setup.
    pub fn insert(&self, mut url: ShortUrl) -> ShortUrl {
        url.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());
        url
    }

    pub fn get(&self, id: i64) -> Option<ShortUrl> {
        self.urls.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut urls = self.urls.lock().unwrap();
        if urls.iter().any(|u| u.short_token == new_url.short_token) {
            return Err(AppError::conflict("duplicate short token"));
        }

        let url = ShortUrl {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: new_url.user_id,
            original_url: new_url.original_url,
            short_token: new_url.short_token,
            max_clicks: new_url.max_clicks,
            expires_at: new_url.expires_at,
            created_at: Utc::now(),
        };
        urls.push(url.clone());
        Ok(url)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortUrl>, AppError> {
        Ok(self
            .urls
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.short_token == token)
            .cloned())
    }

    async fn find_by_id_for_owner(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        Ok(self
            .urls
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && u.user_id == user_id)
            .cloned())
    }

    async fn list(&self, query: UrlListQuery) -> Result<(Vec<ShortUrl>, i64), AppError> {
        let urls = self.urls.lock().unwrap();
        let matches: Vec<ShortUrl> = urls
            .iter()
            .filter(|u| query.user_id.is_none_or(|id| u.user_id == id))
            .filter(|u| {
                query.search.as_ref().is_none_or(|s| {
                    let needle = s.to_lowercase();
                    u.original_url.to_lowercase().contains(&needle)
                        || u.short_token.to_lowercase().contains(&needle)
                })
            })
            .cloned()
            .collect();

        let count = matches.len() as i64;
        let offset = ((query.page - 1) * query.limit) as usize;
        let page = matches
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();
        Ok((page, count))
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<Option<ShortUrl>, AppError> {
        let mut urls = self.urls.lock().unwrap();
        if let Some(token) = &patch.short_token {
            if urls
                .iter()
                .any(|u| u.short_token == *token && !(u.id == id && u.user_id == user_id))
            {
                return Err(AppError::conflict("duplicate short token"));
            }
        }

        let Some(url) = urls.iter_mut().find(|u| u.id == id && u.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(token) = patch.short_token {
            url.short_token = token;
        }
        if let Some(max_clicks) = patch.max_clicks {
            url.max_clicks = max_clicks;
        }
        if let Some(expires_at) = patch.expires_at {
            url.expires_at = expires_at;
        }
        Ok(Some(url.clone()))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let mut urls = self.urls.lock().unwrap();
        let before = urls.len();
        urls.retain(|u| !(u.id == id && u.user_id == user_id));
        Ok(urls.len() < before)
    }

    async fn decrement_click(&self, token: &str) -> Result<bool, AppError> {
        let mut urls = self.urls.lock().unwrap();
        match urls
            .iter_mut()
            .find(|u| u.short_token == token && u.max_clicks.is_some_and(|c| c > 0))
        {
            Some(url) => {
                url.max_clicks = url.max_clicks.map(|c| c - 1);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("duplicate email"));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password: new_user.password,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, query: UserListQuery) -> Result<(Vec<User>, i64), AppError> {
        let users = self.users.lock().unwrap();
        let matches: Vec<User> = users
            .iter()
            .filter(|u| {
                query.search.as_ref().is_none_or(|s| {
                    let needle = s.to_lowercase();
                    u.first_name.to_lowercase().contains(&needle)
                        || u.last_name.to_lowercase().contains(&needle)
                        || u.email.to_lowercase().contains(&needle)
                })
            })
            .cloned()
            .collect();

        let count = matches.len() as i64;
        let offset = ((query.page - 1) * query.limit) as usize;
        let page = matches
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();
        Ok((page, count))
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

/// TTL-aware in-memory cache.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (value.to_string(), Instant::now() + Duration::from_secs(ttl_seconds)),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub urls: Arc<InMemoryUrlRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub cache: Arc<InMemoryCache>,
    // Held so the email queue stays open for the lifetime of the test.
    _email_rx: mpsc::Receiver<EmailJob>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: TEST_BASE_URL.to_string(),
            database_url: "postgres://unused".to_string(),
            database_max_connections: 1,
            redis_url: None,
            jwt_secret: "integration-test-secret".to_string(),
            jwt_ttl_seconds: 3600,
            email: None,
            log_json: false,
        });

        let urls = Arc::new(InMemoryUrlRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let (email_tx, email_rx) = mpsc::channel(16);

        let state = AppState::new(
            config,
            Arc::clone(&urls) as Arc<dyn UrlRepository>,
            Arc::clone(&users) as Arc<dyn UserRepository>,
            Arc::clone(&cache) as Arc<dyn CacheService>,
            email_tx,
        );

        let server = TestServer::new(create_router(state.clone())).unwrap();
        Self {
            server,
            state,
            urls,
            users,
            cache,
            _email_rx: email_rx,
        }
    }

    /// Creates a verified user directly and returns `(user, bearer token)`.
    pub async fn signed_in_user(&self, email: &str) -> (User, String) {
        let user = self
            .users
            .create(NewUser {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password: bcrypt::hash("secret1", 4).unwrap(),
            })
            .await
            .unwrap();

        let token = self.state.jwt.issue(user.id, &user.email).unwrap();
        (user, token)
    }

    /// Inserts a link owned by `user_id` with the given token.
    pub fn seed_url(
        &self,
        user_id: i64,
        token: &str,
        max_clicks: Option<i64>,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> ShortUrl {
        self.urls.insert(ShortUrl {
            id: 0,
            user_id,
            original_url: "https://example.com/target".to_string(),
            short_token: token.to_string(),
            max_clicks,
            expires_at,
            created_at: Utc::now(),
        })
    }
}

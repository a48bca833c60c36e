//! Shared application state handed to every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, RedirectService, UrlService, UserService};
use crate::config::AppConfig;
use crate::domain::email_job::EmailJob;
use crate::domain::repositories::{UrlRepository, UserRepository};
use crate::infrastructure::cache::CacheService;
use crate::utils::jwt::JwtManager;
use crate::utils::token_generator::TokenGenerator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub url_service: Arc<UrlService>,
    pub redirect_service: Arc<RedirectService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub jwt: Arc<JwtManager>,
    // Kept for the health endpoint's direct connectivity probes.
    pub url_repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
    pub email_queue: mpsc::Sender<EmailJob>,
}

impl AppState {
    /// Wires the services from their collaborators.
    pub fn new(
        config: Arc<AppConfig>,
        url_repository: Arc<dyn UrlRepository>,
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheService>,
        email_queue: mpsc::Sender<EmailJob>,
    ) -> Self {
        let tokens = Arc::new(TokenGenerator::new());
        let jwt = Arc::new(JwtManager::new(
            &config.jwt_secret,
            config.jwt_ttl_seconds,
        ));

        Self {
            url_service: Arc::new(UrlService::new(
                Arc::clone(&url_repository),
                Arc::clone(&cache),
                Arc::clone(&tokens),
            )),
            redirect_service: Arc::new(RedirectService::new(
                Arc::clone(&url_repository),
                Arc::clone(&cache),
            )),
            user_service: Arc::new(UserService::new(Arc::clone(&user_repository))),
            auth_service: Arc::new(AuthService::new(
                user_repository,
                Arc::clone(&cache),
                Arc::clone(&jwt),
                tokens,
                email_queue.clone(),
            )),
            jwt,
            email_queue,
            url_repository,
            cache,
            config,
        }
    }
}

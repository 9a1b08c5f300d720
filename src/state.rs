use std::sync::Arc;

use crate::{config::AppConfig, db::OrmConn, middleware::auth::JwtKeys};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub jwt: Arc<JwtKeys>,
    pub public_url: Arc<str>,
}

impl AppState {
    pub fn new(orm: OrmConn, jwt_key: &str, public_url: impl Into<Arc<str>>) -> Self {
        Self {
            orm,
            jwt: Arc::new(JwtKeys::new(jwt_key)),
            public_url: public_url.into(),
        }
    }

    pub fn from_config(orm: OrmConn, config: &AppConfig) -> Self {
        Self::new(orm, &config.jwt_key, config.public_url())
    }
}

//! Shared state handed to every request handler.

use axum::extract::FromRef;
use pim_models::db::connection::DbConnection;
use pim_web::{auth::AuthService, mw_auth::AdminKey};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth: AuthService,
    pub admin_key: AdminKey,
}

impl AppState {
    pub fn new(auth: AuthService, admin_key: AdminKey) -> Self {
        Self { auth, admin_key }
    }

    pub fn connection(&self) -> &DbConnection {
        self.auth.connection()
    }
}

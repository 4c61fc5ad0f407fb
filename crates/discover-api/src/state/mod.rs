//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, the open feed sessions and the preloaded globe outline.

use std::sync::Arc;

use discover_common::{AppConfig, JwtService};
use discover_globe::Outline;
use discover_service::{ServiceContext, SessionRegistry};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    sessions: Arc<SessionRegistry>,
    globe_outline: Option<Arc<Outline>>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new(service_context.clone()));
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            sessions,
            globe_outline: None,
        }
    }

    /// Attach the landmass outline served with the globe scene
    pub fn with_globe_outline(mut self, outline: Outline) -> Self {
        self.globe_outline = Some(Arc::new(outline));
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn globe_outline(&self) -> Option<&Outline> {
        self.globe_outline.as_deref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("sessions", &self.sessions.len())
            .field("globe_outline", &self.globe_outline.is_some())
            .finish()
    }
}

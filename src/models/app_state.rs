use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::RemoteProductService;
use crate::models::session::Session;

/// Shared state of the web panel.
#[derive(Clone)]
pub struct AppState {
    /// Browser session id -> product service session.
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub flash_store: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub service: RemoteProductService,
    pub api_base_url: String,
    pub image_base_url: String,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(service: RemoteProductService, image_base_url: String) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            api_base_url: service.client().base_url().to_string(),
            service,
            image_base_url,
            custom_css: None,
        }
    }

    pub fn session_for(&self, sid: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(sid).cloned()
    }

    pub fn push_flash(&self, sid: &str, message: impl Into<String>) {
        self.flash_store
            .lock()
            .unwrap()
            .entry(sid.to_string())
            .or_default()
            .push(message.into());
    }
}

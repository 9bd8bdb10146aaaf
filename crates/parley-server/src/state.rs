use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use parley_avatar::AvatarPresenter;
use parley_engine::{Scorer, SessionStore};
use parley_provider::ReplyProvider;

/// Vendor credentials as loaded at startup. Route handlers only ever expose
/// presence and a short masked preview, never the value.
#[derive(Clone, Default)]
pub struct VendorKeys {
    pub generative_text: Option<String>,
    pub avatar: Option<String>,
}

/// Shared application state, injected into every route handler. There is no
/// ambient global session map; everything hangs off this struct.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub scorer: Arc<Scorer>,
    pub replies: Arc<dyn ReplyProvider>,
    pub presenter: Option<Arc<dyn AvatarPresenter>>,
    /// Avatar session id per negotiation session, maintained best-effort.
    pub avatar_sessions: Arc<RwLock<HashMap<Uuid, String>>>,
    pub keys: VendorKeys,
}

impl AppState {
    pub fn new(
        store: Arc<SessionStore>,
        scorer: Scorer,
        replies: Arc<dyn ReplyProvider>,
        presenter: Option<Arc<dyn AvatarPresenter>>,
        keys: VendorKeys,
    ) -> Self {
        Self {
            store,
            scorer: Arc::new(scorer),
            replies,
            presenter,
            avatar_sessions: Arc::new(RwLock::new(HashMap::new())),
            keys,
        }
    }
}

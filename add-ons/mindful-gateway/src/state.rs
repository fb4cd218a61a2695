use mindful_core::{Capabilities, ConversationSession, CoreConfig, JournalAnalyzer};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state. The conversation is process-wide; the mutex keeps one `send` or
/// `reset` in flight at a time.
#[derive(Clone)]
pub(crate) struct AppState {
    pub config: Arc<CoreConfig>,
    pub analyzer: Arc<dyn JournalAnalyzer>,
    pub session: Option<Arc<Mutex<ConversationSession>>>,
}

impl AppState {
    pub fn new(config: CoreConfig, capabilities: Capabilities) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: capabilities.analyzer,
            session: capabilities.session.map(|s| Arc::new(Mutex::new(s))),
        }
    }
}

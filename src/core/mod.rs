//! Core modules for BiasLens

pub mod lexicon;
pub mod scorer;
pub mod provider;
pub mod analyzer;
pub mod store;
pub mod history;
pub mod analytics;
pub mod auth;
pub mod api;

pub use scorer::{HeuristicScorer, TermHits};
pub use provider::{AnalysisProvider, GeminiProvider};
pub use analyzer::{Analyzer, AnalysisSource};
pub use store::{KeyValueStore, MemoryStore, FileStore};
pub use history::HistoryService;
pub use analytics::summarize_history;
pub use auth::{AuthService, AuthSubject, Subscription};
pub use api::{create_router, run_server, AppState};

pub mod game_events;
pub mod game_session;
pub mod input_validation;
pub mod record_store;
pub mod scoring;

// Re-export main components
pub use game_events::*;
pub use game_session::*;
pub use input_validation::*;
pub use record_store::*;
pub use scoring::*;

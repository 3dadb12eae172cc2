// Module declarations
pub mod persistence;
pub mod search;

// Re-export implementations
pub use persistence::InMemoryDocumentRepository;
pub use search::matcher::matches;

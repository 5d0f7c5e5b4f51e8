// Errors layer - Error type definitions
pub mod internal;
pub mod web;

// Re-exports for convenience
pub use internal::InternalError;
pub use web::WebError;

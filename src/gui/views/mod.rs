//! GUI views

pub mod main_view;

// Re-export for convenience
pub use main_view::main_view;

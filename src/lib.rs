//! Bookshelf application library.
//!
//! Holds the module implementations (books, users, favorites), the shared
//! domain error type, and the registration entry point wiring modules into
//! the kernel registry.

pub mod error;
pub mod modules;

pub use modules::register_all;

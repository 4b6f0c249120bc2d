//! Core business logic, independent of the HTTP layer.
//!
//! The pricing, cart, wizard and message modules are pure; the repository
//! modules take a `SeaORM` connection.

/// Admin password hashing and bearer tokens
pub mod auth;
/// Booking persistence and status changes
pub mod booking;
/// Menu categories
pub mod category;
/// Menu items with variants and options
pub mod menu;
/// Booking message text and messaging deep link
pub mod message;
/// The in-progress cart
pub mod order;
/// Totals, tax and deposit
pub mod pricing;
/// Dashboard statistics
pub mod report;
/// Seating spots
pub mod seating;
/// Local file upload sink
pub mod upload;
/// Reservation step gating
pub mod wizard;

//! Host-side input collaborators
//!
//! Device polling lives outside the crate. The only thing the core needs from
//! an input layer is a way to ask for the current episode to stop.

pub mod quit;

pub use quit::QuitSignal;

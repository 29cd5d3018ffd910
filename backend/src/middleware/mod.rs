//! Request middleware. Currently just trace identifier propagation.

pub mod trace;

pub use trace::Trace;

//! High-level driver
//!
//! [`Is25lp`] owns a transport and a chip profile and exposes every
//! device operation as a method. It is the only handle callers need.

mod driver;

pub use driver::Is25lp;

//! Shared traits for the strided-core workspace.
//!
//! This crate provides the numeric trait definitions that are shared across
//! `strided-kernel`, `strided-sum`, and `strided-dispatch`.
//!
//! External crates can depend on `strided-traits` to implement traits for
//! their own float types without orphan rule violations.

pub mod scalar;

pub use scalar::Real;

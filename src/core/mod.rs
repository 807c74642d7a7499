// This module holds the infrastructure shared by every IR provider and by the feature
// engine: the IrAdaptor trait that exposes a module as functions, blocks and instructions,
// the InstKind tag for structural load/store checks, and the FeatureError type.

//! Core infrastructure.
//!
//! # Key Components
//!
//! ## IR Adaptor (`adaptor`)
//! - Read-only view of a module in declaration order
//! - Structural instruction kinds with pointer address spaces
//!
//! ## Errors (`error`)
//! - `FeatureError` built with `thiserror`

pub mod adaptor;
pub mod error;

pub use adaptor::{InstKind, IrAdaptor};
pub use error::{FeatureError, FeatureResult};

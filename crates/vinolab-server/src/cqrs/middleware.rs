//! CQRS marker traits
//!
//! Commands change the store; queries only read it. Both are plain mediator
//! requests, the markers let code and tests tell them apart.

/// A request that writes to the sample store
pub trait Command {}

/// A request that only reads from the sample store
pub trait Query {}

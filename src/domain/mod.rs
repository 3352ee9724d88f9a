//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Entities: Objects with identity
//! - Value Objects: Immutable objects without identity
//! - Domain Events: Things that happened in the domain
//! - Ports: Interfaces implemented by the infrastructure layer

pub mod call;
pub mod notification;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};

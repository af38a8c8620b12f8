//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity of their own and are compared by their
/// attribute values (a price context, a tax line, a set of sale overrides).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

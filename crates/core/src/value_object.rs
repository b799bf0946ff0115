//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. An
/// [`Amount`](crate::Amount) of 100 equals any other amount of 100; a
/// statement carrying it is an entity and is compared by id instead.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Entities that carry a persisted position for display ordering.
pub trait Reorderable: Identifiable {
    fn sort_order(&self) -> i32;
    fn set_sort_order(&mut self, sort_order: i32);
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;

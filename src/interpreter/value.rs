/// Array value representation.
///
/// Defines the `ArrayValue` type used for `Value::Array`. Arrays have a fixed
/// size chosen at declaration, a single element type, and are mutated in
/// place by index. Multi-dimensional arrays nest one `ArrayValue` per
/// dimension, built by deep-copying the inner template into every slot.
pub mod array;

/// Core runtime value type.
///
/// Defines the tagged `Value` enum, its lossy coercions, and the declared-type
/// compatibility rule that decides which values a slot may hold.
pub mod core;

//! Math utility functions.

use euclid::default::Vector3D;
use num_traits::Float;

use crate::color::{Component, Components};

/// Three color channels as a vector, for channel-wise arithmetic.
pub type Channels = Vector3D<Component>;

/// Linearly interpolate from `a` to `b` using `t` as the progress between
/// them.
pub fn lerp<T: Float>(a: T, b: T, t: T) -> T {
    a + (b - a) * t
}

/// Clamp a value to `0..=1`.
pub fn clamp01<T: Float>(value: T) -> T {
    value.max(T::zero()).min(T::one())
}

/// Convert components to a vector.
pub fn to_channels(components: Components) -> Channels {
    Channels::new(components.0, components.1, components.2)
}

/// Convert a vector to components.
pub fn from_channels(channels: Channels) -> Components {
    Components(channels.x, channels.y, channels.z)
}

/// Apply a function to every channel of a vector.
pub fn map_channels(channels: Channels, f: impl Fn(Component) -> Component) -> Channels {
    Channels::new(f(channels.x), f(channels.y), f(channels.z))
}

//! Local pointer input: subscription, address encoding, and throttling.

mod input;
mod pointer;
mod throttle;

pub use input::LocalInputReporter;
pub use pointer::{PointerEvent, PointerHub, PointerSubscription};
pub use throttle::Throttle;

//! Reducer registration.
//!
//! Each event name maps to an ordered list of reducers. Registration hands
//! back a [`Subscription`] that removes exactly that registration.

mod reducer;
mod registry;
mod subscription;

pub use reducer::{Reducer, Reduction};
pub(crate) use registry::{HandlerId, ReducerRegistry};
pub use subscription::Subscription;

//! Change notification.
//!
//! Listeners bound to [`CHANGED`] observe the store after a dispatch that
//! altered the state and after every successful undo, redo or rollback. The
//! event argument they receive says why they fired.

mod notifier;

pub use notifier::{is_reserved, Listener, CHANGED, REDO, ROLLBACK, UNDO};
pub(crate) use notifier::ChangeNotifier;

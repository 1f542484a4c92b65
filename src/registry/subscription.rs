use std::cell::RefCell;
use std::fmt;

/// Handle to one reducer or listener registration.
///
/// Calling [`unsubscribe`](Subscription::unsubscribe) removes that exact
/// registration; later calls do nothing. Dropping the handle leaves the
/// registration in place.
pub struct Subscription {
    event: String,
    cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    pub(crate) fn new(event: &str, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            event: event.to_string(),
            cancel: RefCell::new(Some(Box::new(cancel))),
        }
    }

    /// Remove the registration this handle was returned for.
    pub fn unsubscribe(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Whether `unsubscribe` has not been called yet.
    pub fn is_active(&self) -> bool {
        self.cancel.borrow().is_some()
    }

    /// The event name the registration is bound to.
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("active", &self.is_active())
            .finish()
    }
}

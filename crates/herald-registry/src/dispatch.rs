//! The outbound dispatch seam.

use herald_types::{Notification, Target};

/// Turns a stored callback identifier into an actual invocation.
///
/// The registry never interprets callback identifiers; it hands each
/// matching [`Target`] to the dispatcher together with the posted
/// [`Notification`]. From the registry's point of view every dispatch
/// succeeds. Failures are the dispatcher's business.
pub trait Dispatch<E, P, C> {
    fn dispatch(&self, target: &Target<P, C>, notification: Notification<'_, E, P>);
}

impl<E, P, C, F> Dispatch<E, P, C> for F
where
    F: Fn(&Target<P, C>, Notification<'_, E, P>),
{
    fn dispatch(&self, target: &Target<P, C>, notification: Notification<'_, E, P>) {
        self(target, notification)
    }
}

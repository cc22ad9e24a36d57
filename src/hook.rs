//! Observer hooks invoked at fixed points of a scheduler tick.

use std::borrow::Cow;
use std::fmt;

use crate::StopReason;

/// What a [`Hook::Observe`] callback is told about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookEvent {
    /// A frame is about to be handed to the display collaborator.
    BeforeDisplay { index: usize },
    /// A frame was shown and the position moved.
    Advanced {
        displayed: usize,
        position: usize,
        frames: usize,
    },
    /// The scheduler reached its terminal phase.
    Stopped(StopReason),
}

/// A hook registered on a [`Scheduler`](crate::Scheduler).
///
/// Hooks run in registration order on the tick stream.
pub enum Hook<P> {
    /// Does nothing. Useful as a placeholder in hook tables.
    Noop,
    /// Rewrites the payload before it is displayed.
    ///
    /// Receives the frame index and a private copy of the payload, so the
    /// playlist itself is never touched.
    Transform(Box<dyn FnMut(usize, &mut P)>),
    /// Side-effecting observer, e.g. sounds or counters kept by the host.
    Observe(Box<dyn FnMut(HookEvent)>),
}

impl<P> Hook<P> {
    /// Build a [`Hook::Transform`] from a closure.
    pub fn transform(f: impl FnMut(usize, &mut P) + 'static) -> Self {
        Hook::Transform(Box::new(f))
    }

    /// Build a [`Hook::Observe`] from a closure.
    pub fn observe(f: impl FnMut(HookEvent) + 'static) -> Self {
        Hook::Observe(Box::new(f))
    }
}

impl<P> fmt::Debug for Hook<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Noop => f.write_str("Noop"),
            Hook::Transform(_) => f.write_str("Transform(..)"),
            Hook::Observe(_) => f.write_str("Observe(..)"),
        }
    }
}

/// Run every transform hook over `payload`, cloning it only if one exists.
pub(crate) fn apply_transforms<'a, P: Clone>(
    hooks: &mut [Hook<P>],
    index: usize,
    payload: &'a P,
) -> Cow<'a, P> {
    let mut payload = Cow::Borrowed(payload);
    for hook in hooks.iter_mut() {
        if let Hook::Transform(f) = hook {
            f(index, payload.to_mut());
        }
    }
    payload
}

pub(crate) fn notify<P>(hooks: &mut [Hook<P>], event: HookEvent) {
    for hook in hooks.iter_mut() {
        if let Hook::Observe(f) = hook {
            f(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn transforms_run_in_order() {
        let mut hooks = vec![
            Hook::transform(|i, s: &mut String| s.push_str(&format!("[{}]", i))),
            Hook::Noop,
            Hook::transform(|_, s: &mut String| *s = s.to_uppercase()),
        ];
        let original = "frame".to_string();
        let out = apply_transforms(&mut hooks, 3, &original);
        assert_eq!(out.as_ref(), "FRAME[3]");
        assert_eq!(original, "frame");
    }

    #[test]
    fn no_transform_borrows() {
        let mut hooks: Vec<Hook<String>> = vec![Hook::Noop, Hook::observe(|_| {})];
        let original = "frame".to_string();
        let out = apply_transforms(&mut hooks, 0, &original);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn observers_see_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut hooks: Vec<Hook<String>> = vec![
            Hook::transform(|_, _| {}),
            Hook::observe(move |e| sink.borrow_mut().push(e)),
        ];
        notify(&mut hooks, HookEvent::BeforeDisplay { index: 1 });
        notify(&mut hooks, HookEvent::Stopped(StopReason::Cancelled));
        assert_eq!(
            *seen.borrow(),
            vec![
                HookEvent::BeforeDisplay { index: 1 },
                HookEvent::Stopped(StopReason::Cancelled)
            ]
        );
    }

    #[test]
    fn debug_hides_closures() {
        let hook: Hook<String> = Hook::observe(|_| {});
        assert_eq!(format!("{:?}", hook), "Observe(..)");
    }
}

//! Notification callbacks around cube operations.
//!
//! Hooks run synchronously on the calling thread, outside the coordination
//! lock. Rotation hooks run while the rotation's layer lock is held; hooks of
//! same-group operations may run concurrently with each other.

use cube_core::Side;
use std::sync::Arc;

/// Callbacks invoked around every rotation and show.
///
/// Every method defaults to doing nothing. A cancelled operation runs
/// neither its before- nor its after-hook.
pub trait CubeHooks: Send + Sync {
    /// Called after admission and the layer lock, before the facelets move.
    fn before_rotation(&self, _side: Side, _layer: usize) {}

    /// Called after the facelets moved, before the layer lock is released.
    fn after_rotation(&self, _side: Side, _layer: usize) {}

    /// Called after admission, before the state is read.
    fn before_show(&self) {}

    /// Called after the state was read, before exiting the coordinator.
    fn after_show(&self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl CubeHooks for NoopHooks {}

impl<T: CubeHooks + ?Sized> CubeHooks for Arc<T> {
    fn before_rotation(&self, side: Side, layer: usize) {
        (**self).before_rotation(side, layer)
    }

    fn after_rotation(&self, side: Side, layer: usize) {
        (**self).after_rotation(side, layer)
    }

    fn before_show(&self) {
        (**self).before_show()
    }

    fn after_show(&self) {
        (**self).after_show()
    }
}

/// Adapter turning four closures into [`CubeHooks`].
pub struct CallbackHooks<BR, AR, BS, AS> {
    before_rotation: BR,
    after_rotation: AR,
    before_show: BS,
    after_show: AS,
}

impl<BR, AR, BS, AS> CallbackHooks<BR, AR, BS, AS>
where
    BR: Fn(Side, usize) + Send + Sync,
    AR: Fn(Side, usize) + Send + Sync,
    BS: Fn() + Send + Sync,
    AS: Fn() + Send + Sync,
{
    /// Wrap the four callbacks.
    pub fn new(before_rotation: BR, after_rotation: AR, before_show: BS, after_show: AS) -> Self {
        Self {
            before_rotation,
            after_rotation,
            before_show,
            after_show,
        }
    }
}

impl<BR, AR, BS, AS> CubeHooks for CallbackHooks<BR, AR, BS, AS>
where
    BR: Fn(Side, usize) + Send + Sync,
    AR: Fn(Side, usize) + Send + Sync,
    BS: Fn() + Send + Sync,
    AS: Fn() + Send + Sync,
{
    fn before_rotation(&self, side: Side, layer: usize) {
        (self.before_rotation)(side, layer)
    }

    fn after_rotation(&self, side: Side, layer: usize) {
        (self.after_rotation)(side, layer)
    }

    fn before_show(&self) {
        (self.before_show)()
    }

    fn after_show(&self) {
        (self.after_show)()
    }
}

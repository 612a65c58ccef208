// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped suppression of native callbacks during structural mutations.
//!
//! Native widgets fire callbacks (selection changed, branch opened) synchronously
//! while the control is halfway through a mutation, when node ids and the cache
//! disagree. The control holds a [`Suppress`] token for the whole mutation and
//! drops any callback that arrives while one is alive.
//!
//! ```
//! use understory_tree_control::guard::Reentrancy;
//!
//! let guard = Reentrancy::new();
//! {
//!     let _outer = guard.enter();
//!     let _inner = guard.enter();
//!     assert!(guard.is_active());
//! }
//! assert!(!guard.is_active());
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

/// Shared nesting counter. Cloning shares the counter.
#[derive(Clone, Debug, Default)]
pub struct Reentrancy {
    depth: Rc<Cell<u32>>,
}

impl Reentrancy {
    /// A guard with no active suppression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start suppressing until the returned token is dropped. Nests.
    pub fn enter(&self) -> Suppress {
        self.depth.set(self.depth.get() + 1);
        Suppress {
            depth: Rc::clone(&self.depth),
        }
    }

    /// True while at least one [`Suppress`] token is alive.
    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Token returned by [`Reentrancy::enter`]; ends suppression on drop.
///
/// Dropped on every exit path, including early returns and unwinding.
#[must_use = "suppression ends as soon as the token is dropped"]
#[derive(Debug)]
pub struct Suppress {
    depth: Rc<Cell<u32>>,
}

impl Drop for Suppress {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_releases_on_early_return() {
        fn bail(guard: &Reentrancy, fail: bool) -> Result<(), ()> {
            let _token = guard.enter();
            if fail {
                return Err(());
            }
            Ok(())
        }
        let guard = Reentrancy::new();
        assert!(bail(&guard, true).is_err());
        assert!(!guard.is_active());
        assert!(bail(&guard, false).is_ok());
        assert!(!guard.is_active());
    }

    #[test]
    fn clones_share_depth() {
        let guard = Reentrancy::new();
        let other = guard.clone();
        let token = other.enter();
        assert!(guard.is_active());
        drop(token);
        assert!(!guard.is_active());
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations.
//!
//! - `memory`: a pure in-memory widget, used for headless controls and tests.
//!
//! Toolkit bindings (GTK, Qt, EFL, Win32) implement
//! [`NativeTreeBackend`](crate::backend::NativeTreeBackend) in their own crates.

pub mod memory;

pub use memory::{MemoryBackend, MemoryHandle, NodeState};

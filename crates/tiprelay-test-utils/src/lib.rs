// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for tiprelay integration tests.
//!
//! Provides in-memory adapters and configuration fixtures so registry and
//! gateway tests run without touching the filesystem or the network.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory state store with injectable write failures
//! - [`MockForwarder`] - Forwarder that records events instead of sending them
//! - [`fixtures`] - Complete game slots and targets

pub mod fixtures;
pub mod mock_forwarder;
pub mod mock_store;

pub use fixtures::{complete_slot, sample_target, slots};
pub use mock_forwarder::MockForwarder;
pub use mock_store::MemoryStore;

// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the persistence and forwarding seams.
//!
//! Both use `#[async_trait]` so they can be held as `Arc<dyn _>` in the
//! gateway state and swapped for in-memory doubles in tests.

pub mod forwarder;
pub mod store;

pub use forwarder::Forwarder;
pub use store::StateStore;

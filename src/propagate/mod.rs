// SPDX-License-Identifier: MPL-2.0

//! Rewriting every open list after a local change to one status.
//!
//! Lists are shaped differently (plain statuses, feed wrappers, thread nodes,
//! identifier-only loaders) but they all answer the same question: which row,
//! if any, shows the status that just changed?

mod entry;
mod mutation;
mod propagator;

pub use entry::{Entry, FeedRecord, FeedRecordKind, ThreadLists, ThreadNode, ThreadPosition};
pub use mutation::Mutation;
pub use propagator::{MutationPropagator, PropagationReport, PropagationTarget};

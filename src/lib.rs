// SPDX-License-Identifier: MPL-2.0

//! Feed engine for a Mastodon client.
//!
//! Loaders page through server timelines into lists of [`feed::ItemIdentifier`]
//! rows. Every entity they fetch lands in one shared [`cache::IdentityCache`],
//! filter rules from [`filter::FilterService`] decide which rows stay, and
//! [`propagate::MutationPropagator`] rewrites open lists after local changes.

pub mod actions;
pub mod api;
pub mod cache;
pub mod config;
pub mod feed;
pub mod filter;
pub mod logging;
pub mod model;
pub mod propagate;
pub mod state;

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Slipway.
//!
//! This crate provides a pre-configured HTTP client with a consistent
//! User-Agent header. Outbound calls carry no timeout unless a caller asks
//! for one via [`new_client_with_timeout`]; provisioning calls block for as
//! long as the provider takes.

mod client;

pub use client::{builder, new_client, new_client_with_timeout, user_agent};

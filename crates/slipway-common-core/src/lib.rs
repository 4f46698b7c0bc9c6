// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared provisioning vocabulary for Slipway.
//!
//! Every "ensure" operation in the toolkit — ensure a repository, ensure an
//! execution identity, ensure a function — resolves to the same shape: the
//! resource handle, plus whether this call created it or found it already in
//! place. [`Ensured`] is that shape. Failures are always typed `Err` values
//! from the owning crate; there is no out-of-band error channel.

/// Outcome of an idempotent ensure operation.
///
/// Both variants carry the resolved resource handle. Callers that only need
/// the handle use [`Ensured::into_value`]; callers that report what happened
/// branch on [`Ensured::was_created`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ensured<T> {
	/// The resource did not exist and was created by this call.
	Created(T),
	/// The resource already existed; the handle was looked up and reused.
	Existing(T),
}

impl<T> Ensured<T> {
	/// Borrow the resolved resource handle.
	pub fn value(&self) -> &T {
		match self {
			Ensured::Created(value) | Ensured::Existing(value) => value,
		}
	}

	/// Consume the outcome, yielding the resource handle.
	pub fn into_value(self) -> T {
		match self {
			Ensured::Created(value) | Ensured::Existing(value) => value,
		}
	}

	/// Whether this call created the resource.
	pub fn was_created(&self) -> bool {
		matches!(self, Ensured::Created(_))
	}

	/// Map the resource handle, preserving the created/existing distinction.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Ensured<U> {
		match self {
			Ensured::Created(value) => Ensured::Created(f(value)),
			Ensured::Existing(value) => Ensured::Existing(f(value)),
		}
	}
}

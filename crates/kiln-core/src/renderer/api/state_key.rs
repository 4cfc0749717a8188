// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The exact, total equality contract that pipeline descriptors are cached by.
//!
//! Descriptors are used as cache keys, so their equality has to be exact
//! (no epsilon on floats), total (reflexive even for `NaN`) and consistent with
//! their hash. [`StateKey`] provides that relation. Structs never implement it
//! by hand: `#[derive(StateKey)]` builds it from the declared field list, and
//! also emits the matching `PartialEq`, `Eq` and `Hash` impls.

use std::hash::{Hash, Hasher};

pub use kiln_macros::StateKey;

/// Exact structural equality and hashing for pipeline state.
///
/// Floating-point values compare and hash by bit pattern: a `NaN` equals
/// itself when the bits match, and `0.0` differs from `-0.0`.
pub trait StateKey {
    /// Names of the fields taking part in the comparison, in declaration order.
    ///
    /// Empty for leaf types.
    const FIELDS: &'static [&'static str] = &[];

    /// Returns `true` if `self` and `other` describe exactly the same state.
    fn state_eq(&self, other: &Self) -> bool;

    /// Feeds the state into `state`. Equal values always hash identically.
    fn state_hash<H: Hasher>(&self, state: &mut H);
}

/// Implements [`StateKey`] for types whose own `Eq` and `Hash` are already exact.
macro_rules! state_key_by_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::renderer::api::state_key::StateKey for $ty {
                #[inline]
                fn state_eq(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline]
                fn state_hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    ::std::hash::Hash::hash(self, state);
                }
            }
        )*
    };
}

pub(crate) use state_key_by_eq;

state_key_by_eq!(bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, String);

macro_rules! state_key_by_bits {
    ($($ty:ty),*) => {
        $(
            impl StateKey for $ty {
                #[inline]
                fn state_eq(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }

                #[inline]
                fn state_hash<H: Hasher>(&self, state: &mut H) {
                    self.to_bits().hash(state);
                }
            }
        )*
    };
}

state_key_by_bits!(f32, f64);

impl<T: StateKey> StateKey for Option<T> {
    fn state_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.state_eq(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn state_hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Some(value) => {
                1u8.hash(state);
                value.state_hash(state);
            }
            None => 0u8.hash(state),
        }
    }
}

// Sequences are ordered: element `i` is only ever compared with element `i`.
impl<T: StateKey> StateKey for [T] {
    fn state_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.state_eq(b))
    }

    fn state_hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.state_hash(state);
        }
    }
}

impl<T: StateKey> StateKey for Vec<T> {
    #[inline]
    fn state_eq(&self, other: &Self) -> bool {
        self.as_slice().state_eq(other.as_slice())
    }

    #[inline]
    fn state_hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().state_hash(state);
    }
}

impl<T: StateKey, const N: usize> StateKey for [T; N] {
    #[inline]
    fn state_eq(&self, other: &Self) -> bool {
        self.as_slice().state_eq(other.as_slice())
    }

    #[inline]
    fn state_hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().state_hash(state);
    }
}

impl<A: StateKey, B: StateKey> StateKey for (A, B) {
    fn state_eq(&self, other: &Self) -> bool {
        self.0.state_eq(&other.0) && self.1.state_eq(&other.1)
    }

    fn state_hash<H: Hasher>(&self, state: &mut H) {
        self.0.state_hash(state);
        self.1.state_hash(state);
    }
}

/// Asserts that overriding one (possibly nested) field of `base` breaks equality.
#[cfg(test)]
macro_rules! assert_field_sensitive {
    ($base:expr, $($field:ident).+ = $value:expr) => {{
        let base = $base;
        let mut changed = base.clone();
        changed.$($field).+ = $value;
        assert_ne!(
            base,
            changed,
            concat!("changing `", stringify!($($field).+), "` must break equality")
        );
        assert_ne!(changed, base, "equality must be symmetric");
    }};
}

#[cfg(test)]
pub(crate) use assert_field_sensitive;

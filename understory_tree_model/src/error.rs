// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::{String, ToString};

/// Errors surfaced by key lookups and model construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A key does not exist in the model.
    #[error("no node with key `{key}`")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },
    /// The node declarations do not describe a valid tree.
    #[error("invalid tree model: {0}")]
    InvalidModel(#[from] InvalidModel),
}

impl TreeError {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }
}

/// Reasons a set of node declarations is rejected at construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidModel {
    /// A branch was declared with an explicit empty children list.
    #[error("branch `{key}` has an empty children list")]
    EmptyBranch {
        /// Key of the offending node.
        key: String,
    },
    /// The same key was declared more than once.
    #[error("key `{key}` is declared more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
}

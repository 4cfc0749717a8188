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

//! Defines the error types reported by pipeline factories.
//!
//! Descriptors themselves never fail: every combination of fields is
//! representable. A backend checks the combination when it builds the
//! pipeline and reports problems through [`PipelineError`].

use crate::renderer::api::shader::ShaderProgramId;
use std::fmt;

/// An error related to the creation of a graphics pipeline.
///
/// The type is `Clone` so a pipeline cache can hand the same failure to every
/// caller that waited on one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The descriptor combines fields in a way the backend cannot build.
    InvalidConfiguration {
        /// The label of the pipeline being created, if any.
        label: Option<String>,
        /// What is wrong with the descriptor.
        reason: String,
    },
    /// The descriptor does not reference a shader program.
    MissingShaderProgram {
        /// The label of the pipeline being created, if any.
        label: Option<String>,
    },
    /// The descriptor references a shader program the backend does not know.
    UnknownShaderProgram {
        /// The ID of the shader program.
        id: ShaderProgramId,
        /// The label of the pipeline being created, if any.
        label: Option<String>,
    },
    /// A required graphics feature is not supported by the device.
    FeatureNotSupported {
        /// The label of the pipeline being created, if any.
        label: Option<String>,
        /// The name of the missing feature or limit.
        feature: String,
    },
    /// The graphics backend failed to compile the pipeline state object.
    CompilationFailed {
        /// The label of the pipeline being created, if any.
        label: Option<String>,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::InvalidConfiguration`].
    pub fn invalid(label: Option<&str>, reason: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            label: label.map(String::from),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PipelineError::FeatureNotSupported`].
    pub fn unsupported(label: Option<&str>, feature: impl Into<String>) -> Self {
        PipelineError::FeatureNotSupported {
            label: label.map(String::from),
            feature: feature.into(),
        }
    }

    /// Returns `true` for errors caused by the descriptor's contents rather than the backend.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidConfiguration { .. }
                | PipelineError::MissingShaderProgram { .. }
                | PipelineError::UnknownShaderProgram { .. }
        )
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidConfiguration { label, reason } => {
                write!(
                    f,
                    "Invalid configuration for pipeline '{}': {}",
                    label.as_deref().unwrap_or("Unknown"),
                    reason
                )
            }
            PipelineError::MissingShaderProgram { label } => {
                write!(
                    f,
                    "Pipeline '{}' has no shader program",
                    label.as_deref().unwrap_or("Unknown")
                )
            }
            PipelineError::UnknownShaderProgram { id, label } => {
                write!(
                    f,
                    "Unknown shader program {:?} for pipeline '{}'",
                    id,
                    label.as_deref().unwrap_or("Unknown")
                )
            }
            PipelineError::FeatureNotSupported { label, feature } => {
                write!(
                    f,
                    "Feature not supported for pipeline '{}': {}",
                    label.as_deref().unwrap_or("Unknown"),
                    feature
                )
            }
            PipelineError::CompilationFailed { label, details } => {
                write!(
                    f,
                    "Pipeline compilation failed for '{}': {}",
                    label.as_deref().unwrap_or("Unknown"),
                    details
                )
            }
            PipelineError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

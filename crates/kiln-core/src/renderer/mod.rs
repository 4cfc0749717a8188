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

//! Provides the public, backend-agnostic pipeline contracts.
//!
//! This module defines the "common language" shared by callers and backends. It
//! contains the descriptor data model (like [`GraphicsPipelineDesc`]), the
//! [`StateKey`] equality contract used for caching, the abstract `traits` a
//! backend implements (like [`PipelineFactory`]), and the error types backends
//! report.
//!
//! This module defines the 'what' of a pipeline, while the 'how' is handled by a
//! concrete backend (e.g. the headless device in `kiln-infra`) which implements
//! these traits.

pub mod api;
pub mod cache;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::cache::{PipelineCache, PipelineCacheSettings, PipelineCacheStats};
pub use self::error::PipelineError;
pub use self::traits::PipelineFactory;

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

use crate::renderer::api::{GraphicsPipeline, GraphicsPipelineDesc};
use crate::renderer::error::PipelineError;
use std::fmt::Debug;
use std::sync::Arc;

/// A backend that turns descriptors into pipeline objects.
///
/// Implementations own all validation: any cross-field consistency check
/// (attachment counts, vertex layouts, device limits) happens here, never in
/// the descriptor types.
pub trait PipelineFactory: Send + Sync + Debug {
    /// The backend's pipeline object type.
    type Pipeline: GraphicsPipeline;

    /// Creates a graphics pipeline from the provided descriptor.
    /// ## Arguments
    /// * `descriptor` - A reference to a `GraphicsPipelineDesc` containing the pipeline configuration.
    /// ## Returns
    /// A `Result` containing the created pipeline, which owns a copy of `descriptor`.
    /// ## Errors
    /// * `PipelineError` - If the descriptor is invalid for this backend or compilation fails.
    fn create_graphics_pipeline(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<Self::Pipeline, PipelineError>;
}

impl<F: PipelineFactory + ?Sized> PipelineFactory for &F {
    type Pipeline = F::Pipeline;

    fn create_graphics_pipeline(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<Self::Pipeline, PipelineError> {
        (**self).create_graphics_pipeline(descriptor)
    }
}

impl<F: PipelineFactory + ?Sized> PipelineFactory for Arc<F> {
    type Pipeline = F::Pipeline;

    fn create_graphics_pipeline(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<Self::Pipeline, PipelineError> {
        (**self).create_graphics_pipeline(descriptor)
    }
}

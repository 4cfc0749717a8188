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

//! Pipeline objects: a finalized descriptor bound to a backend resource.

use super::descriptor::GraphicsPipelineDesc;
use std::fmt::Debug;
use std::sync::Arc;

/// A compiled graphics pipeline, as seen by backend-agnostic code.
///
/// The trait is object safe: pipelines from any backend can be held as
/// `Box<dyn GraphicsPipeline>` or `Arc<dyn GraphicsPipeline>` and dropped
/// through that pointer.
pub trait GraphicsPipeline: Send + Sync + Debug {
    /// Returns the descriptor this pipeline was built from.
    ///
    /// The descriptor never changes after construction.
    fn descriptor(&self) -> &GraphicsPipelineDesc;
}

/// A pipeline object: one finalized descriptor plus the backend handle built from it.
///
/// The backend handle lives alongside the descriptor. Dropping a `Pipeline`
/// drops the descriptor first, then the handle, whose own `Drop` releases the
/// GPU resource.
#[derive(Debug)]
pub struct Pipeline<H> {
    descriptor: GraphicsPipelineDesc,
    handle: H,
}

impl<H> Pipeline<H> {
    /// Binds `descriptor` to a backend `handle`. The descriptor is stored as-is.
    pub fn new(descriptor: GraphicsPipelineDesc, handle: H) -> Self {
        Self { descriptor, handle }
    }

    /// Returns the descriptor this pipeline was built from.
    pub fn descriptor(&self) -> &GraphicsPipelineDesc {
        &self.descriptor
    }

    /// Returns the backend resource handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Splits the pipeline back into its descriptor and backend handle.
    pub fn into_parts(self) -> (GraphicsPipelineDesc, H) {
        (self.descriptor, self.handle)
    }
}

impl<H: Send + Sync + Debug> GraphicsPipeline for Pipeline<H> {
    fn descriptor(&self) -> &GraphicsPipelineDesc {
        &self.descriptor
    }
}

impl<P: GraphicsPipeline + ?Sized> GraphicsPipeline for Arc<P> {
    fn descriptor(&self) -> &GraphicsPipelineDesc {
        (**self).descriptor()
    }
}

impl<P: GraphicsPipeline + ?Sized> GraphicsPipeline for Box<P> {
    fn descriptor(&self) -> &GraphicsPipelineDesc {
        (**self).descriptor()
    }
}

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

use super::settings::HeadlessDeviceSettings;
use super::validation::validate_descriptor;
use kiln_core::renderer::{
    GraphicsPipelineDesc, Pipeline, PipelineError, PipelineFactory, ShaderProgramId,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An opaque identifier for a pipeline created by a [`HeadlessDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadlessPipelineId(pub usize);

impl fmt::Display for HeadlessPipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeadlessPipeline#{}", self.0)
    }
}

/// The backend resource behind a headless pipeline.
///
/// Dropping the handle releases the pipeline from the device's live count.
#[derive(Debug)]
pub struct HeadlessPipelineHandle {
    id: HeadlessPipelineId,
    live_pipelines: Arc<AtomicUsize>,
}

impl HeadlessPipelineHandle {
    /// Returns the device-assigned id of this pipeline.
    pub fn id(&self) -> HeadlessPipelineId {
        self.id
    }
}

impl Drop for HeadlessPipelineHandle {
    fn drop(&mut self) {
        self.live_pipelines.fetch_sub(1, Ordering::AcqRel);
        log::trace!("HeadlessDevice: Released {}", self.id);
    }
}

/// A pipeline object produced by a [`HeadlessDevice`].
pub type HeadlessPipeline = Pipeline<HeadlessPipelineHandle>;

/// The shared state behind every clone of a [`HeadlessDevice`].
#[derive(Debug)]
struct HeadlessDeviceInternal {
    settings: HeadlessDeviceSettings,
    shader_programs: Mutex<HashMap<ShaderProgramId, String>>,
    next_shader_program_id: AtomicUsize,
    next_pipeline_id: AtomicUsize,
    created_pipelines: AtomicUsize,
    live_pipelines: Arc<AtomicUsize>,
}

impl HeadlessDeviceInternal {
    // The registry only maps ids to labels, so a panic mid-update cannot leave it inconsistent.
    fn shader_programs(&self) -> MutexGuard<'_, HashMap<ShaderProgramId, String>> {
        self.shader_programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A clonable, thread-safe device that builds pipelines without a GPU.
///
/// Clones share one shader program registry and one set of pipeline counters.
#[derive(Clone, Debug)]
pub struct HeadlessDevice {
    internal: Arc<HeadlessDeviceInternal>,
}

impl HeadlessDevice {
    /// Creates a device with the given capabilities.
    pub fn new(settings: HeadlessDeviceSettings) -> Self {
        log::debug!("HeadlessDevice: Created with {settings:?}");
        Self {
            internal: Arc::new(HeadlessDeviceInternal {
                settings,
                shader_programs: Mutex::new(HashMap::new()),
                next_shader_program_id: AtomicUsize::new(0),
                next_pipeline_id: AtomicUsize::new(0),
                created_pipelines: AtomicUsize::new(0),
                live_pipelines: Arc::new(AtomicUsize::new(0)),
            }),
        }
    }

    /// Returns the capabilities this device was created with.
    pub fn settings(&self) -> &HeadlessDeviceSettings {
        &self.internal.settings
    }

    /// Registers a shader program and returns the id descriptors use to reference it.
    pub fn register_shader_program(&self, label: impl Into<String>) -> ShaderProgramId {
        let id = ShaderProgramId(
            self.internal
                .next_shader_program_id
                .fetch_add(1, Ordering::Relaxed),
        );
        let label = label.into();
        log::debug!("HeadlessDevice: Registered {id} ({label})");
        self.internal.shader_programs().insert(id, label);
        id
    }

    /// Removes a shader program. Pipelines already built from it stay valid.
    ///
    /// Returns `true` if the program was registered.
    pub fn unregister_shader_program(&self, id: ShaderProgramId) -> bool {
        let removed = self.internal.shader_programs().remove(&id).is_some();
        if removed {
            log::debug!("HeadlessDevice: Unregistered {id}");
        }
        removed
    }

    /// Returns the label a shader program was registered with.
    pub fn shader_program_label(&self, id: ShaderProgramId) -> Option<String> {
        self.internal.shader_programs().get(&id).cloned()
    }

    /// Returns the number of pipelines created by this device that are still alive.
    pub fn live_pipeline_count(&self) -> usize {
        self.internal.live_pipelines.load(Ordering::Acquire)
    }

    /// Returns the total number of pipelines this device has created.
    pub fn created_pipeline_count(&self) -> usize {
        self.internal.created_pipelines.load(Ordering::Acquire)
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(HeadlessDeviceSettings::default())
    }
}

impl PipelineFactory for HeadlessDevice {
    type Pipeline = HeadlessPipeline;

    fn create_graphics_pipeline(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<Self::Pipeline, PipelineError> {
        log::debug!(
            "HeadlessDevice: Creating graphics pipeline with label: {:?}",
            descriptor.label()
        );

        let validation = {
            let programs = self.internal.shader_programs();
            validate_descriptor(descriptor, &self.internal.settings, |id| {
                programs.contains_key(&id)
            })
        };
        if let Err(err) = validation {
            log::warn!("HeadlessDevice: {err}");
            return Err(err);
        }

        let id = HeadlessPipelineId(self.internal.next_pipeline_id.fetch_add(1, Ordering::Relaxed));
        self.internal
            .created_pipelines
            .fetch_add(1, Ordering::AcqRel);
        self.internal.live_pipelines.fetch_add(1, Ordering::AcqRel);

        Ok(Pipeline::new(
            descriptor.clone(),
            HeadlessPipelineHandle {
                id,
                live_pipelines: Arc::clone(&self.internal.live_pipelines),
            },
        ))
    }
}

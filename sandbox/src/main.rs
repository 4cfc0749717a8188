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

// Kiln Sandbox
// Builds a handful of pipelines through a cache and reports what was shared.

use std::mem;

use anyhow::Result;
use kiln_core::renderer::{
    AttachmentDesc, CullMode, GraphicsPipelineDesc, PipelineCache, PipelineCacheSettings,
    SampleCount, ShaderProgramId, TextureFormat, VertexAttributeDesc, VertexBufferDesc,
    VertexFormat, VertexStepFunction,
};
use kiln_infra::graphics::headless::{HeadlessDevice, HeadlessDeviceSettings};

#[repr(C)]
#[allow(dead_code)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

impl Vertex {
    fn buffer_desc() -> VertexBufferDesc {
        VertexBufferDesc {
            binding_index: 0,
            vertex_attributes: vec![
                // location 0: position
                VertexAttributeDesc {
                    format: VertexFormat::Float32x3,
                    offset: 0,
                    shader_bind_location: 0,
                },
                // location 1: color
                VertexAttributeDesc {
                    format: VertexFormat::Float32x3,
                    offset: mem::size_of::<[f32; 3]>() as u32,
                    shader_bind_location: 1,
                },
            ],
            vertex_step_function: VertexStepFunction::PerVertex,
            vertex_stride: mem::size_of::<Vertex>() as u32,
        }
    }
}

fn opaque_pipeline(program: ShaderProgramId) -> GraphicsPipelineDesc {
    GraphicsPipelineDesc::default()
        .with_debug_name("opaque")
        .with_shader_program(program)
        .with_vertex_buffer(Vertex::buffer_desc())
        .with_color_attachment(AttachmentDesc::color(TextureFormat::Bgra8UnormSrgb))
        .with_depth_attachment(AttachmentDesc::depth(TextureFormat::Depth24PlusStencil8))
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let device = HeadlessDevice::new(HeadlessDeviceSettings::default());
    let lit = device.register_shader_program("lit");
    let cache = PipelineCache::with_settings(device.clone(), PipelineCacheSettings::default());

    let opaque = opaque_pipeline(lit);

    let mut double_sided = opaque.clone().with_debug_name("double_sided");
    double_sided.rasterization_state.cull_mode = CullMode::None;

    let mut transparent = opaque.clone().with_debug_name("transparent");
    transparent.color_attachment_descs[0] = AttachmentDesc::color(TextureFormat::Bgra8UnormSrgb)
        .with_alpha_blending();
    transparent.depth_state.depth_write_enabled = false;

    let mut msaa = opaque.clone().with_debug_name("opaque_msaa");
    msaa.multi_sample_state.sample_count = SampleCount::X4;

    // Many draws ask for the same few pipelines.
    let requests = [&opaque, &double_sided, &opaque, &transparent, &msaa, &opaque];
    for desc in requests {
        let pipeline = cache.get_or_create(desc)?;
        log::info!(
            "Draw with '{}' -> {}",
            desc.debug_name,
            pipeline.handle().id()
        );
    }

    // A descriptor the device cannot build is reported, not cached.
    let mut wide_lines = opaque.clone().with_debug_name("wide_lines");
    wide_lines.rasterization_state.line_width = 4.0;
    if let Err(err) = cache.get_or_create(&wide_lines) {
        log::info!("Rejected as expected: {err}");
    }

    let stats = cache.stats();
    log::info!(
        "Cache: {} hits, {} misses, {} failures, {} entries",
        stats.hits,
        stats.misses,
        stats.failures,
        stats.entries
    );
    log::info!(
        "Device: {} pipelines created, {} alive",
        device.created_pipeline_count(),
        device.live_pipeline_count()
    );

    cache.clear();
    log::info!(
        "After clearing the cache: {} alive",
        device.live_pipeline_count()
    );
    Ok(())
}

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

//! State descriptors for the pipeline.
//!
//! Each type is a plain value with a `Default` matching the common case, so
//! callers only override the fields they care about. Equality and hashing are
//! derived from the field list through [`StateKey`].

use super::enums::*;
use crate::renderer::api::state_key::StateKey;
use crate::renderer::api::util::{SampleCount, ShaderStageFlags};

/// Describes a single vertex attribute within a vertex buffer.
#[derive(Debug, Clone, StateKey)]
pub struct VertexAttributeDesc {
    /// The format of the attribute's data.
    pub format: VertexFormat,
    /// The byte offset of this attribute from the start of the vertex.
    pub offset: u32,
    /// The input location of this attribute in the vertex shader (e.g., `layout(location = 0)`).
    pub shader_bind_location: u32,
}

impl Default for VertexAttributeDesc {
    fn default() -> Self {
        Self {
            format: VertexFormat::Float32x4,
            offset: 0,
            shader_bind_location: 0,
        }
    }
}

/// Describes the memory layout of a single vertex buffer.
///
/// Attribute order is significant: it is the order in which the bindings were declared.
#[derive(Debug, Clone, StateKey)]
pub struct VertexBufferDesc {
    /// The binding slot of this buffer.
    pub binding_index: u32,
    /// A list of attributes contained within each element of the buffer.
    pub vertex_attributes: Vec<VertexAttributeDesc>,
    /// How often the vertex buffer is advanced.
    pub vertex_step_function: VertexStepFunction,
    /// The byte distance between consecutive elements in the buffer.
    pub vertex_stride: u32,
}

impl Default for VertexBufferDesc {
    fn default() -> Self {
        Self {
            binding_index: 0,
            vertex_attributes: Vec::new(),
            vertex_step_function: VertexStepFunction::PerVertex,
            vertex_stride: 0,
        }
    }
}

/// Describes the multisampling state for a graphics pipeline.
#[derive(Debug, Clone, StateKey)]
pub struct MultiSampleState {
    /// If `true`, multisample rasterization is enabled.
    pub multi_sample_enable: bool,
    /// If `true`, the fragment's alpha value determines sample coverage.
    pub alpha_to_coverage_enable: bool,
    /// If `true`, the fragment's alpha is forced to one after coverage is computed.
    pub alpha_to_one_enable: bool,
    /// The number of samples per pixel.
    pub sample_count: SampleCount,
}

impl Default for MultiSampleState {
    fn default() -> Self {
        Self {
            multi_sample_enable: true,
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
            sample_count: SampleCount::X1,
        }
    }
}

/// Describes the state for rasterization.
#[derive(Debug, Clone, StateKey)]
pub struct RasterizationState {
    /// The rasterization mode for polygons.
    pub polygon_mode: PolygonMode,
    /// The width of rasterized lines.
    pub line_width: f32,
    /// The face culling mode.
    pub cull_mode: CullMode,
    /// The vertex winding order that determines the "front" face of a triangle.
    pub winding: Winding,
    /// If `false`, primitives are discarded before rasterization.
    pub rasterizer_enabled: bool,
    /// If `true`, fragment depth is clamped instead of clipped.
    pub depth_clamp_enabled: bool,
    /// The `(near, far)` mapping of normalized device depth.
    pub depth_range: (f32, f32),
    /// If `true`, enables conservative rasterization.
    pub conservative_raster: bool,
    /// The number of user clip distances the vertex stage writes.
    pub num_clip_distances: u32,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            polygon_mode: PolygonMode::Fill,
            line_width: 1.0,
            cull_mode: CullMode::Back,
            winding: Winding::CounterClockwise,
            rasterizer_enabled: true,
            depth_clamp_enabled: false,
            depth_range: (0.0, 1.0),
            conservative_raster: false,
            num_clip_distances: 0,
        }
    }
}

/// Describes the stencil test and operations for a single face of a primitive.
#[derive(Debug, Clone, StateKey)]
pub struct StencilState {
    /// The comparison function used for the stencil test.
    pub compare_fn: CompareFunction,
    /// The value the stencil buffer is compared against.
    pub reference_value: u32,
    /// The operation to perform if the stencil test fails.
    pub stencil_fail_op: StencilOp,
    /// The operation to perform if the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOp,
    /// The operation to perform if both the stencil and depth tests pass.
    pub depth_stencil_pass_op: StencilOp,
    /// A bitmask for reading from the stencil buffer.
    pub read_mask: u32,
    /// A bitmask for writing to the stencil buffer.
    pub write_mask: u32,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            compare_fn: CompareFunction::Always,
            reference_value: 0,
            stencil_fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            depth_stencil_pass_op: StencilOp::Keep,
            read_mask: 0xffff_ffff,
            write_mask: 0xffff_ffff,
        }
    }
}

/// Describes the state for depth and stencil testing.
///
/// `stencil_front` and `stencil_back` are independent; each is only ever
/// compared with its own counterpart.
#[derive(Debug, Clone, StateKey)]
pub struct DepthStencilState {
    /// If `true`, fragments are tested against the depth buffer.
    pub depth_test_enabled: bool,
    /// If `true`, depth values will be written to the depth buffer.
    pub depth_write_enabled: bool,
    /// The comparison function used for the depth test.
    pub depth_compare_fn: CompareFunction,
    /// If `true`, the depth bias below is applied.
    pub depth_bias_enabled: bool,
    /// A constant value added to the depth of each fragment.
    pub depth_bias_constant_factor: f32,
    /// A factor that scales with the fragment's depth slope.
    pub depth_bias_slope_factor: f32,
    /// If `true`, the stencil test is performed.
    pub stencil_test_enabled: bool,
    /// The stencil state for front-facing primitives.
    pub stencil_front: StencilState,
    /// The stencil state for back-facing primitives.
    pub stencil_back: StencilState,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test_enabled: true,
            depth_write_enabled: true,
            depth_compare_fn: CompareFunction::Less,
            depth_bias_enabled: false,
            depth_bias_constant_factor: 0.0,
            depth_bias_slope_factor: 0.0,
            stencil_test_enabled: false,
            stencil_front: StencilState::default(),
            stencil_back: StencilState::default(),
        }
    }
}

/// Describes an inline constant-buffer binding visible to some shader stages.
#[derive(Debug, Clone, StateKey)]
pub struct ShaderConstantsDesc {
    /// The size of the constant block in bytes.
    pub byte_size: u32,
    /// The stages that can read the constants.
    pub stage_usage: ShaderStageFlags,
}

impl Default for ShaderConstantsDesc {
    fn default() -> Self {
        Self {
            byte_size: 0,
            stage_usage: ShaderStageFlags::FRAGMENT,
        }
    }
}

/// Fixed tessellation factors, used when the pipeline does not compute them in a shader.
#[derive(Debug, Clone, Default, StateKey)]
pub struct TessellationLevel {
    /// Inner tessellation factors.
    pub inner_tess_level: [f32; 2],
    /// Outer tessellation factors.
    pub outer_tess_level: [f32; 4],
}

/// Describes the tessellation stage.
#[derive(Debug, Clone, Default, StateKey)]
pub struct TessellationState {
    /// The kind of patch being tessellated.
    pub patch_type: PatchType,
    /// The number of control points per patch.
    pub primitive_index_size: u32,
    /// Fixed tessellation factors.
    pub tessellation_level: TessellationLevel,
}

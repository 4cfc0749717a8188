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

//! Main pipeline descriptor.

use super::attachment::AttachmentDesc;
use super::enums::PrimitiveType;
use super::state::*;
use crate::renderer::api::shader::ShaderProgramId;
use crate::renderer::api::state_key::StateKey;

/// A complete descriptor for a graphics pipeline.
///
/// This struct aggregates all the state needed by a backend to build a
/// pipeline object. Two descriptors are equal only if every field is equal,
/// recursively, which makes the descriptor usable as an exact cache key.
///
/// `debug_name` takes part in equality: two descriptors differing only in
/// their label are distinct and will be compiled separately.
#[derive(Debug, Clone, StateKey)]
pub struct GraphicsPipelineDesc {
    /// A debug label.
    pub debug_name: String,
    /// The topology of the primitives.
    pub primitive_type: PrimitiveType,
    /// The compiled shader program, owned by the shader subsystem.
    pub shader_program: Option<ShaderProgramId>,
    /// The state for depth and stencil testing.
    pub depth_state: DepthStencilState,
    /// The multisampling state.
    pub multi_sample_state: MultiSampleState,
    /// The rasterization state.
    pub rasterization_state: RasterizationState,
    /// The layout of the vertex buffers, in binding declaration order.
    pub vertex_buffers: Vec<VertexBufferDesc>,
    /// The color targets this pipeline renders to, in slot order.
    pub color_attachment_descs: Vec<AttachmentDesc>,
    /// The depth/stencil target this pipeline renders to.
    pub depth_attachment_desc: AttachmentDesc,
    /// If `true`, multisampled attachments are resolved at the end of the pass.
    pub resolve_attachments: bool,
    /// The inline constant blocks the pipeline's shaders read.
    pub shader_constants_desc: Vec<ShaderConstantsDesc>,
    /// The tessellation stage configuration.
    pub tessellation_state: TessellationState,
}

impl Default for GraphicsPipelineDesc {
    fn default() -> Self {
        Self {
            debug_name: String::new(),
            primitive_type: PrimitiveType::TriangleList,
            shader_program: None,
            depth_state: DepthStencilState::default(),
            multi_sample_state: MultiSampleState::default(),
            rasterization_state: RasterizationState::default(),
            vertex_buffers: Vec::new(),
            color_attachment_descs: Vec::new(),
            depth_attachment_desc: AttachmentDesc::default(),
            resolve_attachments: false,
            shader_constants_desc: Vec::new(),
            tessellation_state: TessellationState::default(),
        }
    }
}

impl GraphicsPipelineDesc {
    /// Sets the debug label.
    pub fn with_debug_name(mut self, name: impl Into<String>) -> Self {
        self.debug_name = name.into();
        self
    }

    /// Sets the primitive topology.
    pub fn with_primitive_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.primitive_type = primitive_type;
        self
    }

    /// Sets the shader program.
    pub fn with_shader_program(mut self, program: ShaderProgramId) -> Self {
        self.shader_program = Some(program);
        self
    }

    /// Replaces the depth/stencil state.
    pub fn with_depth_state(mut self, state: DepthStencilState) -> Self {
        self.depth_state = state;
        self
    }

    /// Replaces the multisampling state.
    pub fn with_multi_sample_state(mut self, state: MultiSampleState) -> Self {
        self.multi_sample_state = state;
        self
    }

    /// Replaces the rasterization state.
    pub fn with_rasterization_state(mut self, state: RasterizationState) -> Self {
        self.rasterization_state = state;
        self
    }

    /// Appends a vertex buffer layout.
    pub fn with_vertex_buffer(mut self, buffer: VertexBufferDesc) -> Self {
        self.vertex_buffers.push(buffer);
        self
    }

    /// Appends a color attachment.
    pub fn with_color_attachment(mut self, attachment: AttachmentDesc) -> Self {
        self.color_attachment_descs.push(attachment);
        self
    }

    /// Sets the depth/stencil attachment.
    pub fn with_depth_attachment(mut self, attachment: AttachmentDesc) -> Self {
        self.depth_attachment_desc = attachment;
        self
    }

    /// Enables or disables resolving of multisampled attachments.
    pub fn with_resolve_attachments(mut self, resolve: bool) -> Self {
        self.resolve_attachments = resolve;
        self
    }

    /// Appends an inline constant block.
    pub fn with_shader_constants(mut self, constants: ShaderConstantsDesc) -> Self {
        self.shader_constants_desc.push(constants);
        self
    }

    /// Replaces the tessellation state.
    pub fn with_tessellation_state(mut self, state: TessellationState) -> Self {
        self.tessellation_state = state;
        self
    }

    /// Returns the debug label, or `None` if it is empty.
    pub fn label(&self) -> Option<&str> {
        if self.debug_name.is_empty() {
            None
        } else {
            Some(&self.debug_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::pipeline::enums::*;
    use crate::renderer::api::state_key::assert_field_sensitive;
    use crate::renderer::api::util::{SampleCount, ShaderStageFlags, TextureFormat};
    use std::collections::HashMap;

    fn position_buffer() -> VertexBufferDesc {
        VertexBufferDesc {
            binding_index: 0,
            vertex_attributes: vec![VertexAttributeDesc {
                format: VertexFormat::Float32x3,
                offset: 0,
                shader_bind_location: 0,
            }],
            vertex_step_function: VertexStepFunction::PerVertex,
            vertex_stride: 12,
        }
    }

    fn instance_buffer() -> VertexBufferDesc {
        VertexBufferDesc {
            binding_index: 1,
            vertex_attributes: vec![VertexAttributeDesc {
                format: VertexFormat::Float32x4,
                offset: 0,
                shader_bind_location: 1,
            }],
            vertex_step_function: VertexStepFunction::PerInstance,
            vertex_stride: 16,
        }
    }

    fn sample_desc() -> GraphicsPipelineDesc {
        GraphicsPipelineDesc::default()
            .with_debug_name("mesh")
            .with_shader_program(ShaderProgramId(3))
            .with_vertex_buffer(position_buffer())
            .with_vertex_buffer(instance_buffer())
            .with_color_attachment(AttachmentDesc::color(TextureFormat::Rgba8Unorm))
            .with_depth_attachment(AttachmentDesc::depth(TextureFormat::Depth32Float))
    }

    #[test]
    fn test_default_graphics_pipeline_desc() {
        let desc = GraphicsPipelineDesc::default();
        assert_eq!(desc.primitive_type, PrimitiveType::TriangleList);
        assert!(!desc.resolve_attachments);
        assert!(desc.shader_program.is_none());
        assert!(desc.vertex_buffers.is_empty());
        assert!(desc.label().is_none());
    }

    #[test]
    #[allow(clippy::eq_op)]
    fn equality_is_reflexive_and_symmetric() {
        let a = sample_desc();
        let b = sample_desc();
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);

        let c = sample_desc().with_primitive_type(PrimitiveType::LineList);
        assert_ne!(a, c);
        assert_ne!(c, a);
    }

    #[test]
    fn every_aggregate_field_is_compared() {
        let base = sample_desc();
        assert_field_sensitive!(base.clone(), debug_name = "other".to_string());
        assert_field_sensitive!(base.clone(), primitive_type = PrimitiveType::PointList);
        assert_field_sensitive!(base.clone(), shader_program = Some(ShaderProgramId(4)));
        assert_field_sensitive!(base.clone(), shader_program = None);
        assert_field_sensitive!(base.clone(), depth_state.depth_write_enabled = false);
        assert_field_sensitive!(base.clone(), depth_state.stencil_front.read_mask = 1);
        assert_field_sensitive!(base.clone(), depth_state.stencil_back.read_mask = 1);
        assert_field_sensitive!(base.clone(), multi_sample_state.sample_count = SampleCount::X8);
        assert_field_sensitive!(base.clone(), rasterization_state.cull_mode = CullMode::Front);
        assert_field_sensitive!(base.clone(), vertex_buffers = vec![position_buffer()]);
        assert_field_sensitive!(base.clone(), color_attachment_descs = Vec::new());
        assert_field_sensitive!(
            base.clone(),
            depth_attachment_desc = AttachmentDesc::depth(TextureFormat::Depth24PlusStencil8)
        );
        assert_field_sensitive!(base.clone(), resolve_attachments = true);
        assert_field_sensitive!(
            base.clone(),
            shader_constants_desc = vec![ShaderConstantsDesc {
                byte_size: 16,
                stage_usage: ShaderStageFlags::VERTEX,
            }]
        );
        assert_field_sensitive!(base, tessellation_state.primitive_index_size = 4);
    }

    #[test]
    fn field_list_is_complete() {
        assert_eq!(
            GraphicsPipelineDesc::FIELDS,
            &[
                "debug_name",
                "primitive_type",
                "shader_program",
                "depth_state",
                "multi_sample_state",
                "rasterization_state",
                "vertex_buffers",
                "color_attachment_descs",
                "depth_attachment_desc",
                "resolve_attachments",
                "shader_constants_desc",
                "tessellation_state",
            ]
        );
    }

    #[test]
    fn debug_name_participates_in_equality() {
        let a = sample_desc().with_debug_name("opaque");
        let b = sample_desc().with_debug_name("opaque_copy");
        assert_ne!(a, b);
    }

    #[test]
    fn vertex_buffer_order_is_significant() {
        let a = GraphicsPipelineDesc::default()
            .with_vertex_buffer(position_buffer())
            .with_vertex_buffer(instance_buffer());
        let b = GraphicsPipelineDesc::default()
            .with_vertex_buffer(instance_buffer())
            .with_vertex_buffer(position_buffer());
        assert_ne!(a, b);
    }

    #[test]
    fn only_cull_mode_changed_breaks_equality() {
        let a = sample_desc();
        let mut b = a.clone();
        b.rasterization_state.cull_mode = CullMode::None;
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn identical_descriptors_with_empty_vertex_buffers_are_equal() {
        let c = GraphicsPipelineDesc::default().with_debug_name("fullscreen");
        let d = GraphicsPipelineDesc::default().with_debug_name("fullscreen");
        assert!(c.vertex_buffers.is_empty());
        assert_eq!(c, d);
    }

    #[test]
    fn equal_descriptors_share_a_cache_slot() {
        let mut cache: HashMap<GraphicsPipelineDesc, u32> = HashMap::new();
        cache.insert(sample_desc(), 1);
        cache.insert(sample_desc(), 2);
        cache.insert(sample_desc().with_debug_name("other"), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&sample_desc()), Some(&2));
    }
}

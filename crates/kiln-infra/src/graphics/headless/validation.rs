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

//! Descriptor checks performed before a headless pipeline is created.
//!
//! The descriptor types accept any combination of field values. Everything
//! a real driver would reject is caught here instead.

use super::HeadlessDeviceSettings;
use kiln_core::renderer::{
    GraphicsPipelineDesc, PipelineError, PrimitiveType, SampleCount, ShaderProgramId,
};
use std::collections::HashSet;

/// Checks `descriptor` against the device `settings`.
///
/// `is_known_program` reports whether a shader program id is registered with the device.
/// ## Errors
/// * `PipelineError::MissingShaderProgram` - If no shader program is set.
/// * `PipelineError::UnknownShaderProgram` - If the shader program is not registered.
/// * `PipelineError::FeatureNotSupported` - If the descriptor needs a feature the device lacks.
/// * `PipelineError::InvalidConfiguration` - For any inconsistent combination of fields.
pub fn validate_descriptor<F>(
    descriptor: &GraphicsPipelineDesc,
    settings: &HeadlessDeviceSettings,
    is_known_program: F,
) -> Result<(), PipelineError>
where
    F: Fn(ShaderProgramId) -> bool,
{
    let label = descriptor.label();

    let program = descriptor
        .shader_program
        .ok_or_else(|| PipelineError::MissingShaderProgram {
            label: label.map(String::from),
        })?;
    if !is_known_program(program) {
        return Err(PipelineError::UnknownShaderProgram {
            id: program,
            label: label.map(String::from),
        });
    }

    validate_vertex_input(descriptor, settings)?;
    validate_multisampling(descriptor, settings)?;
    validate_attachments(descriptor, settings)?;
    validate_rasterization(descriptor, settings)?;
    validate_tessellation(descriptor, settings)?;
    Ok(())
}

fn validate_vertex_input(
    descriptor: &GraphicsPipelineDesc,
    settings: &HeadlessDeviceSettings,
) -> Result<(), PipelineError> {
    let label = descriptor.label();
    let buffers = &descriptor.vertex_buffers;

    if buffers.len() > settings.max_vertex_buffers as usize {
        return Err(PipelineError::invalid(
            label,
            format!(
                "{} vertex buffers exceed the device limit of {}",
                buffers.len(),
                settings.max_vertex_buffers
            ),
        ));
    }

    let attribute_count: usize = buffers.iter().map(|b| b.vertex_attributes.len()).sum();
    if attribute_count > settings.max_vertex_attributes as usize {
        return Err(PipelineError::invalid(
            label,
            format!(
                "{} vertex attributes exceed the device limit of {}",
                attribute_count, settings.max_vertex_attributes
            ),
        ));
    }

    let mut bindings = HashSet::with_capacity(buffers.len());
    let mut locations = HashSet::with_capacity(attribute_count);
    for buffer in buffers {
        if !bindings.insert(buffer.binding_index) {
            return Err(PipelineError::invalid(
                label,
                format!("vertex binding index {} is used twice", buffer.binding_index),
            ));
        }

        if buffer.vertex_stride == 0 && !buffer.vertex_attributes.is_empty() {
            return Err(PipelineError::invalid(
                label,
                format!(
                    "vertex buffer {} has attributes but a zero stride",
                    buffer.binding_index
                ),
            ));
        }

        for attribute in &buffer.vertex_attributes {
            if !locations.insert(attribute.shader_bind_location) {
                return Err(PipelineError::invalid(
                    label,
                    format!(
                        "shader location {} is bound twice",
                        attribute.shader_bind_location
                    ),
                ));
            }

            let end = attribute.offset.saturating_add(attribute.format.size());
            if end > buffer.vertex_stride {
                return Err(PipelineError::invalid(
                    label,
                    format!(
                        "attribute at location {} ({:?} at offset {}) overruns the stride of {} bytes",
                        attribute.shader_bind_location,
                        attribute.format,
                        attribute.offset,
                        buffer.vertex_stride
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn validate_multisampling(
    descriptor: &GraphicsPipelineDesc,
    settings: &HeadlessDeviceSettings,
) -> Result<(), PipelineError> {
    let label = descriptor.label();
    let state = &descriptor.multi_sample_state;

    if state.sample_count > SampleCount::X1 && !state.multi_sample_enable {
        return Err(PipelineError::invalid(
            label,
            format!(
                "sample count {} requires multisampling to be enabled",
                state.sample_count.count()
            ),
        ));
    }
    if state.sample_count > settings.max_sample_count {
        return Err(PipelineError::unsupported(
            label,
            format!("sample count {}", state.sample_count.count()),
        ));
    }
    if descriptor.resolve_attachments && state.sample_count == SampleCount::X1 {
        return Err(PipelineError::invalid(
            label,
            "resolve attachments require a multisampled pipeline",
        ));
    }
    Ok(())
}

fn validate_attachments(
    descriptor: &GraphicsPipelineDesc,
    settings: &HeadlessDeviceSettings,
) -> Result<(), PipelineError> {
    let label = descriptor.label();
    let colors = &descriptor.color_attachment_descs;

    if colors.len() > settings.max_color_attachments as usize {
        return Err(PipelineError::invalid(
            label,
            format!(
                "{} color attachments exceed the device limit of {}",
                colors.len(),
                settings.max_color_attachments
            ),
        ));
    }

    for (index, attachment) in colors.iter().enumerate() {
        if let Some(format) = attachment.format.filter(|f| f.is_depth()) {
            return Err(PipelineError::invalid(
                label,
                format!("color attachment {index} uses depth format {format:?}"),
            ));
        }
    }

    if let Some(format) = descriptor
        .depth_attachment_desc
        .format
        .filter(|f| !f.is_depth())
    {
        return Err(PipelineError::invalid(
            label,
            format!("depth attachment uses color format {format:?}"),
        ));
    }
    Ok(())
}

fn validate_rasterization(
    descriptor: &GraphicsPipelineDesc,
    settings: &HeadlessDeviceSettings,
) -> Result<(), PipelineError> {
    let label = descriptor.label();
    let state = &descriptor.rasterization_state;

    if state.line_width != 1.0 && !settings.wide_lines {
        return Err(PipelineError::unsupported(label, "wide_lines"));
    }
    if state.conservative_raster && !settings.conservative_rasterization {
        return Err(PipelineError::unsupported(
            label,
            "conservative_rasterization",
        ));
    }
    if state.depth_clamp_enabled && !settings.depth_clamp {
        return Err(PipelineError::unsupported(label, "depth_clamp"));
    }

    let (near, far) = state.depth_range;
    let unit = 0.0..=1.0;
    if !unit.contains(&near) || !unit.contains(&far) {
        return Err(PipelineError::invalid(
            label,
            format!("depth range ({near}, {far}) must lie within [0, 1]"),
        ));
    }
    if near > far {
        return Err(PipelineError::invalid(
            label,
            format!("depth range near ({near}) is greater than far ({far})"),
        ));
    }
    Ok(())
}

fn validate_tessellation(
    descriptor: &GraphicsPipelineDesc,
    settings: &HeadlessDeviceSettings,
) -> Result<(), PipelineError> {
    if descriptor.primitive_type != PrimitiveType::PatchList {
        return Ok(());
    }

    let label = descriptor.label();
    if !settings.tessellation {
        return Err(PipelineError::unsupported(label, "tessellation"));
    }
    if descriptor.tessellation_state.primitive_index_size == 0 {
        return Err(PipelineError::invalid(
            label,
            "patch lists need a non-zero primitive index size",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::renderer::{
        AttachmentDesc, TextureFormat, VertexAttributeDesc, VertexBufferDesc, VertexFormat,
    };

    const PROGRAM: ShaderProgramId = ShaderProgramId(0);

    fn check(desc: &GraphicsPipelineDesc) -> Result<(), PipelineError> {
        validate_descriptor(desc, &HeadlessDeviceSettings::default(), |id| id == PROGRAM)
    }

    fn base() -> GraphicsPipelineDesc {
        GraphicsPipelineDesc::default()
            .with_debug_name("validation")
            .with_shader_program(PROGRAM)
    }

    fn attribute(format: VertexFormat, offset: u32, location: u32) -> VertexAttributeDesc {
        VertexAttributeDesc {
            format,
            offset,
            shader_bind_location: location,
        }
    }

    fn buffer(binding: u32, stride: u32, attributes: Vec<VertexAttributeDesc>) -> VertexBufferDesc {
        VertexBufferDesc {
            binding_index: binding,
            vertex_attributes: attributes,
            vertex_stride: stride,
            ..Default::default()
        }
    }

    fn assert_invalid(result: Result<(), PipelineError>) {
        match result {
            Err(PipelineError::InvalidConfiguration { label, .. }) => {
                assert_eq!(label.as_deref(), Some("validation"));
            }
            other => panic!("expected an invalid configuration, got {other:?}"),
        }
    }

    fn assert_unsupported(result: Result<(), PipelineError>, expected: &str) {
        match result {
            Err(PipelineError::FeatureNotSupported { feature, .. }) => {
                assert_eq!(feature, expected);
            }
            other => panic!("expected an unsupported feature, got {other:?}"),
        }
    }

    #[test]
    fn a_minimal_descriptor_is_accepted() {
        assert_eq!(check(&base()), Ok(()));
    }

    #[test]
    fn shader_program_is_required_and_must_be_known() {
        assert_eq!(
            check(&GraphicsPipelineDesc::default()),
            Err(PipelineError::MissingShaderProgram { label: None })
        );
        assert_eq!(
            check(&base().with_shader_program(ShaderProgramId(7))),
            Err(PipelineError::UnknownShaderProgram {
                id: ShaderProgramId(7),
                label: Some("validation".to_string()),
            })
        );
    }

    #[test]
    fn interleaved_vertex_layout_is_accepted() {
        let desc = base()
            .with_vertex_buffer(buffer(
                0,
                24,
                vec![
                    attribute(VertexFormat::Float32x3, 0, 0),
                    attribute(VertexFormat::Float32x3, 12, 1),
                ],
            ))
            .with_vertex_buffer(buffer(1, 8, vec![attribute(VertexFormat::Float32x2, 0, 2)]));
        assert_eq!(check(&desc), Ok(()));
    }

    #[test]
    fn duplicate_bindings_and_locations_are_rejected() {
        let bindings = base()
            .with_vertex_buffer(buffer(0, 16, vec![attribute(VertexFormat::Float32x4, 0, 0)]))
            .with_vertex_buffer(buffer(0, 16, vec![attribute(VertexFormat::Float32x4, 0, 1)]));
        assert_invalid(check(&bindings));

        let locations = base()
            .with_vertex_buffer(buffer(0, 16, vec![attribute(VertexFormat::Float32x4, 0, 3)]))
            .with_vertex_buffer(buffer(1, 16, vec![attribute(VertexFormat::Float32x4, 0, 3)]));
        assert_invalid(check(&locations));
    }

    #[test]
    fn stride_must_cover_every_attribute() {
        let zero = base().with_vertex_buffer(buffer(
            0,
            0,
            vec![attribute(VertexFormat::Float32, 0, 0)],
        ));
        assert_invalid(check(&zero));

        let overrun = base().with_vertex_buffer(buffer(
            0,
            16,
            vec![attribute(VertexFormat::Float32x4, 4, 0)],
        ));
        assert_invalid(check(&overrun));

        let empty = base().with_vertex_buffer(buffer(0, 0, Vec::new()));
        assert_eq!(check(&empty), Ok(()));
    }

    #[test]
    fn device_limits_are_enforced() {
        let settings = HeadlessDeviceSettings {
            max_vertex_buffers: 1,
            max_color_attachments: 1,
            ..Default::default()
        };
        let buffers = base()
            .with_vertex_buffer(buffer(0, 0, Vec::new()))
            .with_vertex_buffer(buffer(1, 0, Vec::new()));
        assert_invalid(validate_descriptor(&buffers, &settings, |_| true));

        let colors = base()
            .with_color_attachment(AttachmentDesc::color(TextureFormat::Rgba8Unorm))
            .with_color_attachment(AttachmentDesc::color(TextureFormat::Rgba8Unorm));
        assert_invalid(validate_descriptor(&colors, &settings, |_| true));
    }

    #[test]
    fn multisampling_rules() {
        let mut disabled = base();
        disabled.multi_sample_state.sample_count = SampleCount::X4;
        disabled.multi_sample_state.multi_sample_enable = false;
        assert_invalid(check(&disabled));

        let resolve = base().with_resolve_attachments(true);
        assert_invalid(check(&resolve));

        let mut too_many = base();
        too_many.multi_sample_state.sample_count = SampleCount::X16;
        let settings = HeadlessDeviceSettings {
            max_sample_count: SampleCount::X4,
            ..Default::default()
        };
        assert_unsupported(
            validate_descriptor(&too_many, &settings, |_| true),
            "sample count 16",
        );
    }

    #[test]
    fn attachment_formats_must_match_their_slot() {
        let depth_as_color =
            base().with_color_attachment(AttachmentDesc::color(TextureFormat::Depth32Float));
        assert_invalid(check(&depth_as_color));

        let color_as_depth =
            base().with_depth_attachment(AttachmentDesc::depth(TextureFormat::Rgba8Unorm));
        assert_invalid(check(&color_as_depth));

        let good = base()
            .with_color_attachment(AttachmentDesc::color(TextureFormat::Bgra8UnormSrgb))
            .with_depth_attachment(AttachmentDesc::depth(TextureFormat::Depth24PlusStencil8));
        assert_eq!(check(&good), Ok(()));
    }

    #[test]
    fn rasterization_features_are_checked() {
        let mut wide = base();
        wide.rasterization_state.line_width = 2.0;
        assert_unsupported(check(&wide), "wide_lines");

        let mut conservative = base();
        conservative.rasterization_state.conservative_raster = true;
        assert_unsupported(check(&conservative), "conservative_rasterization");

        let mut clamp = base();
        clamp.rasterization_state.depth_clamp_enabled = true;
        assert_eq!(check(&clamp), Ok(()));
        let no_clamp = HeadlessDeviceSettings {
            depth_clamp: false,
            ..Default::default()
        };
        assert_unsupported(
            validate_descriptor(&clamp, &no_clamp, |_| true),
            "depth_clamp",
        );

        let mut reversed = base();
        reversed.rasterization_state.depth_range = (1.0, 0.0);
        assert_invalid(check(&reversed));
    }

    #[test]
    fn depth_range_must_be_finite_and_normalized() {
        for range in [
            (f32::NAN, 1.0),
            (0.0, f32::NAN),
            (0.0, f32::INFINITY),
            (-0.5, 1.0),
            (0.0, 1.5),
        ] {
            let mut desc = base();
            desc.rasterization_state.depth_range = range;
            assert_invalid(check(&desc));
        }

        let mut subrange = base();
        subrange.rasterization_state.depth_range = (0.25, 0.75);
        assert_eq!(check(&subrange), Ok(()));
    }

    #[test]
    fn patch_lists_need_tessellation() {
        let mut patches = base().with_primitive_type(PrimitiveType::PatchList);
        patches.tessellation_state.primitive_index_size = 0;
        assert_invalid(check(&patches));

        patches.tessellation_state.primitive_index_size = 3;
        assert_eq!(check(&patches), Ok(()));

        let no_tess = HeadlessDeviceSettings {
            tessellation: false,
            ..Default::default()
        };
        assert_unsupported(
            validate_descriptor(&patches, &no_tess, |_| true),
            "tessellation",
        );
    }
}

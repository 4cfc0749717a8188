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

//! Attachment descriptions consumed by a pipeline's output stage.

use super::enums::{AttachmentLoadOp, AttachmentStoreOp, BlendFactor, BlendOp};
use crate::renderer::api::state_key::StateKey;
use crate::renderer::api::util::{AttachmentUsage, ColorWrites, TextureFormat};

/// Describes one color or depth/stencil attachment a pipeline renders into,
/// together with the blend state applied to it.
#[derive(Debug, Clone, StateKey)]
pub struct AttachmentDesc {
    /// The texture format of the attachment. `None` means no attachment is bound.
    pub format: Option<TextureFormat>,
    /// How the attachment texture is used.
    pub usage: AttachmentUsage,
    /// What happens to the attachment when the pass begins.
    pub load_op: AttachmentLoadOp,
    /// What happens to the attachment when the pass ends.
    pub store_op: AttachmentStoreOp,
    /// The value written by [`AttachmentLoadOp::Clear`].
    pub clear_value: [f32; 4],
    /// A bitmask controlling which color channels are written to.
    pub color_mask: ColorWrites,
    /// If `true`, the blend equations below are applied.
    pub blend_enabled: bool,
    /// The blend factor for the source color.
    pub src_color_blend_factor: BlendFactor,
    /// The blend factor for the destination color.
    pub dst_color_blend_factor: BlendFactor,
    /// The operation combining the color factors.
    pub color_blend_op: BlendOp,
    /// The blend factor for the source alpha.
    pub src_alpha_blend_factor: BlendFactor,
    /// The blend factor for the destination alpha.
    pub dst_alpha_blend_factor: BlendFactor,
    /// The operation combining the alpha factors.
    pub alpha_blend_op: BlendOp,
    /// The constant used by the `Constant*` blend factors.
    pub blend_constant_color: [f32; 4],
}

impl Default for AttachmentDesc {
    fn default() -> Self {
        Self {
            format: None,
            usage: AttachmentUsage::empty(),
            load_op: AttachmentLoadOp::Load,
            store_op: AttachmentStoreOp::Store,
            clear_value: [0.0; 4],
            color_mask: ColorWrites::ALL,
            blend_enabled: false,
            src_color_blend_factor: BlendFactor::Zero,
            dst_color_blend_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::Zero,
            dst_alpha_blend_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
            blend_constant_color: [0.0; 4],
        }
    }
}

impl AttachmentDesc {
    /// A color target of the given format that is cleared and stored.
    pub fn color(format: TextureFormat) -> Self {
        Self {
            format: Some(format),
            usage: AttachmentUsage::COLOR_TARGET,
            load_op: AttachmentLoadOp::Clear,
            ..Default::default()
        }
    }

    /// A depth (and stencil, if the format has one) target that is cleared to `1.0`.
    pub fn depth(format: TextureFormat) -> Self {
        let mut usage = AttachmentUsage::DEPTH_TARGET;
        if format.has_stencil() {
            usage |= AttachmentUsage::STENCIL_TARGET;
        }
        Self {
            format: Some(format),
            usage,
            load_op: AttachmentLoadOp::Clear,
            clear_value: [1.0, 0.0, 0.0, 0.0],
            ..Default::default()
        }
    }

    /// Enables standard "over" alpha blending on this attachment.
    pub fn with_alpha_blending(mut self) -> Self {
        self.blend_enabled = true;
        self.src_color_blend_factor = BlendFactor::SrcAlpha;
        self.dst_color_blend_factor = BlendFactor::OneMinusSrcAlpha;
        self.color_blend_op = BlendOp::Add;
        self.src_alpha_blend_factor = BlendFactor::One;
        self.dst_alpha_blend_factor = BlendFactor::OneMinusSrcAlpha;
        self.alpha_blend_op = BlendOp::Add;
        self
    }

    /// Returns `true` if a texture is bound to this slot.
    pub fn is_bound(&self) -> bool {
        self.format.is_some()
    }
}

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


//! Bit sets used by pipeline descriptors.

use crate::renderer::api::state_key::state_key_by_eq;
use bitflags::bitflags;

bitflags! {
    /// Flags representing which shader stages can see a binding.
    ///
    /// Multiple stages can be combined using bitwise operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        /// Vertex shader stage.
        const VERTEX = 1 << 0;
        /// Fragment shader stage.
        const FRAGMENT = 1 << 1;
        /// Compute shader stage.
        const COMPUTE = 1 << 2;
        /// Tessellation control (hull) stage.
        const TESSELLATION_CONTROL = 1 << 3;
        /// Tessellation evaluation (domain) stage.
        const TESSELLATION_EVAL = 1 << 4;
        /// Geometry shader stage.
        const GEOMETRY = 1 << 5;
        /// Post-tessellation control stage, for backends that emulate tessellation.
        const POST_TESSELLATION_CONTROL = 1 << 6;
        /// Post-tessellation vertex stage, for backends that emulate tessellation.
        const POST_TESSELLATION_VERTEX = 1 << 7;
        /// Vertex and fragment stages.
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
    }
}

bitflags! {
    /// Describes how an attachment texture is going to be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttachmentUsage: u32 {
        /// Rendered to as a color target.
        const COLOR_TARGET = 1 << 0;
        /// Rendered to as a depth target.
        const DEPTH_TARGET = 1 << 1;
        /// Rendered to as a stencil target.
        const STENCIL_TARGET = 1 << 2;
        /// Sampled by a later shader.
        const SHADER_READ = 1 << 3;
        /// Written by a shader as a storage image.
        const SHADER_WRITE = 1 << 4;
    }
}

bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWrites: u8 {
        /// Enable writes to the Red channel.
        const R = 0b0001;
        /// Enable writes to the Green channel.
        const G = 0b0010;
        /// Enable writes to the Blue channel.
        const B = 0b0100;
        /// Enable writes to the Alpha channel.
        const A = 0b1000;
        /// Enable writes to all channels.
        const ALL = 0b1111;
    }
}

impl ShaderStageFlags {
    const TESSELLATION_STAGES: Self = Self::TESSELLATION_CONTROL
        .union(Self::TESSELLATION_EVAL)
        .union(Self::POST_TESSELLATION_CONTROL)
        .union(Self::POST_TESSELLATION_VERTEX);

    /// Returns `true` if any tessellation stage is present.
    pub const fn uses_tessellation(&self) -> bool {
        self.intersects(Self::TESSELLATION_STAGES)
    }
}

impl Default for ShaderStageFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for AttachmentUsage {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for ColorWrites {
    fn default() -> Self {
        Self::ALL
    }
}

state_key_by_eq!(ShaderStageFlags, AttachmentUsage, ColorWrites);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_writes_all() {
        assert_eq!(
            ColorWrites::ALL,
            ColorWrites::R | ColorWrites::G | ColorWrites::B | ColorWrites::A
        );
        assert_eq!(ColorWrites::default(), ColorWrites::ALL);
    }

    #[test]
    fn stage_flags_combine() {
        let mut stages = ShaderStageFlags::VERTEX;
        stages |= ShaderStageFlags::FRAGMENT;
        assert_eq!(stages, ShaderStageFlags::VERTEX_FRAGMENT);
        assert!(stages.contains(ShaderStageFlags::FRAGMENT));
        assert!(!stages.contains(ShaderStageFlags::COMPUTE));
        assert!(!stages.uses_tessellation());
        assert!((stages | ShaderStageFlags::TESSELLATION_EVAL).uses_tessellation());
    }

    #[test]
    fn empty_usage_is_empty() {
        assert!(AttachmentUsage::default().is_empty());
        assert_eq!(AttachmentUsage::default(), AttachmentUsage::empty());
        assert!(!(AttachmentUsage::COLOR_TARGET | AttachmentUsage::SHADER_READ).is_empty());
    }
}

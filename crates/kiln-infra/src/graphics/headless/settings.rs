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

use kiln_core::renderer::SampleCount;

/// Capabilities and limits reported by a [`super::HeadlessDevice`].
///
/// The defaults describe a typical desktop GPU without the less common
/// rasterization features.
#[derive(Debug, Clone)]
pub struct HeadlessDeviceSettings {
    /// Maximum number of vertex buffers a pipeline may declare.
    pub max_vertex_buffers: u32,
    /// Maximum number of vertex attributes across all vertex buffers.
    pub max_vertex_attributes: u32,
    /// Maximum number of color attachments.
    pub max_color_attachments: u32,
    /// Highest supported MSAA sample count.
    pub max_sample_count: SampleCount,
    /// Whether line widths other than 1.0 are supported.
    pub wide_lines: bool,
    /// Whether conservative rasterization is supported.
    pub conservative_rasterization: bool,
    /// Whether depth clamping is supported.
    pub depth_clamp: bool,
    /// Whether tessellation (patch list topologies) is supported.
    pub tessellation: bool,
}

impl Default for HeadlessDeviceSettings {
    fn default() -> Self {
        Self {
            max_vertex_buffers: 16,
            max_vertex_attributes: 32,
            max_color_attachments: 8,
            max_sample_count: SampleCount::X16,
            wide_lines: false,
            conservative_rasterization: false,
            depth_clamp: true,
            tessellation: true,
        }
    }
}

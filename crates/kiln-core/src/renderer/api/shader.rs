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

//! Handles to externally owned shader programs.

use crate::renderer::api::state_key::state_key_by_eq;
use std::fmt;

/// An opaque handle to a compiled shader program.
///
/// The program itself is owned by the shader subsystem; descriptors only
/// store and compare this identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderProgramId(pub usize);

impl fmt::Display for ShaderProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShaderProgram#{}", self.0)
    }
}

state_key_by_eq!(ShaderProgramId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_program_id_creation_and_equality() {
        let id1 = ShaderProgramId(1);
        let id2 = ShaderProgramId(2);
        let id1_again = ShaderProgramId(1);

        assert_eq!(id1, id1_again);
        assert_ne!(id1, id2);
        assert_eq!(id2.to_string(), "ShaderProgram#2");
    }
}

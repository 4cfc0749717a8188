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

//! # Kiln Core
//!
//! Backend-agnostic description of a graphics pipeline's fixed-function and
//! binding state, plus the exact structural-equality contract that lets a
//! backend deduplicate and cache pipeline objects keyed by descriptor content.

#![warn(missing_docs)]

// Lets `#[derive(StateKey)]` refer to `::kiln_core` from inside this crate too.
extern crate self as kiln_core;

pub mod renderer;

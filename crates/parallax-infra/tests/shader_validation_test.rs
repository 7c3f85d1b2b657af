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

//! Validates the parallax shader with naga and checks it against the CPU layouts.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{ShaderStage, TypeInner};
use parallax_core::renderer::SceneUniforms;
use parallax_infra::graphics::wgpu::PARALLAX_SHADER_SOURCE;

fn parse_shader() -> naga::Module {
    wgsl::parse_str(PARALLAX_SHADER_SOURCE)
        .unwrap_or_else(|e| panic!("{}", e.emit_to_string(PARALLAX_SHADER_SOURCE)))
}

#[test]
fn test_shader_passes_validation() {
    let module = parse_shader();
    let result = Validator::new(ValidationFlags::all(), Capabilities::empty()).validate(&module);
    assert!(result.is_ok(), "shader validation failed: {result:?}");
}

#[test]
fn test_shader_declares_pipeline_entry_points() {
    let module = parse_shader();
    let find = |name: &str| module.entry_points.iter().find(|ep| ep.name == name);
    assert_eq!(find("vs_main").map(|ep| ep.stage), Some(ShaderStage::Vertex));
    assert_eq!(find("fs_main").map(|ep| ep.stage), Some(ShaderStage::Fragment));
}

#[test]
fn test_uniform_block_matches_scene_uniforms() {
    let module = parse_shader();
    let (_, uniforms) = module
        .global_variables
        .iter()
        .find(|(_, var)| {
            var.binding
                .as_ref()
                .is_some_and(|b| b.group == 0 && b.binding == 0)
        })
        .expect("uniform block at @group(0) @binding(0)");

    let TypeInner::Struct { members, span } = &module.types[uniforms.ty].inner else {
        panic!("uniform block is not a struct");
    };
    assert_eq!(*span as usize, std::mem::size_of::<SceneUniforms>());

    let offset = |name: &str| {
        members
            .iter()
            .find(|m| m.name.as_deref() == Some(name))
            .map(|m| m.offset as usize)
    };
    assert_eq!(
        offset("camera_position"),
        Some(std::mem::offset_of!(SceneUniforms, camera_position))
    );
    assert_eq!(
        offset("height_scale"),
        Some(std::mem::offset_of!(SceneUniforms, height_scale))
    );
    assert_eq!(offset("mode"), Some(std::mem::offset_of!(SceneUniforms, mode)));
}

#[test]
fn test_material_bindings_are_declared() {
    let module = parse_shader();
    let mut bindings: Vec<u32> = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| var.binding.as_ref())
        .filter(|b| b.group == 0)
        .map(|b| b.binding)
        .collect();
    bindings.sort_unstable();
    assert_eq!(bindings, vec![0, 1, 2, 3]);
}

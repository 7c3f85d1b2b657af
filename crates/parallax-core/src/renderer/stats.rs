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

/// Statistics gathered while drawing one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderStats {
    /// Monotonic number of the frame these stats belong to (first frame is 1).
    pub frame_number: u64,
    /// CPU time spent before command recording (acquire, uniform upload).
    pub cpu_preparation_time_ms: f32,
    /// CPU time spent recording and submitting commands.
    pub cpu_render_submission_time_ms: f32,
    /// Number of draw calls issued.
    pub draw_calls: u32,
    /// Number of triangles submitted.
    pub triangles_rendered: u32,
}

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

//! # Parallax Core
//!
//! Foundational crate containing the view/delegate contracts, math, and the
//! backend-independent pieces of the parallax renderer: camera derivation,
//! GPU uniform layouts, the plane mesh, procedural materials, input controls
//! and configuration.
//!
//! Concrete GPU and windowing code lives in `parallax-infra`; this crate never
//! talks to a graphics API.

#![warn(missing_docs)]

pub mod config;
pub mod controls;
pub mod material;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod utils;

pub use config::{AppConfig, ConfigError};
pub use utils::timer::Stopwatch;

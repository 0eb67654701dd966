// Copyright 2024 Saptak Santra
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

//! Rogue ECS - Sparse-set entity/component storage
//!
//! Generational entity handles, one densely packed cache per component type,
//! boolean tags, and lazy queries over both. Single-threaded: the
//! whole simulation tick runs against one `&mut World`.

pub mod command;
pub mod component;
pub mod config;
pub mod debug;
pub mod entity;
pub mod error;
pub mod prelude;
pub mod profiling;
pub mod query;
pub mod registry;
pub mod storage;
pub mod tag;
pub mod world;


#[cfg(all(test, feature = "profiling"))]
mod log_capture;

pub use command::*;
pub use component::*;
pub use config::*;
pub use entity::*;
pub use error::*;
pub use query::*;
pub use registry::*;
pub use storage::*;
pub use tag::*;
pub use world::*;

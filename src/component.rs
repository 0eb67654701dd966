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

//! Component marker trait
//!
//! Components are plain data attached to entities. Attaching one starts from
//! its `Default` value, which callers then fill in through the returned
//! mutable reference.

/// Marker trait for components
///
/// Components must be 'static (no borrowed data) and have a zero value.
pub trait Component: 'static + Default {}

/// Automatically implement Component for all valid types
impl<T: 'static + Default> Component for T {}

/// Short type name used in logs and diagnostics
pub(crate) fn component_name<T: Component>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Tuples and arrays have no single outermost path to strip
    if full.starts_with(|c| c == '(' || c == '[') {
        return full;
    }
    // Keep the last path segment of the outermost type; generic args stay intact
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

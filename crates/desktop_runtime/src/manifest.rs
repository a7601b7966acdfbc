//! Window catalog compiled from `windows.manifest.toml` by the build script.

use crate::{model::Size, routes::RouteEntry};

include!(concat!(env!("OUT_DIR"), "/window_manifest_generated.rs"));

/// Returns the catalog size for `component`, if the component is known.
pub fn catalog_size(component: &str) -> Option<Size> {
    COMPONENT_DEFAULT_SIZES
        .iter()
        .find(|(name, _, _)| *name == component)
        .map(|&(_, width, height)| Size::new(width, height))
}

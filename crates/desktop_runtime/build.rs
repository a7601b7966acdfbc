use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct WindowDefaults {
    component: String,
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct RouteDefinition {
    path: String,
    window_id: String,
    component: String,
    title: String,
}

#[derive(Debug, Clone, Deserialize)]
struct WindowManifest {
    schema_version: u32,
    #[serde(default, rename = "window")]
    windows: Vec<WindowDefaults>,
    #[serde(default, rename = "route")]
    routes: Vec<RouteDefinition>,
}

fn validate(manifest: &WindowManifest, path: &str) {
    if manifest.schema_version != 1 {
        panic!(
            "manifest schema mismatch in {path}: expected 1 found {}",
            manifest.schema_version
        );
    }

    let mut components = HashSet::new();
    for window in &manifest.windows {
        if window.width <= 0 || window.height <= 0 {
            panic!(
                "window `{}` in {path} must have a positive size",
                window.component
            );
        }
        if !components.insert(window.component.as_str()) {
            panic!("duplicate window component `{}` in {path}", window.component);
        }
    }

    let mut paths = HashSet::new();
    let mut window_ids = HashSet::new();
    for route in &manifest.routes {
        if !route.path.starts_with('/') || route.path.len() < 2 || route.path.ends_with('/') {
            panic!("route path `{}` in {path} must look like `/segment`", route.path);
        }
        if !paths.insert(route.path.as_str()) {
            panic!("duplicate route path `{}` in {path}", route.path);
        }
        if !window_ids.insert(route.window_id.as_str()) {
            panic!("duplicate route window id `{}` in {path}", route.window_id);
        }
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let manifest_path = crate_root.join("windows.manifest.toml");
    println!("cargo:rerun-if-changed={}", manifest_path.display());

    let display_path = manifest_path.display().to_string();
    let raw = fs::read_to_string(&manifest_path)
        .unwrap_or_else(|err| panic!("failed to read {display_path}: {err}"));
    let manifest: WindowManifest = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {display_path}: {err}"));
    validate(&manifest, &display_path);

    let mut generated = String::from("// Generated by build.rs from windows.manifest.toml.\n\n");

    generated.push_str("/// Default frame sizes keyed by content component name.\n");
    generated.push_str("pub const COMPONENT_DEFAULT_SIZES: &[(&str, i32, i32)] = &[\n");
    for window in &manifest.windows {
        generated.push_str(&format!(
            "    ({:?}, {}, {}),\n",
            window.component, window.width, window.height
        ));
    }
    generated.push_str("];\n\n");

    generated.push_str("/// Navigable paths and the windows that present them.\n");
    generated.push_str("pub const ROUTE_TABLE: &[RouteEntry] = &[\n");
    for route in &manifest.routes {
        generated.push_str(&format!(
            "    RouteEntry {{ path: {:?}, window_id: {:?}, component: {:?}, title: {:?} }},\n",
            route.path, route.window_id, route.component, route.title
        ));
    }
    generated.push_str("];\n");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("window_manifest_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}

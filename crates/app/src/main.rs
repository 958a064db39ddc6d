//! CLI entry point: load one or more OBJ files and report per-group
//! mesh statistics after welding.

use std::time::Instant;

use anyhow::{Context, Result, bail};

use loader::{LoadOptions, load_obj_from_path};

fn parse_threshold_arg() -> f32 {
    // Accept: --merge-threshold=0.0001 (0 selects the default)
    let mut threshold = 0.0f32;
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--merge-threshold=") {
            match val.parse::<f32>() {
                Ok(v) if v >= 0.0 => threshold = v,
                _ => {
                    eprintln!("[warn] Bad merge threshold '{}', using default.", val);
                }
            }
        }
    }
    threshold
}

fn parse_expect_arg() -> usize {
    // --expect-vertices=N pre-reserves buffers; default mirrors a
    // typical mid-size scan, 0 disables reservation.
    let mut expect = 10_000usize;
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--expect-vertices=") {
            if let Ok(v) = val.parse::<usize>() {
                expect = v;
            }
        }
    }
    expect
}

fn parse_name_arg() -> Option<String> {
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--name=") {
            if !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

fn collect_paths() -> Vec<String> {
    std::env::args()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths = collect_paths();
    if paths.is_empty() {
        bail!(
            "usage: objweld [--merge-threshold=F] [--expect-vertices=N] [--name=S] <file.obj>..."
        );
    }

    let options = LoadOptions {
        merge_threshold: parse_threshold_arg(),
        expected_vertices: parse_expect_arg(),
        base_name: parse_name_arg(),
    };

    for path in &paths {
        let started = Instant::now();
        let model = load_obj_from_path(path, &options)
            .with_context(|| format!("loading {}", path))?;
        let elapsed = started.elapsed();

        log::info!(
            "{}: {} group(s), {} unique vertices, {} triangles in {:.3}s",
            model.name,
            model.groups.len(),
            model.vertex_count(),
            model.triangle_count(),
            elapsed.as_secs_f64()
        );
        for group in &model.groups {
            log::info!(
                "  {}: {} vertices, {} triangles",
                group.name,
                group.mesh.positions.len(),
                group.mesh.triangle_count()
            );
        }
    }

    Ok(())
}

//! Streaming Wavefront OBJ parser with vertex welding.
//! Produces one deduplicated, render-ready mesh buffer per object/group.

pub mod mesh;
pub mod obj;
pub mod scan;
pub mod weld;

pub use mesh::{MeshBuffer, MeshGroup, ParsedModel};
pub use obj::{LoadOptions, load_obj_from_path, load_obj_from_reader, load_obj_from_str};

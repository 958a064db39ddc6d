//! Core types: math re-exports and the shared load-error enum.

pub use glam::{Vec2, Vec3, vec2, vec3};

pub mod error;

pub use error::LoadError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_vector_is_y() {
        assert_eq!(Vec3::Y, vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn open_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = LoadError::Open {
            path: "models/teapot.obj".into(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("models/teapot.obj"), "got: {msg}");
    }

    #[test]
    fn vertex_overflow_names_the_limit() {
        let msg = LoadError::VertexOverflow.to_string();
        assert!(msg.contains(&u32::MAX.to_string()), "got: {msg}");
    }
}

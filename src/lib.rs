pub mod config;
pub mod render;

pub use config::AppConfig;
pub use render::buffer::{BufferError, Vertex, VertexBuffer};
pub use render::context::WindowContext;
pub use render::driver::{Gl, GlApi};
pub use render::shader::{CompiledShader, ShaderError, ShaderKind, ShaderProgram};

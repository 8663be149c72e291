pub mod buffer;
pub mod context;
pub mod driver;
pub mod shader;

pub use buffer::{BufferError, Vertex, VertexBuffer};
pub use context::WindowContext;
pub use driver::{Gl, GlApi};
pub use shader::{CompiledShader, ShaderError, ShaderKind, ShaderProgram};

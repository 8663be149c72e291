use gl::types::{GLenum, GLuint};
use log::{error, info};
use std::ffi::{CString, NulError};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::driver::GlApi;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Shader compilation failed: {0}")]
    Compilation(String),
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Driver refused to create a shader object")]
    ShaderCreation,
    #[error("Driver refused to create a program object")]
    ProgramCreation,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => write!(f, "vertex"),
            ShaderKind::Fragment => write!(f, "fragment"),
        }
    }
}

/// A compiled shader object. Deleted on drop, so every exit path out of
/// [`ShaderProgram::link`] releases it.
pub struct CompiledShader<G: GlApi> {
    gl: G,
    id: GLuint,
    kind: ShaderKind,
}

impl<G: GlApi> CompiledShader<G> {
    /// Reads the whole file at `path`, hands it to the driver and compiles
    /// it. The source buffer is dropped right after submission. On a compile
    /// error the driver's info log is logged and the shader object deleted.
    pub fn load(gl: &G, path: &Path, kind: ShaderKind) -> Result<Self, ShaderError> {
        let source = fs::read_to_string(path).map_err(|err| {
            error!("Can't open {} shader file {}: {}", kind, path.display(), err);
            err
        })?;
        let source = CString::new(source)?;

        let id = gl.create_shader(kind);
        if id == 0 {
            error!("Couldn't create a {} shader object", kind);
            return Err(ShaderError::ShaderCreation);
        }
        let shader = Self {
            gl: gl.clone(),
            id,
            kind,
        };

        shader.gl.shader_source(id, &source);
        drop(source);

        shader.gl.compile_shader(id);
        if !shader.gl.compile_status(id) {
            let log = shader.gl.shader_info_log(id);
            error!(
                "Compilation of {} shader {} failed:\n{}",
                kind,
                path.display(),
                log
            );
            return Err(ShaderError::Compilation(log));
        }

        info!("Compiled {} shader {}", kind, path.display());
        Ok(shader)
    }
}

impl<G: GlApi> Drop for CompiledShader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked shader program. Owns its driver handle and deletes it on drop.
pub struct ShaderProgram<G: GlApi> {
    gl: G,
    id: GLuint,
}

impl<G: GlApi> ShaderProgram<G> {
    /// Compiles the vertex+fragment pair at the given paths and links them.
    pub fn load(gl: &G, vert_path: &Path, frag_path: &Path) -> Result<Self, ShaderError> {
        let vert = CompiledShader::load(gl, vert_path, ShaderKind::Vertex)?;
        let frag = CompiledShader::load(gl, frag_path, ShaderKind::Fragment)?;
        Self::link(vert, frag)
    }

    /// Links a compiled vertex and fragment shader into a program. Both
    /// shader objects are consumed and deleted before this returns, on the
    /// success path and on every failure path.
    pub fn link(vert: CompiledShader<G>, frag: CompiledShader<G>) -> Result<Self, ShaderError> {
        debug_assert_eq!(vert.kind, ShaderKind::Vertex);
        debug_assert_eq!(frag.kind, ShaderKind::Fragment);

        let gl = vert.gl.clone();
        let id = gl.create_program();
        if id == 0 {
            error!("Couldn't create a shader program object");
            return Err(ShaderError::ProgramCreation);
        }

        gl.attach_shader(id, vert.id);
        gl.attach_shader(id, frag.id);
        gl.link_program(id);

        if !gl.link_status(id) {
            let log = gl.program_info_log(id);
            error!("Linking shader program failed:\n{}", log);
            gl.delete_program(id);
            return Err(ShaderError::Linking(log));
        }

        Ok(Self { gl, id })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        self.gl.use_program(self.id);
    }
}

impl<G: GlApi> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

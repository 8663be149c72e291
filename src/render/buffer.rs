use bytemuck::{Pod, Zeroable};
use gl::types::{GLenum, GLsizei, GLuint};
use log::error;
use thiserror::Error;

use super::driver::GlApi;

/// One vertex record. Must match the vertex shader's single input: two
/// floats of clip-space position at attribute 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

pub const POSITION_ATTRIB_INDEX: GLuint = 0;

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("Vertex buffer upload failed, driver error code {0:#06x}")]
    Upload(GLenum),
}

/// A driver-side buffer holding an immutable vertex array. Uploaded once at
/// creation; there is no update path. Deleted on drop.
pub struct VertexBuffer<G: GlApi> {
    gl: G,
    id: GLuint,
    len: usize,
}

impl<G: GlApi> VertexBuffer<G> {
    /// Uploads `vertices` with STATIC_DRAW and checks the driver error flag.
    /// On a reported error the buffer is deleted before returning.
    pub fn new(gl: &G, vertices: &[Vertex]) -> Result<Self, BufferError> {
        let id = gl.gen_buffer();
        gl.bind_array_buffer(id);
        gl.buffer_data(bytemuck::cast_slice(vertices));
        gl.bind_array_buffer(0);

        let err = gl.get_error();
        if err != gl::NO_ERROR {
            error!("Creating VBO failed, code: {:#06x}", err);
            gl.delete_buffer(id);
            return Err(BufferError::Upload(err));
        }

        Ok(Self {
            gl: gl.clone(),
            id,
            len: vertices.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Binds the buffer and describes the position attribute layout, then
    /// enables it. Draw calls issued afterwards read vertices from this
    /// buffer.
    pub fn bind_position_attribute(&self) {
        self.gl.bind_array_buffer(self.id);
        self.gl.vertex_attrib_pointer_f32(
            POSITION_ATTRIB_INDEX,
            2,
            std::mem::size_of::<Vertex>() as GLsizei,
        );
        self.gl.enable_vertex_attrib_array(POSITION_ATTRIB_INDEX);
    }

    pub fn draw(&self) {
        self.gl.draw_triangles(0, self.len as GLsizei);
    }
}

impl<G: GlApi> Drop for VertexBuffer<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.id);
    }
}

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use std::ffi::{CStr, CString};
use std::ptr;

use super::shader::ShaderKind;

/// The driver calls the renderer needs. Production code goes through [`Gl`],
/// which forwards to the loaded OpenGL entry points; tests substitute a fake
/// driver that tracks object lifetimes.
pub trait GlApi: Clone {
    fn create_shader(&self, kind: ShaderKind) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    fn gen_buffer(&self) -> GLuint;
    /// Binds `buffer` to GL_ARRAY_BUFFER; 0 unbinds.
    fn bind_array_buffer(&self, buffer: GLuint);
    /// Uploads `data` into the currently bound array buffer with STATIC_DRAW.
    fn buffer_data(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: GLuint);

    fn vertex_attrib_pointer_f32(&self, index: GLuint, components: GLint, stride: GLsizei);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn draw_triangles(&self, first: GLint, count: GLsizei);

    /// Reads and clears the driver error flag.
    fn get_error(&self) -> GLenum;
}

/// Zero-sized handle to the real driver. Valid only on the thread that made
/// a GL context current.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gl;

impl GlApi for Gl {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        unsafe { gl::CreateShader(kind.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe {
            gl::CompileShader(shader);
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != gl::FALSE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        let buffer = whitespace_cstring_with_len(len as usize);
        unsafe {
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buffer.as_ptr() as *mut GLchar);
        }
        buffer.to_string_lossy().into_owned()
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe {
            gl::DeleteShader(shader);
        }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe {
            gl::AttachShader(program, shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        unsafe {
            gl::LinkProgram(program);
        }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != gl::FALSE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        let buffer = whitespace_cstring_with_len(len as usize);
        unsafe {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buffer.as_ptr() as *mut GLchar);
        }
        buffer.to_string_lossy().into_owned()
    }

    fn delete_program(&self, program: GLuint) {
        unsafe {
            gl::DeleteProgram(program);
        }
    }

    fn use_program(&self, program: GLuint) {
        unsafe {
            gl::UseProgram(program);
        }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe {
            gl::GenBuffers(1, &mut buffer);
        }
        buffer
    }

    fn bind_array_buffer(&self, buffer: GLuint) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer);
        }
    }

    fn buffer_data(&self, data: &[u8]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as isize,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe {
            gl::DeleteBuffers(1, &buffer);
        }
    }

    fn vertex_attrib_pointer_f32(&self, index: GLuint, components: GLint, stride: GLsizei) {
        unsafe {
            gl::VertexAttribPointer(index, components, gl::FLOAT, gl::FALSE, stride, ptr::null());
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe {
            gl::EnableVertexAttribArray(index);
        }
    }

    fn draw_triangles(&self, first: GLint, count: GLsizei) {
        unsafe {
            gl::DrawArrays(gl::TRIANGLES, first, count);
        }
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }
}

fn whitespace_cstring_with_len(len: usize) -> CString {
    let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
    buffer.extend([b' '].iter().cycle().take(len));
    unsafe { CString::from_vec_unchecked(buffer) }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    #[derive(Default)]
    struct State {
        next_id: GLuint,
        shaders_created: usize,
        live_shaders: HashSet<GLuint>,
        live_programs: HashSet<GLuint>,
        live_buffers: HashSet<GLuint>,
        attachments: HashMap<GLuint, Vec<GLuint>>,
        bound_array_buffer: GLuint,
        buffer_sizes: HashMap<GLuint, usize>,
        error_flag: GLenum,
        fail_compile: bool,
        fail_link: bool,
        fail_create_program: bool,
        fail_buffer_data: bool,
    }

    /// In-memory driver that hands out sequential ids and tracks which
    /// objects are still alive, so tests can assert on leaks.
    #[derive(Clone, Default)]
    pub struct FakeGl {
        state: Rc<RefCell<State>>,
    }

    impl FakeGl {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_compile() -> Self {
            let fake = Self::new();
            fake.state.borrow_mut().fail_compile = true;
            fake
        }

        pub fn failing_link() -> Self {
            let fake = Self::new();
            fake.state.borrow_mut().fail_link = true;
            fake
        }

        pub fn failing_program_creation() -> Self {
            let fake = Self::new();
            fake.state.borrow_mut().fail_create_program = true;
            fake
        }

        pub fn failing_buffer_upload() -> Self {
            let fake = Self::new();
            fake.state.borrow_mut().fail_buffer_data = true;
            fake
        }

        pub fn shaders_created(&self) -> usize {
            self.state.borrow().shaders_created
        }

        pub fn live_shaders(&self) -> usize {
            self.state.borrow().live_shaders.len()
        }

        pub fn live_programs(&self) -> usize {
            self.state.borrow().live_programs.len()
        }

        pub fn live_buffers(&self) -> usize {
            self.state.borrow().live_buffers.len()
        }

        pub fn live_objects(&self) -> usize {
            let state = self.state.borrow();
            state.live_shaders.len() + state.live_programs.len() + state.live_buffers.len()
        }

        pub fn buffer_size(&self, buffer: GLuint) -> Option<usize> {
            self.state.borrow().buffer_sizes.get(&buffer).copied()
        }

        pub fn attachments(&self, program: GLuint) -> Vec<GLuint> {
            self.state
                .borrow()
                .attachments
                .get(&program)
                .cloned()
                .unwrap_or_default()
        }

        fn next_id(&self) -> GLuint {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            state.next_id
        }
    }

    impl GlApi for FakeGl {
        fn create_shader(&self, _kind: ShaderKind) -> GLuint {
            let id = self.next_id();
            let mut state = self.state.borrow_mut();
            state.shaders_created += 1;
            state.live_shaders.insert(id);
            id
        }

        fn shader_source(&self, _shader: GLuint, _source: &CStr) {}

        fn compile_shader(&self, _shader: GLuint) {}

        fn compile_status(&self, _shader: GLuint) -> bool {
            !self.state.borrow().fail_compile
        }

        fn shader_info_log(&self, _shader: GLuint) -> String {
            "0:1: synthetic compile error".to_string()
        }

        fn delete_shader(&self, shader: GLuint) {
            self.state.borrow_mut().live_shaders.remove(&shader);
        }

        fn create_program(&self) -> GLuint {
            if self.state.borrow().fail_create_program {
                return 0;
            }
            let id = self.next_id();
            self.state.borrow_mut().live_programs.insert(id);
            id
        }

        fn attach_shader(&self, program: GLuint, shader: GLuint) {
            self.state
                .borrow_mut()
                .attachments
                .entry(program)
                .or_default()
                .push(shader);
        }

        fn link_program(&self, _program: GLuint) {}

        fn link_status(&self, _program: GLuint) -> bool {
            !self.state.borrow().fail_link
        }

        fn program_info_log(&self, _program: GLuint) -> String {
            "synthetic link error".to_string()
        }

        fn delete_program(&self, program: GLuint) {
            self.state.borrow_mut().live_programs.remove(&program);
        }

        fn use_program(&self, _program: GLuint) {}

        fn gen_buffer(&self) -> GLuint {
            let id = self.next_id();
            self.state.borrow_mut().live_buffers.insert(id);
            id
        }

        fn bind_array_buffer(&self, buffer: GLuint) {
            self.state.borrow_mut().bound_array_buffer = buffer;
        }

        fn buffer_data(&self, data: &[u8]) {
            let mut state = self.state.borrow_mut();
            if state.fail_buffer_data {
                state.error_flag = gl::OUT_OF_MEMORY;
                return;
            }
            let bound = state.bound_array_buffer;
            state.buffer_sizes.insert(bound, data.len());
        }

        fn delete_buffer(&self, buffer: GLuint) {
            let mut state = self.state.borrow_mut();
            state.live_buffers.remove(&buffer);
            state.buffer_sizes.remove(&buffer);
        }

        fn vertex_attrib_pointer_f32(&self, _index: GLuint, _components: GLint, _stride: GLsizei) {}

        fn enable_vertex_attrib_array(&self, _index: GLuint) {}

        fn draw_triangles(&self, _first: GLint, _count: GLsizei) {}

        fn get_error(&self) -> GLenum {
            let mut state = self.state.borrow_mut();
            std::mem::replace(&mut state.error_flag, gl::NO_ERROR)
        }
    }
}

use std::path::PathBuf;

/// Startup configuration. Everything is fixed at launch; nothing is
/// reloaded afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// RGBA clear color used for both the empty first frame and the
    /// triangle frame.
    pub clear_color: [f32; 4],
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "GLES3 Triangle".to_string(),
            width: 640,
            height: 480,
            clear_color: [0.3, 0.1, 0.85, 1.0],
            vertex_shader: PathBuf::from("assets/shaders/simple2d.vert"),
            fragment_shader: PathBuf::from("assets/shaders/simple2d.frag"),
        }
    }
}

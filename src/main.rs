use anyhow::Result;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::num::NonZeroU32;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};

use gles_triangle::{
    config::AppConfig,
    render::{
        buffer::{Vertex, VertexBuffer},
        context::WindowContext,
        driver::Gl,
        shader::ShaderProgram,
    },
};

/// The whole scene. Matches the single position input of simple2d.vert.
const TRIANGLE: [Vertex; 3] = [
    Vertex {
        position: [0.0, -0.9],
    },
    Vertex {
        position: [0.9, 0.9],
    },
    Vertex {
        position: [-0.9, 0.9],
    },
];

struct App {
    ctx: WindowContext,
    program: ShaderProgram<Gl>,
    triangle: VertexBuffer<Gl>,
    clear_color: [f32; 4],
}

impl App {
    fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        let (ctx, event_loop) = WindowContext::new(config)?;

        // Present an empty frame so the window comes up in the clear color
        // before shader compilation runs.
        let [r, g, b, a] = config.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
        ctx.swap_buffers()?;

        let driver = Gl;
        let program =
            ShaderProgram::load(&driver, &config.vertex_shader, &config.fragment_shader)?;
        info!("Shader program ready");

        let triangle = VertexBuffer::new(&driver, &TRIANGLE)?;
        info!("Triangle VBO uploaded");

        Ok((
            Self {
                ctx,
                program,
                triangle,
                clear_color: config.clear_color,
            },
            event_loop,
        ))
    }

    /// Draws the one static frame. Called once at startup and again whenever
    /// the window system asks for the contents back; there is no per-frame
    /// update logic.
    fn render(&self) -> Result<()> {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        self.program.set_used();
        self.triangle.bind_position_attribute();
        self.triangle.draw();

        self.ctx.swap_buffers()
    }
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;
    info!("Starting up");

    let config = AppConfig::default();
    let (app, event_loop) = App::new(&config)?;

    app.render()?;
    info!("First frame presented");

    event_loop.run(move |event, elwt| {
        // Block until the window system delivers an event.
        elwt.set_control_flow(ControlFlow::Wait);

        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::CloseRequested => {
                    info!("Quit requested");
                    elwt.exit();
                }
                WindowEvent::Resized(size) => {
                    if let (Some(width), Some(height)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        app.ctx.resize(width, height);
                        app.ctx.window.request_redraw();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Err(err) = app.render() {
                        error!("Redraw failed: {}", err);
                        elwt.exit();
                    }
                }
                _ => (),
            }
        }
    })?;

    Ok(())
}

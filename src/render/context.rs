use anyhow::{anyhow, Context as _, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::info;
use raw_window_handle::HasRawWindowHandle;
use std::{ffi::CString, num::NonZeroU32};
use winit::{
    dpi::LogicalSize,
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use crate::config::AppConfig;

/// The window plus the GL context and surface rendering into it. Creating
/// one makes the context current and loads the GL entry points, so [`Gl`]
/// calls are valid from then on.
///
/// [`Gl`]: super::driver::Gl
pub struct WindowContext {
    pub window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

impl WindowContext {
    /// Builds the event loop and window, requests an OpenGL ES 3.0 context
    /// and makes it current. Every failure here is fatal to the caller.
    pub fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new()
            .build()
            .context("couldn't create the event loop")?;

        let window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() < accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .map_err(|err| anyhow!("couldn't pick a GL config: {}", err))?;

        let window = window.ok_or_else(|| anyhow!("couldn't create the main window"))?;
        info!("Window created");

        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("couldn't create an OpenGL ES 3.0 context")?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("couldn't create the GL surface")?
        };

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("couldn't make the GL context current")?;
        info!("GL context current");

        gl::load_with(|symbol| {
            let symbol = CString::new(symbol).unwrap();
            gl_display.get_proc_address(symbol.as_c_str()) as *const _
        });

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
            },
            event_loop,
        ))
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("couldn't swap buffers")
    }

    pub fn resize(&self, width: NonZeroU32, height: NonZeroU32) {
        self.gl_surface.resize(&self.gl_context, width, height);
        unsafe {
            gl::Viewport(0, 0, width.get() as i32, height.get() as i32);
        }
    }
}

//! Flow control and application event loop.
//!
//! This module opens the window, owns the GPU [`Context`] and drives an
//! [`Engine`] frame by frame on behalf of a [`Client`].
//!
//! # User-facing types
//!
//! - [`Client`] is the trait for games/applications that react to input and update the scene
//! - [`Key`] is the engine's key code, translated from winit keyboard events
//!
//! # Lifecycle Flow
//!
//! Once the window exists [`Client::on_init`] runs, then the event loop
//! follows this pattern each frame:
//! 1. Collect window events; key presses go to [`Client::on_key`]
//! 2. Call [`Client::on_update`]
//! 3. Run [`Engine::frame`]: movement tick, render list pass, render into the context
//! 4. Present the frame and refresh the window title with [`Client::status`]

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{self, KeyCode, NamedKey, PhysicalKey},
    window::Window,
};

use crate::{context::Context, engine::Engine};

/// Engine key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, as typed.
    Char(char),
    Up,
    Down,
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    CtrlLeft,
    CtrlRight,
    AltLeft,
    AltRight,
    /// Function key `F1..=F12`.
    F(u8),
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
}

impl Key {
    /// Translate a winit key event. Keys without an engine code yield `None`.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if let PhysicalKey::Code(code) = event.physical_key {
            let modifier = match code {
                KeyCode::ShiftLeft => Some(Key::ShiftLeft),
                KeyCode::ShiftRight => Some(Key::ShiftRight),
                KeyCode::ControlLeft => Some(Key::CtrlLeft),
                KeyCode::ControlRight => Some(Key::CtrlRight),
                KeyCode::AltLeft => Some(Key::AltLeft),
                KeyCode::AltRight => Some(Key::AltRight),
                _ => None,
            };
            if modifier.is_some() {
                return modifier;
            }
        }
        match &event.logical_key {
            keyboard::Key::Character(text) => text.chars().next().map(Key::Char),
            keyboard::Key::Named(named) => Self::from_named(*named),
            _ => None,
        }
    }

    fn from_named(named: NamedKey) -> Option<Self> {
        let key = match named {
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Insert => Key::Insert,
            NamedKey::Delete => Key::Delete,
            NamedKey::Space => Key::Char(' '),
            NamedKey::F1 => Key::F(1),
            NamedKey::F2 => Key::F(2),
            NamedKey::F3 => Key::F(3),
            NamedKey::F4 => Key::F(4),
            NamedKey::F5 => Key::F(5),
            NamedKey::F6 => Key::F(6),
            NamedKey::F7 => Key::F(7),
            NamedKey::F8 => Key::F(8),
            NamedKey::F9 => Key::F(9),
            NamedKey::F10 => Key::F(10),
            NamedKey::F11 => Key::F(11),
            NamedKey::F12 => Key::F(12),
            _ => return None,
        };
        Some(key)
    }
}

/// Trait for implementing an application on top of the engine.
///
/// The client builds its scene into the [`Engine`] before [`run`] is called
/// and afterwards mutates it from the callbacks below.
pub trait Client {
    /// Invoked once the window and its GPU context exist.
    fn on_init(&mut self, _engine: &mut Engine) {}

    /// Invoked for every key press (key repeats included).
    fn on_key(&mut self, engine: &mut Engine, key: Key);

    /// Invoked once per frame before the scene is traversed.
    fn on_update(&mut self, _engine: &mut Engine) {}

    fn on_resize(&mut self, _engine: &mut Engine, _width: u32, _height: u32) {}

    fn on_close(&mut self, _engine: &mut Engine) {}

    /// Status line shown next to the window title.
    fn status(&self, _engine: &Engine) -> Option<String> {
        None
    }
}

pub struct App<C: Client> {
    async_runtime: tokio::runtime::Runtime,
    engine: Engine,
    client: C,
    ctx: Option<Context>,
    title: String,
    error: Option<anyhow::Error>,
}

impl<C: Client> App<C> {
    fn new(engine: Engine, client: C) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            title: engine.config.title.clone(),
            engine,
            client,
            ctx: None,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        self.client.on_update(&mut self.engine);
        self.engine.frame(ctx);

        match ctx.present(self.engine.config.clear_colour, self.engine.wireframe()) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = ctx.window.inner_size();
                ctx.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {e}"),
        }

        let title = match self.client.status(&self.engine) {
            Some(status) => format!("{} | {status}", self.engine.config.title),
            None => self.engine.config.title.clone(),
        };
        if title != self.title {
            ctx.window.set_title(&title);
            self.title = title;
        }
        ctx.window.request_redraw();
    }
}

impl<C: Client> ApplicationHandler for App<C> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }
        let config = &self.engine.config;
        let shadow_colour = config.shadow_colour;
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let ctx = match self
            .async_runtime
            .block_on(Context::new(window, shadow_colour))
        {
            Ok(ctx) => ctx,
            Err(e) => return self.fail(event_loop, e.context("cannot create the main context")),
        };
        let size = ctx.window.inner_size();
        self.engine.resize(size.width, size.height);
        self.client.on_init(&mut self.engine);
        ctx.window.request_redraw();
        self.ctx = Some(ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.client.on_close(&mut self.engine);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.resize(size.width, size.height);
                }
                self.engine.resize(size.width, size.height);
                self.client
                    .on_resize(&mut self.engine, size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(key) = Key::from_event(&event) {
                    self.client.on_key(&mut self.engine, key);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Open a window and drive `engine` for `client` until the window is closed.
pub fn run<C: Client>(engine: Engine, client: C) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(engine, client)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

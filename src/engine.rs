//! Engine context.
//!
//! [`Engine`] bundles everything a frame needs: the [`Scene`], the root node
//! to draw, the [`RenderList`] with its active camera, the viewport size, the
//! frame counter and the wireframe toggle. Clients get `&mut Engine` in every
//! callback and drive the scene through it.

use std::path::Path;

use cgmath::{Matrix4, SquareMatrix, Vector4};
use instant::{Duration, Instant};
use log::{info, warn};

use crate::{
    data_structures::{light::MAX_LIGHTS, scene_graph::{NodeId, Scene}},
    render::{RenderList, Renderer},
    resources,
};

/// Start-up settings of the engine and its window.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    /// Plane receiving planar shadows, `None` disables them.
    pub shadow_plane: Option<Vector4<f32>>,
    pub shadow_colour: [f32; 4],
    pub max_lights: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "hanoi-ngin".to_string(),
            width: 1066,
            height: 600,
            clear_colour: wgpu::Color {
                r: 0.75,
                g: 0.75,
                b: 0.75,
                a: 1.0,
            },
            shadow_plane: Some(Vector4::new(0.0, 1.0, 0.0, 0.0)),
            shadow_colour: [0.65, 0.65, 0.65, 0.1],
            max_lights: MAX_LIGHTS,
        }
    }
}

/// Counts frames and publishes the count once per second.
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    fps: u32,
    since: Instant,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frames: 0,
            fps: 0,
            since: Instant::now(),
        }
    }
}

impl FpsCounter {
    pub fn frame(&mut self) {
        self.frame_at(Instant::now());
    }

    pub fn frame_at(&mut self, now: Instant) {
        self.frames += 1;
        if now.duration_since(self.since) >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.since = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[derive(Debug)]
pub struct Engine {
    pub config: EngineConfig,
    scene: Scene,
    root: Option<NodeId>,
    list: RenderList,
    viewport: (u32, u32),
    fps: FpsCounter,
    wireframe: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let mut list = RenderList::new();
        list.set_shadow_plane(config.shadow_plane);
        Self {
            scene: Scene::with_light_capacity(config.max_lights),
            root: None,
            list,
            viewport: (config.width, config.height.max(1)),
            fps: FpsCounter::default(),
            wireframe: false,
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Load a glTF scene and make it the root.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> anyhow::Result<NodeId> {
        let root = resources::load_scene_gltf(&mut self.scene, path)?;
        self.root = Some(root);
        Ok(root)
    }

    /// Render through `camera` from now on and fit it to the viewport.
    pub fn set_active_camera(&mut self, camera: NodeId) -> bool {
        if !self.list.set_camera(&self.scene, camera) {
            return false;
        }
        let (w, h) = self.viewport;
        if let Some(camera) = self.scene.camera_mut(camera) {
            camera.fit_viewport(w, h);
        }
        if let Some(name) = self.scene.name(camera) {
            info!("Active camera: {name}");
        }
        true
    }

    pub fn active_camera(&self) -> Option<NodeId> {
        self.list.camera()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let height = height.max(1);
        self.viewport = (width, height);
        if let Some(camera) = self.list.camera().and_then(|c| self.scene.camera_mut(c)) {
            camera.fit_viewport(width, height);
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Tick, collect and draw one frame.
    pub fn frame(&mut self, renderer: &mut dyn Renderer) -> bool {
        let Some(root) = self.root else {
            warn!("frame: no root node to render");
            return false;
        };
        self.list.pass(&mut self.scene, root, Matrix4::identity());
        let rendered = self.list.render(&self.scene, renderer);
        self.list.clear();
        self.fps.frame();
        rendered
    }

    pub fn render_list(&self) -> &RenderList {
        &self.list
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }
}

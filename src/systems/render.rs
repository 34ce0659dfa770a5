//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface (the capability check)
//! - Mesh and snow pipelines
//! - Texture and per-entity uploads
//! - Frame rendering

use std::collections::BTreeSet;
use std::sync::Arc;

use snowfall_core::AssetCache;
use snowfall_render::{
    frame_uniforms, snow_uniforms, Camera, MeshPipeline, RenderContext, RenderError, SceneObjects, SnowPipeline,
    TextureStore,
};
use winit::window::Window;

use crate::scene::Scene;

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    mesh_pipeline: MeshPipeline,
    snow_pipeline: Option<SnowPipeline>,
    textures: TextureStore,
    objects: SceneObjects,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create the render system for a window
    ///
    /// Fails with [`RenderError::Unsupported`] when the machine cannot render.
    pub fn new(window: Arc<Window>, vsync: bool, clear_color: wgpu::Color) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::new(window, vsync))?;

        let mut mesh_pipeline = MeshPipeline::new(&context.device, context.surface_format());
        mesh_pipeline.ensure_depth_texture(&context.device, context.size.width, context.size.height);
        let textures = TextureStore::new(&context.device, &context.queue);

        Ok(Self {
            context,
            mesh_pipeline,
            snow_pipeline: None,
            textures,
            objects: SceneObjects::new(),
            clear_color,
        })
    }

    /// Upload the scene's textures and create the snow pipeline
    ///
    /// Textures missing from the cache fall back to plain white.
    pub fn prepare_scene(&mut self, scene: &Scene, assets: &AssetCache) {
        let names = texture_names(scene);
        let uploaded = self.textures.upload_from(
            &self.context.device,
            &self.context.queue,
            assets,
            names.iter().map(String::as_str),
        );
        log::info!("Uploaded {} of {} textures", uploaded, names.len());

        self.snow_pipeline = scene.snow.as_ref().map(|field| {
            let texture = self.textures.resolve(field.texture());
            SnowPipeline::new(&self.context.device, self.context.surface_format(), texture, field)
        });
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(winit::dpi::PhysicalSize::new(width, height));
        self.mesh_pipeline
            .ensure_depth_texture(&self.context.device, self.context.size.width, self.context.size.height);
    }

    /// Re-apply the surface configuration after it was lost
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Render a single frame
    ///
    /// Dirty entities are re-uploaded first; meshes are drawn before snow.
    pub fn render_frame(&mut self, scene: &mut Scene, camera: &mut Camera) -> Result<(), RenderError> {
        let (width, height) = self.size();
        camera.set_aspect(width, height);

        let device = &self.context.device;
        let queue = &self.context.queue;
        self.objects
            .sync(device, queue, &self.mesh_pipeline, &self.textures, &mut scene.world);
        self.mesh_pipeline.update_scene(queue, &frame_uniforms(&scene.world, camera));
        if let (Some(pipeline), Some(field)) = (self.snow_pipeline.as_ref(), scene.snow.as_ref()) {
            pipeline.update_uniforms(queue, &snow_uniforms(field, camera, (width, height)));
        }

        let depth_view = self
            .mesh_pipeline
            .depth_view()
            .ok_or_else(|| RenderError::Other("depth texture missing".to_string()))?;

        // Get surface texture
        let output = self.context.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pipeline.begin(&mut pass);
            self.objects.draw(&mut pass, &self.mesh_pipeline, &scene.world);
            if let Some(snow) = &self.snow_pipeline {
                snow.draw(&mut pass);
            }
        }

        // Submit
        queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }

    /// Number of entities with GPU resources
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// Every texture the scene refers to, sorted and without duplicates
fn texture_names(scene: &Scene) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = scene
        .world
        .iter()
        .filter_map(|entity| entity.material.map_name())
        .map(str::to_string)
        .collect();
    if let Some(texture) = scene.snow.as_ref().and_then(|field| field.texture()) {
        names.insert(texture.to_string());
    }
    names
}

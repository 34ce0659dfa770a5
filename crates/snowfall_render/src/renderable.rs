//! GPU mirrors of scene entities
//!
//! [`SceneObjects`] keeps one [`GpuObject`] per entity key and only re-uploads
//! what an entity's dirty flags say changed. Textures are uploaded once by
//! [`TextureStore::upload_from`]; an entity whose texture is not in the store
//! is bound to the white placeholder for the rest of the run.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use snowfall_core::{AssetCache, DirtyFlags, EntityKey, MeshData, TextureData, World};

use crate::pipeline::{MeshPipeline, MeshVertex, ObjectBinding};
use crate::texture::GpuTexture;
use crate::uniforms::object_uniforms;

/// Interleave positions, normals and UVs; missing attributes default to zero
pub fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).map_or([0.0, 1.0, 0.0], |n| n.to_array()),
            uv: mesh.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

/// Vertex and index buffers for one mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// Line-list indices, present only for wireframe materials
    pub wireframe: Option<(wgpu::Buffer, u32)>,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, mesh: &MeshData, wireframe: bool) -> Self {
        let mut vertices = mesh_vertices(mesh);
        if vertices.is_empty() {
            vertices.push(MeshVertex::default());
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let (index_buffer, index_count) = upload_indices(device, &mesh.indices, "Mesh Index Buffer");
        let wireframe = wireframe.then(|| upload_indices(device, &mesh.wireframe_indices(), "Wireframe Index Buffer"));

        Self {
            vertex_buffer,
            index_buffer,
            index_count,
            wireframe,
        }
    }
}

fn upload_indices(device: &wgpu::Device, indices: &[u32], label: &str) -> (wgpu::Buffer, u32) {
    let (contents, count) = index_contents(indices);
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(contents),
        usage: wgpu::BufferUsages::INDEX,
    });
    (buffer, count)
}

/// Buffer contents and draw count; wgpu rejects zero-sized buffers
fn index_contents(indices: &[u32]) -> (&[u32], u32) {
    if indices.is_empty() {
        let padding: &[u32] = &[0];
        (padding, 0)
    } else {
        (indices, indices.len() as u32)
    }
}

/// Uploaded textures by asset name, with a white fallback
pub struct TextureStore {
    white: GpuTexture,
    textures: HashMap<String, GpuTexture>,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            white: GpuTexture::white(device, queue),
            textures: HashMap::new(),
        }
    }

    pub fn white(&self) -> &GpuTexture {
        &self.white
    }

    pub fn get(&self, name: &str) -> Option<&GpuTexture> {
        self.textures.get(name)
    }

    /// The named texture, or white when it is missing or `name` is `None`
    pub fn resolve(&self, name: Option<&str>) -> &GpuTexture {
        name.and_then(|n| self.textures.get(n)).unwrap_or(&self.white)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Upload every named texture the cache holds that is not on the GPU yet
    ///
    /// Returns how many were uploaded.
    pub fn upload_from<'a>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        assets: &AssetCache,
        names: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let mut uploaded = 0;
        for name in names {
            if self.textures.contains_key(name) {
                continue;
            }
            if let Some(data) = assets.get_named::<TextureData>(name) {
                let texture = GpuTexture::from_data(device, queue, &data, name);
                log::debug!("Uploaded texture {} ({}x{})", name, texture.width, texture.height);
                self.textures.insert(name.to_string(), texture);
                uploaded += 1;
            }
        }
        uploaded
    }
}

/// Texture name to bind for a wanted map; `None` means the white fallback
pub fn bound_texture<'a>(wanted: Option<&'a str>, available: impl Fn(&str) -> bool) -> Option<&'a str> {
    wanted.filter(|name| available(name))
}

/// GPU resources of one entity
pub struct GpuObject {
    pub mesh: GpuMesh,
    pub binding: ObjectBinding,
    /// Texture currently bound, `None` for the white fallback
    texture: Option<String>,
}

/// GPU objects keyed by entity
#[derive(Default)]
pub struct SceneObjects {
    objects: HashMap<EntityKey, GpuObject>,
}

impl SceneObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, key: EntityKey) -> Option<&GpuObject> {
        self.objects.get(&key)
    }

    /// Bring GPU objects in line with the world, then clear its dirty flags
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &MeshPipeline,
        textures: &TextureStore,
        world: &mut World,
    ) {
        self.objects.retain(|key, _| world.get_entity(*key).is_some());

        for (key, entity) in world.iter_with_keys() {
            let wanted = bound_texture(entity.material.map_name(), |name| textures.contains(name));

            let mut dirty = entity.dirty_flags();
            let created = !self.objects.contains_key(&key);
            if created {
                let object = GpuObject {
                    mesh: GpuMesh::new(device, &entity.mesh, entity.material.wireframe),
                    binding: pipeline.create_object(device, textures.resolve(wanted)),
                    texture: wanted.map(str::to_string),
                };
                self.objects.insert(key, object);
                dirty = DirtyFlags::ALL;
            }
            let Some(object) = self.objects.get_mut(&key) else {
                continue;
            };

            let wireframe_changed = entity.material.wireframe != object.mesh.wireframe.is_some();
            if !created && (dirty.contains(DirtyFlags::MESH) || wireframe_changed) {
                object.mesh = GpuMesh::new(device, &entity.mesh, entity.material.wireframe);
            }

            if object.texture.as_deref() != wanted {
                pipeline.rebind_texture(device, &mut object.binding, textures.resolve(wanted));
                object.texture = wanted.map(str::to_string);
                dirty |= DirtyFlags::MATERIAL;
            }

            if !dirty.is_empty() {
                pipeline.update_object(queue, &object.binding, &object_uniforms(entity, wanted.is_some()));
            }
        }

        world.clear_all_dirty();
    }

    /// Draw opaque entities first, then transparent ones
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &MeshPipeline, world: &World) {
        pipeline.begin(pass);
        for transparent in [false, true] {
            for (key, entity) in world.iter_with_keys() {
                if entity.material.transparent != transparent {
                    continue;
                }
                if let Some(object) = self.objects.get(&key) {
                    pipeline.draw(pass, &object.mesh, &object.binding, &entity.material);
                }
            }
        }
    }
}

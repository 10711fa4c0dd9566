//! Rendering system with wgpu pipelines for sky, water and cloud.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::{Error, Result};
use crate::ocean::{Vertex, WaterMesh, WaveField};
use crate::params::{Rgb, WaterPreset};
use crate::scene::{CloudModel, CloudVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// `uVariant` values understood by `water.wgsl`
pub const VARIANT_OCTAVE: u32 = 0;
pub const VARIANT_RADIAL: u32 = 1;

/// Uniform buffer for the water shader (camera + every wave uniform)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub color_near: [f32; 4],
    pub color_far: [f32; 4],
    pub big_waves_frequency: [f32; 2],
    pub time: f32,
    pub big_waves_elevation: f32,
    pub big_waves_speed: f32,
    pub small_waves_elevation: f32,
    pub small_waves_frequency: f32,
    pub small_waves_speed: f32,
    pub small_waves_iterations: u32,
    pub color_offset: f32,
    pub color_multiplier: f32,
    pub wave_speed: f32,
    pub wave_amplitude: f32,
    pub texture_size: f32,
    pub variant: u32,
    pub combine_sign: f32,
    pub falloff_radius: f32,
    pub _padding: [f32; 3], // Padding for alignment
}

impl WaterUniforms {
    /// Pack the field's preset for frame time `time_s`
    ///
    /// Colours are converted to linear because the surface format is sRGB.
    pub fn new(view_proj: Mat4, field: &WaveField, time_s: f32) -> Self {
        let (near, far) = field.preset().colors();
        let mut uniforms = Self {
            view_proj: view_proj.to_cols_array_2d(),
            color_near: near.to_linear().to_vec4(),
            color_far: far.to_linear().to_vec4(),
            time: time_s,
            ..Self::zeroed()
        };

        match field.preset() {
            WaterPreset::Octave(c) => {
                uniforms.variant = VARIANT_OCTAVE;
                uniforms.big_waves_frequency = c.big_waves_frequency;
                uniforms.big_waves_elevation = c.big_waves_elevation;
                uniforms.big_waves_speed = c.big_waves_speed;
                uniforms.small_waves_elevation = c.small_waves_elevation;
                uniforms.small_waves_frequency = c.small_waves_frequency;
                uniforms.small_waves_speed = c.small_waves_speed;
                uniforms.small_waves_iterations = c.small_waves_iterations;
                uniforms.color_offset = c.color_offset;
                uniforms.color_multiplier = c.color_multiplier;
                uniforms.combine_sign = c.combine.sign();
            }
            WaterPreset::Radial(c) => {
                uniforms.variant = VARIANT_RADIAL;
                uniforms.wave_speed = c.wave_speed;
                uniforms.wave_amplitude = c.wave_amplitude;
                uniforms.texture_size = c.texture_size;
                uniforms.falloff_radius = c.falloff_radius;
            }
        }
        uniforms
    }
}

/// Uniform buffer for sky shader (inverse view-projection + backdrop)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    pub sky_color: [f32; 4],
    pub time: f32,
    /// 1.0 shows the starfield
    pub stars: f32,
    pub _padding: [f32; 2], // Padding for alignment
}

impl SkyUniforms {
    pub fn new(view_proj: Mat4, sky_color: Rgb, starfield: bool, time_s: f32) -> Self {
        Self {
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            sky_color: sky_color.to_linear().to_vec4(),
            time: time_s,
            stars: if starfield { 1.0 } else { 0.0 },
            _padding: [0.0; 2],
        }
    }
}

/// Uniform buffer for cloud shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CloudUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl CloudUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, color: Rgb) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: color.to_linear().to_vec4(),
        }
    }
}

/// Uploaded cloud geometry
struct CloudGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// One uniform buffer plus its bind group
struct UniformBinding {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    fn new<T: Pod>(device: &wgpu::Device, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(std::slice::from_ref(initial)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
        }
    }
}

/// Pipeline settings that differ between the three passes
struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    layout: &'a wgpu::BindGroupLayout,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    sky_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    cloud_pipeline: wgpu::RenderPipeline,
    water_vertex_buffer: wgpu::Buffer,
    water_index_buffer: wgpu::Buffer,
    water_index_count: u32,
    water_uniforms: UniformBinding,
    sky_uniforms: UniformBinding,
    cloud_uniforms: UniformBinding,
    cloud: Option<CloudGeometry>,
}

impl RenderSystem {
    /// Create new rendering system at `size` physical pixels
    pub async fn new(
        window: std::sync::Arc<winit::window::Window>,
        water_mesh: &WaterMesh,
        size: (u32, u32),
    ) -> Result<Self> {
        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Gpu(format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::Gpu("Failed to find suitable GPU adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| Error::Gpu(format!("Failed to request device: {}", e)))?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| Error::Gpu("Surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        // Load shaders
        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("water.wgsl").into()),
        });
        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
        });
        let cloud_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cloud Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("cloud.wgsl").into()),
        });

        // Create buffers
        let water_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Vertex Buffer"),
            contents: bytemuck::cast_slice(&water_mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let water_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Index Buffer"),
            contents: bytemuck::cast_slice(&water_mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let water_uniforms = UniformBinding::new(
            &device,
            "Water Uniforms",
            &WaterUniforms::zeroed(),
        );
        let sky_uniforms = UniformBinding::new(&device, "Sky Uniforms", &SkyUniforms::zeroed());
        let cloud_uniforms =
            UniformBinding::new(&device, "Cloud Uniforms", &CloudUniforms::zeroed());

        let sky_pipeline = create_pipeline(
            &device,
            config.format,
            PipelineDesc {
                label: "Sky Pipeline",
                shader: &sky_shader,
                layout: &sky_uniforms.layout,
                buffers: &[],
                blend: None,
                cull_mode: None,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Always,
            },
        );

        let water_pipeline = create_pipeline(
            &device,
            config.format,
            PipelineDesc {
                label: "Water Pipeline",
                shader: &water_shader,
                layout: &water_uniforms.layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
                }],
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                cull_mode: None,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        let cloud_pipeline = create_pipeline(
            &device,
            config.format,
            PipelineDesc {
                label: "Cloud Pipeline",
                shader: &cloud_shader,
                layout: &cloud_uniforms.layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<CloudVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                }],
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            sky_pipeline,
            water_pipeline,
            cloud_pipeline,
            water_vertex_buffer,
            water_index_buffer,
            water_index_count: water_mesh.indices.len() as u32,
            water_uniforms,
            sky_uniforms,
            cloud_uniforms,
            cloud: None,
        })
    }

    /// Reconfigure the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    /// Reconfigure with the current size (after `SurfaceError::Lost`)
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Upload cloud geometry once its loader finishes
    pub fn upload_cloud(&mut self, model: &CloudModel) {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cloud Vertex Buffer"),
                contents: bytemuck::cast_slice(&model.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cloud Index Buffer"),
                contents: bytemuck::cast_slice(&model.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.cloud = Some(CloudGeometry {
            vertex_buffer,
            index_buffer,
            index_count: model.indices.len() as u32,
        });
    }

    pub fn has_cloud(&self) -> bool {
        self.cloud.is_some()
    }

    pub fn update_water_uniforms(&self, uniforms: &WaterUniforms) {
        self.queue.write_buffer(
            &self.water_uniforms.buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );
    }

    pub fn update_sky_uniforms(&self, uniforms: &SkyUniforms) {
        self.queue
            .write_buffer(&self.sky_uniforms.buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    pub fn update_cloud_uniforms(&self, uniforms: &CloudUniforms) {
        self.queue.write_buffer(
            &self.cloud_uniforms.buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );
    }

    /// Render a frame; the cloud is drawn only when uploaded and `draw_cloud`
    pub fn render(&self, draw_cloud: bool) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Render sky first
            render_pass.set_pipeline(&self.sky_pipeline);
            render_pass.set_bind_group(0, &self.sky_uniforms.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            if draw_cloud {
                if let Some(cloud) = &self.cloud {
                    render_pass.set_pipeline(&self.cloud_pipeline);
                    render_pass.set_bind_group(0, &self.cloud_uniforms.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, cloud.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(cloud.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..cloud.index_count, 0, 0..1);
                }
            }

            // Water last so its alpha blends over the opaque geometry
            render_pass.set_pipeline(&self.water_pipeline);
            render_pass.set_bind_group(0, &self.water_uniforms.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.water_vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                self.water_index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..self.water_index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    desc: PipelineDesc,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[desc.layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{RadialWaveConfig, WaveConfig};

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        // Sizes must match the WGSL struct layouts (16-byte multiples)
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 176);
        assert_eq!(std::mem::size_of::<SkyUniforms>(), 96);
        assert_eq!(std::mem::size_of::<CloudUniforms>(), 144);
    }

    #[test]
    fn test_octave_uniforms() {
        let field = WaveField::new(WaterPreset::Octave(WaveConfig::default()));
        let uniforms = WaterUniforms::new(Mat4::IDENTITY, &field, 2.5);

        assert_eq!(uniforms.variant, VARIANT_OCTAVE);
        assert_eq!(uniforms.time, 2.5);
        assert_eq!(uniforms.combine_sign, -1.0);
        assert_eq!(uniforms.small_waves_iterations, 3);
        assert_eq!(uniforms.big_waves_frequency, [1.0, 1.5]);
    }

    #[test]
    fn test_radial_uniforms() {
        let field = WaveField::new(WaterPreset::Radial(RadialWaveConfig::default()));
        let uniforms = WaterUniforms::new(Mat4::IDENTITY, &field, 0.0);

        assert_eq!(uniforms.variant, VARIANT_RADIAL);
        assert_eq!(uniforms.wave_speed, 1.05);
        assert_eq!(uniforms.texture_size, 6.0);
        assert_eq!(uniforms.small_waves_iterations, 0);
    }

    #[test]
    fn test_sky_uniforms_star_flag() {
        let on = SkyUniforms::new(Mat4::IDENTITY, Rgb::BLACK, true, 0.0);
        let off = SkyUniforms::new(Mat4::IDENTITY, Rgb::BLACK, false, 0.0);
        assert_eq!(on.stars, 1.0);
        assert_eq!(off.stars, 0.0);
    }
}

//! SDF-based WebGPU render pipeline
//!
//! Renders the entire board in the fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::Scene;
use crate::sim::DiscKind;

/// Maximum number of discs the shader draws
const MAX_CIRCLES: usize = 16;
/// Board outline width (board units)
const OUTLINE_WIDTH: f32 = 3.0;
/// Aim line width (board units)
const AIM_WIDTH: f32 = 2.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    board_size: f32,      // offset 8
    board_margin: f32,    // offset 12
    aim_start: [f32; 2],  // offset 16
    aim_end: [f32; 2],    // offset 24
    circle_count: u32,    // offset 32
    aim_active: u32,      // offset 36
    outline_width: f32,   // offset 40
    aim_width: f32,       // offset 44
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CircleData {
    center: [f32; 2],
    radius: f32,
    kind: f32, // 0 = striker, 1 = coin
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    circles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Uniform (not storage) so the WebGL2 fallback can bind it
        let circles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("circles"),
            size: (std::mem::size_of::<CircleData>() * MAX_CIRCLES) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: circles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            circles_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the scene and draw one frame
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let (globals, circles) = pack_scene(scene, self.size);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.circles_buffer, 0, bytemuck::cast_slice(&circles));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Flatten a scene into the shader's uniform layout
fn pack_scene(scene: &Scene, size: (u32, u32)) -> (Globals, [CircleData; MAX_CIRCLES]) {
    let mut circles = [CircleData::zeroed(); MAX_CIRCLES];
    for (slot, circle) in circles.iter_mut().zip(scene.circles()) {
        *slot = CircleData {
            center: circle.center.to_array(),
            radius: circle.radius,
            kind: match circle.kind {
                DiscKind::Striker => 0.0,
                DiscKind::Coin => 1.0,
            },
        };
    }

    let (aim_start, aim_end, aim_active) = match scene.aim_line() {
        Some((a, b)) => (a.to_array(), b.to_array(), 1),
        None => ([0.0; 2], [0.0; 2], 0),
    };

    let globals = Globals {
        resolution: [size.0 as f32, size.1 as f32],
        board_size: scene.board.size,
        board_margin: scene.board.margin,
        aim_start,
        aim_end,
        circle_count: scene.circles().len().min(MAX_CIRCLES) as u32,
        aim_active,
        outline_width: OUTLINE_WIDTH,
        aim_width: AIM_WIDTH,
    };

    (globals, circles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RenderSurface, SceneSync};
    use crate::sim::{AimGesture, CarromState};
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<CircleData>(), 16);
    }

    #[test]
    fn test_pack_scene() {
        let mut state = CarromState::new(Tuning::default());
        state.aim = AimGesture::Dragging {
            press: state.striker.pos,
            pointer: Some(Vec2::new(10.0, 20.0)),
        };
        let mut scene = Scene::new(state.board);
        SceneSync::new().sync(&state, &mut scene);

        let (globals, circles) = pack_scene(&scene, (800, 600));
        assert_eq!(globals.circle_count, 2);
        assert_eq!(globals.aim_active, 1);
        assert_eq!(globals.aim_start, [300.0, 500.0]);
        assert_eq!(globals.aim_end, [10.0, 20.0]);
        assert_eq!(globals.board_margin, 50.0);
        assert_eq!(circles[0].kind, 0.0);
        assert_eq!(circles[1].kind, 1.0);
        assert_eq!(circles[1].radius, 10.0);
    }

    #[test]
    fn test_pack_scene_caps_circles() {
        let mut scene = Scene::new(crate::sim::Board::new(600.0, 50.0));
        for i in 0..(MAX_CIRCLES + 4) {
            scene.create_circle(Vec2::splat(i as f32), 10.0, DiscKind::Coin);
        }
        let (globals, _) = pack_scene(&scene, (600, 600));
        assert_eq!(globals.circle_count, MAX_CIRCLES as u32);
        assert_eq!(globals.aim_active, 0);
    }
}

use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{bail, ensure, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window as OsWindow;

use crate::coords::{Vec2, Viewport};
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::paint::Color;

use super::Renderer;

/// GPU renderer drawing instanced solid quads into a window surface.
///
/// Quads are buffered between `begin_frame` and `end_frame`, then drawn in
/// submission order with a single instanced call.
pub struct WgpuRenderer {
    gpu: Gpu,
    window: Arc<OsWindow>,
    pipeline: QuadPipeline,

    clear_color: Color,
    clear_requested: bool,
    instances: Vec<QuadInstance>,

    /// `Some` between begin/end when a swapchain image was acquired.
    frame: Option<GpuFrame>,
    in_frame: bool,
}

impl WgpuRenderer {
    /// Creates the GPU context for `window` and builds the quad pipeline.
    pub async fn new(window: Arc<OsWindow>, init: GpuInit) -> Result<Self> {
        let gpu = Gpu::new(Arc::clone(&window), init).await?;
        let pipeline = QuadPipeline::new(gpu.device(), gpu.surface_format());

        Ok(Self {
            gpu,
            window,
            pipeline,
            clear_color: Color::BLACK,
            clear_requested: false,
            instances: Vec::new(),
            frame: None,
            in_frame: false,
        })
    }

    /// [`new`](Self::new) for native callers without an executor.
    ///
    /// Browsers cannot block; await [`new`](Self::new) there.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_blocking(window: Arc<OsWindow>, init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(window, init))
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn viewport(&self) -> Viewport {
        let size = self.gpu.size();
        Viewport::from_physical(size.width, size.height, self.window.scale_factor())
    }

    /// Keeps the swapchain in step with the window size.
    fn sync_surface_size(&mut self) {
        let size = self.window.inner_size();
        if size != self.gpu.size() {
            self.gpu.resize(size);
        }
    }
}

impl Renderer for WgpuRenderer {
    fn backend_name(&self) -> &'static str {
        "wgpu"
    }

    fn begin_frame(&mut self) -> Result<()> {
        ensure!(!self.in_frame, "begin_frame called twice without end_frame");
        self.in_frame = true;
        self.clear_requested = false;
        self.instances.clear();

        self.sync_surface_size();
        if !self.gpu.is_drawable() {
            return Ok(());
        }

        match self.gpu.begin_frame() {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => match self.gpu.handle_surface_error(&err) {
                SurfaceErrorAction::Fatal => {
                    self.in_frame = false;
                    bail!("surface acquisition failed: {err}");
                }
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    log::debug!("skipping frame after surface error: {err}");
                }
            },
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        ensure!(self.in_frame, "end_frame called without begin_frame");
        self.in_frame = false;

        let Some(mut frame) = self.frame.take() else {
            self.instances.clear();
            return Ok(());
        };

        let load = if self.clear_requested {
            wgpu::LoadOp::Clear(self.clear_color.to_wgpu())
        } else {
            wgpu::LoadOp::Load
        };

        let viewport = self.viewport();
        self.pipeline.prepare(
            self.gpu.device(),
            self.gpu.queue(),
            viewport,
            &self.instances,
        );
        self.pipeline
            .record(&mut frame.encoder, &frame.view, load, self.instances.len() as u32);
        self.instances.clear();

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        Ok(())
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        // Anything queued so far would be painted over.
        self.instances.clear();
        self.clear_requested = true;
    }

    fn draw_quad(&mut self, position: Vec2, size: Vec2, color: Color) {
        if !self.in_frame {
            log::warn!("draw_quad outside of a frame; ignored");
            return;
        }
        if !(size.x > 0.0 && size.y > 0.0) || !position.is_finite() {
            return;
        }

        self.instances.push(QuadInstance {
            origin: [position.x, position.y],
            size: [size.x, size.y],
            color: color.to_array(),
        });
    }
}

/// Pipeline, unit quad and growable instance buffer.
struct QuadPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl QuadPipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cafe quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cafe quad bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(size_of::<ViewportUniform>() as u64),
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cafe quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cafe quad pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), QuadInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cafe quad viewport ubo"),
            size: size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cafe quad bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cafe quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cafe quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            bind_group,
            viewport_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Uploads the viewport and this frame's instances.
    fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        viewport: Viewport,
        instances: &[QuadInstance],
    ) {
        let uniform = ViewportUniform {
            size: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&uniform));

        if instances.is_empty() {
            return;
        }

        if instances.len() > self.instance_capacity || self.instance_vbo.is_none() {
            let capacity = instances.len().next_power_of_two().max(64);
            self.instance_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("cafe quad instance vbo"),
                size: (capacity * size_of::<QuadInstance>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.instance_capacity = capacity;
        }

        if let Some(vbo) = self.instance_vbo.as_ref() {
            queue.write_buffer(vbo, 0, bytemuck::cast_slice(instances));
        }
    }

    /// Records one pass; `count` may be zero for a clear-only frame.
    fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
        count: u32,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cafe quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        if count == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        pass.set_vertex_buffer(1, instance_vbo.slice(..));
        pass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..count);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

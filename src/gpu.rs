use std::mem;

use anyhow::bail;
use bytemuck::NoUninit;
use wgpu::{
    Adapter, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsages, Color, ColorTargetState,
    ColorWrites, CommandEncoder, Device, DeviceDescriptor, FragmentState, LoadOp, MemoryHints,
    MultisampleState, Operations, PipelineCompilationOptions, PipelineLayoutDescriptor,
    PrimitiveState, PrimitiveTopology, Queue, RenderPass, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor, RequestAdapterOptions,
    ShaderModuleDescriptor, ShaderSource, ShaderStages, Surface, Texture, TextureFormat,
    VertexState,
};

use crate::{
    math::{vec2, Point, Rect, Vec2f},
    palette::Rgba,
    render::DrawCmd,
};

pub struct Gpu {
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
    /// Format of the window surface.
    pub format: TextureFormat,

    render_pipeline: RenderPipeline,
    uniforms_bgl: BindGroupLayout,
    instances_bgl: BindGroupLayout,
}

impl Gpu {
    pub fn new(
        instance: &wgpu::Instance,
        surface: &Surface<'_>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            compatible_surface: Some(surface),
            ..Default::default()
        }));
        let adapter = match adapter {
            Ok(adapter) => adapter,
            Err(e) => bail!("failed to find a supported graphics adapter: {e}"),
        };
        log::debug!("using graphics adapter {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            memory_hints: MemoryHints::MemoryUsage,
            ..Default::default()
        }))?;

        let Some(config) = surface.get_default_config(&adapter, width, height) else {
            bail!("graphics adapter does not support the window surface");
        };

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("shader"),
            source: ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // BGLs
        let uniforms_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("uniforms"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                count: None,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
            }],
        });
        let instances_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("instances"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                count: None,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
            }],
        });

        // Pipeline.
        let render_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("shape_pipeline"),
            layout: Some(&device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("shape_pipeline"),
                bind_group_layouts: &[&uniforms_bgl, &instances_bgl],
                ..Default::default()
            })),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vertex"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[],
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fragment"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: config.format,
                    blend: Some(BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: ColorWrites::all(),
                })],
            }),
            multiview: None,
            cache: None,
        });

        Ok(Gpu {
            adapter,
            device,
            queue,
            format: config.format,
            render_pipeline,
            uniforms_bgl,
            instances_bgl,
        })
    }

    /// Colors have to be converted to linear light when the surface encodes to sRGB on write.
    pub fn color(&self, color: Rgba) -> Rgba {
        if self.format.is_srgb() {
            color.to_linear()
        } else {
            color
        }
    }
}

#[derive(Clone, Copy, NoUninit)]
#[repr(C)]
pub struct Uniforms {
    /// Render target size in logical pixels.
    viewport: Vec2f,
    scale: f32,
    _padding: f32,
}

impl Uniforms {
    pub fn new(viewport: Vec2f, scale: f32) -> Self {
        Self {
            viewport,
            scale,
            _padding: 0.0,
        }
    }
}

const KIND_SEGMENT: u32 = 0;
const KIND_ELLIPSE: u32 = 1;
const KIND_RECT: u32 = 2;

/// A single shape, laid out like `Instance` in `shader.wgsl`.
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
#[repr(C)]
struct Instance {
    /// Premultiplied.
    color: [f32; 4],
    a: Vec2f,
    b: Vec2f,
    radius: f32,
    outline: f32,
    blur: f32,
    kind: u32,
}

impl Instance {
    fn segment(from: Point, to: Point, width: f32, color: [f32; 4]) -> Self {
        Self {
            color,
            a: from,
            b: to,
            radius: width / 2.0,
            outline: 0.0,
            blur: 0.0,
            kind: KIND_SEGMENT,
        }
    }

    fn ellipse(bounds: Rect, outline: f32, color: [f32; 4]) -> Self {
        Self {
            color,
            a: bounds.center(),
            b: bounds.size() * 0.5,
            radius: 0.0,
            outline,
            blur: 0.0,
            kind: KIND_ELLIPSE,
        }
    }

    fn circle(center: Point, diameter: f32, color: [f32; 4]) -> Self {
        Self::ellipse(
            Rect::from_center_size(center, vec2(diameter, diameter)),
            0.0,
            color,
        )
    }

    fn rect(bounds: Rect, corner_radius: f32, blur: f32, color: [f32; 4]) -> Self {
        Self {
            color,
            a: bounds.min,
            b: bounds.max,
            radius: corner_radius,
            outline: 0.0,
            blur,
            kind: KIND_RECT,
        }
    }
}

/// Breaks draw commands down into the shapes the shader knows, preserving their order.
///
/// Paths become one segment per pair of points, with a circle on every point for the round joins
/// and caps.
fn tessellate(
    cmds: &[DrawCmd<'_>],
    mut convert: impl FnMut(Rgba) -> Rgba,
    out: &mut Vec<Instance>,
) {
    for cmd in cmds {
        match *cmd {
            DrawCmd::StrokePath {
                points,
                color,
                width,
            } => {
                let color = convert(color).premultiplied();
                out.extend(
                    points
                        .windows(2)
                        .map(|pair| Instance::segment(pair[0], pair[1], width, color)),
                );
                out.extend(points.iter().map(|&p| Instance::circle(p, width, color)));
            }
            DrawCmd::FillEllipse { bounds, color } => {
                out.push(Instance::ellipse(bounds, 0.0, convert(color).premultiplied()));
            }
            DrawCmd::StrokeEllipse {
                bounds,
                color,
                width,
            } => {
                out.push(Instance::ellipse(bounds, width, convert(color).premultiplied()));
            }
            DrawCmd::FillRoundedRect {
                bounds,
                corner_radius,
                color,
                blur,
            } => {
                out.push(Instance::rect(
                    bounds,
                    corner_radius,
                    blur,
                    convert(color).premultiplied(),
                ));
            }
        }
    }
}

pub struct Pass<'a> {
    gpu: &'a Gpu,
    pass: RenderPass<'a>,
}

impl<'a> Pass<'a> {
    pub fn new(gpu: &'a Gpu, enc: &'a mut CommandEncoder, target: &Texture, clear: Color) -> Self {
        let pass = enc.begin_render_pass(&RenderPassDescriptor {
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &target.create_view(&Default::default()),
                depth_slice: None,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(clear),
                    ..Default::default()
                },
            })],
            ..Default::default()
        });

        Self { gpu, pass }
    }
}

/// GPU buffers holding one frame's worth of shapes.
pub struct Batch {
    uniform_buf: Buffer,
    instance_buf: Buffer,
    uniforms_bg: BindGroup,
    instances_bg: BindGroup,
    /// Reused between frames to avoid reallocating.
    instances: Vec<Instance>,
    instance_count: u32,
}

impl Batch {
    pub fn new(gpu: &Gpu) -> Self {
        let uniform_buf = gpu.device.create_buffer(&BufferDescriptor {
            label: Some("uniforms"),
            size: mem::size_of::<Uniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniforms_bg = gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some("uniforms"),
            layout: &gpu.uniforms_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(uniform_buf.as_entire_buffer_binding()),
            }],
        });
        // 1 instance preallocated
        let (instance_buf, instances_bg) = Self::create_instance_buf(gpu, 1);

        Self {
            uniform_buf,
            instance_buf,
            uniforms_bg,
            instances_bg,
            instances: Vec::new(),
            instance_count: 0,
        }
    }

    fn create_instance_buf(gpu: &Gpu, capacity: usize) -> (Buffer, BindGroup) {
        let buf = gpu.device.create_buffer(&BufferDescriptor {
            label: Some("instances"),
            size: (mem::size_of::<Instance>() * capacity) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bg = gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some("instances"),
            layout: &gpu.instances_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(buf.as_entire_buffer_binding()),
            }],
        });
        (buf, bg)
    }

    /// Uploads `cmds` to be drawn by the next [`Batch::draw`].
    pub fn prepare(&mut self, gpu: &Gpu, cmds: &[DrawCmd<'_>], uniforms: Uniforms) {
        self.instances.clear();
        tessellate(cmds, |c| gpu.color(c), &mut self.instances);

        let size = (mem::size_of::<Instance>() * self.instances.len()) as u64;
        if self.instance_buf.size() < size {
            let capacity = self.instances.len().next_power_of_two();
            log::debug!("growing instance buffer to {capacity} shapes");
            (self.instance_buf, self.instances_bg) = Self::create_instance_buf(gpu, capacity);
        }
        gpu.queue.write_buffer(
            &self.instance_buf,
            0,
            bytemuck::cast_slice(&self.instances),
        );
        gpu.queue
            .write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniforms));
        self.instance_count = self.instances.len() as u32;
    }

    pub fn draw(&self, p: &mut Pass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        p.pass.set_pipeline(&p.gpu.render_pipeline);
        p.pass.set_bind_group(0, &self.uniforms_bg, &[]);
        p.pass.set_bind_group(1, &self.instances_bg, &[]);
        p.pass.draw(0..4, 0..self.instance_count);
    }
}

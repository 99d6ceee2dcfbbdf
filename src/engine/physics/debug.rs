use glam::{Vec2, Vec4};
use rapier2d::prelude::*;
use wgpu::util::DeviceExt;

use super::collision::CollisionType;
use super::world::DebugData;
use crate::engine::renderer::LineVertex;

const DYNAMIC_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 0.8);
const FIXED_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 0.8);
const KINEMATIC_COLOR: Vec4 = Vec4::new(0.0, 0.5, 1.0, 0.8);
const PLATFORM_COLOR: Vec4 = Vec4::new(1.0, 0.6, 0.1, 0.9);
const SLEEPING_COLOR: Vec4 = Vec4::new(0.3, 0.5, 0.3, 0.8);
const CONTACT_COLOR: Vec4 = Vec4::new(1.0, 0.1, 0.1, 1.0);

/// Half-length of the cross marking a contact point
const CONTACT_MARKER_SIZE: Real = 4.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DebugUniforms {
    view_proj: [[f32; 4]; 4],
}

/// Line-list geometry for the colliders and contacts of a physics world
#[derive(Debug, Default)]
pub struct DebugGeometry {
    vertices: Vec<LineVertex>,
    indices: Vec<u32>,
}

impl DebugGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the geometry from the current world state
    pub fn rebuild(&mut self, data: &DebugData<'_>, show_contacts: bool) {
        self.vertices.clear();
        self.indices.clear();

        let identity = Isometry::identity();
        for (_handle, collider) in data.colliders.iter() {
            let parent_body = collider.parent().and_then(|h| data.rigid_bodies.get(h));
            let body_pos = parent_body.map(|b| b.position()).unwrap_or(&identity);
            let transform = body_pos * collider.position_wrt_parent().copied().unwrap_or(identity);

            let color = match parent_body {
                Some(_) if CollisionType::of(collider) == CollisionType::PLATFORM => PLATFORM_COLOR,
                Some(body) if body.is_sleeping() => SLEEPING_COLOR,
                Some(body) => match body.body_type() {
                    RigidBodyType::Dynamic => DYNAMIC_COLOR,
                    RigidBodyType::Fixed => FIXED_COLOR,
                    RigidBodyType::KinematicPositionBased
                    | RigidBodyType::KinematicVelocityBased => KINEMATIC_COLOR,
                },
                None => Vec4::ONE,
            };

            self.draw_collider_shape(collider, &transform, color);
        }

        if show_contacts {
            for pair in data.narrow_phase.contact_pairs() {
                for manifold in &pair.manifolds {
                    for contact in &manifold.data.solver_contacts {
                        self.draw_cross(
                            &Isometry::translation(contact.point.x, contact.point.y),
                            CONTACT_MARKER_SIZE,
                            CONTACT_COLOR,
                        );
                    }
                }
            }
        }
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn push_vertex(&mut self, point: Point<Real>, color: Vec4) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(LineVertex::new(Vec2::new(point.x, point.y), color));
        index
    }

    /// Draw a collider shape
    fn draw_collider_shape(&mut self, collider: &Collider, transform: &Isometry<Real>, color: Vec4) {
        let shape = collider.shape();
        match shape.shape_type() {
            ShapeType::ConvexPolygon => {
                if let Some(polygon) = shape.as_convex_polygon() {
                    self.draw_loop(transform, polygon.points(), color);
                }
            }
            ShapeType::Cuboid => {
                if let Some(cuboid) = shape.as_cuboid() {
                    let he = cuboid.half_extents;
                    let corners = [
                        point![-he.x, -he.y],
                        point![he.x, -he.y],
                        point![he.x, he.y],
                        point![-he.x, he.y],
                    ];
                    self.draw_loop(transform, &corners, color);
                }
            }
            ShapeType::Segment => {
                if let Some(segment) = shape.as_segment() {
                    let a = self.push_vertex(transform * segment.a, color);
                    let b = self.push_vertex(transform * segment.b, color);
                    self.indices.extend_from_slice(&[a, b]);
                }
            }
            ShapeType::Ball => {
                if let Some(ball) = shape.as_ball() {
                    self.draw_circle(transform, ball.radius, color);
                }
            }
            _ => {
                // For other shapes, draw a simple cross
                self.draw_cross(transform, 5.0, color);
            }
        }
    }

    /// Draw a closed polyline
    fn draw_loop(&mut self, transform: &Isometry<Real>, points: &[Point<Real>], color: Vec4) {
        let start = self.vertices.len() as u32;
        let count = points.len() as u32;
        for point in points {
            self.push_vertex(transform * point, color);
        }
        for i in 0..count {
            self.indices.push(start + i);
            self.indices.push(start + (i + 1) % count);
        }
    }

    /// Draw a circle with a radius line showing its rotation
    fn draw_circle(&mut self, transform: &Isometry<Real>, radius: Real, color: Vec4) {
        const SEGMENTS: usize = 16;
        let points: Vec<Point<Real>> = (0..SEGMENTS)
            .map(|i| {
                let angle = (i as Real / SEGMENTS as Real) * std::f32::consts::TAU;
                point![angle.cos() * radius, angle.sin() * radius]
            })
            .collect();
        self.draw_loop(transform, &points, color);

        let center = self.push_vertex(transform * Point::origin(), color);
        let rim = self.push_vertex(transform * point![radius, 0.0], color);
        self.indices.extend_from_slice(&[center, rim]);
    }

    /// Draw a cross
    fn draw_cross(&mut self, transform: &Isometry<Real>, size: Real, color: Vec4) {
        let points = [
            point![-size, 0.0],
            point![size, 0.0],
            point![0.0, -size],
            point![0.0, size],
        ];

        let start = self.vertices.len() as u32;
        for point in &points {
            self.push_vertex(transform * point, color);
        }
        self.indices
            .extend_from_slice(&[start, start + 1, start + 2, start + 3]);
    }
}

/// Default scene renderer: draws every collider as lines
pub struct DebugRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    geometry: DebugGeometry,
    show_contacts: bool,
}

impl DebugRenderer {
    /// Create a new debug renderer
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        view_proj_matrix: [[f32; 4]; 4],
        show_contacts: bool,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Physics Debug Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/debug.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Physics Debug Uniform Buffer"),
            contents: bytemuck::cast_slice(&[DebugUniforms {
                view_proj: view_proj_matrix,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Physics Debug Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Physics Debug Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Physics Debug Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Physics Debug Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[LineVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // Grown on demand in `prepare`
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Physics Debug Vertex Buffer"),
            size: 4096,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Physics Debug Index Buffer"),
            size: 4096,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
            geometry: DebugGeometry::new(),
            show_contacts,
        }
    }

    /// Toggle drawing of contact points
    pub fn toggle_contacts(&mut self) -> bool {
        self.show_contacts = !self.show_contacts;
        self.show_contacts
    }

    /// Update the view-projection matrix
    pub fn update_view_proj(&self, queue: &wgpu::Queue, view_proj: [[f32; 4]; 4]) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[DebugUniforms { view_proj }]),
        );
    }

    /// Prepare debug geometry for rendering
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &DebugData<'_>) {
        self.geometry.rebuild(data, self.show_contacts);
        if self.geometry.is_empty() {
            return;
        }

        let vertices = self.geometry.vertices();
        let indices = self.geometry.indices();
        let vertex_size = std::mem::size_of_val(vertices) as u64;
        let index_size = std::mem::size_of_val(indices) as u64;

        if vertex_size > self.vertex_buffer.size() {
            self.vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Physics Debug Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        } else {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        if index_size > self.index_buffer.size() {
            self.index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Physics Debug Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });
        } else {
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
        }
    }

    /// Render the debug geometry
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.geometry.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.geometry.indices().len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::super::body::presets;
    use super::super::world::PhysicsWorld;
    use super::*;

    #[test]
    fn test_geometry_for_box_and_segment() {
        let mut world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let ground = world.add_rigid_body(presets::static_body());
        world.add_collider(
            presets::boundary_segment(point![-10.0, 0.0], point![10.0, 0.0]),
            ground,
        );
        let body = world.add_rigid_body(presets::box_body(0.0, 5.0, 1.0, 2.0, 2.0));
        world.add_collider(
            presets::box_collider(2.0, 2.0, 0.5, CollisionType::DEFAULT).expect("valid box"),
            body,
        );

        let mut geometry = DebugGeometry::new();
        geometry.rebuild(&world.debug_data(), false);

        // Segment: 2 vertices, 1 line. Box: 4 vertices, 4 lines.
        assert_eq!(geometry.vertices().len(), 6);
        assert_eq!(geometry.indices().len(), 10);
    }

    #[test]
    fn test_box_geometry_is_translated_by_body() {
        let mut world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let body = world.add_rigid_body(presets::box_body(100.0, 50.0, 1.0, 2.0, 2.0));
        world.add_collider(
            presets::box_collider(2.0, 2.0, 0.5, CollisionType::PLATFORM).expect("valid box"),
            body,
        );

        let mut geometry = DebugGeometry::new();
        geometry.rebuild(&world.debug_data(), true);

        for vertex in geometry.vertices() {
            assert!((vertex.position[0] - 100.0).abs() <= 1.0 + 1e-4);
            assert!((vertex.position[1] - 50.0).abs() <= 1.0 + 1e-4);
            assert_eq!(vertex.color, PLATFORM_COLOR.to_array());
        }
    }

    #[test]
    fn test_empty_world_has_no_geometry() {
        let world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let mut geometry = DebugGeometry::new();
        geometry.rebuild(&world.debug_data(), true);
        assert!(geometry.is_empty());
    }
}

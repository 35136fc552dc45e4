//! Compute-kernel simulation step
//!
//! Dispatches the Life transition kernel over the grid in 16x16 tiles,
//! reading the current buffer and writing the scratch buffer.

use crate::simulation::grid::GridState;
use crate::wgpu_utils::binding_types;

/// Cells per tile edge; one workgroup covers one tile
pub const TILE_SIZE: u32 = 16;

/// The parallel compute step advancing the grid by one generation.
///
/// Holds one bind group per buffer role assignment (A reads / B writes and
/// the reverse), built once at startup. Selecting by
/// [`GridState::current_index`] makes it impossible to bind the same image
/// for read and write in a single dispatch.
pub struct SimulationStep {
    pipeline: wgpu::ComputePipeline,
    bind_groups: [wgpu::BindGroup; 2],
}

impl SimulationStep {
    pub fn new(device: &wgpu::Device, grid: &GridState) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("life_kernel"),
            source: wgpu::ShaderSource::Wgsl(include_str!("life.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("life_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: binding_types::texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: binding_types::image_2d(
                        GridState::CELL_FORMAT,
                        wgpu::StorageTextureAccess::WriteOnly,
                    ),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("life_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("life_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        // bind_groups[i]: read texture i, write texture 1 - i
        let bind_groups = [
            Self::create_bind_group(device, &bind_group_layout, grid, 0, "life_bind_a_to_b"),
            Self::create_bind_group(device, &bind_group_layout, grid, 1, "life_bind_b_to_a"),
        ];

        Self {
            pipeline,
            bind_groups,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        grid: &GridState,
        read_index: usize,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&grid.texture(read_index).view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        &grid.texture(1 - read_index).view,
                    ),
                },
            ],
        })
    }

    /// Records one generation step into `encoder`.
    ///
    /// Reads the current buffer, writes the scratch buffer. Closing the
    /// compute pass is the write-to-read fence: storage writes recorded here
    /// are visible to any later pass in the same submission. The caller must
    /// call [`GridState::advance`] after this and before recording anything
    /// that reads the new current buffer.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, grid: &GridState) {
        let (groups_x, groups_y) = dispatch_extent(grid.width(), grid.height());

        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("life_step_pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, &self.bind_groups[grid.current_index()], &[]);
        compute_pass.dispatch_workgroups(groups_x, groups_y, 1);
    }
}

/// Workgroup counts covering the whole grid, rounding partial tiles up
pub(crate) fn dispatch_extent(width: u32, height: u32) -> (u32, u32) {
    (
        (width + TILE_SIZE - 1) / TILE_SIZE,
        (height + TILE_SIZE - 1) / TILE_SIZE,
    )
}

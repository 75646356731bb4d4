//! Stacked rendering surfaces of one chart.
//!
//! Surfaces share the container and the plot origin. The base SVG sits at
//! the bottom, per-series raster surfaces above it, and a transparent SVG
//! overlay on top is the only surface that accepts pointer input.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{PlotGeometry, SurfaceId};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[serde(rename = "svg")]
    Svg,
    #[serde(rename = "canvas")]
    Canvas,
    #[serde(rename = "webgl")]
    WebGl,
}

impl SurfaceKind {
    #[must_use]
    pub fn is_raster(self) -> bool {
        matches!(self, Self::Canvas | Self::WebGl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceRole {
    /// Axes, grid, legend and SVG series.
    Base,
    /// Dedicated raster surface of one series.
    Series,
    /// Transparent top layer: guides, selection rectangle, pointer input.
    Overlay,
}

/// Host hook that creates the backing element of a surface.
pub trait SurfaceFactory {
    fn create_surface(
        &mut self,
        id: SurfaceId,
        kind: SurfaceKind,
    ) -> ChartResult<Box<dyn Renderer>>;
}

pub struct Surface {
    id: SurfaceId,
    kind: SurfaceKind,
    role: SurfaceRole,
    owner: Option<String>,
    pointer_owning: bool,
    size: (u32, u32),
    offset: (f64, f64),
    renderer: Box<dyn Renderer>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("role", &self.role)
            .field("owner", &self.owner)
            .field("pointer_owning", &self.pointer_owning)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Surface {
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    #[must_use]
    pub fn role(&self) -> SurfaceRole {
        self.role
    }

    /// Series that owns a dedicated surface.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    #[must_use]
    pub fn is_pointer_owning(&self) -> bool {
        self.pointer_owning
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn clear(&mut self) -> ChartResult<()> {
        self.renderer.clear().map_err(|err| self.wrap(err))
    }

    pub fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.renderer.render(frame).map_err(|err| self.wrap(err))
    }

    fn layout(&mut self, geometry: PlotGeometry) -> ChartResult<()> {
        // SVG surfaces span the container so axes can draw into the margin;
        // raster surfaces cover the plot area only.
        let size = if self.kind.is_raster() {
            (geometry.width.ceil() as u32, geometry.height.ceil() as u32)
        } else {
            (geometry.viewport.width, geometry.viewport.height)
        };
        self.renderer
            .resize(size.0, size.1)
            .map_err(|err| self.wrap(err))?;
        let offset = geometry.offset();
        self.renderer.set_offset(offset.0, offset.1);
        self.size = size;
        self.offset = offset;
        Ok(())
    }

    fn wrap(&self, err: ChartError) -> ChartError {
        match err {
            ChartError::Surface { .. } | ChartError::GpuContextUnavailable { .. } => err,
            other => ChartError::Surface {
                surface: self.id.raw(),
                message: other.to_string(),
            },
        }
    }
}

/// Ordered surfaces, bottom first.
#[derive(Debug, Default)]
pub struct SurfaceStack {
    surfaces: Vec<Surface>,
    next_id: usize,
}

impl SurfaceStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and stacks a surface through the host factory.
    ///
    /// Series surfaces are inserted below the overlay. A WebGL surface that
    /// cannot acquire its context fails with `GpuContextUnavailable`.
    pub fn create(
        &mut self,
        factory: &mut dyn SurfaceFactory,
        kind: SurfaceKind,
        role: SurfaceRole,
        owner: Option<&str>,
    ) -> ChartResult<SurfaceId> {
        let id = SurfaceId::new(self.next_id);
        let mut renderer = factory.create_surface(id, kind)?;
        self.next_id += 1;
        if let Err(err) = renderer.acquire() {
            warn!(surface = id.raw(), ?kind, error = %err, "surface context acquisition failed");
            if kind == SurfaceKind::WebGl {
                return Err(ChartError::GpuContextUnavailable {
                    series: owner.unwrap_or_default().to_owned(),
                });
            }
            return Err(err);
        }
        let pointer_owning = role == SurfaceRole::Overlay;
        renderer.set_pointer_events(pointer_owning);

        let surface = Surface {
            id,
            kind,
            role,
            owner: owner.map(str::to_owned),
            pointer_owning,
            size: (0, 0),
            offset: (0.0, 0.0),
            renderer,
        };
        let position = match role {
            SurfaceRole::Overlay => self.surfaces.len(),
            _ => self
                .surfaces
                .iter()
                .position(|existing| existing.role == SurfaceRole::Overlay)
                .unwrap_or(self.surfaces.len()),
        };
        debug!(surface = id.raw(), ?kind, ?role, z = position, "surface created");
        self.surfaces.insert(position, surface);
        Ok(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    #[must_use]
    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|surface| surface.id == id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.iter_mut().find(|surface| surface.id == id)
    }

    /// Stacking position, zero at the bottom.
    #[must_use]
    pub fn z_index(&self, id: SurfaceId) -> Option<usize> {
        self.surfaces.iter().position(|surface| surface.id == id)
    }

    #[must_use]
    pub fn base(&self) -> Option<SurfaceId> {
        self.first_with_role(SurfaceRole::Base)
    }

    #[must_use]
    pub fn overlay(&self) -> Option<SurfaceId> {
        self.first_with_role(SurfaceRole::Overlay)
    }

    #[must_use]
    pub fn pointer_owner(&self) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .find(|surface| surface.pointer_owning)
            .map(Surface::id)
    }

    #[must_use]
    pub fn accepts_pointer(&self, id: SurfaceId) -> bool {
        self.get(id).is_some_and(Surface::is_pointer_owning)
    }

    /// Resizes and repositions every surface for new plot geometry.
    pub fn layout(&mut self, geometry: PlotGeometry) -> ChartResult<()> {
        for surface in &mut self.surfaces {
            surface.layout(geometry)?;
        }
        Ok(())
    }

    /// Clears every raster surface.
    pub fn clear_raster(&mut self) -> ChartResult<()> {
        for surface in self.surfaces.iter_mut().filter(|s| s.kind.is_raster()) {
            surface.clear()?;
        }
        Ok(())
    }

    /// Releases and unstacks one surface. Returns `true` when removed.
    pub fn remove(&mut self, id: SurfaceId) -> bool {
        let Some(position) = self.z_index(id) else {
            return false;
        };
        let mut surface = self.surfaces.remove(position);
        surface.renderer.release();
        debug!(surface = id.raw(), "surface released");
        true
    }

    pub fn release_all(&mut self) {
        for surface in &mut self.surfaces {
            surface.renderer.release();
        }
        self.surfaces.clear();
    }

    fn first_with_role(&self, role: SurfaceRole) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .find(|surface| surface.role == role)
            .map(Surface::id)
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::SurfaceId;
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer, SurfaceFactory, SurfaceKind};

/// What a headless surface has been asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceLog {
    pub size: (u32, u32),
    pub offset: (f64, f64),
    pub pointer_events: bool,
    pub clear_count: usize,
    pub render_count: usize,
    /// Frames rendered since the last clear.
    pub frames: Vec<RenderFrame>,
    pub released: bool,
}

impl SurfaceLog {
    /// Primitives currently shown by the surface.
    #[must_use]
    pub fn visible_primitives(&self) -> usize {
        self.frames.iter().map(RenderFrame::primitive_count).sum()
    }

    #[must_use]
    pub fn visible_circles(&self) -> usize {
        self.frames.iter().map(|frame| frame.circles.len()).sum()
    }

    #[must_use]
    pub fn visible_rects(&self) -> usize {
        self.frames.iter().map(|frame| frame.rects.len()).sum()
    }
}

/// Recording renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// before a real backend is introduced.
#[derive(Debug)]
pub struct NullRenderer {
    log: Rc<RefCell<SurfaceLog>>,
    context_available: bool,
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl NullRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_log(Rc::default())
    }

    #[must_use]
    pub fn with_log(log: Rc<RefCell<SurfaceLog>>) -> Self {
        Self {
            log,
            context_available: true,
        }
    }

    /// Renderer whose context acquisition fails, like a browser without WebGL.
    #[must_use]
    pub fn without_context(mut self) -> Self {
        self.context_available = false;
        self
    }

    #[must_use]
    pub fn log(&self) -> Rc<RefCell<SurfaceLog>> {
        Rc::clone(&self.log)
    }
}

impl Renderer for NullRenderer {
    fn acquire(&mut self) -> ChartResult<()> {
        if self.context_available {
            Ok(())
        } else {
            Err(ChartError::InvalidConfig(
                "rendering context unavailable".to_owned(),
            ))
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> ChartResult<()> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        self.log.borrow_mut().size = (width, height);
        Ok(())
    }

    fn set_offset(&mut self, x: f64, y: f64) {
        self.log.borrow_mut().offset = (x, y);
    }

    fn set_pointer_events(&mut self, enabled: bool) {
        self.log.borrow_mut().pointer_events = enabled;
    }

    fn clear(&mut self) -> ChartResult<()> {
        let mut log = self.log.borrow_mut();
        log.clear_count += 1;
        log.frames.clear();
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let mut log = self.log.borrow_mut();
        log.render_count += 1;
        log.frames.push(frame.clone());
        Ok(())
    }

    fn release(&mut self) {
        self.log.borrow_mut().released = true;
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    surfaces: Vec<(SurfaceId, SurfaceKind, Rc<RefCell<SurfaceLog>>)>,
    gpu_unavailable: bool,
}

/// Surface factory producing `NullRenderer`s.
///
/// Clones share state, so a test can keep one handle and hand another to the
/// chart, then inspect what each surface recorded.
#[derive(Debug, Clone, Default)]
pub struct NullSurfaceFactory {
    state: Rc<RefCell<FactoryState>>,
}

impl NullSurfaceFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// WebGL surfaces created from now on fail to acquire a context.
    #[must_use]
    pub fn without_gpu(self) -> Self {
        self.state.borrow_mut().gpu_unavailable = true;
        self
    }

    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.state.borrow().surfaces.len()
    }

    #[must_use]
    pub fn kind(&self, id: SurfaceId) -> Option<SurfaceKind> {
        self.state
            .borrow()
            .surfaces
            .iter()
            .find(|(surface, _, _)| *surface == id)
            .map(|(_, kind, _)| *kind)
    }

    /// Snapshot of the log of one surface.
    #[must_use]
    pub fn log(&self, id: SurfaceId) -> Option<SurfaceLog> {
        self.state
            .borrow()
            .surfaces
            .iter()
            .find(|(surface, _, _)| *surface == id)
            .map(|(_, _, log)| log.borrow().clone())
    }
}

impl SurfaceFactory for NullSurfaceFactory {
    fn create_surface(
        &mut self,
        id: SurfaceId,
        kind: SurfaceKind,
    ) -> ChartResult<Box<dyn Renderer>> {
        let mut state = self.state.borrow_mut();
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        let mut renderer = NullRenderer::with_log(Rc::clone(&log));
        if kind == SurfaceKind::WebGl && state.gpu_unavailable {
            renderer = renderer.without_context();
        }
        state.surfaces.push((id, kind, log));
        Ok(Box::new(renderer))
    }
}

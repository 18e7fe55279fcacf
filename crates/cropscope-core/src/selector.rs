use std::fmt;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::config::SelectorConfig;
use crate::error::{CropscopeError, Result};
use crate::geometry::ViewportGeometry;
use crate::render::{OverviewRenderer, PreviewRenderer};
use crate::selection::{clamp, Proposal, Selection, SelectionBounds, SelectionInput};
use crate::source::{SourceImage, SourceRef};
use crate::submit::{CropReceipt, CropRequest, CropService, SubmissionAdapter};

/// Lifecycle of a Selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorPhase {
    Idle,
    Loading,
    Ready,
    Submitting,
    /// Decode failed; stays here until a new image is assigned.
    LoadFailed(String),
}

impl fmt::Display for SelectorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Submitting => write!(f, "Submitting"),
            Self::LoadFailed(msg) => write!(f, "Load failed: {msg}"),
        }
    }
}

/// Identifies one image assignment. A decode result is only accepted when
/// it carries the ticket of the latest assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub image_id: u64,
    pub generation: u64,
}

/// Identifies one commit. Only the response carrying the ticket of the
/// commit in flight returns the selector to `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitTicket {
    pub image_id: u64,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image is drawn and the selector is interactive.
    Ready(Selection),
    /// The result belonged to a superseded assignment and was dropped.
    Stale,
}

pub type RefreshCallback = Box<dyn FnMut(&CropReceipt)>;

/// Everything derived from one assigned source, replaced as a unit.
struct Session {
    source: SourceImage,
    geometry: ViewportGeometry,
    bounds: SelectionBounds,
    selection: Selection,
}

/// Square ROI selector over one source image.
///
/// Owns the selection and the viewport geometry exclusively. Every input
/// channel goes through [`Selector::apply`], which clamps the proposal and
/// redraws both surfaces before returning.
pub struct Selector {
    config: SelectorConfig,
    viewport_height: u32,
    phase: SelectorPhase,
    generation: u64,
    pending: Option<(LoadTicket, SourceRef)>,
    commit_generation: u64,
    in_flight: Option<CommitTicket>,
    session: Option<Session>,
    overview: OverviewRenderer,
    preview: PreviewRenderer,
    adapter: SubmissionAdapter,
    refresh: Option<RefreshCallback>,
}

impl Selector {
    pub fn new(config: SelectorConfig, viewport_height: u32) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            overview: OverviewRenderer::new(config.outline_color, config.outline_width),
            preview: PreviewRenderer::new(config.preview_display_size),
            adapter: SubmissionAdapter::new(config.crop_size),
            config,
            viewport_height,
            phase: SelectorPhase::Idle,
            generation: 0,
            pending: None,
            commit_generation: 0,
            in_flight: None,
            session: None,
            refresh: None,
        })
    }

    /// Register the callback run after every successful crop.
    pub fn on_refresh(&mut self, callback: impl FnMut(&CropReceipt) + 'static) {
        self.refresh = Some(Box::new(callback));
    }

    /// Viewport height used by the next image assignment.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
    }

    /// Point the selector at a new image. Discards the current image and
    /// invalidates any decode still in flight.
    pub fn assign(&mut self, source: SourceRef) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            image_id: source.id,
            generation: self.generation,
        };

        info!(
            id = source.id,
            url = %source.raster_url,
            generation = ticket.generation,
            "Assigning source image"
        );

        self.session = None;
        self.in_flight = None;
        self.overview.clear();
        self.preview.clear();
        self.pending = Some((ticket, source));
        self.phase = SelectorPhase::Loading;
        ticket
    }

    /// Deliver a decode result.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        decoded: Result<RgbaImage>,
    ) -> Result<LoadOutcome> {
        let current = self.pending.as_ref().map(|(t, _)| *t);
        if current != Some(ticket) {
            warn!(
                id = ticket.image_id,
                generation = ticket.generation,
                "Discarding stale decode result"
            );
            return Ok(LoadOutcome::Stale);
        }
        let Some((_, source_ref)) = self.pending.take() else {
            return Ok(LoadOutcome::Stale);
        };

        let raster = match decoded {
            Ok(raster) => raster,
            Err(e) => return Err(self.fail_load(e)),
        };

        let source = SourceImage::from_decoded(&source_ref, raster);
        let geometry = match ViewportGeometry::compute(
            source.width,
            source.height,
            self.viewport_height,
            self.config.display_budget,
        ) {
            Ok(g) => g,
            Err(e) => return Err(self.fail_load(e)),
        };

        let bounds = SelectionBounds::new(source.width, source.height, self.config.min_size);
        let selection = clamp(
            Proposal {
                x: 0,
                y: 0,
                size: self.config.default_size as i64,
            },
            &bounds,
        );

        self.overview.prepare(&source.raster, &geometry);
        let session = Session {
            source,
            geometry,
            bounds,
            selection,
        };
        redraw(&session, &mut self.overview, &mut self.preview);
        info!(
            id = session.source.id,
            width = session.source.width,
            height = session.source.height,
            display = %format!("{}x{}", geometry.display_width, geometry.display_height),
            "Source image ready"
        );
        self.session = Some(session);
        self.phase = SelectorPhase::Ready;

        Ok(LoadOutcome::Ready(selection))
    }

    fn fail_load(&mut self, err: CropscopeError) -> CropscopeError {
        let err = match err {
            e @ (CropscopeError::ImageLoad(_) | CropscopeError::InvalidGeometry { .. }) => e,
            other => CropscopeError::ImageLoad(other.to_string()),
        };
        warn!(error = %err, "Source image failed to load");
        self.phase = SelectorPhase::LoadFailed(err.to_string());
        err
    }

    /// Run one input through clamp-and-commit. Returns the committed
    /// selection, or `None` when the selector is not interactive.
    pub fn apply(&mut self, input: SelectionInput) -> Option<Selection> {
        if self.phase != SelectorPhase::Ready {
            debug!(phase = %self.phase, input = %input, "Input rejected");
            return None;
        }
        let session = self.session.as_mut()?;

        let proposal = input.propose(
            session.selection,
            &session.geometry,
            self.config.default_size,
        );
        session.selection = clamp(proposal, &session.bounds);
        redraw(session, &mut self.overview, &mut self.preview);

        debug!(input = %input, selection = %session.selection, "Selection committed");
        Some(session.selection)
    }

    /// Change the display-height budget; geometry and both surfaces are
    /// rebuilt before this returns.
    pub fn set_display_budget(&mut self, budget: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.display_budget = budget;
        config.validate()?;

        if let Some(session) = self.session.as_mut() {
            let geometry = ViewportGeometry::compute(
                session.source.width,
                session.source.height,
                self.viewport_height,
                budget,
            )?;
            self.overview.prepare(&session.source.raster, &geometry);
            session.geometry = geometry;
            redraw(session, &mut self.overview, &mut self.preview);
        }

        self.config = config;
        Ok(())
    }

    /// Package the current selection and enter `Submitting`. The ticket
    /// must be handed back with the service's response.
    pub fn begin_commit(&mut self) -> Result<(CommitTicket, CropRequest)> {
        let session = match (&self.phase, self.session.as_ref()) {
            (SelectorPhase::Ready, Some(session)) => session,
            _ => return Err(CropscopeError::NotReady(self.phase.to_string())),
        };

        let request = self.adapter.package(&session.selection, session.source.id);
        info!(
            x = request.x,
            y = request.y,
            zoom = request.zoom,
            source = request.source_image_id,
            "Submitting crop"
        );
        self.commit_generation += 1;
        let ticket = CommitTicket {
            image_id: request.source_image_id,
            generation: self.commit_generation,
        };
        self.in_flight = Some(ticket);
        self.phase = SelectorPhase::Submitting;
        Ok((ticket, request))
    }

    /// Deliver the crop service's response and return to `Ready`.
    ///
    /// The selection is never touched here, so a failed crop can be retried
    /// by committing again. A response for any other ticket leaves the phase
    /// alone; its receipt still reaches the refresh callback.
    pub fn finish_commit(
        &mut self,
        ticket: CommitTicket,
        response: Result<CropReceipt>,
    ) -> Result<CropReceipt> {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            self.phase = SelectorPhase::Ready;
        } else {
            debug!(
                id = ticket.image_id,
                generation = ticket.generation,
                phase = %self.phase,
                "Submission response does not match the commit in flight"
            );
        }

        match response {
            Ok(receipt) => {
                if let Some(refresh) = self.refresh.as_mut() {
                    refresh(&receipt);
                }
                Ok(receipt)
            }
            Err(e) => {
                let err = match e {
                    e @ CropscopeError::Submission(_) => e,
                    other => CropscopeError::Submission(other.to_string()),
                };
                warn!(error = %err, "Crop submission failed");
                Err(err)
            }
        }
    }

    /// Commit through `service` synchronously.
    pub fn commit(&mut self, service: &dyn CropService) -> Result<CropReceipt> {
        let (ticket, request) = self.begin_commit()?;
        let response = service.submit(&request);
        self.finish_commit(ticket, response)
    }

    /// Drop the current image and selection and return to `Idle`.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.in_flight = None;
        self.session = None;
        self.overview.clear();
        self.preview.clear();
        self.phase = SelectorPhase::Idle;
    }

    pub fn phase(&self) -> &SelectorPhase {
        &self.phase
    }

    pub fn is_interactive(&self) -> bool {
        self.phase == SelectorPhase::Ready
    }

    pub fn selection(&self) -> Option<Selection> {
        self.session.as_ref().map(|s| s.selection)
    }

    pub fn geometry(&self) -> Option<ViewportGeometry> {
        self.session.as_ref().map(|s| s.geometry)
    }

    pub fn bounds(&self) -> Option<SelectionBounds> {
        self.session.as_ref().map(|s| s.bounds)
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.session.as_ref().map(|s| &s.source)
    }

    /// Reference of the assignment still waiting for its decode.
    pub fn pending_source(&self) -> Option<&SourceRef> {
        self.pending.as_ref().map(|(_, s)| s)
    }

    pub fn overview(&self) -> &OverviewRenderer {
        &self.overview
    }

    pub fn preview(&self) -> &PreviewRenderer {
        &self.preview
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

/// Draw both surfaces from the same committed selection and geometry.
fn redraw(session: &Session, overview: &mut OverviewRenderer, preview: &mut PreviewRenderer) {
    overview.render(&session.selection, &session.geometry);
    if let Err(e) = preview.render(&session.source.raster, &session.selection) {
        warn!(error = %e, "Preview render failed");
    }
}

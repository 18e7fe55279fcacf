mod common;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;

use common::{coordinate_raster, ready_selector, solid_raster, source_ref, Lcg};
use cropscope_core::config::{CropSizePolicy, SelectorConfig};
use cropscope_core::error::{CropscopeError, Result};
use cropscope_core::geometry::DisplayPoint;
use cropscope_core::selection::{Selection, SelectionInput};
use cropscope_core::selector::{LoadOutcome, Selector, SelectorPhase};
use cropscope_core::submit::{CropReceipt, CropRequest, CropService};

struct RecordingService {
    requests: Mutex<Vec<CropRequest>>,
}

impl RecordingService {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl CropService for RecordingService {
    fn submit(&self, request: &CropRequest) -> Result<CropReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CropReceipt {
            crop_id: 7,
            source_image_id: request.source_image_id,
            x: request.x,
            y: request.y,
            size: request.zoom,
            path: PathBuf::from("crop.png"),
        })
    }
}

struct RejectingService;

impl CropService for RejectingService {
    fn submit(&self, _request: &CropRequest) -> Result<CropReceipt> {
        Err(CropscopeError::Submission("service unavailable".into()))
    }
}

#[test]
fn test_idle_rejects_inputs() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    assert_eq!(selector.phase(), &SelectorPhase::Idle);
    assert_eq!(selector.apply(SelectionInput::SetX(10)), None);
    assert!(matches!(
        selector.begin_commit(),
        Err(CropscopeError::NotReady(_))
    ));
}

#[test]
fn test_loading_rejects_inputs() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    selector.assign(source_ref(1, 2000, 1000));
    assert_eq!(selector.phase(), &SelectorPhase::Loading);
    assert_eq!(selector.apply(SelectionInput::SetSize(512)), None);
    assert!(selector.selection().is_none());
}

#[test]
fn test_load_seeds_default_selection_and_draws() {
    let selector = ready_selector(2000, 1000, 1000);
    assert_eq!(selector.phase(), &SelectorPhase::Ready);
    assert_eq!(selector.selection(), Some(Selection::new(0, 0, 256)));

    let geometry = selector.geometry().unwrap();
    assert_eq!(geometry.display_width, 1440);
    assert_eq!(geometry.display_height, 720);
    assert_eq!(selector.overview().surface().dimensions(), (1440, 720));
    assert_eq!(selector.preview().surface().dimensions(), (256, 256));
}

#[test]
fn test_default_selection_clamped_on_small_image() {
    let selector = ready_selector(100, 80, 1000);
    assert_eq!(selector.selection(), Some(Selection::new(0, 0, 80)));
}

#[test]
fn test_scenario_a_pointer_pick() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let committed = selector.apply(SelectionInput::PointerPick(DisplayPoint::new(720.0, 360.0)));
    assert_eq!(committed, Some(Selection::new(1000, 500, 256)));

    let outline = selector.overview().outline().unwrap();
    assert_eq!((outline.left, outline.top), (720, 360));

    let raster = coordinate_raster(2000, 1000);
    assert_eq!(
        selector.preview().surface().get_pixel(0, 0),
        raster.get_pixel(1000, 500)
    );
}

#[test]
fn test_scenario_b_through_selector() {
    let mut selector = ready_selector(2000, 1000, 1000);
    selector.apply(SelectionInput::SetX(1500));
    selector.apply(SelectionInput::SetY(700));
    let committed = selector.apply(SelectionInput::SetSize(3000)).unwrap();
    assert_eq!(committed, Selection::new(1000, 0, 1000));
    assert_eq!(selector.preview().surface().dimensions(), (1000, 1000));
}

#[test]
fn test_reset_keeps_origin() {
    let mut selector = ready_selector(2000, 1000, 1000);
    selector.apply(SelectionInput::SetX(800));
    selector.apply(SelectionInput::SetY(400));
    selector.apply(SelectionInput::SetSize(512));
    let committed = selector.apply(SelectionInput::ResetToDefault).unwrap();
    assert_eq!(committed, Selection::new(800, 400, 256));
}

#[test]
fn test_scenario_d_stale_decode_is_discarded() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    let ticket_a = selector.assign(source_ref(10, 400, 300));
    let ticket_b = selector.assign(source_ref(20, 600, 500));

    let raster_b = coordinate_raster(600, 500);
    let outcome = selector.complete_load(ticket_b, Ok(raster_b.clone())).unwrap();
    assert!(matches!(outcome, LoadOutcome::Ready(_)));
    selector.apply(SelectionInput::SetX(100));
    selector.apply(SelectionInput::SetSize(64));

    let preview_before = selector.preview().surface().clone();
    let overview_before = selector.overview().surface().clone();
    let selection_before = selector.selection();

    let raster_a = solid_raster(400, 300, [255, 0, 0, 255]);
    let outcome = selector.complete_load(ticket_a, Ok(raster_a)).unwrap();
    assert_eq!(outcome, LoadOutcome::Stale);

    assert_eq!(selector.preview().surface(), &preview_before);
    assert_eq!(selector.overview().surface(), &overview_before);
    assert_eq!(selector.selection(), selection_before);
    assert_eq!(selector.source().unwrap().id, 20);
    assert_eq!(selector.phase(), &SelectorPhase::Ready);
}

#[test]
fn test_stale_decode_while_loading_keeps_waiting() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    let ticket_a = selector.assign(source_ref(1, 64, 64));
    let _ticket_b = selector.assign(source_ref(2, 64, 64));

    let outcome = selector
        .complete_load(ticket_a, Ok(coordinate_raster(64, 64)))
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(selector.phase(), &SelectorPhase::Loading);
    assert_eq!(selector.pending_source().unwrap().id, 2);
}

#[test]
fn test_reassigning_same_id_invalidates_old_ticket() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    let first = selector.assign(source_ref(5, 64, 64));
    let second = selector.assign(source_ref(5, 64, 64));
    assert_ne!(first, second);

    let outcome = selector
        .complete_load(first, Ok(coordinate_raster(64, 64)))
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Stale);
}

#[test]
fn test_load_failure_is_persistent() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    let ticket = selector.assign(source_ref(3, 100, 100));
    let err = selector
        .complete_load(ticket, Err(CropscopeError::ImageLoad("decode error".into())))
        .unwrap_err();
    assert!(matches!(err, CropscopeError::ImageLoad(_)));
    assert!(matches!(selector.phase(), SelectorPhase::LoadFailed(_)));
    assert_eq!(selector.apply(SelectionInput::SetX(1)), None);

    // A second delivery for the same ticket is ignored.
    let outcome = selector
        .complete_load(ticket, Ok(coordinate_raster(100, 100)))
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(matches!(selector.phase(), SelectorPhase::LoadFailed(_)));
}

#[test]
fn test_empty_raster_fails_with_invalid_geometry() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    let ticket = selector.assign(source_ref(4, 0, 0));
    let err = selector
        .complete_load(ticket, Ok(image::RgbaImage::new(0, 0)))
        .unwrap_err();
    assert!(matches!(err, CropscopeError::InvalidGeometry { .. }));
    assert!(matches!(selector.phase(), SelectorPhase::LoadFailed(_)));
}

#[test]
fn test_decoded_dimensions_win() {
    let mut selector = Selector::new(SelectorConfig::default(), 1000).unwrap();
    let ticket = selector.assign(source_ref(6, 999, 999));
    selector
        .complete_load(ticket, Ok(coordinate_raster(320, 240)))
        .unwrap();
    let source = selector.source().unwrap();
    assert_eq!((source.width, source.height), (320, 240));
    assert_eq!(selector.bounds().unwrap().max_size(), 240);
}

#[test]
fn test_commit_success_runs_refresh_and_returns_ready() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let refreshed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&refreshed);
    selector.on_refresh(move |receipt| sink.borrow_mut().push(receipt.crop_id));

    selector.apply(SelectionInput::SetX(300));
    let service = RecordingService::new();
    let receipt = selector.commit(&service).unwrap();

    assert_eq!(receipt.x, 300);
    assert_eq!(refreshed.borrow().as_slice(), &[7]);
    assert_eq!(selector.phase(), &SelectorPhase::Ready);

    let requests = service.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        CropRequest {
            x: 300,
            y: 0,
            zoom: 256,
            source_image_id: 1,
            crop_size: 256,
        }
    );
}

#[test]
fn test_commit_failure_preserves_selection() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let refreshed = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&refreshed);
    selector.on_refresh(move |_| *sink.borrow_mut() += 1);

    selector.apply(SelectionInput::SetSize(512));
    selector.apply(SelectionInput::SetY(123));
    let before = selector.selection();

    let err = selector.commit(&RejectingService).unwrap_err();
    assert!(matches!(err, CropscopeError::Submission(_)));
    assert_eq!(selector.selection(), before);
    assert_eq!(selector.phase(), &SelectorPhase::Ready);
    assert_eq!(*refreshed.borrow(), 0);

    // Manual retry goes through.
    assert!(selector.commit(&RecordingService::new()).is_ok());
    assert_eq!(*refreshed.borrow(), 1);
}

#[test]
fn test_inputs_rejected_while_submitting() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let (ticket, request) = selector.begin_commit().unwrap();
    assert_eq!(selector.phase(), &SelectorPhase::Submitting);
    assert_eq!(selector.apply(SelectionInput::SetX(50)), None);
    assert!(matches!(
        selector.begin_commit(),
        Err(CropscopeError::NotReady(_))
    ));

    let service = RecordingService::new();
    selector.finish_commit(ticket, service.submit(&request)).unwrap();
    assert_eq!(selector.phase(), &SelectorPhase::Ready);
    assert_eq!(selector.apply(SelectionInput::SetX(50)).unwrap().x, 50);
}

#[test]
fn test_late_response_for_previous_image_keeps_commit_blocked() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let refreshed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&refreshed);
    selector.on_refresh(move |receipt| sink.borrow_mut().push(receipt.source_image_id));

    let service = RecordingService::new();
    let (first_ticket, first_request) = selector.begin_commit().unwrap();

    let load = selector.assign(source_ref(2, 800, 600));
    selector
        .complete_load(load, Ok(coordinate_raster(800, 600)))
        .unwrap();
    let (second_ticket, second_request) = selector.begin_commit().unwrap();
    assert_ne!(first_ticket, second_ticket);

    // The first image's receipt arrives while the second commit is in flight.
    selector
        .finish_commit(first_ticket, service.submit(&first_request))
        .unwrap();
    assert_eq!(selector.phase(), &SelectorPhase::Submitting);
    assert!(matches!(
        selector.begin_commit(),
        Err(CropscopeError::NotReady(_))
    ));
    assert_eq!(selector.apply(SelectionInput::SetX(10)), None);

    selector
        .finish_commit(second_ticket, service.submit(&second_request))
        .unwrap();
    assert_eq!(selector.phase(), &SelectorPhase::Ready);
    assert_eq!(refreshed.borrow().as_slice(), &[1, 2]);
}

#[test]
fn test_repeated_response_does_not_unblock_next_commit() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let service = RecordingService::new();

    let (first_ticket, first_request) = selector.begin_commit().unwrap();
    selector
        .finish_commit(first_ticket, service.submit(&first_request))
        .unwrap();
    let (second_ticket, _) = selector.begin_commit().unwrap();

    let _ = selector.finish_commit(first_ticket, service.submit(&first_request));
    assert_eq!(selector.phase(), &SelectorPhase::Submitting);

    let timeout = Err(CropscopeError::Submission("timeout".into()));
    assert!(selector.finish_commit(second_ticket, timeout).is_err());
    assert_eq!(selector.phase(), &SelectorPhase::Ready);
}

#[test]
fn test_viewport_height_applies_at_next_assignment() {
    let mut selector = ready_selector(2000, 1000, 1000);
    let before = selector.geometry().unwrap();

    selector.set_viewport_height(500);
    assert_eq!(selector.geometry(), Some(before));
    assert_eq!(selector.overview().surface().dimensions(), (1440, 720));

    let ticket = selector.assign(source_ref(2, 2000, 1000));
    selector
        .complete_load(ticket, Ok(coordinate_raster(2000, 1000)))
        .unwrap();
    let after = selector.geometry().unwrap();
    assert_eq!((after.display_width, after.display_height), (720, 360));
}

#[test]
fn test_match_selection_policy_sends_size() {
    let config = SelectorConfig {
        crop_size: CropSizePolicy::MatchSelection,
        ..SelectorConfig::default()
    };
    let mut selector = Selector::new(config, 1000).unwrap();
    let ticket = selector.assign(source_ref(9, 2000, 1000));
    selector
        .complete_load(ticket, Ok(coordinate_raster(2000, 1000)))
        .unwrap();
    selector.apply(SelectionInput::SetSize(768));

    let (_, request) = selector.begin_commit().unwrap();
    assert_eq!(request.zoom, 768);
    assert_eq!(request.crop_size, 768);
    assert_eq!(request.source_image_id, 9);
}

#[test]
fn test_dismiss_returns_to_idle() {
    let mut selector = ready_selector(300, 300, 500);
    selector.dismiss();
    assert_eq!(selector.phase(), &SelectorPhase::Idle);
    assert!(selector.selection().is_none());
    assert!(selector.geometry().is_none());
    assert_eq!(selector.preview().surface().dimensions(), (0, 0));
    assert_eq!(selector.overview().surface().dimensions(), (0, 0));
}

#[test]
fn test_set_display_budget_rebuilds_geometry() {
    let mut selector = ready_selector(2000, 1000, 1000);
    selector.apply(SelectionInput::SetX(1000));
    selector.set_display_budget(0.5).unwrap();

    let geometry = selector.geometry().unwrap();
    assert_eq!(geometry.display_height, 500);
    assert_eq!(geometry.display_width, 1000);
    assert_eq!(selector.overview().surface().dimensions(), (1000, 500));
    assert_eq!(selector.overview().outline().unwrap().left, 500);
    assert_eq!(selector.selection().unwrap().x, 1000);

    assert!(selector.set_display_budget(1.5).is_err());
    assert_eq!(selector.geometry().unwrap().display_height, 500);
}

#[test]
fn test_surfaces_agree_after_every_input() {
    let mut selector = ready_selector(1200, 900, 800);
    let raster = coordinate_raster(1200, 900);
    let mut rng = Lcg::new(99);

    for _ in 0..60 {
        let input = match rng.range(0, 4) {
            0 => SelectionInput::PointerPick(DisplayPoint::new(
                rng.range(0, 800) as f64,
                rng.range(0, 600) as f64,
            )),
            1 => SelectionInput::SetX(rng.range(0, 1200)),
            2 => SelectionInput::SetY(rng.range(0, 900)),
            3 => SelectionInput::SetSize(rng.range(0, 11) * 256),
            _ => SelectionInput::ResetToDefault,
        };
        let s = selector.apply(input).unwrap();
        let geometry = selector.geometry().unwrap();

        assert!(s.x + s.size <= 1200 && s.y + s.size <= 900);
        assert_eq!(selector.preview().surface().dimensions(), (s.size, s.size));
        assert_eq!(
            selector.preview().surface().get_pixel(0, 0),
            raster.get_pixel(s.x, s.y)
        );

        let outline = selector.overview().outline().unwrap();
        assert_eq!(outline.left, (s.x as f64 * geometry.scale_factor).round() as u32);
        assert_eq!(outline.top, (s.y as f64 * geometry.scale_factor).round() as u32);
    }
}

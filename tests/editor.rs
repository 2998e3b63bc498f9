use image::{Rgba, RgbaImage};

use snapmark::annotations::Document;
use snapmark::domain::{MIN_SHAPE_SIZE, Point, Rect, Shape, Tool};
use snapmark::render::image::render_shapes;
use snapmark::render::mosaic::apply_mosaic;
use snapmark::render::text::FixedAdvanceText;
use snapmark::session::{CollectingHost, Interaction, Key, StyleMsg};
use snapmark::{EditorConfig, EditorEvent, EditorSession, FinishAction};

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn session() -> EditorSession {
    EditorSession::new(gradient(160, 120), &EditorConfig::default(), Box::new(FixedAdvanceText))
        .unwrap()
}

fn run(session: &mut EditorSession, events: impl IntoIterator<Item = EditorEvent>) {
    let mut host = CollectingHost::default();
    for event in events {
        session.handle(event, &mut host);
    }
}

fn drag(tool: Tool, from: (i32, i32), to: (i32, i32)) -> [EditorEvent; 4] {
    [
        EditorEvent::SelectTool(Some(tool)),
        EditorEvent::down(from.0, from.1),
        EditorEvent::moved(to.0, to.1),
        EditorEvent::up(to.0, to.1),
    ]
}

fn outline_bounds(session: &EditorSession, index: usize) -> Rect {
    match session.document().get(index) {
        Some(Shape::Rectangle(o) | Shape::Ellipse(o) | Shape::Arrow(o)) => o.bounds(),
        other => panic!("unexpected shape {:?}", other),
    }
}

#[test]
fn test_append_and_undo_lengths() {
    let mut s = session();
    run(&mut s, drag(Tool::Rectangle, (10, 10), (50, 40)));
    run(&mut s, drag(Tool::Ellipse, (70, 10), (110, 40)));
    run(&mut s, drag(Tool::Arrow, (10, 80), (90, 100)));
    assert_eq!(s.document().len(), 3);

    run(&mut s, [EditorEvent::Undo]);
    assert_eq!(s.document().len(), 2);
    run(&mut s, [EditorEvent::Undo, EditorEvent::Undo, EditorEvent::Undo]);
    assert!(s.document().is_empty());
    assert_eq!(s.working_pixels(), s.base_pixels());
}

#[test]
fn test_undo_leaves_first_shape_intact() {
    let mut s = session();
    run(&mut s, drag(Tool::Rectangle, (10, 10), (50, 40)));
    let first = s.document().get(0).cloned().unwrap();
    run(&mut s, drag(Tool::Arrow, (10, 80), (90, 100)));
    run(&mut s, [EditorEvent::Undo]);

    assert_eq!(s.document().iter().collect::<Vec<_>>(), vec![&first]);
    let mut expected = s.base_pixels().clone();
    render_shapes(&mut expected, [&first], &FixedAdvanceText);
    assert_eq!(s.working_pixels(), &expected);
}

#[test]
fn test_undo_replays_remaining_mosaics() {
    let mut s = session();
    run(&mut s, drag(Tool::Mosaic, (10, 10), (70, 70)));
    run(&mut s, drag(Tool::Mosaic, (40, 40), (120, 100)));
    run(&mut s, [EditorEvent::Undo]);

    let mut expected = s.base_pixels().clone();
    apply_mosaic(&mut expected, Rect::new(10, 10, 70, 70), 10);
    assert_eq!(s.working_pixels(), &expected);
    assert_eq!(s.document().bakes().len(), 1);
}

#[test]
fn test_undo_mosaic_keeps_shapes_between() {
    let mut s = session();
    run(&mut s, drag(Tool::Mosaic, (10, 10), (70, 70)));
    run(&mut s, drag(Tool::Rectangle, (20, 20), (90, 80)));
    run(&mut s, drag(Tool::Mosaic, (30, 30), (150, 110)));
    run(&mut s, [EditorEvent::Undo]);

    let mut expected = s.base_pixels().clone();
    apply_mosaic(&mut expected, Rect::new(10, 10, 70, 70), 10);
    render_shapes(&mut expected, s.document(), &FixedAdvanceText);
    assert_eq!(s.working_pixels(), &expected);
    assert!(matches!(s.document().get(1), Some(Shape::Rectangle(_))));
}

#[test]
fn test_replay_matches_live_bakes() {
    let mut s = session();
    run(&mut s, drag(Tool::Mosaic, (5, 5), (80, 60)));
    run(&mut s, [EditorEvent::Style(StyleMsg::MosaicBlockSize(7))]);
    run(&mut s, drag(Tool::Mosaic, (50, 30), (140, 110)));

    let replayed: RgbaImage = s.document().replay(s.base_pixels());
    assert_eq!(s.working_pixels(), &replayed);
}

#[test]
fn test_resize_clamps_to_minimum() {
    let mut s = session();
    run(&mut s, drag(Tool::Rectangle, (50, 50), (120, 100)));
    run(
        &mut s,
        [
            EditorEvent::down(120, 100),
            EditorEvent::moved(0, 0),
            EditorEvent::up(0, 0),
        ],
    );
    let b = outline_bounds(&s, 0);
    assert_eq!(b, Rect::new(50, 50, 55, 55));
    assert_eq!(b.width(), MIN_SHAPE_SIZE);
    assert_eq!(b.height(), MIN_SHAPE_SIZE);
}

#[test]
fn test_newest_handle_wins() {
    let mut s = session();
    run(&mut s, drag(Tool::Rectangle, (20, 20), (60, 60)));
    run(&mut s, drag(Tool::Ellipse, (100, 100), (62, 62)));
    run(&mut s, [EditorEvent::SelectTool(None), EditorEvent::down(61, 61)]);
    assert_eq!(
        s.interaction(),
        Interaction::ResizingShape {
            index: 1,
            corner: snapmark::domain::Corner::NW
        }
    );
}

#[test]
fn test_move_translates_both_points() {
    let mut s = session();
    run(&mut s, drag(Tool::Arrow, (90, 20), (30, 60)));
    run(
        &mut s,
        [
            EditorEvent::SelectTool(None),
            EditorEvent::down(60, 40),
            EditorEvent::moved(70, 45),
            EditorEvent::up(70, 45),
        ],
    );
    match s.document().get(0) {
        Some(Shape::Arrow(o)) => {
            assert_eq!(o.start, Point::new(100, 25));
            assert_eq!(o.end, Point::new(40, 65));
        }
        other => panic!("unexpected shape {:?}", other),
    }
}

#[test]
fn test_drag_below_threshold_discarded() {
    let mut s = session();
    run(&mut s, drag(Tool::Ellipse, (40, 40), (44, 43)));
    run(&mut s, drag(Tool::Mosaic, (40, 40), (43, 41)));
    assert!(s.document().is_empty());
    assert_eq!(s.working_pixels(), s.base_pixels());
}

#[test]
fn test_thin_shape_still_committed() {
    let mut s = session();
    run(&mut s, drag(Tool::Arrow, (10, 50), (120, 52)));
    assert_eq!(s.document().len(), 1);
}

#[test]
fn test_escape_cancels_drawing() {
    let mut s = session();
    run(
        &mut s,
        [
            EditorEvent::SelectTool(Some(Tool::Rectangle)),
            EditorEvent::down(10, 10),
            EditorEvent::moved(80, 80),
        ],
    );
    assert_ne!(&s.render_frame(), s.working_pixels());
    run(&mut s, [EditorEvent::Key(Key::Escape), EditorEvent::up(80, 80)]);
    assert!(s.document().is_empty());
    assert_eq!(&s.render_frame(), s.working_pixels());
}

#[test]
fn test_text_composition_events() {
    let mut s = session();
    run(
        &mut s,
        [
            EditorEvent::SelectTool(Some(Tool::Text)),
            EditorEvent::down(20, 40),
            EditorEvent::commit("A"),
            EditorEvent::preedit("中"),
        ],
    );
    assert_eq!(s.composition().committed(), "A");
    assert_eq!(s.composition().preedit(), "中");

    run(&mut s, [EditorEvent::Key(Key::Enter)]);
    assert_eq!(s.interaction(), Interaction::TextEditing);
    match s.document().get(0) {
        Some(Shape::Text(t)) => {
            assert_eq!(t.string, "A");
            assert_eq!(t.anchor, Point::new(20, 40));
        }
        other => panic!("unexpected shape {:?}", other),
    }
}

#[test]
fn test_tool_switch_commits_text() {
    let mut s = session();
    run(
        &mut s,
        [
            EditorEvent::SelectTool(Some(Tool::Text)),
            EditorEvent::down(20, 40),
            EditorEvent::commit("label"),
            EditorEvent::SelectTool(Some(Tool::Rectangle)),
        ],
    );
    assert_eq!(s.document().len(), 1);
    assert!(s.composition().anchor().is_none());
    assert_eq!(s.interaction(), Interaction::Idle);
}

#[test]
fn test_clear_all_then_finish() {
    let mut s = session();
    run(&mut s, drag(Tool::Mosaic, (10, 10), (70, 70)));
    run(&mut s, drag(Tool::Rectangle, (20, 20), (90, 80)));

    let mut host = CollectingHost::default();
    s.handle(EditorEvent::ClearAll, &mut host);
    s.handle(EditorEvent::Finish(FinishAction::Copy), &mut host);
    let (image, action) = host.result.expect("finished image");
    assert_eq!(action, FinishAction::Copy);
    assert_eq!(&image, s.base_pixels());
}

#[test]
fn test_document_rejects_small_shapes() {
    let mut doc = Document::new();
    let tiny = Shape::Mosaic(snapmark::domain::MosaicShape {
        start: Point::new(0, 0),
        end: Point::new(3, 3),
        block_size: 10,
    });
    assert!(!doc.append(tiny));
    assert!(doc.bakes().is_empty());
}

use std::rc::Rc;

use egui::{Align2, Pos2, Rect, Vec2};
use egui_flow::{
    ContentHeight, DOCK_SIZE, Dock, DockId, DockKind, DockRef, DrawContext, FlowError,
    LayoutConfig, Node, NodeContent, RowLayout, Sink, Source, ViewId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sink(w: f32, h: f32) -> Rc<Sink> {
    let sink = Rc::new(Sink::new("in", "float"));
    sink.set_min_size(Vec2::new(w, h));
    sink
}

fn source(w: f32, h: f32) -> Rc<Source> {
    let source = Rc::new(Source::new("out", "float"));
    source.set_min_size(Vec2::new(w, h));
    source
}

fn node_with_border(border_width: f32) -> Node {
    Node::with_config(LayoutConfig {
        border_width,
        ..LayoutConfig::default()
    })
}

fn assert_fits(node: &Node) {
    let alloc = node.allocation();
    assert!(alloc.width() >= node.minimum_width());
    assert!(alloc.height() >= node.minimum_height());
}

#[derive(Default)]
struct Recorder {
    frames: Vec<Rect>,
    ports: Vec<(Rect, DockId, DockKind)>,
    labels: Vec<(Pos2, Align2, String)>,
    children: Vec<Rect>,
    child_used: Option<Vec2>,
}

impl DrawContext for Recorder {
    fn render_frame(&mut self, rect: Rect) {
        self.frames.push(rect);
    }

    fn render_port(&mut self, rect: Rect, dock: DockId, kind: DockKind, _type_name: &str) {
        self.ports.push((rect, dock, kind));
    }

    fn render_label(&mut self, anchor: Pos2, align: Align2, text: &str) {
        self.labels.push((anchor, align, text.to_string()));
    }

    fn draw_child(&mut self, _content: &mut dyn NodeContent, rect: Rect) -> Rect {
        self.children.push(rect);
        match self.child_used {
            Some(size) => Rect::from_min_size(rect.min, size),
            None => rect,
        }
    }
}

struct Panel {
    size: Vec2,
    parented: Rc<std::cell::Cell<bool>>,
}

impl NodeContent for Panel {
    fn preferred_size(&self) -> Vec2 {
        self.size
    }

    fn ui(&mut self, _ui: &mut egui::Ui) {}

    fn on_parent(&mut self, _node: egui_flow::NodeId) {
        self.parented.set(true);
    }

    fn on_unparent(&mut self) {
        self.parented.set(false);
    }
}

// ── Sizing ──

#[test]
fn minimum_size_scenario() {
    init_logger();
    let mut node = node_with_border(2.0);
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    node.add_source(&source(40.0, 24.0)).expect("add source");

    assert_eq!(node.minimum_width(), 44.0);
    assert_eq!(node.minimum_height(), 48.0);
    assert_eq!(node.allocation().size(), Vec2::new(44.0, 48.0));
}

#[test]
fn fresh_node_is_empty_and_zero_sized() {
    let node = Node::new();
    assert!(node.sinks().is_empty());
    assert!(node.sources().is_empty());
    assert_eq!(node.allocation(), Rect::from_min_size(Pos2::ZERO, Vec2::ZERO));
    assert!(node.owning_view().is_none());
}

#[test]
fn manual_enlargement_persists() {
    let mut node = Node::new();
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    node.set_allocation(Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(200.0, 150.0)));

    let extra = sink(30.0, 20.0);
    node.add_sink(&extra).expect("add sink");
    node.remove_sink(&extra).expect("remove sink");
    assert_eq!(node.allocation().size(), Vec2::new(200.0, 150.0));

    node.set_allocation(Rect::from_min_size(Pos2::ZERO, Vec2::new(1.0, 1.0)));
    assert_eq!(node.allocation().size(), Vec2::new(30.0, 20.0));
}

#[test]
fn dock_size_change_grows_node() {
    let mut node = Node::new();
    let s = sink(30.0, 20.0);
    node.add_sink(&s).expect("add sink");

    s.set_min_size(Vec2::new(90.0, 40.0));
    assert_eq!(node.allocation().size(), Vec2::new(90.0, 40.0));

    s.set_label("a label long enough to widen the node");
    assert_fits(&node);
}

#[test]
fn border_width_change_resizes() {
    let mut node = Node::new();
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    node.set_border_width(5.0);
    assert_eq!(node.allocation().size(), Vec2::new(40.0, 30.0));

    node.set_border_width(-3.0);
    assert_eq!(node.border_width(), 0.0);
    assert_eq!(node.allocation().size(), Vec2::new(40.0, 30.0));
}

#[test]
fn content_counts_towards_minimum() {
    let mut node = node_with_border(1.0);
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    let parented = Rc::new(std::cell::Cell::new(false));
    node.set_content(Box::new(Panel {
        size: Vec2::new(100.0, 50.0),
        parented: parented.clone(),
    }));

    assert!(parented.get());
    assert!(node.has_content());
    assert_eq!(node.minimum_width(), 102.0);
    assert_eq!(node.minimum_height(), 72.0);
    assert_fits(&node);

    let panel = node.take_content().expect("content");
    assert!(!parented.get());
    assert!(!node.has_content());
    assert_eq!(node.minimum_height(), 22.0);
    drop(panel);
}

// ── Registry ──

#[test]
fn re_adding_to_same_node_is_already_has_dock() {
    let mut node = Node::new();
    let s1 = sink(30.0, 20.0);
    node.add_sink(&s1).expect("add sink");

    let err = node.add_sink(&s1).unwrap_err();
    assert!(matches!(err, FlowError::AlreadyHasDock { .. }));
    assert_eq!(node.sinks().len(), 1);
}

#[test]
fn dock_bound_elsewhere_is_rejected() {
    let mut a = Node::new();
    let mut b = Node::new();
    let s1 = sink(30.0, 20.0);
    let o1 = source(30.0, 20.0);
    a.add_sink(&s1).expect("add sink");
    a.add_source(&o1).expect("add source");

    let err = b.add_sink(&s1).unwrap_err();
    match err {
        FlowError::DockAlreadyBoundToNode { dock, bound_to } => {
            assert_eq!(dock, s1.id());
            assert_eq!(bound_to, a.id());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        b.add_source(&o1),
        Err(FlowError::DockAlreadyBoundToNode { .. })
    ));

    assert!(a.has_sink(&s1));
    assert!(!b.has_sink(&s1));
    assert!(b.sinks().is_empty() && b.sources().is_empty());
    assert_eq!(s1.node(), Some(a.id()));
}

#[test]
fn removing_absent_dock_fails_without_change() {
    let mut node = Node::new();
    let kept = sink(30.0, 20.0);
    node.add_sink(&kept).expect("add sink");
    let before = node.allocation();

    let err = node.remove_sink(&sink(30.0, 20.0)).unwrap_err();
    assert!(matches!(err, FlowError::NoSuchDock { kind: DockKind::Sink, .. }));
    assert!(matches!(
        node.remove_source(&source(10.0, 10.0)),
        Err(FlowError::NoSuchDock { kind: DockKind::Source, .. })
    ));
    assert_eq!(node.sinks().len(), 1);
    assert_eq!(node.allocation(), before);
}

#[test]
fn removed_dock_can_move_to_another_node() {
    let mut a = Node::new();
    let mut b = Node::new();
    let o = source(30.0, 20.0);
    a.add_source(&o).expect("add source");
    assert_eq!(o.size_changed().handler_count(), 1);

    a.remove_source(&o).expect("remove source");
    assert!(o.node().is_none());
    assert_eq!(o.size_changed().handler_count(), 0);

    b.add_source(&o).expect("add source");
    assert_eq!(o.node(), Some(b.id()));
    assert!(b.has_dock(&*o));
    assert!(!a.has_dock(&*o));
}

#[test]
fn removed_dock_no_longer_resizes_old_node() {
    let mut node = Node::new();
    let s = sink(30.0, 20.0);
    node.add_sink(&s).expect("add sink");
    node.remove_sink(&s).expect("remove sink");

    s.set_min_size(Vec2::new(500.0, 500.0));
    assert_eq!(node.allocation().size(), Vec2::new(30.0, 20.0));
}

#[test]
fn dropping_node_releases_docks() {
    let s = sink(30.0, 20.0);
    let o = source(30.0, 20.0);
    {
        let mut node = Node::new();
        node.add_sink(&s).expect("add sink");
        node.add_source(&o).expect("add source");
    }
    assert!(s.node().is_none());
    assert!(o.node().is_none());
    assert_eq!(s.size_changed().handler_count(), 0);
    assert_eq!(o.size_changed().handler_count(), 0);
}

#[test]
fn random_add_remove_sequences_keep_invariants() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let sinks: Vec<Rc<Sink>> = (0..6)
        .map(|i| sink(10.0 + i as f32 * 7.0, 16.0 + i as f32 * 3.0))
        .collect();
    let sources: Vec<Rc<Source>> = (0..6)
        .map(|i| source(12.0 + i as f32 * 5.0, 18.0 + i as f32 * 2.0))
        .collect();
    let mut node = node_with_border(3.0);
    let mut last = node.allocation().size();

    for _ in 0..500 {
        let i = rng.gen_range(0..6);
        let (sinks_before, sources_before) = (node.sinks().len(), node.sources().len());
        match rng.gen_range(0..4) {
            0 => match node.add_sink(&sinks[i]) {
                Ok(()) => assert_eq!(node.sinks().len(), sinks_before + 1),
                Err(FlowError::AlreadyHasDock { .. }) => {
                    assert_eq!(node.sinks().len(), sinks_before)
                }
                Err(other) => panic!("unexpected error: {other}"),
            },
            1 => match node.remove_sink(&sinks[i]) {
                Ok(()) => assert!(sinks[i].node().is_none()),
                Err(FlowError::NoSuchDock { .. }) => assert_eq!(node.sinks().len(), sinks_before),
                Err(other) => panic!("unexpected error: {other}"),
            },
            2 => match node.add_source(&sources[i]) {
                Ok(()) => assert_eq!(node.sources().len(), sources_before + 1),
                Err(FlowError::AlreadyHasDock { .. }) => {
                    assert_eq!(node.sources().len(), sources_before)
                }
                Err(other) => panic!("unexpected error: {other}"),
            },
            _ => match node.remove_source(&sources[i]) {
                Ok(()) => assert!(sources[i].node().is_none()),
                Err(FlowError::NoSuchDock { .. }) => {
                    assert_eq!(node.sources().len(), sources_before)
                }
                Err(other) => panic!("unexpected error: {other}"),
            },
        }

        let ids: Vec<DockId> = node.sinks().iter().map(|s| s.id()).collect();
        let mut deduped = ids.clone();
        deduped.sort_by_key(|id| id.as_uuid());
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
        let ids: Vec<DockId> = node.sources().iter().map(|s| s.id()).collect();
        let mut deduped = ids.clone();
        deduped.sort_by_key(|id| id.as_uuid());
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());

        assert_fits(&node);
        let size = node.allocation().size();
        assert!(size.x >= last.x && size.y >= last.y);
        last = size;
    }
}

// ── Geometry ──

#[test]
fn dock_position_of_unknown_dock_fails() {
    let mut node = Node::new();
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    let stranger = source(30.0, 20.0);
    assert!(matches!(
        node.dock_position(&*stranger),
        Err(FlowError::NoSuchDock { .. })
    ));
}

#[test]
fn dock_position_follows_stacking() {
    let mut node = node_with_border(2.0);
    node.set_position(Pos2::new(100.0, 50.0));
    let s1 = sink(30.0, 20.0);
    let s2 = sink(30.0, 20.0);
    let o1 = source(40.0, 20.0);
    node.add_sink(&s1).expect("add sink");
    node.add_sink(&s2).expect("add sink");
    node.add_source(&o1).expect("add source");

    let alloc = node.allocation();
    let half = DOCK_SIZE / 2.0;
    assert_eq!(
        node.dock_position(&*s1).expect("position"),
        Pos2::new(alloc.left() + 2.0 + half, alloc.top() + 2.0 + half)
    );
    assert_eq!(
        node.dock_position(&*s2).expect("position"),
        Pos2::new(alloc.left() + 2.0 + half, alloc.top() + 2.0 + half + 20.0)
    );
    // Continuous rows: the first source sits below the last sink.
    assert_eq!(
        node.dock_position(&*o1).expect("position"),
        Pos2::new(alloc.right() - 2.0 - half, alloc.top() + 2.0 + half + 40.0)
    );
}

#[test]
fn column_rows_start_together() {
    let mut node = Node::with_config(LayoutConfig {
        row_layout: RowLayout::Columns,
        ..LayoutConfig::default()
    });
    let s1 = sink(30.0, 20.0);
    let o1 = source(40.0, 24.0);
    node.add_sink(&s1).expect("add sink");
    node.add_source(&o1).expect("add source");

    let ps = node.dock_position(&*s1).expect("position");
    let po = node.dock_position(&*o1).expect("position");
    assert_eq!(ps.y, po.y);
    assert!(ps.x < po.x);
    assert_eq!(node.minimum_width(), 70.0);
    assert_eq!(node.minimum_height(), 24.0);
}

#[test]
fn positions_and_hit_tests_agree() {
    for row_layout in [RowLayout::Continuous, RowLayout::Columns] {
        let mut node = Node::with_config(LayoutConfig {
            border_width: 3.0,
            row_layout,
            ..LayoutConfig::default()
        });
        node.set_position(Pos2::new(-40.0, 12.5));
        let sinks = [sink(30.0, 20.0), sink(50.0, 36.0), sink(20.0, 16.0)];
        let sources = [source(40.0, 24.0), source(25.0, 30.0)];
        for s in &sinks {
            node.add_sink(s).expect("add sink");
        }
        for s in &sources {
            node.add_source(s).expect("add source");
        }

        for s in &sinks {
            let p = node.dock_position(&**s).expect("position");
            assert_eq!(node.dock_at_point(p), Some(DockRef::Sink(s.clone())));
        }
        for s in &sources {
            let p = node.dock_position(&**s).expect("position");
            assert_eq!(node.dock_at_point(p), Some(DockRef::Source(s.clone())));
        }
    }
}

#[test]
fn hit_test_misses_outside_handles() {
    let mut node = node_with_border(2.0);
    let s1 = sink(30.0, 20.0);
    node.add_sink(&s1).expect("add sink");
    node.set_allocation(Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 100.0)));

    assert!(node.dock_at_point(Pos2::new(2.0, 2.0)).is_some());
    assert!(node.dock_at_point(Pos2::new(2.0 + DOCK_SIZE, 2.0 + DOCK_SIZE)).is_some());
    assert!(node.dock_at_point(Pos2::new(1.0, 5.0)).is_none());
    assert!(node.dock_at_point(Pos2::new(50.0, 10.0)).is_none());
    assert!(node.dock_at_point(Pos2::new(5.0, 2.0 + DOCK_SIZE + 1.0)).is_none());
}

#[test]
fn undersized_docks_keep_handles_clickable() {
    let mut node = Node::new();
    let s1 = sink(6.0, 6.0);
    let s2 = sink(6.0, 6.0);
    assert_eq!(s1.min_size(), Vec2::splat(DOCK_SIZE));
    node.add_sink(&s1).expect("add sink");
    node.add_sink(&s2).expect("add sink");
    assert_eq!(node.allocation().size(), Vec2::new(DOCK_SIZE, 2.0 * DOCK_SIZE));

    let p1 = node.dock_position(&*s1).expect("position");
    let p2 = node.dock_position(&*s2).expect("position");
    assert!(node.allocation().contains(p2));
    assert_eq!(node.dock_at_point(p1), Some(DockRef::Sink(s1.clone())));
    assert_eq!(node.dock_at_point(p2), Some(DockRef::Sink(s2.clone())));
}

#[test]
fn dock_lookup_by_id() {
    let mut node = Node::new();
    let o1 = source(40.0, 24.0);
    node.add_source(&o1).expect("add source");
    assert_eq!(node.dock(o1.id()), Some(DockRef::Source(o1.clone())));
    assert!(node.dock(DockId::new()).is_none());
}

// ── Rendering ──

#[test]
fn draw_matches_hit_boxes() {
    let mut node = node_with_border(2.0);
    node.set_position(Pos2::new(10.0, 10.0));
    let s1 = sink(30.0, 20.0);
    let o1 = source(40.0, 24.0);
    node.add_sink(&s1).expect("add sink");
    node.add_source(&o1).expect("add source");

    let mut recorder = Recorder::default();
    node.draw(&mut recorder);

    assert_eq!(recorder.frames, vec![node.allocation()]);
    assert_eq!(recorder.ports.len(), 2);
    assert_eq!(recorder.ports[0].1, s1.id());
    assert_eq!(recorder.ports[0].2, DockKind::Sink);
    assert_eq!(recorder.ports[1].2, DockKind::Source);
    for (rect, id, _) in &recorder.ports {
        let hit = node.dock_at_point(rect.center()).expect("hit");
        assert_eq!(hit.id(), *id);
        assert_eq!(rect.size(), Vec2::splat(DOCK_SIZE));
    }
    assert_eq!(recorder.ports[1].0.right(), node.allocation().right() - 2.0);

    assert_eq!(recorder.labels[0].1, Align2::LEFT_CENTER);
    assert_eq!(recorder.labels[1].1, Align2::RIGHT_CENTER);
    assert!(recorder.children.is_empty());
}

#[test]
fn content_fills_remaining_space() {
    let mut node = node_with_border(2.0);
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    node.set_content(Box::new(Panel {
        size: Vec2::new(60.0, 30.0),
        parented: Rc::new(std::cell::Cell::new(false)),
    }));
    node.set_allocation(Rect::from_min_size(Pos2::ZERO, Vec2::new(120.0, 90.0)));

    let mut recorder = Recorder {
        child_used: Some(Vec2::new(116.0, 40.0)),
        ..Recorder::default()
    };
    node.draw(&mut recorder);

    assert_eq!(
        recorder.children,
        vec![Rect::from_min_size(Pos2::new(2.0, 22.0), Vec2::new(116.0, 66.0))]
    );
    assert_eq!(node.content_size(), Some(Vec2::new(116.0, 40.0)));
    assert_eq!(node.allocation().size(), Vec2::new(120.0, 90.0));
}

#[test]
fn fixed_content_height_is_honoured() {
    let mut node = Node::with_config(LayoutConfig {
        content_height: ContentHeight::Fixed(12.0),
        ..LayoutConfig::default()
    });
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    node.set_content(Box::new(|_ui: &mut egui::Ui| {}));

    let mut recorder = Recorder::default();
    node.draw(&mut recorder);
    assert_eq!(recorder.children[0].min, Pos2::new(0.0, 20.0));
    assert_eq!(recorder.children[0].height(), 12.0);
    assert_eq!(node.content_size(), Some(Vec2::new(30.0, 12.0)));
    assert_fits(&node);
}

#[test]
fn content_growth_during_draw_grows_node() {
    let mut node = Node::new();
    node.add_sink(&sink(30.0, 20.0)).expect("add sink");
    node.set_content(Box::new(|_ui: &mut egui::Ui| {}));

    let mut recorder = Recorder {
        child_used: Some(Vec2::new(80.0, 45.0)),
        ..Recorder::default()
    };
    node.draw(&mut recorder);
    assert_eq!(node.allocation().size(), Vec2::new(80.0, 65.0));
}

// ── Owning view ──

#[test]
fn owning_view_is_plain_reference() {
    let mut node = Node::new();
    let view = ViewId::new();
    node.set_owning_view(Some(view));
    assert_eq!(node.owning_view(), Some(view));
    node.set_owning_view(None);
    assert!(node.owning_view().is_none());
}

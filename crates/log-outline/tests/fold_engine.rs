use log_outline::{
    CollapsedLinesSource, FoldEngine, FoldError, OutlineMarker, SharedCollapsedLines, VisibleRow,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

fn rows(engine: &FoldEngine<impl CollapsedLinesSource>) -> Vec<VisibleRow> {
    engine.iter().copied().collect()
}

fn row(marker: OutlineMarker, line: usize) -> VisibleRow {
    VisibleRow::new(marker, line)
}

/// Random disjoint regions of length >= 2 within `line_count` lines.
fn random_regions(rng: &mut StdRng, line_count: usize) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    let mut line = 0;
    while line + 2 <= line_count {
        line += rng.gen_range(0..4);
        let length = rng.gen_range(2..6);
        if line + length > line_count {
            break;
        }
        regions.push((line, length));
        line += length;
    }
    regions
}

fn expected_row_count(engine: &FoldEngine<impl CollapsedLinesSource>) -> usize {
    let hidden: usize = engine
        .regions()
        .iter()
        .filter(|r| r.is_collapsed)
        .map(|r| r.length - 1)
        .sum();
    engine.line_count() - hidden
}

#[test]
fn test_scenario_six_lines_one_region() {
    let mut engine = FoldEngine::from_regions(6, [(1, 3)]).unwrap();

    assert_eq!(
        rows(&engine),
        vec![
            row(OutlineMarker::None, 0),
            row(OutlineMarker::ExpandedUpper(1), 1),
            row(OutlineMarker::None, 2),
            row(OutlineMarker::ExpandedLower(3), 3),
            row(OutlineMarker::None, 4),
            row(OutlineMarker::None, 5),
        ]
    );

    engine.toggle(1);

    assert_eq!(
        rows(&engine),
        vec![
            row(OutlineMarker::None, 0),
            row(OutlineMarker::Collapsed(1), 1),
            row(OutlineMarker::None, 4),
            row(OutlineMarker::None, 5),
        ]
    );
    assert_eq!(engine.visible_row_count(), 4);
}

#[test]
fn test_marker_toggle_targets_route_back_to_engine() {
    let mut engine = FoldEngine::from_regions(6, [(1, 3)]).unwrap();

    // Clicking the lower expander collapses the region.
    let lower = engine.row(3).unwrap().marker;
    assert_eq!(lower.toggle_target(), Some(3));
    assert!(engine.toggle(3));
    assert_eq!(engine.visible_row_count(), 4);

    // Clicking the collapsed placeholder expands it again.
    let collapsed = engine.row(1).unwrap().marker;
    assert_eq!(collapsed, OutlineMarker::Collapsed(1));
    assert!(engine.toggle(collapsed.toggle_target().unwrap()));
    assert_eq!(engine.visible_row_count(), 6);

    assert_eq!(engine.row(0).unwrap().marker.toggle_target(), None);
}

#[test]
fn test_row_count_invariant_random() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let line_count = rng.gen_range(0..60);
        let regions = random_regions(&mut rng, line_count);
        let mut engine = FoldEngine::from_regions(line_count, regions.clone()).unwrap();
        assert_eq!(engine.visible_row_count(), line_count);

        for _ in 0..10 {
            if regions.is_empty() {
                break;
            }
            let (start, length) = regions[rng.gen_range(0..regions.len())];
            let line = if rng.gen_bool(0.5) {
                start
            } else {
                start + length - 1
            };
            engine.toggle(line);

            assert_eq!(engine.visible_row_count(), expected_row_count(&engine));

            // Rows are strictly increasing raw lines, and no hidden line is shown.
            let lines: Vec<usize> = engine.iter().map(|r| r.line).collect();
            assert!(lines.windows(2).all(|w| w[0] < w[1]));
            for region in engine.regions().iter().filter(|r| r.is_collapsed) {
                for hidden in region.start + 1..=region.end_line() {
                    assert_eq!(engine.logical_to_visual(hidden), None);
                }
            }
        }
    }
}

#[test]
fn test_toggle_twice_is_identity() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..100 {
        let line_count = rng.gen_range(2..40);
        let regions = random_regions(&mut rng, line_count);
        if regions.is_empty() {
            continue;
        }
        let mut engine = FoldEngine::from_regions(line_count, regions.clone()).unwrap();
        if rng.gen_bool(0.5) {
            engine.collapse_all();
        }

        let before = rows(&engine);
        let (start, _) = regions[rng.gen_range(0..regions.len())];
        engine.toggle(start);
        assert_ne!(rows(&engine), before);
        engine.toggle(start);
        assert_eq!(rows(&engine), before);
    }
}

/// Toggle pairing, the row-count rule and the recursive operations on one engine.
fn check_outline_properties<S: CollapsedLinesSource>(
    engine: &mut FoldEngine<S>,
    regions: &[(usize, usize)],
    rng: &mut StdRng,
) {
    assert_eq!(engine.visible_row_count(), expected_row_count(engine));

    for _ in 0..8 {
        let (start, length) = regions[rng.gen_range(0..regions.len())];
        let line = if rng.gen_bool(0.5) {
            start
        } else {
            start + length - 1
        };

        let was_collapsed = engine.is_collapsed(start);
        let before = rows(engine);
        assert!(engine.toggle(line));
        assert_eq!(engine.is_collapsed(start), !was_collapsed);
        assert_eq!(engine.visible_row_count(), expected_row_count(engine));

        assert!(engine.toggle(line));
        assert_eq!(rows(engine), before);

        engine.toggle(start);
    }

    engine.collapse_all();
    assert!(!engine.has_expanded_regions());
    assert!(engine.has_collapsed_regions());
    let hidden: usize = regions.iter().map(|&(_, length)| length - 1).sum();
    assert_eq!(engine.visible_row_count(), engine.line_count() - hidden);

    engine.expand_all();
    assert!(!engine.has_collapsed_regions());
    assert!(engine.has_expanded_regions());
    assert_eq!(engine.visible_row_count(), engine.line_count());
}

#[test]
fn test_outline_properties_for_every_source_kind() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..100 {
        let line_count = rng.gen_range(2..50);
        let regions = random_regions(&mut rng, line_count);
        if regions.is_empty() {
            continue;
        }
        let seeded: HashSet<usize> = regions
            .iter()
            .map(|&(start, _)| start)
            .filter(|_| rng.gen_bool(0.5))
            .collect();

        let mut local = FoldEngine::from_regions(line_count, regions.clone()).unwrap();
        check_outline_properties(&mut local, &regions, &mut rng);

        let settings = SharedCollapsedLines::with_lines(seeded.iter().copied());
        let mut shared = FoldEngine::new(line_count, regions.clone(), settings.clone()).unwrap();
        assert_eq!(shared.collapsed_lines(), &seeded);
        check_outline_properties(&mut shared, &regions, &mut rng);
        assert_eq!(settings.get(), Some(HashSet::new()));

        let constant = seeded.clone();
        let mut supplied =
            FoldEngine::new(line_count, regions.clone(), move || Some(constant.clone())).unwrap();
        assert_eq!(supplied.collapsed_lines(), &seeded);
        check_outline_properties(&mut supplied, &regions, &mut rng);

        let mut empty =
            FoldEngine::new(line_count, regions.clone(), || Some(HashSet::new())).unwrap();
        check_outline_properties(&mut empty, &regions, &mut rng);
    }
}

#[test]
fn test_recursive_operations() {
    let mut engine = FoldEngine::from_regions(20, [(0, 3), (5, 2), (10, 8)]).unwrap();
    assert!(engine.has_expanded_regions());
    assert!(!engine.has_collapsed_regions());

    engine.collapse_all();
    assert!(!engine.has_expanded_regions());
    assert!(engine.has_collapsed_regions());
    assert_eq!(engine.visible_row_count(), 20 - 2 - 1 - 7);
    assert_eq!(
        engine.collapsed_lines(),
        &HashSet::from([0usize, 5, 10])
    );

    engine.expand_all();
    assert!(!engine.has_collapsed_regions());
    assert_eq!(engine.visible_row_count(), 20);
    assert!(engine.collapsed_lines().is_empty());
}

#[test]
fn test_external_resync_precedence() {
    let settings = SharedCollapsedLines::new();
    let mut engine = FoldEngine::new(12, [(0, 3), (4, 3), (8, 4)], settings.clone()).unwrap();

    engine.toggle(0);
    assert!(engine.is_collapsed(0));

    // Settings are edited behind the engine's back; the next change starts from them and
    // drops the local collapse of region 0.
    settings.set(HashSet::from([4, 8]));
    engine.toggle(100);
    assert!(engine.is_collapsed(0), "a no-op toggle does not recompute");

    engine.toggle(4);
    // Region 4 was collapsed by the settings, so toggling it expands it. Region 0 is no longer
    // in the authoritative set.
    assert!(!engine.is_collapsed(4));
    assert!(!engine.is_collapsed(0));
    assert!(engine.is_collapsed(8));
    assert_eq!(settings.get(), Some(HashSet::from([8])));
    assert_eq!(engine.visible_row_count(), 12 - 3);
}

#[test]
fn test_external_set_overrides_local_flags_on_recompute() {
    let settings = SharedCollapsedLines::new();
    let mut engine = FoldEngine::new(12, [(0, 3), (4, 3), (8, 4)], settings.clone()).unwrap();
    engine.collapse_all();
    // Lines 0, 3, 4, 7 and 8 stay visible.
    assert_eq!(engine.visible_row_count(), 5);

    settings.set(HashSet::from([4]));
    engine.toggle(8);

    let expected = HashSet::from([4usize, 8]);
    for region in engine.regions() {
        assert_eq!(
            engine.is_collapsed(region.start),
            expected.contains(&region.start)
        );
        assert_eq!(region.is_collapsed, expected.contains(&region.start));
    }
    assert_eq!(settings.get(), Some(expected));
}

#[test]
fn test_update_collapsed_lines_reseeds_and_notifies() {
    let fired = Rc::new(Cell::new(0));
    let mut engine = FoldEngine::from_regions(10, [(0, 2), (3, 4)]).unwrap();
    let counter = fired.clone();
    engine.subscribe(move || counter.set(counter.get() + 1));

    engine.update_collapsed_lines(HashSet::from([3]));

    assert_eq!(fired.get(), 1);
    assert_eq!(
        rows(&engine),
        vec![
            row(OutlineMarker::ExpandedUpper(0), 0),
            row(OutlineMarker::ExpandedLower(1), 1),
            row(OutlineMarker::None, 2),
            row(OutlineMarker::Collapsed(3), 3),
            row(OutlineMarker::None, 7),
            row(OutlineMarker::None, 8),
            row(OutlineMarker::None, 9),
        ]
    );
}

#[test]
fn test_invalid_configurations_are_rejected() {
    assert!(matches!(
        FoldEngine::from_regions(10, [(3, 1)]),
        Err(FoldError::RegionTooShort { start: 3, length: 1 })
    ));
    assert!(matches!(
        FoldEngine::from_regions(10, [(0, 3), (2, 3)]),
        Err(FoldError::OverlappingRegions { first: 0, second: 2 })
    ));
    assert!(matches!(
        FoldEngine::from_regions(10, [(2, 6), (4, 2)]),
        Err(FoldError::OverlappingRegions { first: 2, second: 4 })
    ));
    assert!(matches!(
        FoldEngine::from_regions(10, [(9, 2)]),
        Err(FoldError::RegionOutOfBounds { .. })
    ));
}

#[test]
fn test_row_access_bounds() {
    let mut engine = FoldEngine::from_regions(4, [(0, 4)]).unwrap();
    engine.collapse_all();
    assert_eq!(engine.visible_row_count(), 1);
    assert_eq!(engine.row(0), Ok(row(OutlineMarker::Collapsed(0), 0)));
    assert_eq!(
        engine.row(1),
        Err(FoldError::RowOutOfBounds { index: 1, len: 1 })
    );
}

#[test]
fn test_projection_round_trip() {
    let mut engine = FoldEngine::from_regions(30, [(2, 5), (10, 3), (20, 10)]).unwrap();
    engine.toggle(10);
    engine.toggle(29);

    for line in 0..engine.line_count() {
        if let Some(visual) = engine.logical_to_visual(line) {
            assert_eq!(engine.visual_to_logical(visual), Some(line));
        }
    }
    for visual in 0..engine.visible_row_count() {
        let line = engine.visual_to_logical(visual).unwrap();
        assert_eq!(engine.logical_to_visual(line), Some(visual));
    }
}

#[test]
fn test_iterating_by_reference() {
    let engine = FoldEngine::from_regions(3, [(1, 2)]).unwrap();
    let mut seen = Vec::new();
    for visible in &engine {
        seen.push(visible.line);
    }
    assert_eq!(seen, vec![0, 1, 2]);
}

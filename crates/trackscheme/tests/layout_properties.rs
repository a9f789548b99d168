//! Property tests of the layout pass over random lineages.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use trackscheme::{
    adapter::PositionTable,
    identifier::{SpotId, TrackId},
    layout::{LayoutOutcome, START_COLUMN, SchemeLayout},
    lineage::LineageGraph,
    model::TrackModel,
    spot::Spot,
};

/// One lineage tree: for every spot after the root, a parent choice and a
/// frame gap; extra links turn some spots into merges.
#[derive(Debug, Clone)]
struct TreeShape {
    parents: Vec<(usize, usize)>,
    merges: Vec<(usize, usize)>,
}

fn tree_strategy() -> impl Strategy<Value = TreeShape> {
    (
        prop::collection::vec((any::<usize>(), 1usize..3), 0..12),
        prop::collection::vec((any::<usize>(), any::<usize>()), 0..3),
    )
        .prop_map(|(parents, merges)| TreeShape { parents, merges })
}

fn forest_strategy() -> impl Strategy<Value = (Vec<TreeShape>, Vec<usize>)> {
    (
        prop::collection::vec(tree_strategy(), 1..5),
        prop::collection::vec(0usize..6, 0..4),
    )
}

/// Builds a model with one declared track per tree plus lonely spots.
fn build_model(trees: &[TreeShape], lonely_frames: &[usize]) -> TrackModel {
    let mut builder = TrackModel::builder();
    let mut next_id = 1u64;

    for (tree_idx, tree) in trees.iter().enumerate() {
        let mut ids = vec![SpotId::new(next_id)];
        let mut frames = vec![tree_idx % 3];
        builder
            .add_spot(Spot::new(ids[0], format!("t{tree_idx}s0"), frames[0]))
            .unwrap();
        next_id += 1;

        let mut links = Vec::new();
        for (k, &(choice, gap)) in tree.parents.iter().enumerate() {
            let parent = choice % (k + 1);
            let id = SpotId::new(next_id);
            next_id += 1;
            let frame = frames[parent] + gap;
            builder
                .add_spot(Spot::new(id, format!("t{tree_idx}s{}", k + 1), frame))
                .unwrap();
            links.push((ids[parent], id));
            ids.push(id);
            frames.push(frame);
        }

        let mut linked: HashSet<(SpotId, SpotId)> = links.iter().copied().collect();
        for &(a, b) in &tree.merges {
            let (source, target) = (a % ids.len(), b % ids.len());
            if frames[source] >= frames[target] {
                continue;
            }
            if linked.insert((ids[source], ids[target])) {
                links.push((ids[source], ids[target]));
            }
        }

        for (source, target) in links {
            builder.add_edge(source, target, 1.0).unwrap();
        }
        builder.add_track(format!("tree{tree_idx:02}"), ids).unwrap();
    }

    for (k, &frame) in lonely_frames.iter().enumerate() {
        builder
            .add_spot(Spot::new(SpotId::new(next_id), format!("lonely{k}"), frame))
            .unwrap();
        next_id += 1;
    }

    builder.build().unwrap()
}

fn layout(model: &TrackModel) -> (PositionTable, LayoutOutcome) {
    let mut table = PositionTable::new();
    let outcome = SchemeLayout::default().run(model, &mut table).unwrap();
    (table, outcome)
}

proptest! {
    #[test]
    fn every_spot_is_placed_on_its_frame((trees, lonely) in forest_strategy()) {
        let model = build_model(&trees, &lonely);
        let (table, _) = layout(&model);

        for spot in model.spots() {
            let placement = table.placement(spot.id());
            prop_assert!(placement.is_some(), "{} was not placed", spot.id());
            let placement = placement.unwrap();
            prop_assert_eq!(placement.row(), spot.frame());
            prop_assert!(placement.column() >= START_COLUMN);
        }
    }

    #[test]
    fn no_two_spots_share_a_cell((trees, lonely) in forest_strategy()) {
        let model = build_model(&trees, &lonely);
        let (table, _) = layout(&model);

        let mut cells = HashSet::new();
        for (spot, placement) in table.placements() {
            prop_assert!(
                cells.insert((placement.column(), placement.row())),
                "{} collides at {:?}", spot, placement.grid()
            );
        }
    }

    #[test]
    fn tracks_keep_to_their_lanes((trees, lonely) in forest_strategy()) {
        let model = build_model(&trees, &lonely);
        let (table, outcome) = layout(&model);

        let mut columns: HashMap<TrackId, (usize, usize)> = HashMap::new();
        for (spot, placement) in table.placements() {
            if let Some(track) = model.track_of(spot) {
                let entry = columns.entry(track).or_insert((usize::MAX, 0));
                entry.0 = entry.0.min(placement.column());
                entry.1 = entry.1.max(placement.column());
            }
        }

        let mut lane_start = START_COLUMN;
        let mut previous_max = None;
        for (&track, &width) in outcome.column_track_ids().iter().zip(outcome.column_widths()) {
            let lane_end = lane_start + width;
            if let Some(&(min, max)) = columns.get(&track) {
                prop_assert!(min >= lane_start && max < lane_end);
                if let Some(previous) = previous_max {
                    prop_assert!(previous < min);
                }
                previous_max = Some(max);
            }
            lane_start = lane_end;
        }
    }

    #[test]
    fn row_lengths_match_widest_column((trees, lonely) in forest_strategy()) {
        let model = build_model(&trees, &lonely);
        let (table, outcome) = layout(&model);

        let frames = model.max_frame().map_or(0, |max| max + 1);
        prop_assert_eq!(outcome.row_lengths().len(), frames);

        let mut widest: HashMap<usize, usize> = HashMap::new();
        for (_, placement) in table.placements() {
            let entry = widest.entry(placement.row()).or_insert(0);
            *entry = (*entry).max(placement.column());
        }
        for frame in 0..frames {
            let expected = widest.get(&frame).map_or(START_COLUMN, |column| column + 1);
            prop_assert_eq!(outcome.row_length(frame), Some(expected));
        }
    }

    #[test]
    fn layout_is_deterministic((trees, lonely) in forest_strategy()) {
        let first_model = build_model(&trees, &lonely);
        let second_model = build_model(&trees, &lonely);

        let (first, first_outcome) = layout(&first_model);
        let (second, second_outcome) = layout(&second_model);

        prop_assert_eq!(
            first.placements().collect::<Vec<_>>(),
            second.placements().collect::<Vec<_>>()
        );
        prop_assert_eq!(first_outcome.column_widths(), second_outcome.column_widths());
        prop_assert_eq!(first_outcome.row_lengths(), second_outcome.row_lengths());
    }
}

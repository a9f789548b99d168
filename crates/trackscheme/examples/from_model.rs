//! Example: Laying out a lineage built in code
//!
//! Builds a small lineage with one division and one merge, lays it out and
//! prints the grid position of every spot followed by the SVG document.

use trackscheme::{SchemeBuilder, identifier::SpotId, model::TrackModel, spot::Spot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut lineage = TrackModel::builder();
    let spots = [
        (1, "mother", 0),
        (2, "left", 1),
        (3, "right", 1),
        (4, "left'", 2),
        (5, "right'", 2),
        (6, "fused", 3),
        (7, "debris", 1),
    ];
    for (id, name, frame) in spots {
        lineage.add_spot(Spot::new(SpotId::new(id), name, frame))?;
    }
    for (source, target) in [(1, 2), (1, 3), (2, 4), (3, 5), (4, 6), (5, 6)] {
        lineage.add_edge(SpotId::new(source), SpotId::new(target), 1.0)?;
    }
    let model = lineage.build()?;

    let builder = SchemeBuilder::default();
    let scheme = builder.layout(&model)?;

    for (spot, placement) in scheme.positions().placements() {
        println!(
            "{spot}: column {} row {}",
            placement.column(),
            placement.row()
        );
    }
    for lane in scheme.lane_bounds() {
        println!("{}: columns {:?}", lane.track(), lane.columns());
    }

    println!("\n{}", builder.render_svg(&scheme)?);
    Ok(())
}

//! Plain-text summaries of a measurement for the command line.

use std::fmt::Write;

use linekit_core::{
    displayed_lines, ClosestLine, DisplayPrecision, EndpointKind, LineId, Measurement,
    MeasurementTree,
};

/// One row per visible line: name, length, angle and midpoint.
///
/// The row for `closest` is marked with `*`.
pub fn line_table(
    measurement: &Measurement,
    precision: DisplayPrecision,
    closest: Option<LineId>,
) -> String {
    let rows = displayed_lines(measurement, closest, precision);
    let name_width = rows
        .iter()
        .map(|row| row.line.name.chars().count())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<width$}  {:>12}  {:>8}  MIDPOINT",
        "NAME",
        "LENGTH",
        "ANGLE",
        width = name_width
    );
    for row in &rows {
        let _ = writeln!(
            out,
            "{} {:<width$}  {:>12}  {:>8}  ({}, {})",
            if row.is_closest { '*' } else { ' ' },
            row.line.name,
            row.length,
            row.angle,
            row.x,
            row.y,
            width = name_width
        );
    }
    out
}

/// Describes a hit-test result, e.g. `Door [3] end, 0.50 px away`.
pub fn describe_hit(hit: &ClosestLine<'_>) -> String {
    let part = match hit.kind {
        EndpointKind::Start => "start",
        EndpointKind::Line => "line",
        EndpointKind::End => "end",
    };
    format!(
        "{} [{}] {}, {:.2} px away",
        hit.line.name, hit.line.id, part, hit.distance
    )
}

/// The group hierarchy as an indented outline.
///
/// Leaves show their line's name, or `<missing>` when no line has the id.
pub fn group_tree(measurement: &Measurement) -> String {
    let mut out = String::new();
    write_nodes(&mut out, measurement, &measurement.hierarchy, 0);
    out
}

fn write_nodes(
    out: &mut String,
    measurement: &Measurement,
    nodes: &[MeasurementTree],
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            MeasurementTree::Group(group) => {
                let _ = writeln!(out, "{}+ {} [{}]", indent, group.name, group.id);
                write_nodes(out, measurement, &group.items, depth + 1);
            }
            MeasurementTree::Leaf(leaf) => {
                let name = measurement
                    .line(leaf.id)
                    .map(|line| line.name.as_str())
                    .unwrap_or("<missing>");
                let _ = writeln!(out, "{}- {} [{}]", indent, name, leaf.id);
            }
        }
    }
}

use super::{names_or_none, print_shape, shape_info};
use crate::cli::CustomArgs;
use crate::output::OutputWriter;
use crate::output_types::CustomOutput;
use anyhow::{Context, Result};
use broadcast_areas_core::config::LayeredConfig;
use broadcast_areas_core::models::{AxisOrder, BroadcastMessageRecord};
use broadcast_areas_library::formats::GeoJsonReader;
use broadcast_areas_library::AreaLibraries;
use broadcast_areas_message::{BroadcastMessage, BroadcastSettings, InMemoryMessageApi};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

pub fn execute(
    args: CustomArgs,
    config: &LayeredConfig,
    libraries: &AreaLibraries,
    output: &OutputWriter,
) -> Result<()> {
    let drawn = GeoJsonReader
        .read_polygon_set(&args.path)
        .with_context(|| format!("Failed to read shape from {}", args.path.display()))?;

    let name = args.name.unwrap_or_else(|| {
        args.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Custom area".to_string())
    });

    // Stored the way a hand-drawn message is persisted: names and shapes, no ids
    let shape = drawn.smooth().simplify();
    debug!(
        points_in = drawn.point_count(),
        points_out = shape.point_count(),
        "Prepared drawn shape"
    );

    let mut draft = BroadcastMessageRecord::draft(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
    draft.areas.names = vec![name.clone()];
    draft.areas.simple_polygons = shape.as_coordinate_pairs(AxisOrder::LatLong);

    let api = InMemoryMessageApi::new();
    let message =
        BroadcastMessage::new(draft, libraries, &api).with_settings(BroadcastSettings::from(config));

    let report = CustomOutput {
        name,
        input: shape_info(&drawn),
        shape: shape_info(&message.simple_polygons()?),
        overlapping: message.summarised_area_names()?,
        count_of_phones: message.count_of_phones()?,
        count_of_phones_likely: message.count_of_phones_likely()?,
    };

    if output.is_json() {
        return output.result(report);
    }

    output.section(&report.name);
    print_shape(output, "Drawn", &report.input);
    print_shape(output, "Broadcast", &report.shape);
    output.kv("Overlaps", names_or_none(&report.overlapping));
    output.kv("Phones", format!("{:.0}", report.count_of_phones));
    output.kv("Phones likely", format!("{:.0}", report.count_of_phones_likely));

    if report.overlapping.is_empty() {
        output.warning("The shape does not overlap any electoral ward");
    } else {
        output.success("Shape is ready to broadcast");
    }
    Ok(())
}

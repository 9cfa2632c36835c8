use super::{names_or_none, print_shape, shape_info};
use crate::cli::SummariseArgs;
use crate::output::OutputWriter;
use crate::output_types::SummaryOutput;
use anyhow::{Context, Result};
use broadcast_areas_core::config::LayeredConfig;
use broadcast_areas_core::models::BroadcastMessageRecord;
use broadcast_areas_library::{AreaLibraries, BroadcastArea};
use broadcast_areas_message::{BroadcastMessage, BroadcastSettings, InMemoryMessageApi};
use chrono::Utc;
use uuid::Uuid;

pub fn execute(
    args: SummariseArgs,
    config: &LayeredConfig,
    libraries: &AreaLibraries,
    output: &OutputWriter,
) -> Result<()> {
    let api = InMemoryMessageApi::new();
    let draft = BroadcastMessageRecord::draft(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
    let mut message = BroadcastMessage::new(draft, libraries, &api)
        .with_settings(BroadcastSettings::from(config));

    message
        .add_areas(&args.ids)
        .with_context(|| format!("Failed to select areas {}", args.ids.join(", ")))?;

    let simple_polygons = message.simple_polygons()?;
    let summary = SummaryOutput {
        ids: message.record().areas.ids.clone(),
        names: message.record().areas.names.clone(),
        parent_names: message
            .parent_areas()?
            .iter()
            .map(|area| area.name().to_string())
            .collect(),
        summary: message.record().areas.aggregate_names.clone(),
        count_of_phones: message.count_of_phones()?,
        count_of_phones_likely: message.count_of_phones_likely()?,
        shape: shape_info(&simple_polygons),
    };

    if output.is_json() {
        return output.result(summary);
    }

    output.section("Selection");
    output.kv("Areas", names_or_none(&summary.names));
    output.kv("Within", names_or_none(&summary.parent_names));
    output.kv("Summary", names_or_none(&summary.summary));

    output.section("Broadcast");
    print_shape(output, "Shape", &summary.shape);
    output.kv("Phones", format!("{:.0}", summary.count_of_phones));
    output.kv("Phones likely", format!("{:.0}", summary.count_of_phones_likely));
    Ok(())
}

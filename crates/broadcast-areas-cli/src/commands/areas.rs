use crate::cli::AreasArgs;
use crate::output::OutputWriter;
use crate::output_types::{AreaInfo, AreasOutput};
use anyhow::{Context, Result};
use broadcast_areas_library::{AreaLibraries, BroadcastArea};
use tabled::Tabled;

pub fn execute(args: AreasArgs, libraries: &AreaLibraries, output: &OutputWriter) -> Result<()> {
    let library = libraries
        .get_library(&args.library)
        .with_context(|| format!("Unknown library '{}'", args.library))?;

    let mut areas: Vec<AreaInfo> = library
        .areas()
        .iter()
        .map(|area| AreaInfo {
            id: area.id().to_string(),
            name: area.name().to_string(),
            kind: area.kind().to_string(),
            parent_id: area.parent_id().map(str::to_string),
            count_of_phones: area.count_of_phones(),
        })
        .collect();
    areas.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    if output.is_json() {
        return output.result(AreasOutput { library: library.id.clone(), areas });
    }

    #[derive(Tabled)]
    struct AreaRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Parent")]
        parent: String,
        #[tabled(rename = "Phones")]
        phones: String,
    }

    output.section(&library.name);
    output.table(
        areas
            .into_iter()
            .map(|area| AreaRow {
                id: area.id,
                name: area.name,
                kind: area.kind,
                parent: area.parent_id.unwrap_or_else(|| "-".to_string()),
                phones: format!("{:.0}", area.count_of_phones),
            })
            .collect(),
    );
    Ok(())
}

use crate::output::OutputWriter;
use crate::output_types::{LibrariesOutput, LibraryInfo};
use anyhow::Result;
use broadcast_areas_library::AreaLibraries;
use tabled::Tabled;

const EXAMPLE_COUNT: usize = 4;

pub fn execute(libraries: &AreaLibraries, output: &OutputWriter) -> Result<()> {
    let mut infos = Vec::new();
    for library in libraries.libraries() {
        infos.push(LibraryInfo {
            id: library.id.clone(),
            name: library.name.clone(),
            name_singular: library.name_singular.clone(),
            is_group: library.is_group,
            area_count: library.len(),
            examples: libraries.examples(&library.id, EXAMPLE_COUNT)?,
        });
    }

    if output.is_json() {
        return output.result(LibrariesOutput { libraries: infos });
    }

    #[derive(Tabled)]
    struct LibraryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Areas")]
        area_count: usize,
        #[tabled(rename = "Examples")]
        examples: String,
    }

    output.section("Area libraries");
    output.table(
        infos
            .into_iter()
            .map(|info| LibraryRow {
                id: info.id,
                name: info.name,
                area_count: info.area_count,
                examples: info.examples.join(", "),
            })
            .collect(),
    );
    Ok(())
}

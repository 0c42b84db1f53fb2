use serde::Serialize;
use telemframe_catalog::{Catalog, Definition};

use crate::cmd::{load_catalog, TypesArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{new_table, order_label, print_json, range_label, OutputFormat};

#[derive(Serialize)]
struct TypesOutput {
    types: Vec<Definition>,
}

pub fn run(args: TypesArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    print_types(&catalog, format);
    Ok(SUCCESS)
}

fn print_types(catalog: &Catalog, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&TypesOutput {
            types: catalog.definitions(),
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec![
                "TYPE", "NAME", "LENGTH", "SIZE", "CHECKSUM RANGE", "ORDER",
            ]);
            for entry in catalog.iter() {
                let d = &entry.descriptor;
                table.add_row(vec![
                    d.type_tag.to_string(),
                    entry.name.clone(),
                    format!("{:#06x}", d.length_value()),
                    d.wire_size.to_string(),
                    range_label(d.checksum_range),
                    order_label(d.checksum_order).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in catalog.iter() {
                let d = &entry.descriptor;
                println!(
                    "{:>3}  {:<32} length={:#06x} size={:<4} checksum={} {}",
                    d.type_tag,
                    entry.name,
                    d.length_value(),
                    d.wire_size,
                    range_label(d.checksum_range),
                    order_label(d.checksum_order)
                );
            }
        }
        OutputFormat::Raw => {
            for entry in catalog.iter() {
                println!("{}\t{}", entry.descriptor.type_tag, entry.name);
            }
        }
    }
}

use ductwise_core::error::DuctError;
use ductwise_core::filter::FilterOptions;

use super::load_dataset;
use crate::InputArgs;

pub fn run(input: &InputArgs) -> Result<(), DuctError> {
    let dataset = load_dataset(input)?;
    if dataset.is_empty() {
        return Err(DuctError::NoUsableData);
    }

    let selected = (!input.units.is_empty()).then_some(input.units.as_slice());
    let options = FilterOptions::from_dataset(&dataset, selected);

    if options.units.is_empty() {
        println!("No Unit No found; all rows are kept.");
    } else {
        println!("Unit No ({}):", options.units.len());
        for unit in &options.units {
            println!("  {unit}");
        }
    }

    println!();
    println!("Vendor Name ({}):", options.vendors.len());
    for vendor in &options.vendors {
        println!("  {vendor}");
    }

    Ok(())
}

use crate::grouping::ordering::sort_master_rows;
use crate::model::{
    CellValue, Dataset, Record, Sheet, CREATED_ON, DUCT_NO, MODIFIED_ON, TOTAL_WEIGHT, UNIT_NO,
    WBS_CODE,
};
use crate::parsing::dates::{format_date_column, to_canonical};

/// Pass-through columns of the master sheet, in output order.
pub const MASTER_FRONT_COLUMNS: [&str; 19] = [
    "DU Code",
    "DU Description",
    "Mark No",
    "DU Quantity",
    "DU UOM",
    "DU Qty In Alternative UOM",
    "Alternate UOM",
    "Unit Weight in KG",
    "Total Weight",
    "Vendor Name",
    "PO No",
    "Package Code of Description",
    "Package Code of MR",
    "Mfg_DrawingNo",
    "Mfg_DrawingRevNo",
    "Shipping list rev. no(Alternate BOM)",
    "MR No",
    "Created On",
    "Modified On",
];

const DATE_COLUMNS: [&str; 2] = [CREATED_ON, MODIFIED_ON];

/// Output columns: the derived keys, then whichever front columns exist.
pub fn master_columns(dataset: &Dataset) -> Vec<String> {
    [DUCT_NO, UNIT_NO, WBS_CODE]
        .into_iter()
        .chain(
            MASTER_FRONT_COLUMNS
                .into_iter()
                .filter(|c| dataset.has_column(c)),
        )
        .map(String::from)
        .collect()
}

/// Every reportable line item, ordered by duct, unit and mark.
pub fn build_master_sheet(dataset: &Dataset) -> Sheet {
    let records: Vec<Record> = dataset
        .records
        .iter()
        .filter(|r| r.is_reportable())
        .cloned()
        .collect();
    let records = sort_master_rows(records);

    let columns = master_columns(dataset);
    let values: Vec<Vec<CellValue>> = columns
        .iter()
        .map(|column| column_values(&records, column))
        .collect();

    let rows = (0..records.len())
        .map(|i| values.iter().map(|col| col[i].clone()).collect())
        .collect();

    Sheet { columns, rows }
}

fn column_values(records: &[Record], column: &str) -> Vec<CellValue> {
    match column {
        TOTAL_WEIGHT => records
            .iter()
            .map(|r| CellValue::Number(r.total_weight))
            .collect(),
        c if DATE_COLUMNS.contains(&c) => {
            let raw: Vec<Option<String>> = records
                .iter()
                .map(|r| {
                    if c == MODIFIED_ON {
                        r.modified_on.as_ref().map(to_canonical)
                    } else {
                        r.get(c).map(String::from)
                    }
                })
                .collect();
            format_date_column(&raw)
                .into_iter()
                .map(|v| v.map(CellValue::Text).unwrap_or(CellValue::Empty))
                .collect()
        }
        c => records.iter().map(|r| CellValue::text(r.field(c))).collect(),
    }
}

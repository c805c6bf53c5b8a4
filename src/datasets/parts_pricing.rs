use chrono::NaiveDate;
use serde::Serialize;

use super::{Record, RowView};
use crate::parse::{MonthKey, ParseError};

/// One sales line of `parts_pricing_sales.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartsSale {
    /// `Date` as written in the file.
    pub date: String,
    pub sold_on: NaiveDate,
    pub month: MonthKey,
    pub part_id: String,
    pub part_name: String,
    pub category: String,
    pub region: String,
    pub segment: String,
    pub units_sold: f64,
    pub unit_price: f64,
    pub revenue: f64,
}

impl Record for PartsSale {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "PartID",
        "PartName",
        "Category",
        "Region",
        "Segment",
        "UnitsSold",
        "UnitPrice",
        "Revenue",
    ];

    fn from_row(row: &RowView<'_>) -> Result<Self, ParseError> {
        let sold_on = row.date("Date")?;
        Ok(Self {
            date: row.text("Date")?,
            sold_on,
            month: MonthKey::from_date(sold_on),
            part_id: row.text("PartID")?,
            part_name: row.text("PartName")?,
            category: row.text("Category")?,
            region: row.text("Region")?,
            segment: row.text("Segment")?,
            units_sold: row.number("UnitsSold")?,
            unit_price: row.number("UnitPrice")?,
            revenue: row.number("Revenue")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::Dataset;

    #[test]
    fn loads_parts_rows() -> anyhow::Result<()> {
        let text = "Date,PartID,PartName,Category,Region,Segment,UnitsSold,UnitPrice,Revenue\n\
                    2024-01-05,P-100,Brake Pad,Brakes,North,OEM,10,25.5,255\n";
        let ds = Dataset::<PartsSale>::from_csv(text)?;
        assert_eq!(ds.len(), 1);
        let row = &ds.rows[0];
        assert_eq!(row.part_id, "P-100");
        assert_eq!(row.month.to_string(), "2024-01");
        assert_eq!(row.units_sold, 10.0);
        assert_eq!(row.unit_price, 25.5);
        Ok(())
    }

    #[test]
    fn bad_date_names_the_column() {
        let text = "Date,PartID,PartName,Category,Region,Segment,UnitsSold,UnitPrice,Revenue\n\
                    05/01/2024,P-100,Brake Pad,Brakes,North,OEM,10,25.5,255\n";
        let err = Dataset::<PartsSale>::from_csv(text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { line: 2, ref column, .. } if column == "Date"));
    }
}

use serde::Serialize;

use super::{Record, RowView};
use crate::parse::{MonthKey, ParseError};

/// One order from `customer_orders.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerOrder {
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: String,
    pub region: String,
    pub order_date: String,
    pub month: MonthKey,
    pub revenue: f64,
}

impl Record for CustomerOrder {
    const COLUMNS: &'static [&'static str] = &[
        "OrderID",
        "CustomerID",
        "CustomerName",
        "Segment",
        "Region",
        "OrderDate",
        "Revenue",
    ];

    fn from_row(row: &RowView<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            order_id: row.text("OrderID")?,
            customer_id: row.text("CustomerID")?,
            customer_name: row.text("CustomerName")?,
            segment: row.text("Segment")?,
            region: row.text("Region")?,
            order_date: row.text("OrderDate")?,
            month: row.month("OrderDate")?,
            revenue: row.number("Revenue")?,
        })
    }
}

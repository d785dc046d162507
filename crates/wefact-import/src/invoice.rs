//! Turns an exported invoice into `invoice/add` parameters.

use chrono::NaiveDate;
use wefact_client::Params;

use crate::config::InvoiceDefaults;
use crate::error::Result;
use crate::export::Invoice;
use crate::period::InvoicePeriod;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DESCRIPTION_PREFIX: &str = "Verbruikskosten";

/// Parameters for one `invoice/add` call.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    /// Form fields to send.
    pub params: Params,
    /// Number of invoice lines in `params`.
    pub lines: usize,
}

/// Build the `invoice/add` parameters for an exported invoice.
///
/// Only specifications with a positive amount become invoice lines; line
/// indices stay contiguous. `today` is used as the date of every line.
///
/// # Errors
///
/// Returns an error if an amount is not numeric.
pub fn invoice_params(
    invoice: &Invoice,
    period: &InvoicePeriod,
    defaults: &InvoiceDefaults,
    today: NaiveDate,
) -> Result<InvoiceDraft> {
    let mut params = Params::new()
        .with("DebtorCode", invoice.debtor_number.as_str())
        .with(
            "Description",
            format!("{DESCRIPTION_PREFIX}: {}", invoice.period.trim()),
        );

    let today = today.format(DATE_FORMAT).to_string();
    let start = period.start.format(DATE_FORMAT).to_string();
    let end = period.end.format(DATE_FORMAT).to_string();

    let mut index = 0usize;
    for spec in &invoice.specifications.items {
        if spec.amount_value()? <= 0.0 {
            continue;
        }

        let fields = [
            ("Date", today.clone()),
            ("Description", format!("{DESCRIPTION_PREFIX}: {}", spec.category)),
            ("ProductCode", defaults.product_code.clone()),
            ("PriceExcl", spec.price()),
            ("StartDate", start.clone()),
            ("EndDate", end.clone()),
            ("TaxCode", defaults.tax_code.clone()),
            ("TaxPercentage", defaults.tax_percentage.clone()),
        ];
        for (field, value) in fields {
            params.add(Params::nested_key("InvoiceLines", &[&index, &field]), value);
        }
        index += 1;
    }

    Ok(InvoiceDraft {
        params,
        lines: index,
    })
}

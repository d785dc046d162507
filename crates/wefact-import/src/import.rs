//! The import run.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};
use wefact_client::{Response, WefactClient};

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::export::{Invoice, Invoices};
use crate::invoice::invoice_params;
use crate::period::{parse_invoice_date, InvoicePeriod};
use crate::watermark::{default_watermark, read_watermark, watermark_params};

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Export file to import.
    pub file: PathBuf,
    /// Leave the export file in place afterwards.
    pub keep_file: bool,
    /// Log what would be imported without changing anything.
    pub dry_run: bool,
}

/// Outcome counters of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Invoices created in WeFact (or that would be, on a dry run).
    pub imported: usize,
    /// Invoices at or before the debtor's watermark.
    pub skipped: usize,
    /// Invoices that could not be looked up or imported.
    pub failed: usize,
}

/// Replays exported invoices into WeFact.
#[derive(Debug)]
pub struct Importer<'a> {
    client: &'a WefactClient,
    config: &'a ImportConfig,
    today: NaiveDate,
    dry_run: bool,
}

impl<'a> Importer<'a> {
    /// Create an importer that dates invoice lines `today`.
    #[must_use]
    pub fn new(client: &'a WefactClient, config: &'a ImportConfig, today: NaiveDate) -> Self {
        Self {
            client,
            config,
            today,
            dry_run: false,
        }
    }

    /// Only log what would be imported.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Import every invoice newer than its debtor's watermark.
    ///
    /// Lookup and import failures are logged and counted; the run carries on
    /// with the next invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if an invoice date cannot be parsed, which aborts
    /// the run.
    pub async fn run(&self, export: &Invoices) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for invoice in &export.invoices {
            let debtor = match self.client.get_debtor(&invoice.debtor_number).await {
                Ok(response) if !response.is_error() => response,
                Ok(response) => {
                    warn!(
                        debtor = %invoice.debtor_number,
                        customer = %invoice.customer_name,
                        errors = ?response.errors(),
                        "Debtor lookup rejected"
                    );
                    summary.failed += 1;
                    continue;
                }
                Err(e) => {
                    warn!(
                        debtor = %invoice.debtor_number,
                        customer = %invoice.customer_name,
                        error = %e,
                        "Failed to get debtor"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let invoice_date =
                parse_invoice_date(&invoice.date).map_err(|source| ImportError::InvalidDate {
                    value: invoice.date.clone(),
                    source,
                })?;

            let watermark = debtor.object("debtor").map_or_else(
                default_watermark,
                |d| read_watermark(d, &self.config.watermark_field),
            );

            if invoice_date <= watermark.and_time(chrono::NaiveTime::MIN) {
                debug!(
                    debtor = %invoice.debtor_number,
                    invoice_date = %invoice_date,
                    watermark = %watermark,
                    "Invoice already imported"
                );
                summary.skipped += 1;
                continue;
            }

            match self.import_invoice(invoice).await {
                Ok(()) => summary.imported += 1,
                Err(e) => {
                    warn!(
                        debtor = %invoice.debtor_number,
                        customer = %invoice.customer_name,
                        error = %e,
                        "Failed to import invoice"
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Create the invoice, then move the debtor's watermark to the period end.
    #[instrument(skip(self, invoice), fields(debtor = %invoice.debtor_number))]
    async fn import_invoice(&self, invoice: &Invoice) -> Result<()> {
        let period = InvoicePeriod::parse(&invoice.period)?;
        let draft = invoice_params(invoice, &period, &self.config.invoice, self.today)?;

        info!(
            customer = %invoice.customer_name,
            period = %invoice.period,
            lines = draft.lines,
            "Creating invoice"
        );

        if self.dry_run {
            info!(watermark = %period.end, "Dry run, not sending");
            return Ok(());
        }

        let response = self
            .client
            .create_invoice(&invoice.debtor_number, draft.params)
            .await?;
        ensure_accepted(&response, "invoice", "add")?;

        let response = self
            .client
            .edit_debtor(
                &invoice.debtor_number,
                watermark_params(&self.config.watermark_field, period.end),
            )
            .await?;
        ensure_accepted(&response, "debtor", "edit")?;

        debug!(watermark = %period.end, "Watermark advanced");
        Ok(())
    }
}

fn ensure_accepted(response: &Response, controller: &str, action: &str) -> Result<()> {
    if response.is_error() {
        return Err(ImportError::Rejected {
            controller: controller.to_string(),
            action: action.to_string(),
            errors: response.errors(),
        });
    }
    Ok(())
}

/// Read the export, import it, and remove the file unless asked to keep it.
///
/// The file is kept on dry runs and when the run aborts.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or removed, or if the
/// run aborts.
pub async fn run(
    client: &WefactClient,
    config: &ImportConfig,
    options: &RunOptions,
) -> Result<ImportSummary> {
    let export = Invoices::read(&options.file)?;
    info!(
        file = %options.file.display(),
        invoices = export.invoices.len(),
        "Loaded invoice export"
    );

    let today = chrono::Local::now().date_naive();
    let summary = Importer::new(client, config, today)
        .dry_run(options.dry_run)
        .run(&export)
        .await?;

    if !options.keep_file && !options.dry_run {
        std::fs::remove_file(&options.file).map_err(|source| ImportError::Io {
            path: options.file.clone(),
            source,
        })?;
        debug!(file = %options.file.display(), "Removed invoice export");
    }

    Ok(summary)
}

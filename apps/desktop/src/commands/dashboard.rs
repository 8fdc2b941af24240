//! # Dashboard Commands
//!
//! Sales listing, statistics, sale details, and cancellation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales Dashboard                                                        │
//! │                                                                         │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐            │
//! │  │ Today                    │  │ This month               │            │
//! │  │ 4 sales  $1,160.00       │  │ 87 sales  $25,520.00     │            │
//! │  └──────────────────────────┘  └──────────────────────────┘            │
//! │       get_dashboard_stats                                               │
//! │                                                                         │
//! │  [ last 7 days ▾ ] [ search...        ]     list_sales                  │
//! │  #12  2024-03-09 12:30  cash   $29.58   [details] [cancel]              │
//! │                                  get_sale_details  cancel_sale          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that depend on the date take `today` from the caller; see
//! [`today`].

use chrono::{Local, NaiveDate};
use salesys_client::Operation;
use salesys_core::dashboard::filter_sales;
use salesys_core::validation::validate_search_query;
use salesys_core::{
    DateRange, Invoice, InvoiceStatus, MenuSection, Money, Sale, SaleDetailWithProduct, SaleId,
    SaleStatus, SalesSummary,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{BackendState, ConfigState, SessionState};

/// Days before today shown when no range is chosen.
pub const DEFAULT_SALES_WINDOW_DAYS: u32 = 7;

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    #[serde(flatten)]
    pub summary: SalesSummary,
    pub total_display: String,
    pub taxes_display: String,
    pub net_display: String,
}

impl SummaryView {
    fn new(summary: SalesSummary, config: &ConfigState) -> Self {
        let fmt = |amount: Money| config.inner().format_money(amount);
        SummaryView {
            total_display: fmt(summary.total),
            taxes_display: fmt(summary.taxes),
            net_display: fmt(summary.net),
            summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today: SummaryView,
    pub month: SummaryView,
}

async fn sales_in(backend: &BackendState, range: &DateRange) -> Result<Vec<Sale>, ApiError> {
    let (start, end) = range.to_wire();
    debug!(%start, %end, "Fetching sales");
    Ok(backend
        .call(
            Operation::GetSalesByDateRange,
            backend.inner().get_sales_by_date_range(range),
        )
        .await?)
}

/// Sales in the chosen days (default: the last week), filtered by the
/// search box.
pub async fn list_sales(
    session: &SessionState,
    backend: &BackendState,
    query: SalesQuery,
    today: NaiveDate,
) -> Result<Vec<Sale>, ApiError> {
    debug!(?query, "list_sales command");
    session.require(MenuSection::Sales)?;

    let range = match (query.first, query.last) {
        (Some(first), Some(last)) => DateRange::days(first, last)?,
        (Some(first), None) => DateRange::days(first, today)?,
        (None, Some(last)) => DateRange::day(last),
        (None, None) => DateRange::last_days(today, DEFAULT_SALES_WINDOW_DAYS),
    };
    let term = validate_search_query(query.search.as_deref().unwrap_or(""))?;

    let sales = sales_in(backend, &range).await?;
    Ok(filter_sales(&sales, &term).into_iter().cloned().collect())
}

pub async fn get_dashboard_stats(
    session: &SessionState,
    backend: &BackendState,
    config: &ConfigState,
    today: NaiveDate,
) -> Result<DashboardStats, ApiError> {
    debug!(%today, "get_dashboard_stats command");
    session.require(MenuSection::Dashboard)?;

    // the month always contains today, so one fetch covers both
    let month_sales = sales_in(backend, &DateRange::month_of(today)).await?;
    let day = DateRange::day(today);

    let month = SalesSummary::from_sales(&month_sales);
    let today = SalesSummary::from_sales(month_sales.iter().filter(|s| day.contains(s.date)));

    Ok(DashboardStats {
        today: SummaryView::new(today, config),
        month: SummaryView::new(month, config),
    })
}

pub async fn get_sale(
    session: &SessionState,
    backend: &BackendState,
    id: SaleId,
) -> Result<Sale, ApiError> {
    debug!(id, "get_sale command");
    session.require(MenuSection::Sales)?;

    Ok(backend
        .call(Operation::GetSale, backend.inner().get_sale(id))
        .await?)
}

pub async fn get_sale_details(
    session: &SessionState,
    backend: &BackendState,
    sale_id: SaleId,
) -> Result<Vec<SaleDetailWithProduct>, ApiError> {
    debug!(sale_id, "get_sale_details command");
    session.require(MenuSection::Sales)?;

    Ok(backend
        .call(
            Operation::GetSaleDetails,
            backend.inner().get_sale_details(sale_id),
        )
        .await?)
}

pub async fn cancel_sale(
    session: &SessionState,
    backend: &BackendState,
    id: SaleId,
) -> Result<(), ApiError> {
    debug!(id, "cancel_sale command");
    session.require(MenuSection::Sales)?;

    let sale = backend
        .call(Operation::GetSale, backend.inner().get_sale(id))
        .await?;
    if sale.status == SaleStatus::Canceled {
        return Err(ApiError::validation(format!("Sale {} is already canceled", id)));
    }

    backend
        .call(Operation::CancelSale, backend.inner().cancel_sale(id))
        .await?;
    info!(sale_id = id, "Sale canceled");
    Ok(())
}

pub async fn get_sale_invoices(
    session: &SessionState,
    backend: &BackendState,
    sale_id: SaleId,
) -> Result<Vec<Invoice>, ApiError> {
    debug!(sale_id, "get_sale_invoices command");
    session.require(MenuSection::Invoices)?;

    Ok(backend
        .call(
            Operation::GetInvoicesBySale,
            backend.inner().get_invoices_by_sale(sale_id),
        )
        .await?)
}

pub async fn cancel_invoice(
    session: &SessionState,
    backend: &BackendState,
    sale_id: SaleId,
    uuid: String,
) -> Result<(), ApiError> {
    debug!(sale_id, uuid = %uuid, "cancel_invoice command");
    session.require(MenuSection::Invoices)?;

    let invoices = backend
        .call(
            Operation::GetInvoicesBySale,
            backend.inner().get_invoices_by_sale(sale_id),
        )
        .await?;
    match invoices.iter().find(|i| i.uuid == uuid) {
        None => return Err(ApiError::not_found("Invoice", &uuid)),
        Some(invoice) if invoice.status == InvoiceStatus::Canceled => {
            return Err(ApiError::validation(format!(
                "Invoice {} is already canceled",
                uuid
            )))
        }
        Some(_) => {}
    }

    backend
        .call(Operation::CancelInvoice, backend.inner().cancel_invoice(&uuid))
        .await?;
    info!(sale_id, uuid = %uuid, "Invoice canceled");
    Ok(())
}

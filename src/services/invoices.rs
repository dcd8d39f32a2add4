//! Invoice management
//!
//! Numbering is a detailer-scoped sequence within the creation year; the
//! display form is `FV/{year}/{number:04}`. Line items travel as an
//! opaque JSON blob. PDF rendering belongs to another system.

use chrono::{Datelike, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        invoice::{CreateInvoice, Invoice},
        EntityId,
    },
    store::Store,
};

#[derive(Clone)]
pub struct InvoicesService {
    store: Store,
}

impl InvoicesService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_invoice(
        &self,
        detailer_id: &EntityId,
        data: CreateInvoice,
    ) -> AppResult<Invoice> {
        data.validate()?;

        let now = Utc::now().naive_utc();
        let number = self.store.invoices.next_number(detailer_id, now.year()).await?;
        let invoice = Invoice {
            id: EntityId::new(),
            number,
            date_created: now,
            detailer_id: detailer_id.clone(),
            first_name: data.first_name,
            last_name: data.last_name,
            amount_brutto: data.amount_brutto,
            positions: data.positions,
        };
        self.store.invoices.insert(invoice.clone()).await?;
        Ok(invoice)
    }

    pub async fn invoices(&self, detailer_id: &EntityId) -> AppResult<Vec<Invoice>> {
        Ok(self.store.invoices.list_for_detailer(detailer_id).await?)
    }

    pub async fn remove_invoice(
        &self,
        detailer_id: &EntityId,
        invoice_id: &EntityId,
    ) -> AppResult<()> {
        self.store
            .invoices
            .get(invoice_id)
            .await?
            .filter(|i| &i.detailer_id == detailer_id)
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

        self.store.invoices.delete(invoice_id).await?;
        Ok(())
    }
}

//! Invoice generation.

use crate::client::ApiClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::InvoiceRequest;

pub const GENERATE: Endpoint = Endpoint::new(HttpMethod::Post, "/invoice/generate");

pub const APPLICATION_PDF: &str = "application/pdf";

pub struct Invoices<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Invoices<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Render an invoice and return the PDF document bytes.
    pub async fn generate(&self, request: &InvoiceRequest) -> Result<Vec<u8>, ApiError> {
        let path = GENERATE.path(&[])?;
        self.client
            .execute_raw(GENERATE.method, &path, Some(request), APPLICATION_PDF)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, ACCEPT};
    use crate::session::Session;
    use crate::transport::testing::ScriptedTransport;
    use crate::types::{InvoiceLine, Party, TaxRates, TotalSummary};

    fn request() -> InvoiceRequest {
        InvoiceRequest {
            invoice_date: "2026-01-15".to_string(),
            receiver: Party::default(),
            consignee: Party::default(),
            items: vec![InvoiceLine {
                serial_no: 1,
                description: "Silk saree".to_string(),
                hsn_code: "5007".to_string(),
                quantity: 2.0,
                rate: 1500.0,
                amount: 3000.0,
            }],
            tax: TaxRates::default(),
            total_summary: TotalSummary::default(),
        }
    }

    #[tokio::test]
    async fn generate_returns_pdf_bytes() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), APPLICATION_PDF.to_string())],
            body: b"%PDF-1.4 fake".to_vec(),
        })]);
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);

        let pdf = c.invoices().generate(&request()).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let sent = c.transport().requests();
        assert_eq!(sent[0].header(ACCEPT), Some(APPLICATION_PDF));
        assert_eq!(sent[0].url, "http://admin.test/api/admin/v1/invoice/generate");
    }
}

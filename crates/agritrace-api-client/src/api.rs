//! Domain methods for the AgriTrace admin API.
//!
//! Entity operations over the admin backend: products, companies, and
//! company documents. Response types live in `agritrace_core::models`.
//! Create/update bodies are validated locally before any request is sent.

use crate::{admin_prefix, ApiClient};
use agritrace_core::models::{
    Company, CompanyDocument, CompanyStatus, ConfirmUpload, CreateCompany, CreateProduct, Page,
    PageRequest, Product, ProductStatus, RequestUploadUrl, UpdateCompany, UpdateProduct,
    UploadUrlGrant,
};
use anyhow::{Context, Result};
use uuid::Uuid;
use validator::Validate;

fn page_query(request: &PageRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", request.page.to_string()),
        ("size", request.size.to_string()),
    ];
    if let Some(q) = &request.q {
        query.push(("q", q.clone()));
    }
    query
}

impl ApiClient {
    // Products

    /// List products with pagination and optional text search.
    pub async fn list_products(&self, request: &PageRequest) -> Result<Page<Product>> {
        self.get(
            &format!("{}/products", admin_prefix()),
            &page_query(request),
        )
        .await
    }

    /// Get a single product by ID.
    pub async fn get_product(&self, id: Uuid) -> Result<Product> {
        self.get(&format!("{}/products/{}", admin_prefix(), id), &[])
            .await
    }

    /// Create a new product.
    pub async fn create_product(&self, dto: &CreateProduct) -> Result<Product> {
        dto.validate().context("Invalid product data")?;
        self.post_json(&format!("{}/products", admin_prefix()), dto)
            .await
    }

    /// Partially update an existing product.
    pub async fn update_product(&self, id: Uuid, dto: &UpdateProduct) -> Result<Product> {
        dto.validate().context("Invalid product data")?;
        self.patch_json(&format!("{}/products/{}", admin_prefix(), id), dto)
            .await
    }

    /// Delete a product by ID.
    pub async fn delete_product(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("{}/products/{}", admin_prefix(), id))
            .await
    }

    /// Set a product's status (ACTIVE or INACTIVE).
    pub async fn set_product_status(&self, id: Uuid, status: ProductStatus) -> Result<Product> {
        let dto = UpdateProduct {
            status: Some(status),
            ..Default::default()
        };
        self.update_product(id, &dto).await
    }

    /// Activate a product.
    pub async fn activate_product(&self, id: Uuid) -> Result<Product> {
        self.set_product_status(id, ProductStatus::Active).await
    }

    /// Deactivate a product.
    pub async fn deactivate_product(&self, id: Uuid) -> Result<Product> {
        self.set_product_status(id, ProductStatus::Inactive).await
    }

    // Companies

    /// List companies with pagination and optional text search.
    pub async fn list_companies(&self, request: &PageRequest) -> Result<Page<Company>> {
        self.get(
            &format!("{}/companies", admin_prefix()),
            &page_query(request),
        )
        .await
    }

    /// Get a single company by ID.
    pub async fn get_company(&self, id: Uuid) -> Result<Company> {
        self.get(&format!("{}/companies/{}", admin_prefix(), id), &[])
            .await
    }

    /// Register a new company.
    pub async fn create_company(&self, dto: &CreateCompany) -> Result<Company> {
        dto.validate().context("Invalid company data")?;
        self.post_json(&format!("{}/companies", admin_prefix()), dto)
            .await
    }

    /// Partially update an existing company.
    pub async fn update_company(&self, id: Uuid, dto: &UpdateCompany) -> Result<Company> {
        dto.validate().context("Invalid company data")?;
        self.patch_json(&format!("{}/companies/{}", admin_prefix(), id), dto)
            .await
    }

    /// Delete a company by ID.
    pub async fn delete_company(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("{}/companies/{}", admin_prefix(), id))
            .await
    }

    /// Assign a platform user as the company administrator.
    pub async fn assign_company_admin(&self, id: Uuid, admin_user_id: Uuid) -> Result<Company> {
        let dto = UpdateCompany {
            admin_user_id: Some(admin_user_id),
            ..Default::default()
        };
        self.update_company(id, &dto).await
    }

    /// Set a company's status (active or inactive).
    pub async fn set_company_status(&self, id: Uuid, status: CompanyStatus) -> Result<Company> {
        let dto = UpdateCompany {
            status: Some(status),
            ..Default::default()
        };
        self.update_company(id, &dto).await
    }

    // Company documents

    /// List documents attached to a company.
    pub async fn list_company_documents(&self, company_id: Uuid) -> Result<Vec<CompanyDocument>> {
        self.get(
            &format!("{}/companies/{}/documents", admin_prefix(), company_id),
            &[],
        )
        .await
    }

    /// Request a write-mode signed upload URL for a company document.
    /// The grant is single-use and expires; it is never cached.
    pub async fn request_document_upload_url(
        &self,
        company_id: Uuid,
        dto: &RequestUploadUrl,
    ) -> Result<UploadUrlGrant> {
        self.post_json(
            &format!(
                "{}/companies/{}/documents/upload-url",
                admin_prefix(),
                company_id
            ),
            dto,
        )
        .await
    }

    /// Confirm a completed direct upload so the backend registers the
    /// document metadata.
    pub async fn confirm_document_upload(
        &self,
        company_id: Uuid,
        dto: &ConfirmUpload,
    ) -> Result<CompanyDocument> {
        self.post_json(
            &format!(
                "{}/companies/{}/documents/confirm",
                admin_prefix(),
                company_id
            ),
            dto,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Auth;

    #[tokio::test]
    async fn list_products_builds_pagination_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/admin/products")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("page".into(), "1".into()),
                mockito::Matcher::UrlEncoded("size".into(), "10".into()),
                mockito::Matcher::UrlEncoded("q".into(), "coffee".into()),
            ]))
            .with_body(r#"{"items":[],"total":0,"page":1,"size":10}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Auth::None).unwrap();
        let request = PageRequest::new(1, 10).with_query("coffee");
        let page = client.list_products(&request).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_product_rejects_invalid_name_before_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/admin/products")
            .expect(0)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Auth::None).unwrap();
        let dto = CreateProduct {
            name: "ab".to_string(),
            description: None,
        };
        assert!(client.create_product(&dto).await.is_err());
        mock.assert_async().await;
    }
}

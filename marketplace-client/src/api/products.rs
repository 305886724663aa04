use serde::Serialize;

use crate::api::errors::{ApiError, expect_success, extract_list, into_json};
use crate::api::types::{Category, Product};
use crate::session::SessionManager;

/// Product catalog, listing management and the admin moderation queue.
/// Browsing endpoints are anonymous; everything that touches ownership or
/// moderation goes through the authenticated-request contract.
pub struct ProductsApi<'a> {
    session: &'a SessionManager,
}

#[derive(Debug, Clone, Default)]
pub struct ProductSearch {
    pub search: String,
    pub category: Option<String>,
}

/// Body for `POST /products/`. Media is referenced by storage path; the
/// backend requires at least one image or video.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: i64,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl<'a> ProductsApi<'a> {
    pub fn new(session: &'a SessionManager) -> Self {
        Self { session }
    }

    /// `GET /products/` with optional query parameters (e.g. `category`).
    pub async fn list(&self, params: &[(&str, &str)]) -> Result<Vec<Product>, ApiError> {
        let response = self
            .session
            .http()
            .get(self.session.endpoint("/products/"))
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        extract_list(response).await
    }

    /// `GET /products/{id}/`.
    pub async fn get(&self, product_id: &str) -> Result<Product, ApiError> {
        let response = self
            .session
            .http()
            .get(self.session.endpoint(&format!("/products/{product_id}/")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        into_json(response).await
    }

    /// `GET /products/search/`.
    pub async fn search(&self, query: &ProductSearch) -> Result<Vec<Product>, ApiError> {
        let mut params = vec![("search", query.search.as_str())];
        if let Some(category) = &query.category {
            params.push(("category", category.as_str()));
        }
        let response = self
            .session
            .http()
            .get(self.session.endpoint("/products/search/"))
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        extract_list(response).await
    }

    /// `GET /products/my/`. The caller's own listings, any status.
    pub async fn my_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.session.http().get(self.session.endpoint("/products/my/"));
        let response = self.session.send_authorized(request).await?;
        extract_list(response).await
    }

    /// `POST /products/`.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint("/products/"))
            .json(product);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `PATCH /products/{id}/`.
    pub async fn update(
        &self,
        product_id: &str,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let request = self
            .session
            .http()
            .patch(self.session.endpoint(&format!("/products/{product_id}/")))
            .json(update);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `DELETE /products/{id}/`.
    pub async fn delete(&self, product_id: &str) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .delete(self.session.endpoint(&format!("/products/{product_id}/")));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }

    /// `GET /products/pending/`, the admin moderation queue.
    pub async fn pending(&self) -> Result<Vec<Product>, ApiError> {
        let request = self
            .session
            .http()
            .get(self.session.endpoint("/products/pending/"));
        let response = self.session.send_authorized(request).await?;
        extract_list(response).await
    }

    /// `POST /products/{id}/approve/`.
    pub async fn approve(&self, product_id: &str) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint(&format!("/products/{product_id}/approve/")));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }

    /// `POST /products/{id}/reject/`. A reason is mandatory.
    pub async fn reject(&self, product_id: &str, rejection_reason: &str) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint(&format!("/products/{product_id}/reject/")))
            .json(&serde_json::json!({ "rejection_reason": rejection_reason }));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }

    /// `GET /categories/`.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self
            .session
            .http()
            .get(self.session.endpoint("/categories/"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        extract_list(response).await
    }

    /// `POST /categories/` (admin).
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let request = self
            .session
            .http()
            .post(self.session.endpoint("/categories/"))
            .json(category);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `PATCH /categories/{id}/` (admin).
    pub async fn update_category(
        &self,
        category_id: i64,
        category: &NewCategory,
    ) -> Result<Category, ApiError> {
        let request = self
            .session
            .http()
            .patch(self.session.endpoint(&format!("/categories/{category_id}/")))
            .json(category);
        let response = self.session.send_authorized(request).await?;
        into_json(response).await
    }

    /// `DELETE /categories/{id}/` (admin).
    pub async fn delete_category(&self, category_id: i64) -> Result<(), ApiError> {
        let request = self
            .session
            .http()
            .delete(self.session.endpoint(&format!("/categories/{category_id}/")));
        let response = self.session.send_authorized(request).await?;
        expect_success(response).await
    }
}

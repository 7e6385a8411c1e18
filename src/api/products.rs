//! Product endpoints.

use super::ApiClient;
use super::client::{require, seg};
use crate::error::AppResult;
use crate::models::{
    CreateProductRequest, IdResponse, Product, ProductVersion, ProductVersionRequest,
    UpdateProductRequest,
};

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        self.client.get_json("/products").await
    }

    pub async fn get(&self, id: &str) -> AppResult<Product> {
        require(id, "Product ID")?;
        self.client
            .get_json(&format!("/products/{}", seg(id)))
            .await
    }

    pub async fn create(&self, request: &CreateProductRequest) -> AppResult<IdResponse> {
        self.client.post_json("/products", request).await
    }

    pub async fn update(&self, id: &str, request: &UpdateProductRequest) -> AppResult<()> {
        require(id, "Product ID")?;
        self.client
            .put_unit(&format!("/products/{}", seg(id)), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        require(id, "Product ID")?;
        self.client.delete(&format!("/products/{}", seg(id))).await
    }

    pub async fn add_version(
        &self,
        product_id: &str,
        request: &ProductVersionRequest,
    ) -> AppResult<ProductVersion> {
        require(product_id, "Product ID")?;
        self.client
            .post_json(&format!("/products/{}/versions", seg(product_id)), request)
            .await
    }

    pub async fn remove_version(&self, product_id: &str, version_id: &str) -> AppResult<()> {
        require(product_id, "Product ID")?;
        require(version_id, "Version ID")?;
        self.client
            .delete(&format!(
                "/products/{}/versions/{}",
                seg(product_id),
                seg(version_id)
            ))
            .await
    }
}

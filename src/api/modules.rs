//! Product module and module attribute endpoints.

use super::ApiClient;
use super::client::{require, seg};
use crate::error::AppResult;
use crate::models::{
    CreateModuleRequest, IdResponse, ModuleAttribute, ModuleAttributeRequest, ProductModule,
    UpdateModuleRequest,
};

pub struct ModulesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ModulesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, product_id: &str) -> AppResult<Vec<ProductModule>> {
        require(product_id, "Product ID")?;
        self.client
            .get_json(&format!("/products/{}/modules", seg(product_id)))
            .await
    }

    pub async fn get(&self, product_id: &str, id: &str) -> AppResult<ProductModule> {
        require(product_id, "Product ID")?;
        require(id, "Module ID")?;
        self.client
            .get_json(&format!("/products/{}/modules/{}", seg(product_id), seg(id)))
            .await
    }

    pub async fn create(
        &self,
        product_id: &str,
        request: &CreateModuleRequest,
    ) -> AppResult<IdResponse> {
        require(product_id, "Product ID")?;
        self.client
            .post_json(&format!("/products/{}/modules", seg(product_id)), request)
            .await
    }

    pub async fn update(
        &self,
        product_id: &str,
        id: &str,
        request: &UpdateModuleRequest,
    ) -> AppResult<ProductModule> {
        require(product_id, "Product ID")?;
        require(id, "Module ID")?;
        self.client
            .put_json(
                &format!("/products/{}/modules/{}", seg(product_id), seg(id)),
                request,
            )
            .await
    }

    pub async fn delete(&self, product_id: &str, id: &str) -> AppResult<()> {
        require(product_id, "Product ID")?;
        require(id, "Module ID")?;
        self.client
            .delete(&format!("/products/{}/modules/{}", seg(product_id), seg(id)))
            .await
    }

    /// Attribute schema declared on a module.
    pub async fn attributes(&self, module_id: &str) -> AppResult<Vec<ModuleAttribute>> {
        require(module_id, "Module ID")?;
        self.client
            .get_json(&format!("/modules/{}/attributes", seg(module_id)))
            .await
    }

    pub async fn create_attribute(
        &self,
        module_id: &str,
        request: &ModuleAttributeRequest,
    ) -> AppResult<IdResponse> {
        require(module_id, "Module ID")?;
        self.client
            .post_json(&format!("/modules/{}/attributes", seg(module_id)), request)
            .await
    }

    pub async fn update_attribute(
        &self,
        module_id: &str,
        attribute_id: &str,
        request: &ModuleAttributeRequest,
    ) -> AppResult<ModuleAttribute> {
        require(module_id, "Module ID")?;
        require(attribute_id, "Attribute ID")?;
        self.client
            .put_json(
                &format!(
                    "/modules/{}/attributes/{}",
                    seg(module_id),
                    seg(attribute_id)
                ),
                request,
            )
            .await
    }

    pub async fn delete_attribute(&self, module_id: &str, attribute_id: &str) -> AppResult<()> {
        require(module_id, "Module ID")?;
        require(attribute_id, "Attribute ID")?;
        self.client
            .delete(&format!(
                "/modules/{}/attributes/{}",
                seg(module_id),
                seg(attribute_id)
            ))
            .await
    }
}

use super::model::{Product, ProductFilter};
use super::service::ProductService;
use crate::common::ApiResponse;
use crate::error::{AppError, Result};
use crate::pipe::{Pipe, builtins::ParseObjectIdPipe};
use axum::{
    Json, Router,
    extract::{
        Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

const NOT_FOUND: &str = "Bike not found";

type JsonBody = std::result::Result<Json<Value>, JsonRejection>;

/// `data` of a successful delete: an empty JSON object
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

pub struct ProductController {
    service: Arc<ProductService>,
}

impl ProductController {
    pub fn new(service: Arc<ProductService>) -> Self {
        Self { service }
    }

    pub fn base_path() -> &'static str {
        "/api/products"
    }

    /// Malformed JSON bodies are answered by the extractor's own rejection;
    /// every other extraction failure goes through the operation's envelope.
    pub fn router<S>(controller: Arc<Self>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new()
            .route(
                "/",
                get({
                    let controller = controller.clone();
                    move |filter: std::result::Result<Query<ProductFilter>, QueryRejection>| {
                        let controller = controller.clone();
                        async move {
                            let filter = filter
                                .map(|Query(filter)| filter)
                                .map_err(|rejection| AppError::Request(rejection.body_text()));
                            controller.get_all_products(filter).await.into_response()
                        }
                    }
                })
                .post({
                    let controller = controller.clone();
                    move |body: JsonBody| {
                        let controller = controller.clone();
                        async move {
                            match body {
                                Err(JsonRejection::JsonSyntaxError(rejection)) => {
                                    rejection.into_response()
                                }
                                body => controller
                                    .create_product(json_payload(body))
                                    .await
                                    .into_response(),
                            }
                        }
                    }
                }),
            )
            .route(
                "/{product_id}",
                get({
                    let controller = controller.clone();
                    move |Path(product_id): Path<String>| {
                        let controller = controller.clone();
                        async move { controller.get_product_by_id(product_id).await.into_response() }
                    }
                })
                .patch({
                    let controller = controller.clone();
                    move |Path(product_id): Path<String>, body: JsonBody| {
                        let controller = controller.clone();
                        async move {
                            match body {
                                Err(JsonRejection::JsonSyntaxError(rejection)) => {
                                    rejection.into_response()
                                }
                                body => controller
                                    .update_product(product_id, json_payload(body))
                                    .await
                                    .into_response(),
                            }
                        }
                    }
                })
                .delete({
                    let controller = controller.clone();
                    move |Path(product_id): Path<String>| {
                        let controller = controller.clone();
                        async move { controller.delete_product(product_id).await.into_response() }
                    }
                }),
            )
    }

    pub async fn create_product(&self, payload: Result<Value>) -> ApiResponse<Product> {
        let result = match payload {
            Ok(payload) => self.service.create_product(&payload).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(product) => {
                ApiResponse::success(StatusCode::CREATED, "Bike created successfully", product)
            }
            Err(e) => failure(StatusCode::BAD_REQUEST, "Validation failed", e),
        }
    }

    pub async fn get_all_products(&self, filter: Result<ProductFilter>) -> ApiResponse<Vec<Product>> {
        let result = match filter {
            Ok(filter) => self.service.get_all_products(&filter).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(products) => {
                ApiResponse::success(StatusCode::OK, "Products retrieved successfully", products)
            }
            Err(e) => failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve products",
                e,
            ),
        }
    }

    pub async fn get_product_by_id(&self, product_id: String) -> ApiResponse<Product> {
        let result = match parse_id(product_id).await {
            Ok(id) => self.service.get_product_by_id(id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(Some(product)) => {
                ApiResponse::success(StatusCode::OK, "Bike retrieved successfully", product)
            }
            Ok(None) => ApiResponse::not_found(NOT_FOUND),
            Err(e) => failure(StatusCode::BAD_REQUEST, "Failed to retrieve bike", e),
        }
    }

    pub async fn update_product(
        &self,
        product_id: String,
        payload: Result<Value>,
    ) -> ApiResponse<Product> {
        let result = match (parse_id(product_id).await, payload) {
            (Ok(id), Ok(payload)) => self.service.update_product(id, &payload).await,
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        match result {
            Ok(Some(product)) => {
                ApiResponse::success(StatusCode::OK, "Bike updated successfully", product)
            }
            Ok(None) => ApiResponse::not_found(NOT_FOUND),
            Err(e) => failure(StatusCode::BAD_REQUEST, "Validation failed", e),
        }
    }

    pub async fn delete_product(&self, product_id: String) -> ApiResponse<Empty> {
        let result = match parse_id(product_id).await {
            Ok(id) => self.service.delete_product(id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(Some(_)) => {
                ApiResponse::success(StatusCode::OK, "Bike deleted successfully", Empty::default())
            }
            Ok(None) => ApiResponse::not_found(NOT_FOUND),
            Err(e) => failure(StatusCode::BAD_REQUEST, "Failed to delete bike", e),
        }
    }
}

/// A request without a JSON content type reads as an empty payload.
fn json_payload(body: JsonBody) -> Result<Value> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Map::new())),
        Err(rejection) => Err(AppError::Request(rejection.body_text())),
    }
}

async fn parse_id(product_id: String) -> Result<ObjectId> {
    Ok(ParseObjectIdPipe.transform(product_id).await?)
}

fn failure<T: Serialize>(status: StatusCode, message: &str, err: AppError) -> ApiResponse<T> {
    tracing::warn!(error = %err, kind = err.name(), "{}", message);
    ApiResponse::failure(status, message, &err)
}

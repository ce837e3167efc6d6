use crate::common::validation::{FieldError, FieldReader, ValidationErrors};
use crate::error::{AppError, Result};
use crate::modules::product::model::serialize_object_id;
use chrono::{DateTime, Utc};
use garde::Validate;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Value, json};

const MODEL: &str = "Order";

/// An order for a single product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(serialize_with = "serialize_object_id")]
    pub product: ObjectId,
    pub quantity: i64,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn create(id: ObjectId, new: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email,
            product: new.product,
            quantity: new.quantity,
            total_price: new.total_price,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated order payload.
///
/// Field types are checked while reading the payload; the bounds below run
/// once every field has converted.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewOrder {
    #[garde(length(min = 1))]
    pub email: String,
    #[garde(skip)]
    pub product: ObjectId,
    #[garde(range(min = 1))]
    pub quantity: i64,
    #[garde(range(min = 0.0))]
    pub total_price: f64,
}

impl NewOrder {
    /// Validate a JSON order payload. `email` is trimmed before its checks.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = FieldReader::new(payload);

        let email = reader
            .required::<String>("email", "Email is required")
            .map(|email| email.trim().to_string());
        let product = reader.required::<ObjectId>("product", "Product ID is required");
        let quantity = reader.required::<i64>("quantity", "Quantity is required");
        let total_price = reader.required::<f64>("totalPrice", "Total price is required");

        reader
            .finish()
            .map_err(|errors| AppError::validation(MODEL, errors))?;

        let (Some(email), Some(product), Some(quantity), Some(total_price)) =
            (email, product, quantity, total_price)
        else {
            return Err(AppError::Internal(
                "validated order payload is missing a field".to_string(),
            ));
        };

        let order = Self {
            email,
            product,
            quantity,
            total_price,
        };
        order.check_bounds()?;
        Ok(order)
    }

    fn check_bounds(&self) -> Result<()> {
        let Err(report) = self.validate() else {
            return Ok(());
        };

        let mut errors = ValidationErrors::new();
        for (path, error) in report.iter() {
            let field_error = match path.to_string().as_str() {
                "email" => FieldError::required("email", "Email is required"),
                "quantity" => FieldError::min(
                    "quantity",
                    "Quantity must be at least 1",
                    &json!(self.quantity),
                ),
                "total_price" => FieldError::min(
                    "totalPrice",
                    "Total price cannot be negative",
                    &json!(self.total_price),
                ),
                other => {
                    return Err(AppError::Internal(format!(
                        "unexpected order constraint on {}: {}",
                        other, error
                    )));
                }
            };
            errors.insert(field_error);
        }
        Err(AppError::validation(MODEL, errors))
    }
}

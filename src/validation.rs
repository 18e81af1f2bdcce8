use serde_json::Value;

use crate::{
    error::AppError,
    schemas::{AddExpenseRequest, NewExpense, DEFAULT_USER_ID},
};

pub fn new_expense(request: AddExpenseRequest) -> Result<NewExpense, AppError> {
    let (amount, category) = match (request.amount, request.category) {
        (Some(amount), Some(category)) if !is_falsy(&amount) && !is_falsy(&category) => {
            (amount, category)
        }
        _ => return Err(AppError::MissingField),
    };

    Ok(NewExpense {
        user_id: request
            .user_id
            .unwrap_or_else(|| DEFAULT_USER_ID.to_owned()),
        amount: coerce_amount(&amount)?,
        category: match category {
            Value::String(category) => category,
            other => return Err(AppError::InvalidCategory(other.to_string())),
        },
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn coerce_amount(value: &Value) -> Result<f64, AppError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| AppError::InvalidAmount(value.to_string()))
}

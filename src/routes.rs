use actix_web::{get, post, web, HttpResponse};
use tracing::info;

use crate::{
    error::{json_error_handler, query_error_handler, AppError},
    inference::TipModel,
    prompt::{build_prompt, extract_tip},
    schemas::{
        AddExpenseRequest, ExpenseCreated, StatusResponse, TipResponse, DEFAULT_USER_ID,
    },
    store::ExpenseStore,
    validation,
};

pub const PING_STATUS: &str = "Firebase connected!";

#[get("/ping")]
async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: PING_STATUS.to_owned(),
    })
}

#[post("/add-expense")]
async fn add_expense(
    store: web::Data<dyn ExpenseStore>,
    body: web::Json<AddExpenseRequest>,
) -> Result<HttpResponse, AppError> {
    let expense = validation::new_expense(body.into_inner())?;
    let expense_id = store.insert_expense(expense).await?;
    info!(%expense_id, "expense recorded");

    Ok(HttpResponse::Ok().json(ExpenseCreated {
        status: "success".to_owned(),
        expense_id,
    }))
}

#[get("/generate-tip-hf")]
async fn generate_tip(
    store: web::Data<dyn ExpenseStore>,
    model: web::Data<dyn TipModel>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let user_id = first_value(&query, "user_id").unwrap_or(DEFAULT_USER_ID).to_owned();

    let expenses = store.expenses_for_user(&user_id).await?;
    info!(%user_id, expenses = expenses.len(), "requesting savings tip");

    let prompt = build_prompt(&expenses)?;
    let generated = model.complete(&prompt).await?;

    Ok(HttpResponse::Ok().json(TipResponse {
        tip: extract_tip(&generated).to_owned(),
    }))
}

/// First value given for `key`; repeated keys are not an error.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(ping)
        .service(add_expense)
        .service(generate_tip);
}

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::FindOptions,
    Client, Collection, Database,
};

use crate::{
    config::StoreConfig,
    schemas::{ExpenseRecord, ExpenseSummary, NewExpense},
};

pub const EXPENSES: &str = "expenses";

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Writes one expense and returns its generated identifier.
    async fn insert_expense(&self, expense: NewExpense) -> anyhow::Result<String>;

    /// Every expense recorded for `user_id`, without paging.
    async fn expenses_for_user(&self, user_id: &str) -> anyhow::Result<Vec<ExpenseSummary>>;
}

pub struct MongoExpenseStore {
    database: Database,
}

impl MongoExpenseStore {
    /// Connects and pings the deployment so an unreachable store fails at startup.
    pub async fn connect(config: &StoreConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .context("failed to build mongodb client")?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .context("failed to reach mongodb")?;
        Ok(Self { database })
    }

    fn expenses(&self) -> Collection<ExpenseRecord> {
        self.database.collection(EXPENSES)
    }
}

#[async_trait]
impl ExpenseStore for MongoExpenseStore {
    async fn insert_expense(&self, expense: NewExpense) -> anyhow::Result<String> {
        let record = ExpenseRecord {
            id: ObjectId::new(),
            user_id: expense.user_id,
            amount: expense.amount,
            category: expense.category,
            timestamp: Utc::now(),
        };
        let id = record.id.to_hex();
        self.expenses()
            .insert_one(record, None)
            .await
            .context("failed to insert expense")?;
        Ok(id)
    }

    async fn expenses_for_user(&self, user_id: &str) -> anyhow::Result<Vec<ExpenseSummary>> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 0, "amount": 1, "category": 1 })
            .build();
        let documents = self
            .expenses()
            .clone_with_type::<Document>()
            .find(doc! { "user_id": user_id }, options)
            .await
            .context("failed to query expenses")?
            .try_collect::<Vec<_>>()
            .await
            .context("failed to read expenses")?;
        Ok(documents.iter().map(summarize).collect())
    }
}

fn summarize(document: &Document) -> ExpenseSummary {
    let amount = match document.get("amount") {
        Some(Bson::Double(amount)) => Some(*amount),
        Some(Bson::Int32(amount)) => Some(f64::from(*amount)),
        Some(Bson::Int64(amount)) => Some(*amount as f64),
        _ => None,
    };
    ExpenseSummary {
        amount,
        category: document.get_str("category").ok().map(str::to_owned),
    }
}

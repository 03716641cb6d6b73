use std::collections::HashMap;

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{Order, OrderItemView, OrderLine, OrderLineView, Product, ProductView};
use crate::database::{Database, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::Deleted;
use crate::schemas::order_line::{CreateOrderLine, UpdateOrderLine};

use super::{first_view, product_service};

pub struct OrderLineService<'a> {
    state: &'a AppState,
    lines: Repository<OrderLine>,
}

impl<'a> OrderLineService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            lines: Repository::new("order_lines", &state.db),
        }
    }

    pub async fn create(&self, input: CreateOrderLine) -> Result<OrderLineView, ApiError> {
        Repository::<Order>::new("orders", &self.state.db)
            .select_404(input.order_id)
            .await?;
        let line = insert_line(self.state.db.pool(), Some(input.order_id), input.product_id, input.quantity).await?;
        tracing::info!("Added line {} to order {}", line.id, input.order_id);
        first_view(load_views(&self.state.db, vec![line]).await?)
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<OrderLineView>, ApiError> {
        let lines = self.lines.select_any(filter).await?;
        Ok(load_views(&self.state.db, lines).await?)
    }

    pub async fn find_one(&self, id: i64) -> Result<OrderLineView, ApiError> {
        let line = self.lines.select_404(id).await?;
        first_view(load_views(&self.state.db, vec![line]).await?)
    }

    pub async fn update(&self, id: i64, changes: UpdateOrderLine) -> Result<OrderLineView, ApiError> {
        self.lines.select_404(id).await?;
        sqlx::query("UPDATE order_lines SET quantity = COALESCE($2, quantity) WHERE id = $1")
            .bind(id)
            .bind(changes.quantity)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        self.find_one(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<Deleted<i64>, ApiError> {
        self.lines.select_404(id).await?;
        sqlx::query("DELETE FROM order_lines WHERE id = $1")
            .bind(id)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(Deleted { id })
    }
}

pub(crate) async fn insert_line<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: Option<i64>,
    product_id: Uuid,
    quantity: i32,
) -> Result<OrderLine, DatabaseError> {
    let line = sqlx::query_as::<_, OrderLine>(
        "INSERT INTO order_lines (order_id, product_id, quantity) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(executor)
    .await?;
    Ok(line)
}

async fn product_views(db: &Database, lines: &[OrderLine]) -> Result<HashMap<Uuid, ProductView>, DatabaseError> {
    let mut ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let products = Repository::<Product>::new("products", db).select_ids("id", &ids).await?;
    Ok(product_service::load_views(db, products)
        .await?
        .into_iter()
        .map(|view| (view.product.id, view))
        .collect())
}

/// Lines as nested under an order: product and its category, no back-reference
pub(crate) async fn load_item_views(db: &Database, lines: Vec<OrderLine>) -> Result<Vec<OrderItemView>, DatabaseError> {
    let products = product_views(db, &lines).await?;
    Ok(lines
        .into_iter()
        .map(|line| {
            let product = products.get(&line.product_id).cloned();
            OrderItemView { line, product }
        })
        .collect())
}

async fn load_views(db: &Database, lines: Vec<OrderLine>) -> Result<Vec<OrderLineView>, DatabaseError> {
    let products = product_views(db, &lines).await?;
    let mut order_ids: Vec<i64> = lines.iter().filter_map(|l| l.order_id).collect();
    order_ids.sort_unstable();
    order_ids.dedup();
    let orders: HashMap<i64, Order> = Repository::<Order>::new("orders", db)
        .select_ids("id", &order_ids)
        .await?
        .into_iter()
        .map(|o| (o.id, o))
        .collect();

    Ok(lines
        .into_iter()
        .map(|line| {
            let order = line.order_id.and_then(|id| orders.get(&id).cloned());
            let product = products.get(&line.product_id).cloned();
            OrderLineView { line, order, product }
        })
        .collect())
}

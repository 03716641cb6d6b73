use std::collections::HashMap;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::{Customer, CustomerView, Order, OrderLine, OrderLineView, OrderStatus, OrderView};
use crate::database::{Database, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::Deleted;
use crate::schemas::order::{CreateOrder, OrderItemInput, UpdateOrder};
use crate::schemas::order_line::CreateOrderLine;

use super::customer_service::{self, insert_customer_with_user};
use super::order_line_service::{insert_line, load_item_views, OrderLineService};
use super::first_view;

pub struct OrderService<'a> {
    state: &'a AppState,
    orders: Repository<Order>,
}

impl<'a> OrderService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            orders: Repository::new("orders", &state.db),
        }
    }

    /// Customer, order and lines are written in one transaction; new orders always start pending
    pub async fn create(&self, input: CreateOrder) -> Result<OrderView, ApiError> {
        let password_hash = match &input.customer {
            Some(customer) => {
                let cost = self.state.config.security.bcrypt_cost;
                Some(hash_password(customer.user.password.clone(), cost).await?)
            }
            None => None,
        };

        let mut tx = self.state.db.pool().begin().await.map_err(DatabaseError::from)?;

        let customer_id = match (input.customer_id, &input.customer, &password_hash) {
            (Some(id), _, _) => id,
            (None, Some(customer), Some(hash)) => insert_customer_with_user(&mut tx, customer, hash).await?.customer.id,
            _ => return Err(ApiError::bad_request("Order needs a customerId or a customer")),
        };

        let order = sqlx::query_as::<_, Order>("INSERT INTO orders (customer_id, status) VALUES ($1, $2) RETURNING *")
            .bind(customer_id)
            .bind(OrderStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;

        for item in &input.items {
            insert_line(&mut *tx, Some(order.id), item.product_id, item.quantity).await?;
        }
        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!("Created order {} for customer {} with {} lines", order.id, customer_id, input.items.len());
        self.find_one(order.id).await
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<OrderView>, ApiError> {
        let orders = self.orders.select_any(filter).await?;
        Ok(load_views(&self.state.db, orders).await?)
    }

    pub async fn find_one(&self, id: i64) -> Result<OrderView, ApiError> {
        let order = self.orders.select_404(id).await?;
        first_view(load_views(&self.state.db, vec![order]).await?)
    }

    /// Orders placed through any customer profile owned by `user_id`
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<OrderView>, ApiError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT o.* FROM orders o JOIN customers c ON c.id = o.customer_id WHERE c.user_id = $1 ORDER BY o.id",
        )
        .bind(user_id)
        .fetch_all(self.state.db.pool())
        .await
        .map_err(DatabaseError::from)?;
        Ok(load_views(&self.state.db, orders).await?)
    }

    pub async fn update(&self, id: i64, changes: UpdateOrder) -> Result<OrderView, ApiError> {
        let order = self.orders.select_404(id).await?;

        if let Some(next) = changes.status {
            let current: OrderStatus = order
                .status
                .parse()
                .map_err(|e: String| DatabaseError::QueryError(format!("order {}: {}", id, e)))?;
            if !current.can_transition_to(next) {
                return Err(DatabaseError::InvalidTransition { from: current, to: next }.into());
            }

            if current != next {
                // Guard on the status we checked so a concurrent decision wins cleanly
                let updated = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1 AND status = $3")
                    .bind(id)
                    .bind(next.as_str())
                    .bind(current.as_str())
                    .execute(self.state.db.pool())
                    .await
                    .map_err(DatabaseError::from)?;
                if updated.rows_affected() == 0 {
                    return Err(ApiError::conflict(format!("Order {} changed while updating", id)));
                }
                tracing::info!("Order {} moved from {} to {}", id, current, next);
            }
        }

        self.find_one(id).await
    }

    /// Lines of a deleted order are kept with their order reference cleared
    pub async fn delete(&self, id: i64) -> Result<Deleted<i64>, ApiError> {
        self.orders.select_404(id).await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(Deleted { id })
    }

    pub async fn add_line(&self, order_id: i64, item: OrderItemInput) -> Result<OrderLineView, ApiError> {
        OrderLineService::new(self.state)
            .create(CreateOrderLine {
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .await
    }
}

async fn load_views(db: &Database, orders: Vec<Order>) -> Result<Vec<OrderView>, DatabaseError> {
    let mut customer_ids: Vec<i64> = orders.iter().filter_map(|o| o.customer_id).collect();
    customer_ids.sort_unstable();
    customer_ids.dedup();
    let customers = Repository::<Customer>::new("customers", db)
        .select_ids("id", &customer_ids)
        .await?;
    let customers: HashMap<i64, CustomerView> = customer_service::load_views(db, customers)
        .await?
        .into_iter()
        .map(|view| (view.customer.id, view))
        .collect();

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let lines: Vec<OrderLine> = Repository::<OrderLine>::new("order_lines", db)
        .select_ids("order_id", &order_ids)
        .await?;
    let mut items: HashMap<i64, Vec<_>> = HashMap::new();
    for item in load_item_views(db, lines).await? {
        if let Some(order_id) = item.line.order_id {
            items.entry(order_id).or_default().push(item);
        }
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let customer = order.customer_id.and_then(|id| customers.get(&id).cloned());
            let lines = items.remove(&order.id).unwrap_or_default();
            OrderView::new(order, customer, lines)
        })
        .collect())
}

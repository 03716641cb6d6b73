use super::types::{Association, Column, FilterOp, SortTarget, ValueKind};

/// Query parameter mapped onto a predicate
#[derive(Debug, Clone, Copy)]
pub struct FilterRule {
    pub param: &'static str,
    pub column: Column,
    pub op: FilterOp,
    pub kind: ValueKind,
}

/// `order_by_*` parameter mapped onto a sort target
#[derive(Debug, Clone, Copy)]
pub struct SortRule {
    pub param: &'static str,
    pub target: SortTarget,
}

#[derive(Debug)]
pub struct ResourceRules {
    pub table: &'static str,
    pub primary_key: &'static str,
    pub filters: &'static [FilterRule],
    /// Applied in declared order, after any primary key ordering
    pub sorts: &'static [SortRule],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Users,
    Customers,
    Categories,
    Products,
    Orders,
    OrderLines,
}

impl ResourceKind {
    pub fn rules(&self) -> &'static ResourceRules {
        match self {
            ResourceKind::Users => &USERS,
            ResourceKind::Customers => &CUSTOMERS,
            ResourceKind::Categories => &CATEGORIES,
            ResourceKind::Products => &PRODUCTS,
            ResourceKind::Orders => &ORDERS,
            ResourceKind::OrderLines => &ORDER_LINES,
        }
    }

    pub fn table(&self) -> &'static str {
        self.rules().table
    }
}

const PRODUCT_CATEGORY: Association = Association { table: "categories", foreign_key: "category_id" };
const ORDER_CUSTOMER: Association = Association { table: "customers", foreign_key: "customer_id" };

const fn contains(param: &'static str, column: &'static str) -> FilterRule {
    FilterRule { param, column: Column::Own(column), op: FilterOp::Contains, kind: ValueKind::Text }
}

const fn exact(param: &'static str, column: &'static str, kind: ValueKind) -> FilterRule {
    FilterRule { param, column: Column::Own(column), op: FilterOp::Eq, kind }
}

const fn sort(param: &'static str, column: &'static str) -> SortRule {
    SortRule { param, target: SortTarget::Field(column) }
}

static USERS: ResourceRules = ResourceRules {
    table: "users",
    primary_key: "id",
    filters: &[contains("email", "email"), exact("role", "role", ValueKind::Text)],
    sorts: &[sort("order_by_email", "email"), sort("order_by_role", "role")],
};

static CUSTOMERS: ResourceRules = ResourceRules {
    table: "customers",
    primary_key: "id",
    filters: &[contains("name", "name"), contains("lastName", "last_name"), contains("phone", "phone")],
    sorts: &[
        sort("order_by_name", "name"),
        sort("order_by_lastName", "last_name"),
        sort("order_by_phone", "phone"),
    ],
};

static CATEGORIES: ResourceRules = ResourceRules {
    table: "categories",
    primary_key: "id",
    filters: &[contains("name", "name")],
    sorts: &[sort("order_by_name", "name")],
};

static PRODUCTS: ResourceRules = ResourceRules {
    table: "products",
    primary_key: "id",
    filters: &[
        contains("name", "name"),
        contains("description", "description"),
        FilterRule { param: "price_min", column: Column::Own("price"), op: FilterOp::Gte, kind: ValueKind::Int },
        FilterRule { param: "price_max", column: Column::Own("price"), op: FilterOp::Lte, kind: ValueKind::Int },
        exact("category_id", "category_id", ValueKind::Int),
        FilterRule {
            param: "category_name",
            column: Column::Related(PRODUCT_CATEGORY, "name"),
            op: FilterOp::Eq,
            kind: ValueKind::Text,
        },
        exact("price", "price", ValueKind::Int),
    ],
    sorts: &[
        SortRule { param: "order_by_category", target: SortTarget::Association(PRODUCT_CATEGORY, "name") },
        sort("order_by_name", "name"),
        sort("order_by_price", "price"),
    ],
};

static ORDERS: ResourceRules = ResourceRules {
    table: "orders",
    primary_key: "id",
    filters: &[
        exact("status", "status", ValueKind::Text),
        exact("customer_id", "customer_id", ValueKind::Int),
        FilterRule {
            param: "customer_name",
            column: Column::Related(ORDER_CUSTOMER, "name"),
            op: FilterOp::Contains,
            kind: ValueKind::Text,
        },
    ],
    sorts: &[sort("order_by_status", "status"), sort("order_by_customer_id", "customer_id")],
};

static ORDER_LINES: ResourceRules = ResourceRules {
    table: "order_lines",
    primary_key: "id",
    filters: &[exact("order_id", "order_id", ValueKind::Int), exact("product_id", "product_id", ValueKind::Uuid)],
    sorts: &[sort("order_by_order_id", "order_id"), sort("order_by_product_id", "product_id")],
};

//! Entity tables - the fixed registry every engine component is driven by
//!
//! Field sets and constraint names mirror the warehouse-management schema.
//! Required rules are declared before duplicate/foreign-key-bearing optional
//! rules where the schema allows, and dependency rules are declared in the
//! order their violations should be reported.

use super::{DependencyRule, EntityDef, FieldRule, ValueKind};

use ValueKind::{Boolean, Integer, Number, Text, Timestamp};

pub static REGISTRY: &[EntityDef] = &[
    EntityDef {
        name: "enterprise",
        fields: &[
            FieldRule::required("name", Text).unique(),
            FieldRule::optional("location", Text),
        ],
        dependents: &[DependencyRule::new("warehouse", "enterprise_id")],
        soft_delete: false,
    },
    EntityDef {
        name: "warehouse",
        fields: &[
            FieldRule::required("code", Text).unique(),
            FieldRule::required("name", Text),
            FieldRule::required("enterprise_id", Integer).references("enterprise"),
        ],
        dependents: &[
            DependencyRule::new("user", "warehouse_id"),
            DependencyRule::new("stock_level", "warehouse_id"),
            DependencyRule::new("client", "warehouse_id"),
            DependencyRule::new("supplier", "warehouse_id"),
            DependencyRule::new("sales_order", "warehouse_id"),
            DependencyRule::new("purchase_order", "warehouse_id"),
        ],
        soft_delete: false,
    },
    EntityDef {
        name: "user",
        fields: &[
            FieldRule::required("username", Text).unique(),
            FieldRule::required("firstname", Text),
            FieldRule::required("lastname", Text),
            FieldRule::required("email", Text).unique(),
            FieldRule::required("keycloak_id", Text).unique(),
            FieldRule::optional("rib", Text).unique(),
            FieldRule::required("warehouse_id", Integer).references("warehouse"),
            FieldRule::optional("is_active", Boolean),
        ],
        dependents: &[],
        soft_delete: true,
    },
    EntityDef {
        name: "category",
        fields: &[
            FieldRule::required("name", Text).unique(),
            FieldRule::optional("parent_id", Integer).references("category"),
        ],
        dependents: &[
            DependencyRule::new("category", "parent_id"),
            DependencyRule::new("product", "category_id"),
        ],
        soft_delete: false,
    },
    EntityDef {
        name: "product",
        fields: &[
            FieldRule::required("sku", Text).unique(),
            FieldRule::required("name", Text),
            FieldRule::optional("price", Number),
            FieldRule::optional("tva", Number),
            FieldRule::optional("category_id", Integer).references("category"),
            FieldRule::optional("unit_of_measure", Text),
            FieldRule::optional("is_active", Boolean),
        ],
        dependents: &[
            DependencyRule::new("purchase_order_line", "product_id"),
            DependencyRule::new("sales_order_line", "product_id"),
            DependencyRule::new("stock_level", "product_id"),
        ],
        soft_delete: true,
    },
    EntityDef {
        name: "client",
        fields: &[
            FieldRule::required("fullname", Text),
            FieldRule::required("rib", Text).unique(),
            FieldRule::optional("email", Text).unique(),
            FieldRule::required("warehouse_id", Integer).references("warehouse"),
            FieldRule::optional("is_active", Boolean),
        ],
        dependents: &[DependencyRule::new("sales_order", "client_id")],
        soft_delete: true,
    },
    EntityDef {
        name: "supplier",
        fields: &[
            FieldRule::required("fullname", Text),
            FieldRule::required("rib", Text).unique(),
            FieldRule::optional("email", Text).unique(),
            FieldRule::required("warehouse_id", Integer).references("warehouse"),
            FieldRule::optional("is_active", Boolean),
        ],
        dependents: &[DependencyRule::new("purchase_order", "supplier_id")],
        soft_delete: true,
    },
    EntityDef {
        name: "purchase_order",
        fields: &[
            FieldRule::required("supplier_id", Integer).references("supplier"),
            FieldRule::required("warehouse_id", Integer).references("warehouse"),
            FieldRule::optional("order_date", Timestamp),
            FieldRule::optional("total_amount", Number),
            FieldRule::optional("amount_paid", Number),
            FieldRule::optional("status", Text),
            FieldRule::optional("is_quote", Boolean),
        ],
        dependents: &[
            DependencyRule::new("purchase_order_line", "purchase_order_id"),
            DependencyRule::new("purchase_invoice", "purchase_order_id"),
        ],
        soft_delete: false,
    },
    EntityDef {
        name: "purchase_order_line",
        fields: &[
            FieldRule::required("purchase_order_id", Integer).references("purchase_order"),
            FieldRule::required("product_id", Integer).references("product"),
            FieldRule::required("quantity", Number),
            FieldRule::required("unit_price", Number),
            FieldRule::required("discount", Number),
        ],
        dependents: &[],
        soft_delete: false,
    },
    EntityDef {
        name: "sales_order",
        fields: &[
            FieldRule::required("warehouse_id", Integer).references("warehouse"),
            FieldRule::optional("client_id", Integer).references("client"),
            FieldRule::optional("order_date", Timestamp),
            FieldRule::optional("total_amount", Number),
            FieldRule::optional("amount_paid", Number),
            FieldRule::optional("status", Text),
            FieldRule::optional("is_quote", Boolean),
        ],
        dependents: &[
            DependencyRule::new("sales_order_line", "sales_order_id"),
            DependencyRule::new("sales_invoice", "sales_order_id"),
            DependencyRule::new("payment", "sales_order_id"),
        ],
        soft_delete: false,
    },
    EntityDef {
        name: "sales_order_line",
        fields: &[
            FieldRule::required("sales_order_id", Integer).references("sales_order"),
            FieldRule::required("product_id", Integer).references("product"),
            FieldRule::required("quantity", Number),
            FieldRule::required("unit_price", Number),
            FieldRule::required("discount", Number),
        ],
        dependents: &[],
        soft_delete: false,
    },
    EntityDef {
        name: "stock_level",
        fields: &[
            FieldRule::required("product_id", Integer).references("product"),
            FieldRule::required("warehouse_id", Integer).references("warehouse"),
            FieldRule::optional("current_qty", Number),
            FieldRule::optional("reserved_qty", Number),
            FieldRule::optional("stock_alert_qty", Number),
        ],
        dependents: &[],
        soft_delete: false,
    },
    EntityDef {
        name: "purchase_invoice",
        fields: &[
            FieldRule::required("purchase_order_id", Integer).references("purchase_order"),
            FieldRule::optional("issue_date", Timestamp),
            FieldRule::optional("due_date", Timestamp),
            FieldRule::optional("total_amount", Number),
            FieldRule::optional("paid_amount", Number),
            FieldRule::optional("status", Text),
        ],
        dependents: &[],
        soft_delete: false,
    },
    EntityDef {
        name: "sales_invoice",
        fields: &[
            FieldRule::required("sales_order_id", Integer).references("sales_order"),
            FieldRule::optional("invoice_number", Integer),
            FieldRule::optional("issue_date", Timestamp),
            FieldRule::optional("due_date", Timestamp),
            FieldRule::optional("total_amount", Number),
            FieldRule::optional("paid_amount", Number),
            FieldRule::optional("status", Text),
        ],
        dependents: &[],
        soft_delete: false,
    },
    EntityDef {
        name: "payment",
        fields: &[
            FieldRule::required("amount", Number),
            FieldRule::required("payment_method", Text),
            FieldRule::required("payment_type", Text),
            FieldRule::optional("sales_order_id", Integer).references("sales_order"),
        ],
        dependents: &[],
        soft_delete: false,
    },
];

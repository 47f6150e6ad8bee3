//! Order status query (`NEW_QUERY_ORDER_REQ`).

use serde::Deserialize;
use serde_json::Value;

use crate::protocol::params::Params;
use crate::protocol::request::ApiRequest;
use crate::protocol::response::{as_list, text_field, ApiResponse};

/// Look up an order by its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOrderStatusRequest {
    order_code: String,
}

impl QueryOrderStatusRequest {
    pub fn new(order_code: impl Into<String>) -> Self {
        Self {
            order_code: order_code.into(),
        }
    }

    pub fn order_code(&self) -> &str {
        &self.order_code
    }
}

impl ApiRequest for QueryOrderStatusRequest {
    type Response = QueryOrderStatusResponse;

    fn api_name(&self) -> &str {
        "NEW_QUERY_ORDER_REQ"
    }

    fn params(&self) -> Params {
        Params::new().with(
            "orderRequest",
            Params::new().with(
                "order",
                Params::new().with("orderCode", self.order_code.as_str()),
            ),
        )
    }
}

/// One ticket line inside an order.
///
/// Amounts are in cents, as the service sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketOrder {
    pub goods_name: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub total_price: Option<String>,
    pub already_check_num: Option<String>,
    pub return_num: Option<String>,
}

/// Typed view over an order status reply.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOrderStatusResponse {
    transaction_name: String,
    code: String,
    description: String,
    tree: Value,
}

impl QueryOrderStatusResponse {
    pub fn transaction_name(&self) -> &str {
        &self.transaction_name
    }

    /// The `orderResponse.order` mapping, if present.
    pub fn order(&self) -> Option<&Value> {
        self.tree
            .get("orderResponse")
            .and_then(|r| r.get("order"))
            .filter(|o| o.is_object())
    }

    pub fn order_code(&self) -> Option<String> {
        self.order().and_then(|o| text_field(o, "orderCode"))
    }

    pub fn link_name(&self) -> Option<String> {
        self.order().and_then(|o| text_field(o, "linkName"))
    }

    pub fn link_mobile(&self) -> Option<String> {
        self.order().and_then(|o| text_field(o, "linkMobile"))
    }

    pub fn pay_status(&self) -> Option<String> {
        self.order().and_then(|o| text_field(o, "payStatus"))
    }

    /// Ticket lines, always as a list even when the service sent one object.
    pub fn ticket_orders(&self) -> Vec<TicketOrder> {
        let lines = self
            .order()
            .and_then(|o| o.get("ticketOrders"))
            .and_then(|t| t.get("ticketOrder"));

        as_list(lines)
            .into_iter()
            .filter_map(|line| TicketOrder::deserialize(line).ok())
            .collect()
    }
}

impl ApiResponse for QueryOrderStatusResponse {
    fn from_tree(tree: Value) -> Self {
        Self {
            transaction_name: text_field(&tree, "transactionName").unwrap_or_default(),
            code: text_field(&tree, "code").unwrap_or_default(),
            description: text_field(&tree, "description").unwrap_or_default(),
            tree,
        }
    }

    fn raw(&self) -> &Value {
        &self.tree
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn description(&self) -> &str {
        &self.description
    }
}

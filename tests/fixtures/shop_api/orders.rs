use crate::models::{ApiError, Order};

pub struct OrderController;

impl OrderController {
    /// @Title listOrders
    /// @Summary List orders, optionally filtered with `?status=`
    /// @Notes Results are sorted by "creation time".
    /// @Param status query OrderStatus false "Only orders in this status"
    /// @Param limit query int false "Page size"
    /// @Success 200 {array} Order
    /// @Produce json
    /// @Router /orders [get]
    pub async fn list(&self) -> Vec<Order> {
        Vec::new()
    }

    /// @Title getOrder
    /// @Summary Fetch one order
    /// @Param id path u64 true "Order id"
    /// @Success 200 {object} Order
    /// @Failure 404 {object} ApiError "Order not found"
    /// @Produce json
    /// @Router /orders/{id} [get]
    pub async fn get(&self, id: u64) -> Result<Order, ApiError> {
        Err(ApiError { message: format!("no order {}", id) })
    }

    /// @Title cancelOrder
    /// @Summary Cancel an order
    /// @Param id path u64 true "Order id"
    /// @Param reason body NullString false
    /// @Success 204 {object} string "Cancelled"
    /// @Failure 409 "Already shipped"
    /// @Router /orders/{id}/cancel [post]
    pub async fn cancel(&self, id: u64) {}

    fn audit(&self) {}
}

// src/models/cart.rs
use crate::{
    errors::{TawsilError, TawsilResult},
    models::{
        order::{OrderCreate, OrderItemCreate, PaymentInfo},
        restaurant::{MenuItem, Restaurant},
    },
    utils::price::format_price_syp,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub menu_item: MenuItem,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.menu_item.price * self.quantity as f64
    }
}

/// Items the customer is about to order. A cart only ever holds items from
/// one restaurant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    restaurant: Option<Restaurant>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one of `menu_item`. An item from another restaurant starts a new cart.
    pub fn add_item(&mut self, menu_item: MenuItem, restaurant: &Restaurant) {
        let same_restaurant = self.restaurant.as_ref().is_none_or(|current| current.id == restaurant.id);
        if !same_restaurant {
            tracing::debug!("Cart switched to restaurant {}", restaurant.id);
            self.items.clear();
        }

        match self.items.iter_mut().find(|item| item.menu_item.id == menu_item.id) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(CartItem { menu_item, quantity: 1 }),
        }
        self.restaurant = Some(restaurant.clone());
    }

    pub fn remove_item(&mut self, menu_item_id: &str) {
        self.items.retain(|item| item.menu_item.id != menu_item_id);
        if self.items.is_empty() {
            self.restaurant = None;
        }
    }

    /// Sets the quantity of an item already in the cart; zero or less removes it
    pub fn update_quantity(&mut self, menu_item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(menu_item_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|item| item.menu_item.id == menu_item_id) {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant = None;
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Subtotal plus the restaurant's delivery fee
    pub fn total(&self) -> f64 {
        self.subtotal() + self.restaurant.as_ref().map_or(0.0, |r| r.delivery_fee)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn meets_min_order(&self) -> bool {
        self.restaurant
            .as_ref()
            .is_none_or(|restaurant| self.subtotal() >= restaurant.min_order)
    }

    /// Builds the order request for checkout.
    ///
    /// Fails on an empty cart or a subtotal under the restaurant's minimum order.
    pub fn into_order_create(
        self,
        address_id: &str,
        payment_method: &str,
        payment_info: Option<PaymentInfo>,
        notes: Option<String>,
    ) -> TawsilResult<OrderCreate> {
        let Some(restaurant) = self.restaurant.as_ref() else {
            return Err(TawsilError::validation_error("items", "السلة فارغة"));
        };
        if !self.meets_min_order() {
            return Err(TawsilError::validation_error(
                "subtotal",
                format!(
                    "الحد الأدنى للطلب من {} هو {}",
                    restaurant.name,
                    format_price_syp(restaurant.min_order)
                ),
            ));
        }

        let order = OrderCreate {
            restaurant_id: restaurant.id.clone(),
            items: self
                .items
                .into_iter()
                .map(|item| OrderItemCreate {
                    menu_item_id: item.menu_item.id,
                    quantity: item.quantity,
                    notes: None,
                    addons: Vec::new(),
                })
                .collect(),
            address_id: address_id.to_string(),
            payment_method: payment_method.to_string(),
            payment_info,
            notes: notes.filter(|n| !n.trim().is_empty()),
        };
        order.validate()?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(id: &str, delivery_fee: f64, min_order: f64) -> Restaurant {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Restaurant {}", id),
            "delivery_fee": delivery_fee,
            "min_order": min_order
        }))
        .unwrap()
    }

    fn item(id: &str, restaurant_id: &str, price: f64) -> MenuItem {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "restaurant_id": restaurant_id,
            "name": format!("Item {}", id),
            "price": price,
            "category": "main"
        }))
        .unwrap()
    }

    #[test]
    fn test_adding_same_item_increments_quantity() {
        let shawarma = restaurant("r1", 2000.0, 0.0);
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 5000.0), &shawarma);
        cart.add_item(item("m1", "r1", 5000.0), &shawarma);
        cart.add_item(item("m2", "r1", 1500.0), &shawarma);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.restaurant().map(|r| r.id.as_str()), Some("r1"));
    }

    #[test]
    fn test_other_restaurant_replaces_cart() {
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 5000.0), &restaurant("r1", 2000.0, 0.0));
        cart.add_item(item("m1", "r1", 5000.0), &restaurant("r1", 2000.0, 0.0));
        cart.add_item(item("p1", "r2", 8000.0), &restaurant("r2", 3000.0, 0.0));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].menu_item.id, "p1");
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.restaurant().map(|r| r.id.as_str()), Some("r2"));
    }

    #[test]
    fn test_non_positive_quantity_removes_item() {
        let r1 = restaurant("r1", 2000.0, 0.0);
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 5000.0), &r1);
        cart.add_item(item("m2", "r1", 1500.0), &r1);

        cart.update_quantity("m1", 4);
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity("m2", 0);
        assert_eq!(cart.items().len(), 1);
        assert!(cart.restaurant().is_some());

        cart.update_quantity("m1", -1);
        assert!(cart.is_empty());
        assert!(cart.restaurant().is_none());
    }

    #[test]
    fn test_update_unknown_item_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 5000.0), &restaurant("r1", 2000.0, 0.0));
        cart.update_quantity("missing", 3);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_removing_last_item_clears_restaurant() {
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 5000.0), &restaurant("r1", 2000.0, 0.0));
        cart.remove_item("m1");
        assert!(cart.is_empty());
        assert!(cart.restaurant().is_none());
    }

    #[test]
    fn test_totals_include_delivery_fee() {
        let r1 = restaurant("r1", 2000.0, 0.0);
        let mut cart = Cart::new();
        assert_eq!(cart.total(), 0.0);

        cart.add_item(item("m1", "r1", 5000.0), &r1);
        cart.add_item(item("m1", "r1", 5000.0), &r1);
        cart.add_item(item("m2", "r1", 1500.0), &r1);

        assert_eq!(cart.subtotal(), 11500.0);
        assert_eq!(cart.total(), 13500.0);

        cart.clear();
        assert_eq!(cart.subtotal(), 0.0);
        assert!(cart.restaurant().is_none());
    }

    #[test]
    fn test_into_order_create() {
        let r1 = restaurant("r1", 2000.0, 5000.0);
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 3000.0), &r1);
        cart.add_item(item("m1", "r1", 3000.0), &r1);

        let order = cart.into_order_create("a1", "COD", None, Some("  ".to_string())).unwrap();
        assert_eq!(order.restaurant_id, "r1");
        assert_eq!(order.address_id, "a1");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].menu_item_id, "m1");
        assert_eq!(order.items[0].quantity, 2);
        assert!(order.notes.is_none());
    }

    #[test]
    fn test_checkout_below_min_order_fails() {
        let mut cart = Cart::new();
        cart.add_item(item("m1", "r1", 3000.0), &restaurant("r1", 2000.0, 10000.0));
        assert!(!cart.meets_min_order());

        match cart.into_order_create("a1", "COD", None, None) {
            Err(TawsilError::ValidationFailed(errors)) => {
                assert_eq!(errors[0].field, "subtotal");
                assert!(errors[0].message.ends_with("10,000 ل.س"));
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let result = Cart::new().into_order_create("a1", "COD", None, None);
        assert!(matches!(result, Err(TawsilError::ValidationFailed(_))));
    }
}

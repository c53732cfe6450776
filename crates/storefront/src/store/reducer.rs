//! Named update operations and the pure function that applies them.

use cartwheel_core::{CartItem, Product, ProductId, User};

use super::Snapshot;

/// An update operation on the application store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the `user` slice.
    SetUser(User),
    /// Clear the `user` slice (logout).
    ClearUser,
    /// Replace the `products` slice wholesale.
    SetProducts(Vec<Product>),
    /// Add a line to the cart, merging into an existing line with the same id.
    AddToCart(CartItem),
    /// Remove every cart line with this id. No-op if absent.
    RemoveFromCart(ProductId),
}

impl Action {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "set_user",
            Self::ClearUser => "clear_user",
            Self::SetProducts(_) => "set_products",
            Self::AddToCart(_) => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
        }
    }
}

/// Apply `action` to `state`.
///
/// Pure and deterministic: replaying the same actions on equal states yields
/// equal states.
pub fn reduce(state: &mut Snapshot, action: Action) {
    match action {
        Action::SetUser(user) => state.user = Some(user),
        Action::ClearUser => state.user = None,
        Action::SetProducts(products) => state.products = products,
        Action::AddToCart(item) => {
            debug_assert!(item.quantity > 0, "cart lines carry at least one unit");
            // The first add's price snapshot wins.
            match state.cart.iter_mut().find(|line| line.id == item.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => state.cart.push(item),
            }
        }
        Action::RemoveFromCart(id) => state.cart.retain(|line| line.id != id),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use cartwheel_core::{Email, Price, UserId};

    use super::*;

    fn item(id: i64, cents: i64) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("item-{id}"),
            price: Price::from_cents(cents),
            quantity: 1,
        }
    }

    fn replay(actions: &[Action]) -> Snapshot {
        let mut state = Snapshot::default();
        for action in actions {
            reduce(&mut state, action.clone());
        }
        state
    }

    #[test]
    fn test_replay_is_deterministic() {
        let actions = vec![
            Action::AddToCart(item(1, 500)),
            Action::AddToCart(item(2, 1200)),
            Action::RemoveFromCart(ProductId::new(1)),
            Action::AddToCart(item(3, 99)),
            Action::AddToCart(item(2, 1200)),
            Action::RemoveFromCart(ProductId::new(9)),
        ];

        let first = replay(&actions);
        let second = replay(&actions);
        assert_eq!(first, second);

        let ids: Vec<i64> = first.cart.iter().map(|line| line.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(first.cart[0].quantity, 2);
    }

    #[test]
    fn test_add_same_id_merges_and_keeps_first_price() {
        let mut state = Snapshot::default();
        reduce(&mut state, Action::AddToCart(item(1, 500)));
        reduce(&mut state, Action::AddToCart(item(1, 700)));

        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart[0].quantity, 2);
        assert_eq!(state.cart[0].price, Price::from_cents(500));
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut empty = Snapshot::default();
        reduce(&mut empty, Action::RemoveFromCart(ProductId::new(1)));
        assert_eq!(empty, Snapshot::default());

        let mut state = replay(&[Action::AddToCart(item(1, 500))]);
        let before = state.clone();
        reduce(&mut state, Action::RemoveFromCart(ProductId::new(2)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_set_products_replaces_wholesale() {
        let mug = Product {
            id: ProductId::new(1),
            name: "Mug".to_string(),
            description: String::new(),
            price: Price::from_units(5),
        };
        let tea = Product {
            id: ProductId::new(2),
            name: "Tea".to_string(),
            description: String::new(),
            price: Price::from_units(8),
        };

        let mut state = Snapshot::default();
        reduce(&mut state, Action::SetProducts(vec![mug.clone(), tea]));
        reduce(&mut state, Action::SetProducts(vec![mug.clone()]));
        assert_eq!(state.products, vec![mug]);
    }

    #[test]
    fn test_set_and_clear_user() {
        let user = User {
            id: UserId::new(4),
            name: "Ana".to_string(),
            email: Email::parse("a@x.com").unwrap(),
        };

        let mut state = Snapshot::default();
        reduce(&mut state, Action::SetUser(user.clone()));
        assert_eq!(state.user, Some(user));
        reduce(&mut state, Action::ClearUser);
        assert_eq!(state.user, None);
    }
}

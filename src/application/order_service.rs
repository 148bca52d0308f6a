use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderLine, OrderStatus, OrderUpdate};
use crate::domain::ports::OrderStore;

/// Orchestrates the order aggregate lifecycle over an [`OrderStore`]. Each
/// method is one unit of work: load, mutate through the aggregate, save.
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderStore> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(&self, draft: NewOrder) -> Result<Order, DomainError> {
        self.repo.save(Order::place(draft))
    }

    /// Full replacement: every scalar is overwritten with the payload's value
    /// and the line set is rebuilt from scratch. Lines cleared here and not
    /// re-added become orphans, which the store deletes on save.
    pub fn update_order(&self, id: Uuid, update: OrderUpdate) -> Result<Order, DomainError> {
        let mut order = self.repo.find_by_id(id)?.ok_or(DomainError::NotFound(id))?;

        order.customer_id = update.customer_id;
        order.status = update.status;
        order.total = update.total;
        order.note = update.note;
        order.tracking_code = update.tracking_code;
        order.invoice_url = update.invoice_url;
        order.payment = update.payment;
        order.payment_key = update.payment_key;

        order.clear_lines();
        for line in update.lines {
            order.add_line(OrderLine::from(line));
        }

        self.repo.save(order)
    }

    /// Transitions are free-form: any status may be set from any status.
    pub fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DomainError> {
        let mut order = self.repo.find_by_id(id)?.ok_or(DomainError::NotFound(id))?;
        order.status = status;
        self.repo.save(order)
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.exists_by_id(id)? {
            return Err(DomainError::NotFound(id));
        }
        self.repo.delete_by_id(id)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.repo.find_all()
    }

    pub fn orders_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.repo.find_by_customer(customer_id)
    }

    pub fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        self.repo.find_by_status(status)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::order::NewOrderLine;

    #[derive(Clone, Default)]
    struct InMemoryStore {
        inner: Arc<StoreInner>,
    }

    #[derive(Default)]
    struct StoreInner {
        orders: Mutex<HashMap<Uuid, Order>>,
        saves: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl InMemoryStore {
        fn save_count(&self) -> usize {
            self.inner.saves.load(Ordering::SeqCst)
        }

        fn delete_count(&self) -> usize {
            self.inner.deletes.load(Ordering::SeqCst)
        }

        fn stored(&self, id: Uuid) -> Option<Order> {
            self.inner.orders.lock().unwrap().get(&id).cloned()
        }
    }

    impl OrderStore for InMemoryStore {
        fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
            Ok(self.inner.orders.lock().unwrap().get(&id).cloned())
        }

        fn find_all(&self) -> Result<Vec<Order>, DomainError> {
            Ok(self.inner.orders.lock().unwrap().values().cloned().collect())
        }

        fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
            Ok(self
                .inner
                .orders
                .lock()
                .unwrap()
                .values()
                .filter(|o| o.customer_id == customer_id)
                .cloned()
                .collect())
        }

        fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
            Ok(self
                .inner
                .orders
                .lock()
                .unwrap()
                .values()
                .filter(|o| o.status == status)
                .cloned()
                .collect())
        }

        fn save(&self, order: Order) -> Result<Order, DomainError> {
            self.inner.saves.fetch_add(1, Ordering::SeqCst);
            self.inner
                .orders
                .lock()
                .unwrap()
                .insert(order.id, order.clone());
            Ok(order)
        }

        fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
            self.inner.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.orders.lock().unwrap().remove(&id);
            Ok(())
        }

        fn exists_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
            Ok(self.inner.orders.lock().unwrap().contains_key(&id))
        }
    }

    fn price(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn line(product_id: Uuid, quantity: i32, unit_price: &str) -> NewOrderLine {
        NewOrderLine {
            product_id,
            quantity,
            unit_price: price(unit_price),
        }
    }

    fn draft(customer_id: Uuid, lines: Vec<NewOrderLine>) -> NewOrder {
        NewOrder {
            customer_id,
            payment: None,
            payment_key: None,
            note: Some("leave at the door".to_string()),
            tracking_code: None,
            invoice_url: None,
            lines,
        }
    }

    fn update(customer_id: Uuid, lines: Vec<NewOrderLine>) -> OrderUpdate {
        OrderUpdate {
            customer_id,
            status: OrderStatus::Paid,
            total: price("90.00"),
            payment: None,
            payment_key: None,
            note: None,
            tracking_code: Some("TRK-1".to_string()),
            invoice_url: None,
            lines,
        }
    }

    fn service() -> (OrderService<InMemoryStore>, InMemoryStore) {
        let store = InMemoryStore::default();
        (OrderService::new(store.clone()), store)
    }

    #[test]
    fn create_order_saves_placed_aggregate() {
        let (service, store) = service();
        let customer_id = Uuid::new_v4();

        let order = service
            .create_order(draft(
                customer_id,
                vec![
                    line(Uuid::new_v4(), 2, "50.00"),
                    line(Uuid::new_v4(), 1, "50.00"),
                ],
            ))
            .expect("create failed");

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.total, price("150.00"));
        let stored = store.stored(order.id).expect("order should be stored");
        assert_eq!(stored.lines().len(), 2);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn update_order_replaces_lines_instead_of_merging() {
        let (service, store) = service();
        let customer_id = Uuid::new_v4();
        let old_products = [Uuid::new_v4(), Uuid::new_v4()];
        let created = service
            .create_order(draft(
                customer_id,
                vec![
                    line(old_products[0], 2, "50.00"),
                    line(old_products[1], 1, "50.00"),
                ],
            ))
            .expect("create failed");

        let new_product = Uuid::new_v4();
        let updated = service
            .update_order(
                created.id,
                update(customer_id, vec![line(new_product, 3, "30.00")]),
            )
            .expect("update failed");

        assert_eq!(updated.lines().len(), 1);
        assert_eq!(updated.lines()[0].product_id, new_product);
        assert_eq!(updated.lines()[0].order_id(), Some(created.id));
        // status and total come from the payload verbatim
        assert_eq!(updated.status, OrderStatus::Paid);
        assert_eq!(updated.total, price("90.00"));
        let stored = store.stored(created.id).expect("order should be stored");
        assert!(stored.lines().iter().all(|l| l.product_id == new_product));
    }

    #[test]
    fn update_order_accepts_empty_replacement_line_list() {
        let (service, _store) = service();
        let customer_id = Uuid::new_v4();
        let created = service
            .create_order(draft(customer_id, vec![line(Uuid::new_v4(), 1, "10.00")]))
            .expect("create failed");

        let updated = service
            .update_order(created.id, update(customer_id, vec![]))
            .expect("update failed");

        assert!(updated.lines().is_empty());
    }

    #[test]
    fn update_order_not_found_saves_nothing() {
        let (service, store) = service();

        let result = service.update_order(Uuid::new_v4(), update(Uuid::new_v4(), vec![]));

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn update_status_touches_only_the_status_field() {
        let (service, _store) = service();
        let customer_id = Uuid::new_v4();
        let created = service
            .create_order(draft(customer_id, vec![line(Uuid::new_v4(), 2, "50.00")]))
            .expect("create failed");

        let updated = service
            .update_status(created.id, OrderStatus::Shipped)
            .expect("status update failed");

        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(updated.total, created.total);
        assert_eq!(updated.note, created.note);
        assert_eq!(updated.lines().len(), created.lines().len());
    }

    #[test]
    fn update_status_not_found_saves_nothing() {
        let (service, store) = service();

        let result = service.update_status(Uuid::new_v4(), OrderStatus::Delivered);

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn delete_order_removes_the_aggregate() {
        let (service, store) = service();
        let created = service
            .create_order(draft(Uuid::new_v4(), vec![line(Uuid::new_v4(), 1, "5.00")]))
            .expect("create failed");

        service.delete_order(created.id).expect("delete failed");

        assert!(store.stored(created.id).is_none());
    }

    #[test]
    fn delete_order_not_found_deletes_nothing() {
        let (service, store) = service();

        let result = service.delete_order(Uuid::new_v4());

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(store.delete_count(), 0);
    }

    #[test]
    fn queries_filter_by_customer_and_status() {
        let (service, _store) = service();
        let customer_id = Uuid::new_v4();
        let mine = service
            .create_order(draft(customer_id, vec![line(Uuid::new_v4(), 1, "5.00")]))
            .expect("create failed");
        let theirs = service
            .create_order(draft(Uuid::new_v4(), vec![line(Uuid::new_v4(), 1, "5.00")]))
            .expect("create failed");
        service
            .update_status(theirs.id, OrderStatus::Cancelled)
            .expect("status update failed");

        let by_customer = service.orders_by_customer(customer_id).expect("query failed");
        assert_eq!(by_customer.len(), 1);
        assert_eq!(by_customer[0].id, mine.id);

        let cancelled = service
            .orders_by_status(OrderStatus::Cancelled)
            .expect("query failed");
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, theirs.id);

        assert_eq!(service.list_orders().expect("query failed").len(), 2);
    }
}

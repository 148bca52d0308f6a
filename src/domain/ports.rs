use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Order, OrderStatus};

/// Persistence port for the order aggregate. Implementations must treat each
/// call as one atomic unit: `save` cascades over the currently-owned lines
/// and removes rows for lines that are no longer owned, `delete_by_id`
/// cascades over the owned lines, and readers never observe a half-replaced
/// line set.
pub trait OrderStore: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_all(&self) -> Result<Vec<Order>, DomainError>;
    fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError>;
    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError>;
    /// Persist the aggregate and return it with identifiers populated.
    fn save(&self, order: Order) -> Result<Order, DomainError>;
    fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError>;
    fn exists_by_id(&self, id: Uuid) -> Result<bool, DomainError>;
}

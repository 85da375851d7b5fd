//! Named operations over [`ApiClient`], one module per backend resource.
//!
//! Each facade fixes method, path template and response shape for its
//! operations and borrows the client; none of them carries state or error
//! handling of its own.

pub mod admin_users;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod inventory;
pub mod invoice;
pub mod products;

pub use admin_users::AdminUsers;
pub use auth::Auth;
pub use categories::Categories;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use inventory::InventoryApi;
pub use invoice::Invoices;
pub use products::Products;

use crate::client::ApiClient;
use crate::transport::Transport;

impl<T: Transport> ApiClient<T> {
    pub fn auth(&self) -> Auth<'_, T> {
        Auth::new(self)
    }

    pub fn categories(&self) -> Categories<'_, T> {
        Categories::new(self)
    }

    pub fn products(&self) -> Products<'_, T> {
        Products::new(self)
    }

    pub fn admin_users(&self) -> AdminUsers<'_, T> {
        AdminUsers::new(self)
    }

    pub fn dashboard(&self) -> Dashboard<'_, T> {
        Dashboard::new(self)
    }

    pub fn inventory(&self) -> InventoryApi<'_, T> {
        InventoryApi::new(self)
    }

    pub fn invoices(&self) -> Invoices<'_, T> {
        Invoices::new(self)
    }
}

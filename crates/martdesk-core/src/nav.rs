//! Console pages and which roles may open them.

use crate::models::Role;

/// Login entry point unauthenticated users are sent to
pub const LOGIN_PATH: &str = "/login";

/// Page authenticated users land on when a page is off limits
pub const LANDING_PAGE: Page = Page::Dashboard;

const ALL_STAFF: &[Role] = &[Role::Admin, Role::InventoryManager, Role::Employee];
const CATALOG_STAFF: &[Role] = &[Role::Admin, Role::InventoryManager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Products,
    Inventory,
    Orders,
    Employees,
    Customers,
    Analytics,
}

impl Page {
    /// Sidebar order
    pub const ALL: [Page; 7] = [
        Page::Dashboard,
        Page::Products,
        Page::Inventory,
        Page::Orders,
        Page::Employees,
        Page::Customers,
        Page::Analytics,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Products => "/products",
            Page::Inventory => "/inventory",
            Page::Orders => "/orders",
            Page::Employees => "/employees",
            Page::Customers => "/users",
            Page::Analytics => "/analytics",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Products => "Products",
            Page::Inventory => "Inventory",
            Page::Orders => "Orders",
            Page::Employees => "Employees",
            Page::Customers => "Customers",
            Page::Analytics => "Analytics",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Page::Dashboard | Page::Orders => ALL_STAFF,
            Page::Products | Page::Inventory => CATALOG_STAFF,
            Page::Employees | Page::Customers | Page::Analytics => ADMIN_ONLY,
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Pages shown in the menu for `role`, in sidebar order
pub fn menu_for(role: Role) -> Vec<Page> {
    Page::ALL.into_iter().filter(|p| p.allows(role)).collect()
}

/// May add products and adjust stock
pub fn can_manage_catalog(role: Role) -> bool {
    CATALOG_STAFF.contains(&role)
}

/// May create, edit and delete employees
pub fn can_manage_employees(role: Role) -> bool {
    role == Role::Admin
}

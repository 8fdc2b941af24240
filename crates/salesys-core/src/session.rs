//! # Session
//!
//! The logged-in user and what their role may open.
//!
//! A `Session` is created from the user returned by `authenticate_user` and
//! passed explicitly to whatever needs it; there is no global current user.
//!
//! ## Menu Access
//! ```text
//! ┌──────────────────────────┬───────┬────────┬─────────┐
//! │ Section                  │ Admin │ Seller │ Manager │
//! ├──────────────────────────┼───────┼────────┼─────────┤
//! │ Dashboard      /         │   ✓   │   ✓    │    ✓    │
//! │ Products       /products │   ✓   │   ✓    │    ✓    │
//! │ Categories               │   ✓   │        │         │
//! │ Customers                │   ✓   │   ✓    │    ✓    │
//! │ Sales                    │   ✓   │   ✓    │    ✓    │
//! │ New Sale                 │   ✓   │   ✓    │         │
//! │ Invoices                 │   ✓   │        │    ✓    │
//! │ Users                    │   ✓   │        │         │
//! └──────────────────────────┴───────┴────────┴─────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{User, UserRole};

// =============================================================================
// Menu
// =============================================================================

/// A section of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MenuSection {
    Dashboard,
    Products,
    Categories,
    Customers,
    Sales,
    NewSale,
    Invoices,
    Users,
}

impl MenuSection {
    pub const fn label(&self) -> &'static str {
        match self {
            MenuSection::Dashboard => "Dashboard",
            MenuSection::Products => "Products",
            MenuSection::Categories => "Categories",
            MenuSection::Customers => "Customers",
            MenuSection::Sales => "Sales",
            MenuSection::NewSale => "New Sale",
            MenuSection::Invoices => "Invoices",
            MenuSection::Users => "Users",
        }
    }
}

impl fmt::Display for MenuSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the static menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub section: MenuSection,
    pub path: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    roles: &'static [UserRole],
}

impl MenuEntry {
    const fn new(section: MenuSection, path: &'static str, roles: &'static [UserRole]) -> Self {
        MenuEntry {
            section,
            path,
            label: section.label(),
            roles,
        }
    }

    pub fn allows(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

const ALL_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Seller, UserRole::Manager];

/// The full menu in display order.
pub const MENU: &[MenuEntry] = &[
    MenuEntry::new(MenuSection::Dashboard, "/", ALL_ROLES),
    MenuEntry::new(MenuSection::Products, "/products", ALL_ROLES),
    MenuEntry::new(MenuSection::Categories, "/products/categories", &[UserRole::Admin]),
    MenuEntry::new(MenuSection::Customers, "/customers", ALL_ROLES),
    MenuEntry::new(MenuSection::Sales, "/sales", ALL_ROLES),
    MenuEntry::new(
        MenuSection::NewSale,
        "/sales/new",
        &[UserRole::Admin, UserRole::Seller],
    ),
    MenuEntry::new(
        MenuSection::Invoices,
        "/invoices",
        &[UserRole::Admin, UserRole::Manager],
    ),
    MenuEntry::new(MenuSection::Users, "/users", &[UserRole::Admin]),
];

// =============================================================================
// Session
// =============================================================================

/// The authenticated user and when they logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User, started_at: DateTime<Utc>) -> Self {
        Session { user, started_at }
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// Menu entries visible to this session's role, in display order.
    pub fn menu(&self) -> Vec<MenuEntry> {
        MENU.iter()
            .filter(|entry| entry.allows(self.role()))
            .copied()
            .collect()
    }

    pub fn can_access(&self, section: MenuSection) -> bool {
        MENU.iter()
            .find(|entry| entry.section == section)
            .is_some_and(|entry| entry.allows(self.role()))
    }

    /// Like [`Session::can_access`], as an error for command guards.
    pub fn require(&self, section: MenuSection) -> CoreResult<()> {
        if self.can_access(section) {
            Ok(())
        } else {
            Err(CoreError::AccessDenied {
                role: self.role(),
                section,
            })
        }
    }
}

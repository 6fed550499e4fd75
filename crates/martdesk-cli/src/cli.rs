//! Command line definitions.

use clap::Parser;
use martdesk_core::models::{AdjustmentReason, Role, SalesGrouping};

#[derive(Parser)]
#[command(name = "martdesk")]
#[command(version)]
#[command(about = "Supermarket back-office console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API origin for this run
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login {
        /// Email address (defaults to the last one used)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Log out and forget the saved token
    Logout,

    /// Show who is logged in
    Whoami,

    /// Show the dashboard and the pages available to you
    Menu,

    /// List products
    Products {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List inventory
    Inventory {
        /// Only products at or below their low-stock threshold
        #[arg(long)]
        low_stock: bool,
        /// Category id to filter by
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show low-stock alerts
    Alerts,

    /// List active categories
    Categories,

    /// Adjust a product's stock
    Adjust {
        /// Product id
        product_id: String,
        /// Signed amount, e.g. 12 or -3
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(short, long, default_value = "manual_correction", value_parser = parse_reason)]
        reason: AdjustmentReason,
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List orders
    Orders {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Manage employees
    Employees {
        #[command(subcommand)]
        command: EmployeeCommands,
    },

    /// List customers
    Customers {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Block or unblock a customer
    Block {
        /// Customer id
        customer_id: String,
    },

    /// Sales and performance for the last 30 days
    Analytics {
        /// Sales bucket size: day, week or month
        #[arg(short, long, default_value = "day", value_parser = parse_grouping)]
        group_by: SalesGrouping,
    },
}

#[derive(clap::Subcommand)]
pub enum EmployeeCommands {
    /// List employees
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add an employee
    Add(EmployeeArgs),
    /// Replace an employee's details
    Update {
        /// Employee id
        id: String,
        #[command(flatten)]
        details: EmployeeArgs,
    },
    /// Delete an employee
    Delete {
        /// Employee id
        id: String,
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct EmployeeArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "employee", value_parser = parse_role)]
    pub role: Role,
    #[arg(long, default_value = "")]
    pub department: String,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

fn parse_reason(s: &str) -> Result<AdjustmentReason, String> {
    s.parse()
}

fn parse_grouping(s: &str) -> Result<SalesGrouping, String> {
    s.parse()
}

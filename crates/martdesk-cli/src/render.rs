//! Plain table output for listings.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use martdesk_core::models::{
    order_status_label, AnalyticsOverview, Category, Customer, Employee, Order, Pagination,
    Product, SalesGrouping, UserProfile,
};
use martdesk_core::nav::{menu_for, Page};
use martdesk_core::utils::{format_currency, format_date, format_optional, format_phone, truncate_string};

/// Column width for free-text cells such as product names
const NAME_WIDTH: usize = 32;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn print_table(table: Table, empty_message: &str, rows: usize) {
    if rows == 0 {
        println!("{}", empty_message);
    } else {
        println!("{}", table);
    }
}

fn print_pagination(page: u32, pagination: &Pagination) {
    if pagination.total_pages() > 1 {
        let hint = if pagination.has_next(page) {
            format!(" (next: --page {})", page + 1)
        } else {
            String::new()
        };
        println!("Page {} of {}{}", page, pagination.total_pages(), hint);
    }
}

pub fn dashboard(user: &UserProfile) {
    println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
    println!();
    println!("Available pages:");
    for page in menu_for(user.role) {
        println!("  {:<10} {}", page.label(), page.path());
    }
}

pub fn redirected(from: Page) {
    println!(
        "{} is not available for your role; showing the dashboard instead.",
        from.label()
    );
    println!();
}

pub fn products(products: &[Product], page: u32, pagination: &Pagination) {
    let mut t = table(&["SKU", "Name", "Category", "Price", "Stock", "Status"]);
    for p in products {
        let stock = if p.is_low_stock() {
            format!("{} (low)", p.stock)
        } else {
            p.stock.to_string()
        };
        t.add_row(vec![
            format_optional(p.sku.as_deref(), "-"),
            truncate_string(&p.name, NAME_WIDTH),
            p.category_name().to_string(),
            format_currency(p.price),
            stock,
            format_optional(p.status.as_deref(), "-"),
        ]);
    }
    print_table(t, "No products found", products.len());
    print_pagination(page, pagination);
}

pub fn inventory(items: &[Product]) {
    let mut t = table(&["ID", "SKU", "Name", "Category", "Stock", "Threshold"]);
    for p in items {
        t.add_row(vec![
            p.id.clone(),
            format_optional(p.sku.as_deref(), "-"),
            truncate_string(&p.name, NAME_WIDTH),
            p.category_name().to_string(),
            p.stock.to_string(),
            p.low_stock_threshold.to_string(),
        ]);
    }
    print_table(t, "No inventory items found", items.len());
}

pub fn alerts(items: &[Product]) {
    if items.is_empty() {
        println!("No low-stock alerts");
        return;
    }
    println!("{} product(s) running low:", items.len());
    for p in items {
        println!(
            "  {} - {} left (threshold {})",
            truncate_string(&p.name, NAME_WIDTH),
            p.stock,
            p.low_stock_threshold
        );
    }
}

pub fn categories(categories: &[Category]) {
    let mut t = table(&["ID", "Name"]);
    for c in categories {
        t.add_row(vec![c.id.clone(), c.name.clone()]);
    }
    print_table(t, "No categories found", categories.len());
}

pub fn orders(orders: &[Order], page: u32, pagination: &Pagination) {
    let mut t = table(&["Order Number", "Customer", "Items", "Total", "Status", "Payment", "Date"]);
    for o in orders {
        t.add_row(vec![
            o.order_number.clone(),
            o.customer_name().to_string(),
            format!("{} items", o.items.len()),
            format_currency(o.total),
            order_status_label(&o.status).to_string(),
            format_optional(o.payment_status.as_deref(), "-"),
            format_date(o.created_at.as_ref()),
        ]);
    }
    print_table(t, "No orders found", orders.len());
    print_pagination(page, pagination);
}

pub fn employees(employees: &[Employee], page: u32, pagination: &Pagination) {
    let mut t = table(&["ID", "Employee ID", "Name", "Email", "Phone", "Role", "Department", "Status"]);
    for e in employees {
        t.add_row(vec![
            e.id.clone(),
            format_optional(e.employee_id.as_deref(), "-"),
            e.name.clone(),
            e.email.clone(),
            e.phone.as_deref().map(format_phone).unwrap_or_else(|| "-".to_string()),
            e.role.label().to_string(),
            format_optional(e.department.as_deref(), "-"),
            if e.is_active { "Active" } else { "Inactive" }.to_string(),
        ]);
    }
    print_table(t, "No employees found", employees.len());
    print_pagination(page, pagination);
}

pub fn customers(customers: &[Customer], page: u32, pagination: &Pagination) {
    let mut t = table(&["ID", "Customer ID", "Name", "Email", "Phone", "Orders", "Spent", "Status"]);
    for c in customers {
        t.add_row(vec![
            c.id.clone(),
            format_optional(c.customer_id.as_deref(), "-"),
            c.name.clone(),
            c.email.clone(),
            c.phone.as_deref().map(format_phone).unwrap_or_else(|| "-".to_string()),
            c.total_orders.to_string(),
            format_currency(c.total_spent),
            c.status_label().to_string(),
        ]);
    }
    print_table(t, "No customers found", customers.len());
    print_pagination(page, pagination);
}

pub fn analytics(overview: &AnalyticsOverview, group_by: SalesGrouping) {
    println!(
        "Last 30 days: {} across {} orders",
        format_currency(overview.total_revenue()),
        overview.total_orders()
    );
    println!();

    let period = match group_by {
        SalesGrouping::Day => "Date",
        SalesGrouping::Week => "Week",
        SalesGrouping::Month => "Month",
    };
    let mut sales = table(&[period, "Revenue", "Orders"]);
    for point in &overview.sales {
        sales.add_row(vec![
            point.label(),
            format_currency(point.total_revenue),
            point.order_count.to_string(),
        ]);
    }
    print_table(sales, "No sales in this period", overview.sales.len());

    let mut top = table(&["Product", "Quantity Sold", "Revenue"]);
    for item in &overview.top_products {
        top.add_row(vec![
            truncate_string(item.product_name(), NAME_WIDTH),
            item.total_quantity.to_string(),
            format_currency(item.total_revenue),
        ]);
    }
    print_table(top, "No product sales yet", overview.top_products.len());

    let mut by_category = table(&["Category", "Revenue"]);
    for c in &overview.category_sales {
        by_category.add_row(vec![
            format_optional(c.category_name.as_deref(), "Uncategorized"),
            format_currency(c.total_revenue),
        ]);
    }
    print_table(by_category, "No category sales yet", overview.category_sales.len());
}

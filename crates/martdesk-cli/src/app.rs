//! Application wiring and command handlers.
//!
//! Each data command enters its page through the route guard first, the same
//! way a protected page renders only after the session checks out.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use martdesk_core::models::{EmployeeForm, InventoryQuery, ListQuery, StockAdjustment};
use martdesk_core::nav::{can_manage_catalog, can_manage_employees, Page};
use martdesk_core::validation::{validate_adjustment, validate_employee, validate_login, FieldErrors};
use martdesk_core::{ApiClient, Config, GuardDecision, LoginOutcome, RouteGuard, SessionStore};
use tracing::{debug, info};

use crate::cli::{Commands, EmployeeArgs, EmployeeCommands};
use crate::render;

pub struct App {
    config: Config,
    session: SessionStore,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let tokens = config.token_store()?;
        let api = ApiClient::with_timeout(
            &config.api_url,
            tokens,
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("Failed to build HTTP client")?;
        debug!(base_url = api.base_url(), "API client ready");

        // The session store registers its own teardown; this one sends the
        // user back to the login entry point.
        api.on_auth_failure(Arc::new(|_: &str| {
            eprintln!("Your session has expired. Run `martdesk login` to sign in again.");
        }));

        let session = SessionStore::new(api);
        Ok(Self { config, session })
    }

    fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email } => self.login(email).await,
            Commands::Logout => {
                self.session.logout();
                println!("Logged out");
                Ok(())
            }
            Commands::Whoami => self.whoami().await,
            Commands::Menu => {
                if self.enter(Page::Dashboard).await? {
                    self.show_dashboard();
                }
                Ok(())
            }
            Commands::Products { page, search } => {
                if !self.enter(Page::Products).await? {
                    return Ok(());
                }
                let query = ListQuery::page(page).with_search(search);
                let result = self.api().fetch_products(&query).await?;
                render::products(&result.data, query.page, &result.pagination);
                Ok(())
            }
            Commands::Inventory { low_stock, category, search } => {
                if !self.enter(Page::Inventory).await? {
                    return Ok(());
                }
                let query = InventoryQuery {
                    low_stock,
                    category,
                    search: search.filter(|s| !s.trim().is_empty()),
                    ..InventoryQuery::default()
                };
                let result = self.api().fetch_inventory(&query).await?;
                render::inventory(&result.data);
                Ok(())
            }
            Commands::Alerts => {
                if self.enter(Page::Inventory).await? {
                    render::alerts(&self.api().fetch_inventory_alerts().await?);
                }
                Ok(())
            }
            Commands::Categories => {
                if self.enter(Page::Inventory).await? {
                    render::categories(&self.api().fetch_categories(true).await?);
                }
                Ok(())
            }
            Commands::Adjust { product_id, amount, reason, notes } => {
                self.adjust(product_id, &amount, reason, notes).await
            }
            Commands::Orders { page } => {
                if !self.enter(Page::Orders).await? {
                    return Ok(());
                }
                let query = ListQuery::page(page);
                let result = self.api().fetch_orders(&query).await?;
                render::orders(&result.data, query.page, &result.pagination);
                Ok(())
            }
            Commands::Employees { command } => self.employees(command).await,
            Commands::Customers { page, search } => {
                if !self.enter(Page::Customers).await? {
                    return Ok(());
                }
                let query = ListQuery::page(page).with_search(search);
                let result = self.api().fetch_customers(&query).await?;
                render::customers(&result.data, query.page, &result.pagination);
                Ok(())
            }
            Commands::Block { customer_id } => {
                if !self.enter(Page::Customers).await? {
                    return Ok(());
                }
                match self.api().toggle_customer_block(&customer_id).await? {
                    Some(true) => println!("Customer {} blocked", customer_id),
                    Some(false) => println!("Customer {} unblocked", customer_id),
                    None => println!("Customer {} block status toggled", customer_id),
                }
                Ok(())
            }
            Commands::Analytics { group_by } => {
                if self.enter(Page::Analytics).await? {
                    let overview = self.api().fetch_analytics_overview(group_by).await?;
                    render::analytics(&overview, group_by);
                }
                Ok(())
            }
        }
    }

    /// Run the route guard for `page`. Returns false when the user was sent
    /// to the dashboard instead; errors when not logged in.
    async fn enter(&self, page: Page) -> Result<bool> {
        let guard = RouteGuard::new(self.session.clone()).for_page(page);
        match guard.resolve().await {
            GuardDecision::Render => Ok(true),
            GuardDecision::RedirectToLanding => {
                info!(page = page.label(), "Role lacks access, redirecting to dashboard");
                render::redirected(page);
                self.show_dashboard();
                Ok(false)
            }
            GuardDecision::RedirectToLogin | GuardDecision::Loading => {
                bail!("Not logged in. Run `martdesk login` first.")
            }
        }
    }

    fn show_dashboard(&self) {
        if let Some(user) = self.session.user() {
            render::dashboard(&user);
        }
    }

    async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email.or_else(|| self.config.last_email.clone()) {
            Some(email) => email,
            None => prompt("Email: ")?,
        };
        let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

        validate_login(&email, &password).map_err(form_error)?;

        match self.session.login(email.trim(), &password).await {
            LoginOutcome::Success(user) => {
                println!("Welcome, {}!", user.name);
                self.config.last_email = Some(user.email.clone());
                if let Err(e) = self.config.save() {
                    tracing::warn!(error = %e, "Failed to save config");
                }
                println!();
                render::dashboard(&user);
                Ok(())
            }
            LoginOutcome::Failed(message) => bail!("{}", message),
        }
    }

    async fn whoami(&self) -> Result<()> {
        if self.session.check_auth().await {
            if let Some(user) = self.session.user() {
                println!("{} <{}> ({})", user.name, user.email, user.role);
            }
        } else {
            println!("Not logged in");
        }
        Ok(())
    }

    async fn adjust(
        &self,
        product_id: String,
        amount: &str,
        reason: martdesk_core::models::AdjustmentReason,
        notes: String,
    ) -> Result<()> {
        if !self.enter(Page::Inventory).await? {
            return Ok(());
        }
        if !self.session.role().is_some_and(can_manage_catalog) {
            bail!("Your role cannot adjust inventory");
        }

        let product = self.api().fetch_product(&product_id).await?;
        let adjustment = validate_adjustment(amount, product.stock).map_err(form_error)?;

        let request = StockAdjustment {
            product_id,
            adjustment,
            reason,
            notes,
        };
        self.api()
            .adjust_inventory(&request)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message("Failed to adjust inventory")))?;
        println!(
            "Inventory adjusted by {} units ({})",
            request.signed_amount(),
            request.reason.label()
        );
        Ok(())
    }

    async fn employees(&self, command: EmployeeCommands) -> Result<()> {
        if !self.enter(Page::Employees).await? {
            return Ok(());
        }

        match command {
            EmployeeCommands::List { page, search } => {
                let query = ListQuery::page(page).with_search(search);
                let result = self.api().fetch_employees(&query).await?;
                render::employees(&result.data, query.page, &result.pagination);
            }
            EmployeeCommands::Add(args) => {
                self.require_employee_admin()?;
                let form = employee_form(args)?;
                self.api()
                    .create_employee(&form)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message("Failed to save employee")))?;
                println!("Employee created successfully");
            }
            EmployeeCommands::Update { id, details } => {
                self.require_employee_admin()?;
                let form = employee_form(details)?;
                self.api()
                    .update_employee(&id, &form)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message("Failed to save employee")))?;
                println!("Employee updated successfully");
            }
            EmployeeCommands::Delete { id, yes } => {
                self.require_employee_admin()?;
                if !yes {
                    bail!("Deleting an employee cannot be undone. Re-run with --yes to confirm.");
                }
                self.api()
                    .delete_employee(&id)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message("Failed to delete employee")))?;
                println!("Employee deleted successfully");
            }
        }
        Ok(())
    }

    fn require_employee_admin(&self) -> Result<()> {
        if self.session.role().is_some_and(can_manage_employees) {
            Ok(())
        } else {
            bail!("Only admins can manage employees")
        }
    }
}

fn employee_form(args: EmployeeArgs) -> Result<EmployeeForm> {
    let form = EmployeeForm {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        phone: args.phone.trim().to_string(),
        role: args.role,
        department: args.department.trim().to_string(),
    };
    validate_employee(&form).map_err(form_error)?;
    Ok(form)
}

/// One line per invalid field
fn form_error(errors: FieldErrors) -> anyhow::Error {
    let lines: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("  {}: {}", field, message))
        .collect();
    anyhow::anyhow!("Please fix the following:\n{}", lines.join("\n"))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use martdesk_core::models::Role;

    #[test]
    fn test_form_error_lists_every_field() {
        let err = validate_login("", "").map_err(form_error).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Please fix the following:"));
        assert!(text.contains("email:"));
        assert!(text.contains("password:"));
    }

    #[test]
    fn test_employee_form_trims_and_validates() {
        let form = employee_form(EmployeeArgs {
            name: "  Rosa ".to_string(),
            email: "rosa@shop.test ".to_string(),
            phone: "5550100".to_string(),
            role: Role::InventoryManager,
            department: String::new(),
        })
        .unwrap();
        assert_eq!(form.name, "Rosa");
        assert_eq!(form.email, "rosa@shop.test");

        let bad = employee_form(EmployeeArgs {
            name: String::new(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            role: Role::Employee,
            department: String::new(),
        });
        assert!(bad.is_err());
    }
}

//! API client for communicating with the supermarket back-office REST API.
//!
//! Every call goes through `ApiClient`, which stamps the persisted bearer
//! token on the request and tears the session down when the server answers
//! 401.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::TokenStore;
use crate::models::{
    AnalyticsOverview, Category, CategorySales, Customer, Employee, EmployeeForm, Envelope,
    InventoryQuery, ListQuery, LoginResponse, Order, Paginated, Product, SalesGrouping,
    SalesPoint, StockAdjustment, TopProduct, UserProfile,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Origin used when nothing is configured
pub const DEFAULT_API_ORIGIN: &str = "http://localhost:5000";

/// Path prefix all API routes live under
const API_PREFIX: &str = "/api";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/auth/login";
const ME_PATH: &str = "/auth/me";

/// Days of sales history on the analytics overview
const ANALYTICS_LOOKBACK_DAYS: i64 = 30;

/// Rows in the analytics top-products table
const TOP_PRODUCTS_LIMIT: u32 = 10;

/// Observer invoked once when an authenticated request is rejected with 401.
/// Receives the rejected token.
pub type AuthFailureHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SalesQuery {
    group_by: &'static str,
    start_date: String,
}

/// API client for the back-office API.
/// Clone is cheap - the connection pool, token store and observers are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    auth_failure_hooks: Arc<RwLock<Vec<AuthFailureHook>>>,
    // Serializes the compare-and-clear in `handle_unauthorized`
    teardown: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a new API client for `origin` (e.g. `https://shop.example.com`)
    pub fn new(origin: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_timeout(origin, tokens, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        origin: &str,
        tokens: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: Self::api_base(origin),
            tokens,
            auth_failure_hooks: Arc::new(RwLock::new(Vec::new())),
            teardown: Arc::new(Mutex::new(())),
        })
    }

    /// Origin plus the `/api` prefix, tolerating a trailing slash or an
    /// origin that already carries the prefix.
    fn api_base(origin: &str) -> String {
        let origin = origin.trim().trim_end_matches('/');
        if origin.ends_with(API_PREFIX) {
            origin.to_string()
        } else {
            format!("{}{}", origin, API_PREFIX)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Register an observer for forced logouts. The gateway itself never
    /// navigates; the application decides what a 401 means for the user.
    pub fn on_auth_failure(&self, hook: AuthFailureHook) {
        self.auth_failure_hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn current_token(&self) -> Option<String> {
        match self.tokens.get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, sending request without it");
                None
            }
        }
    }

    /// Tear down the persisted token after a 401 and notify observers.
    ///
    /// Only the first rejection of a given token fires: a concurrent 401 for
    /// the same token finds it already gone, and a 401 for a token that has
    /// since been replaced by a fresh login leaves the new one alone.
    fn handle_unauthorized(&self, sent_token: Option<&str>) {
        let Some(sent) = sent_token else {
            debug!("401 on a request sent without a token");
            return;
        };

        let fire = {
            let _guard = self.teardown.lock().unwrap_or_else(PoisonError::into_inner);
            let stale = match self.tokens.get() {
                Ok(Some(current)) => current == sent,
                Ok(None) => false,
                Err(e) => {
                    warn!(error = %e, "Failed to read persisted token during teardown");
                    true
                }
            };
            if stale {
                if let Err(e) = self.tokens.remove() {
                    warn!(error = %e, "Failed to remove rejected token");
                }
            }
            stale
        };

        if fire {
            warn!("Token rejected by server, forcing logout");
            let hooks = self
                .auth_failure_hooks
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            for hook in hooks {
                hook(sent);
            }
        }
    }

    /// Send a request through the gateway and decode the response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let token = self.current_token();
        let request = match token.as_deref() {
            Some(t) => request.bearer_auth(t),
            None => request,
        };

        debug!(%method, path, authenticated = token.is_some(), "API request");
        let response = request.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "Request failed to send");
            ApiError::NetworkError(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.handle_unauthorized(token.as_deref());
            }
            let err = ApiError::from_status(status, &body);
            debug!(%method, path, %status, error = %err, "API request rejected");
            return Err(err);
        }

        let text = response.text().await?;
        // 204s and empty bodies decode as JSON null, so `()` and `Option<_>` work
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    // ===== Generic Requests =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path));
        self.execute(Method::GET, path, request).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path)).query(query);
        self.execute(Method::GET, path, request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(Method::POST, path, request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.put(self.url(path)).json(body);
        self.execute(Method::PUT, path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.client.delete(self.url(path));
        self.execute(Method::DELETE, path, request).await
    }

    // ===== Authentication =====

    /// Exchange credentials for a token and profile
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: Envelope<LoginResponse> =
            self.post(LOGIN_PATH, &Credentials { email, password }).await?;
        Ok(response.data)
    }

    /// Fetch the profile the persisted token belongs to
    pub async fn fetch_me(&self) -> Result<UserProfile, ApiError> {
        let response: Envelope<UserProfile> = self.get(ME_PATH).await?;
        Ok(response.data)
    }

    // ===== Products & Inventory =====

    pub async fn fetch_products(&self, query: &ListQuery) -> Result<Paginated<Product>, ApiError> {
        self.get_with_query("/products", query).await
    }

    pub async fn fetch_product(&self, product_id: &str) -> Result<Product, ApiError> {
        let response: Envelope<Product> = self.get(&format!("/products/{}", product_id)).await?;
        Ok(response.data)
    }

    pub async fn fetch_inventory(
        &self,
        query: &InventoryQuery,
    ) -> Result<Paginated<Product>, ApiError> {
        self.get_with_query("/inventory", query).await
    }

    /// Products at or below their low-stock threshold
    pub async fn fetch_inventory_alerts(&self) -> Result<Vec<Product>, ApiError> {
        let response: Envelope<Vec<Product>> = self.get("/inventory/alerts").await?;
        Ok(response.data)
    }

    pub async fn fetch_categories(&self, active_only: bool) -> Result<Vec<Category>, ApiError> {
        let response: Envelope<Vec<Category>> = if active_only {
            self.get_with_query("/categories", &[("isActive", "true")]).await?
        } else {
            self.get("/categories").await?
        };
        Ok(response.data)
    }

    pub async fn adjust_inventory(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<serde_json::Value, ApiError> {
        let response: Envelope<serde_json::Value> =
            self.post("/inventory/adjust", adjustment).await?;
        info!(
            product_id = %adjustment.product_id,
            adjustment = adjustment.adjustment,
            reason = adjustment.reason.as_str(),
            "Inventory adjusted"
        );
        Ok(response.data)
    }

    // ===== Orders =====

    pub async fn fetch_orders(&self, query: &ListQuery) -> Result<Paginated<Order>, ApiError> {
        self.get_with_query("/orders", query).await
    }

    // ===== Employees =====

    pub async fn fetch_employees(&self, query: &ListQuery) -> Result<Paginated<Employee>, ApiError> {
        self.get_with_query("/employees", query).await
    }

    pub async fn create_employee(&self, form: &EmployeeForm) -> Result<Employee, ApiError> {
        let response: Envelope<Employee> = self.post("/employees", form).await?;
        info!(employee_id = %response.data.id, "Employee created");
        Ok(response.data)
    }

    pub async fn update_employee(
        &self,
        employee_id: &str,
        form: &EmployeeForm,
    ) -> Result<Employee, ApiError> {
        let response: Envelope<Employee> =
            self.put(&format!("/employees/{}", employee_id), form).await?;
        info!(employee_id, "Employee updated");
        Ok(response.data)
    }

    pub async fn delete_employee(&self, employee_id: &str) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> =
            self.delete(&format!("/employees/{}", employee_id)).await?;
        info!(employee_id, "Employee deleted");
        Ok(())
    }

    // ===== Customers =====

    pub async fn fetch_customers(&self, query: &ListQuery) -> Result<Paginated<Customer>, ApiError> {
        self.get_with_query("/users/customers", query).await
    }

    /// Flip a customer's blocked flag; the server decides the new state and
    /// reports it back as `isBlocked` when it returns the customer.
    pub async fn toggle_customer_block(&self, customer_id: &str) -> Result<Option<bool>, ApiError> {
        let response: serde_json::Value = self
            .put(&format!("/users/customers/{}/block", customer_id), &serde_json::json!({}))
            .await?;
        let blocked = response
            .pointer("/data/isBlocked")
            .and_then(serde_json::Value::as_bool);
        info!(customer_id, ?blocked, "Customer block status toggled");
        Ok(blocked)
    }

    // ===== Analytics =====

    pub async fn fetch_sales(
        &self,
        group_by: SalesGrouping,
        since: chrono::DateTime<Utc>,
    ) -> Result<Vec<SalesPoint>, ApiError> {
        let query = SalesQuery {
            group_by: group_by.as_str(),
            start_date: since.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        };
        let response: Envelope<Vec<SalesPoint>> =
            self.get_with_query("/analytics/sales", &query).await?;
        Ok(response.data)
    }

    pub async fn fetch_top_products(&self, limit: u32) -> Result<Vec<TopProduct>, ApiError> {
        let response: Envelope<Vec<TopProduct>> = self
            .get_with_query("/analytics/top-products", &[("limit", limit)])
            .await?;
        Ok(response.data)
    }

    pub async fn fetch_category_sales(&self) -> Result<Vec<CategorySales>, ApiError> {
        let response: Envelope<Vec<CategorySales>> = self.get("/analytics/category-sales").await?;
        Ok(response.data)
    }

    /// Sales for the last 30 days bucketed by `group_by`, the top 10
    /// products and revenue per category, fetched concurrently. Fails if any
    /// of the three fails.
    pub async fn fetch_analytics_overview(
        &self,
        group_by: SalesGrouping,
    ) -> Result<AnalyticsOverview, ApiError> {
        let since = Utc::now() - chrono::Duration::days(ANALYTICS_LOOKBACK_DAYS);
        let (sales, top_products, category_sales) = futures::try_join!(
            self.fetch_sales(group_by, since),
            self.fetch_top_products(TOP_PRODUCTS_LIMIT),
            self.fetch_category_sales(),
        )?;

        Ok(AnalyticsOverview {
            sales,
            top_products,
            category_sales,
        })
    }
}

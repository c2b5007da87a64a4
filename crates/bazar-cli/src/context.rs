//! Shared wiring for command handlers: configuration, the API client, the
//! auth store and the on-disk cart.

use std::sync::{Arc, Mutex};

use bazar_client::{ApiClient, AuthStore, LoginRedirect, Session, AUTH_TOKEN_KEY, LOGIN_ROUTE};
use bazar_core::catalogue::effective_tree;
use bazar_core::{
    AppConfig, CartStore, Category, CategoryNode, FileStore, KeyValueStore, Product, StorageError,
    Subcategory,
};

const AUTH_NAMESPACE: &str = "auth";
const CART_NAMESPACE: &str = "cart";
const SEEDED_TOKEN_KEY: &str = "api_token_seeded";

/// Terminal stand-in for the storefront router.
///
/// A forced logout cannot navigate anywhere, so it tells the user to log in
/// again and remembers that the login route is now current.
#[derive(Debug)]
pub(crate) struct CliRedirect {
    route: Mutex<String>,
}

impl CliRedirect {
    pub(crate) fn new(route: &str) -> Self {
        Self {
            route: Mutex::new(route.to_string()),
        }
    }
}

impl LoginRedirect for CliRedirect {
    fn current_route(&self) -> String {
        self.route
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn redirect_to_login(&self) {
        eprintln!("session expired or not authorized; run `bazar login <username>`");
        let mut route = self
            .route
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *route = LOGIN_ROUTE.to_string();
    }
}

/// Products plus the category tree used for scoping.
pub(crate) struct CatalogueData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub tree: Vec<CategoryNode>,
}

pub(crate) struct AppContext {
    pub config: AppConfig,
    pub client: ApiClient,
    pub auth: AuthStore,
}

impl AppContext {
    /// Builds the client and session for a command running at `route`.
    ///
    /// A configured `BAZAR_API_TOKEN` is adopted once; see [`seed_token`].
    ///
    /// # Errors
    ///
    /// Returns an error if the seeded token cannot be stored or the client
    /// cannot be built.
    pub(crate) fn open(config: AppConfig, route: &str) -> anyhow::Result<Self> {
        let auth_storage = FileStore::new(config.data_dir.join(AUTH_NAMESPACE));
        seed_token(&auth_storage, config.api_token.as_deref())?;
        let session = Arc::new(Session::restore(
            Arc::new(auth_storage),
            Arc::new(CliRedirect::new(route)),
        ));
        let client = ApiClient::new(
            &config.api_base,
            config.request_timeout_secs,
            Some(&config.user_agent),
            session,
        )?;
        let auth = AuthStore::new(client.clone());
        Ok(Self {
            config,
            client,
            auth,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read.
    pub(crate) fn cart_store(&self) -> anyhow::Result<CartStore<FileStore>> {
        let storage = FileStore::new(self.config.data_dir.join(CART_NAMESPACE));
        Ok(CartStore::load(storage)?)
    }

    /// Fetches products and taxonomy concurrently.
    ///
    /// Only the product listing is required; taxonomy failures are logged and
    /// leave the tree empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the product listing fails.
    pub(crate) async fn load_catalogue(&self) -> anyhow::Result<CatalogueData> {
        let (products, tree, categories, subcategories) = tokio::join!(
            self.client.list_products(1, self.config.catalogue_fetch_limit),
            self.client.category_tree(),
            self.client.list_categories(),
            self.client.list_subcategories(),
        );
        let products = products?.products;
        let tree = tree.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "category tree unavailable");
            Vec::new()
        });
        let categories = categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "category list unavailable");
            Vec::new()
        });
        let subcategories = subcategories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "subcategory list unavailable");
            Vec::new()
        });
        let tree = effective_tree(&tree, &categories, &subcategories);
        tracing::debug!(
            products = products.len(),
            categories = tree.len(),
            "catalogue loaded"
        );
        Ok(CatalogueData {
            products,
            categories,
            subcategories,
            tree,
        })
    }
}

/// Adopts a configured token once per distinct value.
///
/// The last adopted value is remembered next to the session token, so a
/// logout is not undone by the same `BAZAR_API_TOKEN` on the next run.
///
/// # Errors
///
/// Returns an error if the auth storage cannot be read or written.
pub(crate) fn seed_token(
    storage: &dyn KeyValueStore,
    token: Option<&str>,
) -> Result<bool, StorageError> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(false);
    };
    if storage.get(SEEDED_TOKEN_KEY)?.as_deref() == Some(token) {
        return Ok(false);
    }
    storage.set(AUTH_TOKEN_KEY, token)?;
    storage.set(SEEDED_TOKEN_KEY, token)?;
    tracing::debug!("configured api token adopted");
    Ok(true)
}

/// Fails fast when there is no stored session.
///
/// # Errors
///
/// Returns an error telling the user to log in.
pub(crate) fn require_login(ctx: &AppContext) -> anyhow::Result<()> {
    if ctx.auth.is_authenticated() {
        Ok(())
    } else {
        anyhow::bail!("not logged in; run `bazar login <username>` first")
    }
}

/// Format an optional value for display, falling back to a dash when absent or empty.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("\u{2014}")
}

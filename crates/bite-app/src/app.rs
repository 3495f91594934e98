//! The storefront shell: router, cart, backend and renderer wired together.

use crate::config::{AppConfig, UnmatchedPolicy};
use crate::error::AppError;
use crate::pages::{self, Page, PageRenderer, PageView};
use bite_cache::KeyValueStore;
use bite_commerce::cart::{CartStore, MutationOutcome};
use bite_commerce::ids::{ItemId, OrderId, RestaurantId};
use bite_commerce::money::Money;
use bite_commerce::notice::{Notice, NoticeQueue, NoticeSink};
use bite_data::api::{CheckoutRequest, Credentials, MenuItem, Order, Registration, User};
use bite_data::{BiteApi, FetchClient, FetchError, Transport};
use bite_router::{Dispatch, Location, NavigationToken, Router};
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn};

/// Runs page loads in the background.
pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

impl TaskSpawner for futures::executor::LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        use futures::task::LocalSpawnExt;

        if let Err(e) = self.spawn_local(task) {
            warn!(error = %e, "Executor shut down, dropping page load");
        }
    }
}

/// `wasm_bindgen_futures::spawn_local`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserSpawner;

#[cfg(target_arch = "wasm32")]
impl TaskSpawner for BrowserSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// What happened to the result of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The view was rendered.
    Rendered,
    /// The user navigated away before the response arrived; nothing rendered.
    Stale,
    /// The backend call failed; an error view and notice were shown.
    Failed,
}

/// Everything outside the app's control, injected at construction.
pub struct Platform<S: KeyValueStore> {
    pub location: Rc<dyn Location>,
    pub store: S,
    pub transport: Rc<dyn Transport>,
    pub renderer: Rc<dyn PageRenderer>,
    pub spawner: Rc<dyn TaskSpawner>,
}

/// The storefront.
///
/// Route handlers turn the matched route into a [`Page`], render what can
/// be rendered right away and start a background load for the rest. Loads
/// carry the [`NavigationToken`] of the dispatch that started them and only
/// render while that token is still current.
pub struct App<S: KeyValueStore + 'static> {
    config: AppConfig,
    router: Router,
    cart: CartStore<S>,
    api: BiteApi,
    notices: Rc<NoticeQueue>,
    renderer: Rc<dyn PageRenderer>,
    spawner: Rc<dyn TaskSpawner>,
    current: RefCell<Option<(Page, NavigationToken)>>,
    user: RefCell<Option<User>>,
}

impl<S: KeyValueStore + 'static> App<S> {
    /// Build the app and register its routes. Call [`App::start`] next.
    pub fn new(config: AppConfig, platform: Platform<S>) -> Rc<Self> {
        let notices = Rc::new(NoticeQueue::with_duration(config.notices.duration_ms));
        let cart = CartStore::open(
            platform.store,
            config.cart.storage_key.clone(),
            notices.clone(),
        );
        let api = BiteApi::new(FetchClient::new(
            config.api.base_url.clone(),
            platform.transport,
        ));

        let app = Rc::new(Self {
            router: Router::new(platform.location),
            cart,
            api,
            notices,
            renderer: platform.renderer,
            spawner: platform.spawner,
            current: RefCell::new(None),
            user: RefCell::new(None),
            config,
        });

        app.install_routes();
        app.watch_cart();
        app
    }

    fn install_routes(self: &Rc<Self>) {
        for (pattern, build) in pages::ROUTES {
            self.add_page_route(pattern, *build);
        }

        match self.config.routing.unmatched {
            UnmatchedPolicy::RedirectHome => {
                debug!("Unknown paths redirect home");
            }
            UnmatchedPolicy::NotFound => {
                self.add_page_route(bite_router::NOT_FOUND_PATH, pages::not_found);
            }
        }
    }

    fn add_page_route(self: &Rc<Self>, pattern: &str, build: pages::PageBuilder) {
        let app = Rc::downgrade(self);
        self.router.add_route(pattern, move |ctx| {
            let Some(app) = app.upgrade() else {
                return;
            };
            match build(ctx) {
                Some(page) => app.show(page, ctx.token()),
                None => warn!(path = ctx.path(), "Route matched without its parameters"),
            }
        });
    }

    fn watch_cart(self: &Rc<Self>) {
        let app: Weak<Self> = Rc::downgrade(self);
        self.cart.subscribe(move |cart| {
            let Some(app) = app.upgrade() else {
                return;
            };
            app.renderer.cart_changed(cart);
            if matches!(app.current_page(), Some(Page::Cart)) {
                app.render_cart();
            }
        });
    }

    /// Resolve the initial location.
    pub fn start(&self) -> Dispatch {
        info!(base_url = %self.config.api.base_url, "Starting storefront");
        let cart = self.cart.snapshot();
        self.renderer.cart_changed(&cart);
        self.router.start()
    }

    /// Go to `path` through the location.
    pub fn navigate(&self, path: &str) {
        self.router.navigate(path);
    }

    /// Deliver location changes queued by a polled location.
    pub fn process_location_changes(&self) -> Vec<Dispatch> {
        self.router.run_pending()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub fn api(&self) -> &BiteApi {
        &self.api
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The page shown by the latest dispatch.
    pub fn current_page(&self) -> Option<Page> {
        self.current.borrow().as_ref().map(|(page, _)| page.clone())
    }

    /// The signed-in user, if known.
    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    fn show(self: &Rc<Self>, page: Page, token: NavigationToken) {
        info!(page = %page.path(), token = token.sequence(), "Showing page");
        *self.current.borrow_mut() = Some((page.clone(), token));

        if page.needs_data() {
            self.renderer.render(&PageView::Loading(page.clone()));
            let app = Rc::clone(self);
            self.spawner.spawn(
                async move {
                    app.load(&page, token).await;
                }
                .boxed_local(),
            );
        } else {
            match &page {
                Page::Cart => self.render_cart(),
                Page::Login => self.renderer.render(&PageView::Login),
                Page::Register => self.renderer.render(&PageView::Register),
                Page::NotFound { path } => {
                    self.renderer.render(&PageView::NotFound { path: path.clone() })
                }
                other => warn!(page = %other.path(), "No view for page"),
            }
        }
        self.flush_notices();
    }

    /// Fetch and render the data a page needs.
    pub async fn load(&self, page: &Page, token: NavigationToken) -> Delivery {
        match page {
            Page::Home => self.load_home(token).await,
            Page::Restaurants => self.load_restaurants(token).await,
            Page::Restaurant { id } => self.load_restaurant(id, token).await,
            Page::Orders => self.load_orders(token).await,
            Page::Order { id } => self.load_order(id, token).await,
            _ => Delivery::Rendered,
        }
    }

    /// Restaurants and cuisine categories for the landing page.
    pub async fn load_home(&self, token: NavigationToken) -> Delivery {
        let result = async {
            let restaurants = self.api.restaurants().await?;
            let categories = self.api.categories().await?;
            Ok::<_, FetchError>(PageView::Home {
                restaurants,
                categories,
            })
        }
        .await;
        self.deliver(Page::Home, token, result)
    }

    pub async fn load_restaurants(&self, token: NavigationToken) -> Delivery {
        let result = self
            .api
            .restaurants()
            .await
            .map(|restaurants| PageView::Restaurants { restaurants });
        self.deliver(Page::Restaurants, token, result)
    }

    /// Restaurant details and its menu.
    pub async fn load_restaurant(&self, id: &RestaurantId, token: NavigationToken) -> Delivery {
        let result = async {
            let restaurant = self.api.restaurant(id).await?;
            let menu = self.api.menu(id).await?;
            Ok::<_, FetchError>(PageView::Restaurant { restaurant, menu })
        }
        .await;
        self.deliver(Page::Restaurant { id: id.clone() }, token, result)
    }

    pub async fn load_orders(&self, token: NavigationToken) -> Delivery {
        let result = self
            .api
            .orders()
            .await
            .map(|orders| PageView::Orders { orders });
        self.deliver(Page::Orders, token, result)
    }

    pub async fn load_order(&self, id: &OrderId, token: NavigationToken) -> Delivery {
        let result = self.api.order(id).await.map(|order| PageView::Order { order });
        self.deliver(Page::Order { id: id.clone() }, token, result)
    }

    fn deliver(
        &self,
        page: Page,
        token: NavigationToken,
        result: Result<PageView, FetchError>,
    ) -> Delivery {
        if !self.router.is_current(token) {
            debug!(
                page = %page.path(),
                token = token.sequence(),
                current = self.router.current_token().sequence(),
                "Dropping response for a page no longer shown"
            );
            return Delivery::Stale;
        }

        let delivery = match result {
            Ok(view) => {
                self.renderer.render(&view);
                Delivery::Rendered
            }
            Err(e) => {
                error!(page = %page.path(), error = %e, "Page load failed");
                let message = e.to_string();
                self.notices.notify(Notice::error(message.clone()));
                self.renderer.render(&PageView::Failed { page, message });
                Delivery::Failed
            }
        };
        self.flush_notices();
        delivery
    }

    fn render_cart(&self) {
        let cart = self.cart.snapshot();
        match self.cart.summary(&self.config.pricing) {
            Ok(summary) => self.renderer.render(&PageView::Cart { cart, summary }),
            Err(e) => {
                error!(error = %e, "Cart totals out of range");
                self.renderer.render(&PageView::Failed {
                    page: Page::Cart,
                    message: e.to_string(),
                });
            }
        }
    }

    // Cart actions

    /// Add one unit of a menu item to the local cart.
    pub fn add_to_cart(&self, item: &MenuItem) -> Result<MutationOutcome, AppError> {
        self.add_item(item.id.clone(), &item.name, item.price, &item.kind_tag())
    }

    /// Add one unit of an item described by its raw attributes.
    pub fn add_item(
        &self,
        id: ItemId,
        name: &str,
        price: Money,
        kind: &str,
    ) -> Result<MutationOutcome, AppError> {
        let result = self.cart.add_item(id.clone(), name, price, kind);
        if let Err(e) = &result {
            warn!(item = %id, error = %e, "Rejected cart item");
            self.notices
                .notify(Notice::error(format!("Failed to add {} to cart.", name)));
        }
        self.flush_notices();
        Ok(result?)
    }

    pub fn set_quantity(&self, id: &ItemId, quantity: i64) -> MutationOutcome {
        let outcome = self.cart.set_quantity(id, quantity);
        self.flush_notices();
        outcome
    }

    pub fn remove_from_cart(&self, id: &ItemId) -> MutationOutcome {
        let outcome = self.cart.remove_item(id);
        self.flush_notices();
        outcome
    }

    /// Place an order for the local cart.
    ///
    /// On success the cart is cleared and the orders page is shown.
    /// Returns `Ok(None)` when the input was not valid for an order.
    pub async fn checkout(&self, delivery_address: &str) -> Result<Option<Order>, AppError> {
        if self.cart.is_empty() {
            self.warn_user("Your cart is empty!");
            return Ok(None);
        }
        let delivery_address = delivery_address.trim();
        if delivery_address.is_empty() {
            self.warn_user("Please enter a delivery address.");
            return Ok(None);
        }

        let summary = self.cart.summary(&self.config.pricing)?;
        let request = CheckoutRequest {
            items: self.cart.items(),
            total: summary.total,
            delivery_address: delivery_address.to_string(),
        };

        match self.api.checkout(&request).await {
            Ok(response) => {
                info!(order = %response.order.id, total = %summary.total, "Order placed");
                self.cart.clear();
                self.notices.notify(Notice::success(response.message));
                self.flush_notices();
                self.navigate(&Page::Orders.path());
                Ok(Some(response.order))
            }
            Err(e) => Err(self.report(e, "Failed to place order.")),
        }
    }

    // Account actions

    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            self.warn_user("Please enter your email and password.");
            return Ok(None);
        }

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials).await {
            Ok(response) => {
                let user = response.user.unwrap_or(User {
                    id: None,
                    username: None,
                    email: credentials.email,
                    address: None,
                });
                info!(user = user.display_name(), "Logged in");
                *self.user.borrow_mut() = Some(user.clone());
                self.notices.notify(Notice::success(response.message));
                self.flush_notices();
                self.navigate(&Page::Home.path());
                Ok(Some(user))
            }
            Err(e) => Err(self.report(e, "Login failed!")),
        }
    }

    pub async fn register(
        &self,
        registration: &Registration,
        confirm_password: &str,
    ) -> Result<bool, AppError> {
        if registration.username.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            self.warn_user("All required fields must be filled.");
            return Ok(false);
        }
        if registration.password != confirm_password {
            self.notices.notify(Notice::error("Passwords do not match!"));
            self.flush_notices();
            return Ok(false);
        }

        match self.api.register(registration).await {
            Ok(response) => {
                self.notices.notify(Notice::success(response.message));
                self.flush_notices();
                self.navigate(&Page::Login.path());
                Ok(true)
            }
            Err(e) => Err(self.report(e, "Registration failed. Please try again.")),
        }
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        match self.api.logout().await {
            Ok(response) => {
                *self.user.borrow_mut() = None;
                self.notices.notify(Notice::info(response.message));
                self.flush_notices();
                self.navigate(&Page::Home.path());
                Ok(())
            }
            Err(e) => Err(self.report(e, "Logout failed.")),
        }
    }

    /// Ask the backend who is signed in.
    pub async fn refresh_user(&self) -> Result<Option<User>, AppError> {
        let user = self.api.current_user().await?;
        *self.user.borrow_mut() = user.clone();
        Ok(user)
    }

    fn warn_user(&self, message: &str) {
        self.notices.notify(Notice::warning(message));
        self.flush_notices();
    }

    fn report(&self, e: FetchError, fallback: &str) -> AppError {
        error!(error = %e, "{}", fallback);
        let message = match &e {
            FetchError::HttpError { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        };
        self.notices.notify(Notice::error(message));
        self.flush_notices();
        AppError::from(e)
    }

    fn flush_notices(&self) {
        for notice in self.notices.drain() {
            self.renderer.notice(&notice);
        }
    }
}

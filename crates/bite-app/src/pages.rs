//! Pages of the storefront and the views rendered for them.

use bite_commerce::cart::{Cart, CheckoutSummary};
use bite_commerce::ids::{OrderId, RestaurantId};
use bite_commerce::notice::Notice;
use bite_data::api::{Category, MenuItem, Order, Restaurant};
use bite_router::{RouteContext, NOT_FOUND_PATH};
use serde::Serialize;

/// A page the router can show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Home,
    Restaurants,
    Restaurant { id: RestaurantId },
    Cart,
    Orders,
    Order { id: OrderId },
    Login,
    Register,
    /// Shown for an unknown path when the not-found policy is active.
    NotFound { path: String },
}

/// Builds a page from a matched route.
pub type PageBuilder = fn(&RouteContext) -> Option<Page>;

/// Route patterns of the storefront, in registration order.
pub const ROUTES: &[(&str, PageBuilder)] = &[
    ("/", home),
    ("/restaurants", restaurants),
    ("/restaurant/:id", restaurant),
    ("/cart", cart),
    ("/orders", orders),
    ("/order/:id", order),
    ("/login", login),
    ("/register", register),
];

fn home(_: &RouteContext) -> Option<Page> {
    Some(Page::Home)
}

fn restaurants(_: &RouteContext) -> Option<Page> {
    Some(Page::Restaurants)
}

fn restaurant(ctx: &RouteContext) -> Option<Page> {
    ctx.param("id").map(|id| Page::Restaurant { id: id.into() })
}

fn cart(_: &RouteContext) -> Option<Page> {
    Some(Page::Cart)
}

fn orders(_: &RouteContext) -> Option<Page> {
    Some(Page::Orders)
}

fn order(ctx: &RouteContext) -> Option<Page> {
    ctx.param("id").map(|id| Page::Order { id: id.into() })
}

fn login(_: &RouteContext) -> Option<Page> {
    Some(Page::Login)
}

fn register(_: &RouteContext) -> Option<Page> {
    Some(Page::Register)
}

/// Builder for the `/404` route.
pub fn not_found(ctx: &RouteContext) -> Option<Page> {
    Some(Page::NotFound {
        path: ctx.path().to_string(),
    })
}

impl Page {
    /// Path that leads to this page, for links and `navigate`.
    pub fn path(&self) -> String {
        match self {
            Page::Home => "/".to_string(),
            Page::Restaurants => "/restaurants".to_string(),
            Page::Restaurant { id } => format!("/restaurant/{}", id),
            Page::Cart => "/cart".to_string(),
            Page::Orders => "/orders".to_string(),
            Page::Order { id } => format!("/order/{}", id),
            Page::Login => "/login".to_string(),
            Page::Register => "/register".to_string(),
            Page::NotFound { .. } => NOT_FOUND_PATH.to_string(),
        }
    }

    /// Document title.
    pub fn title(&self) -> String {
        match self {
            Page::Home => "ByteBites".to_string(),
            Page::Restaurants => "Restaurants | ByteBites".to_string(),
            Page::Restaurant { id } => format!("Restaurant {} | ByteBites", id),
            Page::Cart => "Your Cart | ByteBites".to_string(),
            Page::Orders => "Your Orders | ByteBites".to_string(),
            Page::Order { id } => format!("Order {} | ByteBites", id),
            Page::Login => "Log in | ByteBites".to_string(),
            Page::Register => "Sign up | ByteBites".to_string(),
            Page::NotFound { .. } => "Page not found | ByteBites".to_string(),
        }
    }

    /// Whether the page needs data from the backend before it can render.
    pub fn needs_data(&self) -> bool {
        matches!(
            self,
            Page::Home
                | Page::Restaurants
                | Page::Restaurant { .. }
                | Page::Orders
                | Page::Order { .. }
        )
    }
}

/// What the renderer is asked to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PageView {
    /// Placeholder while the page's data is in flight.
    Loading(Page),
    Home {
        restaurants: Vec<Restaurant>,
        categories: Vec<Category>,
    },
    Restaurants {
        restaurants: Vec<Restaurant>,
    },
    Restaurant {
        restaurant: Restaurant,
        menu: Vec<MenuItem>,
    },
    Cart {
        cart: Cart,
        summary: CheckoutSummary,
    },
    Orders {
        orders: Vec<Order>,
    },
    Order {
        order: Order,
    },
    Login,
    Register,
    NotFound {
        path: String,
    },
    /// Loading failed.
    Failed {
        page: Page,
        message: String,
    },
}

/// Draws views. The browser build renders DOM nodes; tests record calls.
pub trait PageRenderer {
    /// Replace the main content area.
    fn render(&self, view: &PageView);

    /// Refresh the cart badge and sidebar.
    fn cart_changed(&self, cart: &Cart);

    /// Show a transient notice.
    fn notice(&self, notice: &Notice);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bite_router::{MemoryLocation, Router};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn resolve(path: &str) -> Option<Page> {
        let location = Rc::new(MemoryLocation::at(path));
        let router = Router::new(location);
        let page = Rc::new(RefCell::new(None));
        for (pattern, build) in ROUTES {
            let page = page.clone();
            let build = *build;
            router.add_route(pattern, move |ctx| *page.borrow_mut() = build(ctx));
        }
        router.start();
        let resolved = page.borrow().clone();
        resolved
    }

    #[test]
    fn test_routes_resolve_to_pages() {
        assert_eq!(resolve("/"), Some(Page::Home));
        assert_eq!(resolve("/cart"), Some(Page::Cart));
        assert_eq!(
            resolve("/restaurant/42"),
            Some(Page::Restaurant { id: "42".into() })
        );
        assert_eq!(
            resolve("/order/ORD1700000000"),
            Some(Page::Order {
                id: "ORD1700000000".into()
            })
        );
    }

    #[test]
    fn test_path_matches_route() {
        for page in [
            Page::Home,
            Page::Restaurants,
            Page::Restaurant { id: "7".into() },
            Page::Cart,
            Page::Orders,
            Page::Order { id: "9".into() },
            Page::Login,
            Page::Register,
        ] {
            assert_eq!(resolve(&page.path()), Some(page));
        }
    }

    #[test]
    fn test_needs_data() {
        assert!(Page::Home.needs_data());
        assert!(!Page::Cart.needs_data());
        assert!(!Page::Login.needs_data());
    }

    #[test]
    fn test_view_serializes_with_tags() {
        let view = PageView::Loading(Page::Restaurant { id: "42".into() });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"view": "loading", "page": "restaurant", "id": "42"})
        );
    }
}

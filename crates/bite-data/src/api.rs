//! Typed bindings for the backend's `/api` endpoints.

use crate::{FetchClient, FetchError};
use bite_commerce::cart::LineItem;
use bite_commerce::ids::{CartItemId, CategoryId, ItemId, OrderId, RestaurantId, UserId};
use bite_commerce::money::Money;
use serde::{Deserialize, Serialize};

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl User {
    /// Name to greet the user with: the username, else the part of the
    /// email before `@`.
    pub fn display_name(&self) -> &str {
        match &self.username {
            Some(name) if !name.is_empty() => name.as_str(),
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// `{"message": ..., "user": ...}` from login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Bare `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub delivery_time: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Category name, sent by the fixture-backed endpoints.
    #[serde(default)]
    pub category: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "bite_commerce::money::decimal")]
    pub price: Money,
    #[serde(default)]
    pub is_veg: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// `veg` or `non-veg`, whichever field the backend filled in.
    pub fn kind_tag(&self) -> String {
        match (&self.kind, self.is_veg) {
            (Some(kind), _) => kind.clone(),
            (None, Some(false)) => "non-veg".to_string(),
            (None, _) => "veg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon_class: Option<String>,
}

/// Session cart held by the backend for signed-in users.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerCart {
    #[serde(default)]
    pub items: Vec<ServerCartItem>,
    #[serde(default, with = "bite_commerce::money::decimal")]
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCartItem {
    pub id: ItemId,
    #[serde(default)]
    pub cart_item_id: Option<CartItemId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "bite_commerce::money::decimal")]
    pub price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

/// Body of `POST /cart/add`.
#[derive(Debug, Clone, Serialize)]
pub struct CartAddRequest {
    pub id: ItemId,
    pub name: String,
    #[serde(with = "bite_commerce::money::decimal")]
    pub price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
}

impl From<&MenuItem> for CartAddRequest {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            restaurant_id: Some(item.restaurant_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CartUpdateRequest<'a> {
    id: &'a ItemId,
    quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    pub message: String,
    #[serde(default)]
    pub cart: ServerCart,
}

/// Body of `POST /checkout`: the local cart plus where to deliver it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub items: Vec<LineItem>,
    #[serde(with = "bite_commerce::money::decimal")]
    pub total: Money,
    pub delivery_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    OnTheWay,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OnTheWay => "On the way",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown => "Unknown",
        }
    }

    /// Whether the order can still change.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Unknown
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "bite_commerce::money::decimal")]
    pub price: Money,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default, alias = "total_amount", with = "bite_commerce::money::decimal")]
    pub total: Money,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub order: Order,
}

/// The backend API.
///
/// Each call is one request; nothing is retried.
#[derive(Clone)]
pub struct BiteApi {
    client: FetchClient,
}

impl BiteApi {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    // Auth & user

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, FetchError> {
        self.client
            .post("/register")
            .json(registration)?
            .fetch_json()
            .await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, FetchError> {
        self.client
            .post("/login")
            .json(credentials)?
            .fetch_json()
            .await
    }

    pub async fn logout(&self) -> Result<MessageResponse, FetchError> {
        self.client.post("/logout").fetch_json().await
    }

    /// The signed-in user, or `None` when the session is anonymous.
    pub async fn current_user(&self) -> Result<Option<User>, FetchError> {
        match self.client.get("/user").fetch_json().await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // Restaurants & categories

    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, FetchError> {
        self.client.get("/restaurants").fetch_json().await
    }

    pub async fn restaurant(&self, id: &RestaurantId) -> Result<Restaurant, FetchError> {
        self.client
            .get(format!("/restaurants/{}", id))
            .fetch_json()
            .await
    }

    pub async fn menu(&self, id: &RestaurantId) -> Result<Vec<MenuItem>, FetchError> {
        self.client
            .get(format!("/restaurants/{}/menu", id))
            .fetch_json()
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        self.client.get("/categories").fetch_json().await
    }

    // Server-side cart

    pub async fn cart(&self) -> Result<ServerCart, FetchError> {
        self.client.get("/cart").fetch_json().await
    }

    pub async fn add_to_cart(&self, item: &CartAddRequest) -> Result<CartResponse, FetchError> {
        self.client.post("/cart/add").json(item)?.fetch_json().await
    }

    pub async fn update_cart_item(
        &self,
        id: &ItemId,
        quantity: i64,
    ) -> Result<CartResponse, FetchError> {
        self.client
            .put("/cart/update")
            .json(&CartUpdateRequest { id, quantity })?
            .fetch_json()
            .await
    }

    pub async fn remove_cart_item(&self, id: &ItemId) -> Result<CartResponse, FetchError> {
        self.client
            .delete(format!("/cart/remove/{}", id))
            .fetch_json()
            .await
    }

    // Orders

    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, FetchError> {
        self.client.post("/checkout").json(request)?.fetch_json().await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, FetchError> {
        self.client.get("/orders").fetch_json().await
    }

    pub async fn order(&self, id: &OrderId) -> Result<Order, FetchError> {
        self.client
            .get(format!("/orders/{}", id))
            .fetch_json()
            .await
    }
}

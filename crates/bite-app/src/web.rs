//! Browser entry point.
//!
//! JavaScript constructs a [`Storefront`] with three callbacks and gets
//! every view, cart change and notice as a plain JS object.

use crate::app::{App, BrowserSpawner, Platform};
use crate::config::{AppConfig, ConfigFormat};
use crate::logging;
use crate::pages::{PageRenderer, PageView};
use anyhow::{Context, Result};
use bite_cache::LocalStore;
use bite_commerce::cart::Cart;
use bite_commerce::ids::ItemId;
use bite_commerce::money::Money;
use bite_commerce::notice::Notice;
use bite_data::BrowserTransport;
use bite_router::{HashChangeListener, HashLocation};
use js_sys::{Function, Promise};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

struct JsRenderer {
    render: Function,
    cart_changed: Function,
    notice: Function,
}

impl JsRenderer {
    fn call<T: Serialize + ?Sized>(&self, callback: &Function, name: &str, value: &T) {
        let result = to_js(value).and_then(|arg| callback.call1(&JsValue::NULL, &arg));
        if let Err(e) = result {
            tracing::warn!(callback = name, error = ?e, "Renderer callback failed");
        }
    }
}

impl PageRenderer for JsRenderer {
    fn render(&self, view: &PageView) {
        self.call(&self.render, "render", view);
    }

    fn cart_changed(&self, cart: &Cart) {
        self.call(&self.cart_changed, "cart_changed", cart);
    }

    fn notice(&self, notice: &Notice) {
        self.call(&self.notice, "notice", notice);
    }
}

/// Handle kept alive by the page for as long as the storefront runs.
#[wasm_bindgen]
pub struct Storefront {
    app: Rc<App<LocalStore>>,
    _listener: HashChangeListener,
}

#[wasm_bindgen]
impl Storefront {
    /// `config` is a JSON document; pass `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: Option<String>,
        render: Function,
        cart_changed: Function,
        notice: Function,
    ) -> Result<Storefront, JsValue> {
        let renderer = JsRenderer {
            render,
            cart_changed,
            notice,
        };
        boot(config.as_deref(), renderer).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
    }

    pub fn navigate(&self, path: &str) {
        self.app.navigate(path);
    }

    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(&self, id: &str, name: &str, price: f64, kind: &str) -> Result<(), JsValue> {
        let price = Money::from_decimal(price);
        self.app
            .add_item(ItemId::new(id), name, price, kind)
            .map(|_| ())
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = setQuantity)]
    pub fn set_quantity(&self, id: &str, quantity: i32) -> bool {
        self.app
            .set_quantity(&ItemId::new(id), i64::from(quantity))
            .persisted
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&self, id: &str) -> bool {
        self.app.remove_from_cart(&ItemId::new(id)).persisted
    }

    /// Current cart lines as an array of plain objects.
    #[wasm_bindgen(js_name = cartItems)]
    pub fn cart_items(&self) -> Result<JsValue, JsValue> {
        to_js(&self.app.cart().items())
    }

    /// Resolves to the placed order, or `null` when the input was rejected.
    pub fn checkout(&self, delivery_address: String) -> Promise {
        let app = Rc::clone(&self.app);
        future_to_promise(async move {
            match app.checkout(&delivery_address).await.map_err(js_error)? {
                Some(order) => to_js(&order),
                None => Ok(JsValue::NULL),
            }
        })
    }

    pub fn login(&self, email: String, password: String) -> Promise {
        let app = Rc::clone(&self.app);
        future_to_promise(async move {
            match app.login(&email, &password).await.map_err(js_error)? {
                Some(user) => to_js(&user),
                None => Ok(JsValue::NULL),
            }
        })
    }

    pub fn logout(&self) -> Promise {
        let app = Rc::clone(&self.app);
        future_to_promise(async move {
            app.logout().await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }
}

fn boot(config: Option<&str>, renderer: JsRenderer) -> Result<Storefront> {
    console_error_panic_hook::set_once();

    let config = match config {
        Some(text) if !text.trim().is_empty() => {
            AppConfig::parse(text, ConfigFormat::Json).context("Failed to parse storefront config")?
        }
        _ => AppConfig::default(),
    };
    logging::init(&config.logging).context("Failed to install logging")?;

    let location = HashLocation::new().context("Failed to access window.location")?;
    let store = LocalStore::open().context("Failed to open localStorage")?;

    let app = App::new(
        config,
        Platform {
            location: Rc::new(location),
            store,
            transport: Rc::new(BrowserTransport::new()),
            renderer: Rc::new(renderer),
            spawner: Rc::new(BrowserSpawner),
        },
    );

    let weak = Rc::downgrade(&app);
    let listener = HashChangeListener::new(move || {
        if let Some(app) = weak.upgrade() {
            app.router().handle_location_change();
        }
    })
    .context("Failed to listen for hashchange")?;

    app.start();
    Ok(Storefront {
        app,
        _listener: listener,
    })
}

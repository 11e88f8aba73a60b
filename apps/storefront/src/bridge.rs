//! # IPC Bridge
//!
//! Connects the frontend to the commands over newline-delimited JSON.
//!
//! ## Wire Format
//! ```text
//! request   {"id": 1, "cmd": "login", "view": "login", "args": {"email": "..", "password": ".."}}
//! success   {"id": 1, "ok": {...}}
//! failure   {"id": 1, "error": {"code": "VALIDATION_ERROR", "message": "..", "fields": [..]}}
//! ```
//!
//! `id` is echoed verbatim and may be any JSON value. `view` names the
//! frontend view the request came from (default `"main"`); `close_view`
//! cancels everything still pending for that view.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin ──► read line ──► decode Request                                │
//! │                              │                                          │
//! │              ┌───────────────┴───────────────┐                          │
//! │              ▼                               ▼                          │
//! │      immediate command               deferred command                   │
//! │      (cart, checkout steps,          (login, register,                  │
//! │       account, config)                complete_review)                  │
//! │              │                               │                          │
//! │       handled inline                 spawned with the view's            │
//! │              │                       cancellation token                 │
//! │              │                               │                          │
//! │              └──────────► writer task ◄──────┘                          │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                       one line on stdout                                │
//! │                                                                         │
//! │  EOF: wait for deferred commands, then cancel every view               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Responses to deferred commands may arrive out of order; match them by `id`.

use std::io;

use agri_core::checkout::{AddressChoice, ReviewInput};
use agri_core::order::OrderFilter;
use agri_core::{AddressInput, LoginForm, PaymentSelection, ProfileSettings, RegistrationForm};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// View used when a request names none.
pub const DEFAULT_VIEW: &str = "main";

// =============================================================================
// Wire Types
// =============================================================================

/// One request line.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub cmd: String,
    #[serde(default = "default_view")]
    pub view: String,
    #[serde(default = "empty_args")]
    pub args: Value,
}

fn default_view() -> String {
    DEFAULT_VIEW.to_string()
}

fn empty_args() -> Value {
    Value::Object(serde_json::Map::new())
}

/// One response line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of a command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok(Value),
    Error(ApiError),
}

impl Response {
    fn new(id: Option<Value>, result: ApiResult<Value>) -> Self {
        let outcome = match result {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::Error(err),
        };
        Response { id, outcome }
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductArgs {
    product_id: String,
    #[serde(default)]
    quantity: Option<i64>,
}

#[derive(Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Deserialize)]
struct QuantityArgs {
    id: String,
    quantity: i64,
}

#[derive(Deserialize)]
struct CodeArgs {
    code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderArgs {
    order_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddAddressArgs {
    address: AddressInput,
    #[serde(default)]
    make_default: bool,
}

fn parse<T: DeserializeOwned>(args: Value) -> ApiResult<T> {
    serde_json::from_value(args)
        .map_err(|e| ApiError::invalid_request(format!("Invalid arguments: {}", e)))
}

fn reply<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Commands that wait on a simulated delay.
pub const DEFERRED_COMMANDS: [&str; 3] = ["login", "register", "complete_review"];

/// Checks if `cmd` runs off the read loop.
pub fn is_deferred(cmd: &str) -> bool {
    DEFERRED_COMMANDS.contains(&cmd)
}

/// Handles an immediate command.
pub fn handle(state: &AppState, request: Request) -> ApiResult<Value> {
    let Request { cmd, view, args, .. } = request;
    let config = state.config.as_ref();
    let catalog = state.catalog.as_ref();

    match cmd.as_str() {
        // Cart
        "get_cart" => reply(commands::get_cart(&state.cart, config)),
        "add_to_cart" => {
            let a: ProductArgs = parse(args)?;
            reply(commands::add_to_cart(
                catalog,
                &state.cart,
                config,
                &a.product_id,
                a.quantity,
            )?)
        }
        "update_cart_item" => {
            let a: QuantityArgs = parse(args)?;
            reply(commands::update_cart_item(&state.cart, config, &a.id, a.quantity))
        }
        "remove_from_cart" => {
            let a: IdArgs = parse(args)?;
            reply(commands::remove_from_cart(&state.cart, config, &a.id))
        }
        "clear_cart" => reply(commands::clear_cart(&state.cart, config)),
        "apply_promo_code" => {
            let a: CodeArgs = parse(args)?;
            reply(commands::apply_promo_code(&state.cart, config, &a.code)?)
        }
        "remove_promo_code" => reply(commands::remove_promo_code(&state.cart, config)),

        // Session
        "get_session" => reply(commands::get_session(&state.auth)),
        "logout" => reply(commands::logout(&state.auth)),
        "get_profile" => reply(commands::get_profile(&state.auth)?),
        "update_profile" => {
            let settings: ProfileSettings = parse(args)?;
            reply(commands::update_profile(&state.auth, settings)?)
        }

        // Checkout
        "begin_checkout" => reply(commands::begin_checkout(
            &state.cart,
            &state.checkout,
            &state.account,
            config,
        )?),
        "get_checkout" => reply(commands::get_checkout(
            &state.cart,
            &state.checkout,
            &state.account,
            config,
        )?),
        "complete_address" => {
            let choice: AddressChoice = parse(args)?;
            reply(commands::complete_address(
                &state.cart,
                &state.checkout,
                &state.account,
                config,
                choice,
            )?)
        }
        "complete_payment" => {
            let payment: PaymentSelection = parse(args)?;
            reply(commands::complete_payment(
                &state.cart,
                &state.checkout,
                &state.account,
                config,
                payment,
            )?)
        }
        "checkout_back" => reply(commands::checkout_back(
            &state.cart,
            &state.checkout,
            &state.account,
            config,
        )?),

        // Account
        "list_orders" => {
            let filter: OrderFilter = parse(args)?;
            reply(commands::list_orders(&state.auth, &state.account, filter)?)
        }
        "track_order" => {
            let a: OrderArgs = parse(args)?;
            reply(commands::track_order(&state.auth, &state.account, &a.order_id)?)
        }
        "list_addresses" => reply(commands::list_addresses(&state.auth, &state.account)?),
        "add_address" => {
            let a: AddAddressArgs = parse(args)?;
            reply(commands::add_address(
                &state.auth,
                &state.account,
                a.address,
                a.make_default,
            )?)
        }
        "set_default_address" => {
            let a: IdArgs = parse(args)?;
            reply(commands::set_default_address(&state.auth, &state.account, &a.id)?)
        }
        "delete_address" => {
            let a: IdArgs = parse(args)?;
            reply(commands::delete_address(&state.auth, &state.account, &a.id)?)
        }
        "get_wishlist" => reply(commands::get_wishlist(&state.auth, &state.account, catalog)?),
        "toggle_wishlist" => {
            let a: ProductArgs = parse(args)?;
            reply(commands::toggle_wishlist(
                &state.auth,
                &state.account,
                catalog,
                &a.product_id,
            )?)
        }
        "move_to_cart" => {
            let a: ProductArgs = parse(args)?;
            reply(commands::move_to_cart(
                &state.auth,
                &state.account,
                catalog,
                &state.cart,
                config,
                &a.product_id,
            )?)
        }

        // Catalog and config
        "list_products" => reply(commands::list_products(catalog)),
        "get_config" => reply(commands::get_config(config)),

        // Views
        "close_view" => reply(state.views.close(&view)),

        other if is_deferred(other) => Err(ApiError::internal(format!(
            "{} must be dispatched as a deferred command",
            other
        ))),
        other => Err(ApiError::invalid_request(format!("Unknown command: {}", other))),
    }
}

/// Handles a deferred command under `scope`.
pub async fn handle_deferred(
    state: &AppState,
    request: Request,
    scope: CancellationToken,
) -> ApiResult<Value> {
    let Request { cmd, args, .. } = request;

    match cmd.as_str() {
        "login" => {
            let form: LoginForm = parse(args)?;
            reply(commands::login(&state.auth, &scope, form).await?)
        }
        "register" => {
            let form: RegistrationForm = parse(args)?;
            reply(commands::register(&state.auth, &scope, form).await?)
        }
        "complete_review" => {
            let review: ReviewInput = parse(args)?;
            reply(
                commands::complete_review(
                    &state.cart,
                    &state.checkout,
                    &state.account,
                    state.config.as_ref(),
                    &scope,
                    review,
                )
                .await?,
            )
        }
        other => Err(ApiError::invalid_request(format!("Unknown command: {}", other))),
    }
}

// =============================================================================
// Serve Loop
// =============================================================================

/// Serves requests from `reader` until EOF, writing responses to `writer`.
pub async fn serve<R, W>(state: AppState, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<Response>();
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut deferred = JoinSet::new();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Malformed request line");
                let err = ApiError::invalid_request(format!("Malformed request: {}", e));
                send(&tx, Response::new(None, Err(err)));
                continue;
            }
        };

        debug!(cmd = %request.cmd, view = %request.view, "Request received");
        let id = request.id.clone();

        if is_deferred(&request.cmd) {
            let scope = state.views.token(&request.view);
            let state = state.clone();
            let tx = tx.clone();
            deferred.spawn(async move {
                let result = handle_deferred(&state, request, scope).await;
                send(&tx, Response::new(id, result));
            });
        } else {
            let result = handle(&state, request);
            send(&tx, Response::new(id, result));
        }
    }

    info!(pending = deferred.len(), "Input closed, draining deferred commands");
    while let Some(joined) = deferred.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Deferred command task failed");
        }
    }
    state.views.shutdown();

    drop(tx);
    match writer_task.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
    }
}

fn send(tx: &mpsc::UnboundedSender<Response>, response: Response) {
    if tx.send(response).is_err() {
        warn!("Response writer is gone, dropping response");
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Response>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let line = match serde_json::to_string(&response) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                continue;
            }
        };
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

mod error;
use error::ServerError;

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::{FromRequest, State}, http::StatusCode, routing::post, Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use bankbook::{Account, AppConfig, Amount, JsonStore, Ledger, LedgerError, LedgerResult};

const CONFIG_VAR: &str = "BANKBOOK_CONFIG";

type SharedLedger = Arc<Mutex<Ledger<JsonStore>>>;
type Reply = Result<Json<AccountView>, ServerError>;

/// JSON body whose rejections are reported like any other `ServerError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
struct Form<T>(T);

/// What the forms get back: the record minus its pin.
#[derive(Debug, Serialize)]
struct AccountView {
    name: String,
    age: u32,
    email: String,
    accountno: String,
    balance: u64,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        AccountView {
            name: account.name,
            age: account.age,
            email: account.email,
            accountno: account.accountno.to_string(),
            balance: account.balance,
        }
    }
}

#[derive(Deserialize)]
struct CreateForm {
    name: String,
    age: u32,
    email: String,
    pin: String,
}

#[derive(Deserialize)]
struct CredentialsForm {
    accountno: String,
    pin: String,
}

#[derive(Deserialize)]
struct MovementForm {
    accountno: String,
    pin: String,
    amount: Amount,
}

#[derive(Deserialize)]
struct UpdateForm {
    accountno: String,
    pin: String,
    name: Option<String>,
    email: Option<String>,
    new_pin: Option<String>,
}

#[derive(Deserialize)]
struct DeleteForm {
    accountno: String,
    pin: String,
    #[serde(default)]
    confirmed: bool,
}

/// Mutations rewrite the whole store file with blocking I/O, so they run
/// on the blocking pool while holding the ledger lock.
async fn mutate<T, F>(ledger: SharedLedger, operation: F) -> Result<T, ServerError>
where
    F: FnOnce(&mut Ledger<JsonStore>) -> LedgerResult<T> + Send + 'static,
    T: Send + 'static,
{
    let mut guard = ledger.lock_owned().await;
    let result = tokio::task::spawn_blocking(move || operation(&mut *guard)).await?;
    Ok(result?)
}

async fn create_account(State(ledger): State<SharedLedger>, Form(form): Form<CreateForm>)
    -> Result<(StatusCode, Json<AccountView>), ServerError>
{
    let account = mutate(ledger, move |ledger| {
        ledger.create_account(&form.name, form.age, &form.email, &form.pin)
    }).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

async fn show_account(State(ledger): State<SharedLedger>, Form(form): Form<CredentialsForm>) -> Reply {
    let ledger = ledger.lock().await;
    let account = ledger.find_account(&form.accountno, &form.pin)
        .ok_or(LedgerError::AccountNotFound)?;
    Ok(Json(account.clone().into()))
}

async fn deposit(State(ledger): State<SharedLedger>, Form(form): Form<MovementForm>) -> Reply {
    let account = mutate(ledger, move |ledger| {
        ledger.deposit(&form.accountno, &form.pin, form.amount)
    }).await?;
    Ok(Json(account.into()))
}

async fn withdraw(State(ledger): State<SharedLedger>, Form(form): Form<MovementForm>) -> Reply {
    let account = mutate(ledger, move |ledger| {
        ledger.withdraw(&form.accountno, &form.pin, form.amount)
    }).await?;
    Ok(Json(account.into()))
}

async fn update_details(State(ledger): State<SharedLedger>, Form(form): Form<UpdateForm>) -> Reply {
    let account = mutate(ledger, move |ledger| {
        ledger.update_details(
            &form.accountno, &form.pin,
            form.name.as_deref(), form.email.as_deref(), form.new_pin.as_deref())
    }).await?;
    Ok(Json(account.into()))
}

async fn delete_account(State(ledger): State<SharedLedger>, Form(form): Form<DeleteForm>) -> Reply {
    let account = mutate(ledger, move |ledger| {
        ledger.delete_account(&form.accountno, &form.pin, form.confirmed)
    }).await?;
    Ok(Json(account.into()))
}

fn router(ledger: SharedLedger) -> Router {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/show", post(show_account))
        .route("/accounts/deposit", post(deposit))
        .route("/accounts/withdraw", post(withdraw))
        .route("/accounts/update", post(update_details))
        .route("/accounts/delete", post(delete_account))
        .with_state(ledger)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bankbook::logging::init();

    let config_path = std::env::var(CONFIG_VAR)
        .unwrap_or_else(|_| AppConfig::DEFAULT_LOCATION.to_owned());
    let config = AppConfig::read_or_default(&config_path)?;
    let ledger = config.open_ledger();
    info!("serving {} accounts from {}", ledger.accounts().len(), config.storage.path.display());

    let listener = tokio::net::TcpListener::bind(config.server.address).await
        .with_context(|| format!("failed to bind {}", config.server.address))?;
    info!("listening on {}", config.server.address);
    axum::serve(listener, router(Arc::new(Mutex::new(ledger)))).await?;

    Ok(())
}

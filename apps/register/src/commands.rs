//! # Register Commands
//!
//! Parses operator input and maps it onto the core API.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin line ──► Command::parse ──► Register::execute ──► Reply         │
//! │                                          │                              │
//! │                     ┌────────────────────┼────────────────────┐         │
//! │                     ▼                    ▼                    ▼         │
//! │                 AppContext         ReceiptPrinter        serde_json     │
//! │             (catalog, cart,       (print, test-print,    (export)      │
//! │              orders, settings)     auto after checkout)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Addressing
//! Products, cart lines and orders can be named by the 1-based number shown
//! in their listing, by full id, or by a unique id prefix (e.g. the short
//! order id printed on receipts).

use driwich_core::validation::{
    validate_currency, validate_price, validate_quantity, validate_shop_name, validate_tax_rate,
};
use driwich_core::{
    AppContext, AppSettings, NewProduct, Order, OrderDetails, OrderItem, OrderStatus,
    PrintOutcome, Product, ReceiptPrinter, ReceiptRequest, SettingsPatch,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::parse_printer_addr;
use crate::error::{ApiError, ErrorCode};

pub const HELP: &str = "\
Catalog:
  products                          list the menu
  add-product <price> <cat> <name>  add a product
  edit <product> <field> <value>    change name, price, category,
                                    description or image ('none' clears)
  toggle <product>                  switch availability
  delete <product>                  remove from the menu
  seed                              load a demo menu
Cart:
  tap <product>                     add one unit
  qty <line> <n>                    set quantity (0 removes)
  inc <line> | dec <line>           +1 / -1
  rm <line>                         remove a line
  cart                              show the cart
  clear                             empty the cart
  checkout [table]                  commit the cart as an order
Orders:
  orders                            list orders, newest first
  next <order>                      move to the next status
  cancel <order>                    cancel a new or processing order
  print <order>                     print a receipt
Settings:
  settings                          show settings
  set <shop|currency|tax|footer> <value>
  printer <ip:port|off>             configure the receipt printer
  test-print                        print a test receipt
Other:
  export                            dump all data as JSON
  help | quit";

// =============================================================================
// Command Parsing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Products,
    AddProduct {
        price: String,
        category: String,
        name: String,
    },
    Edit {
        product: String,
        field: String,
        value: String,
    },
    Toggle(String),
    Delete(String),
    Seed,
    Tap(String),
    Qty {
        line: String,
        quantity: i64,
    },
    Inc(String),
    Dec(String),
    Rm(String),
    Cart,
    Clear,
    Checkout {
        table: Option<String>,
    },
    Orders,
    Next(String),
    Cancel(String),
    Print(String),
    TestPrint,
    Settings,
    Set {
        field: String,
        value: String,
    },
    Printer(String),
    Export,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ApiError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let one = |usage: &str| -> Result<String, ApiError> {
            match args.as_slice() {
                [arg] => Ok(arg.to_string()),
                _ => Err(ApiError::invalid_input(format!("usage: {}", usage))),
            }
        };
        let none = |command: Command| -> Result<Command, ApiError> {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(ApiError::invalid_input(format!("{} takes no arguments", verb)))
            }
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "help" | "?" => none(Command::Help)?,
            "products" => none(Command::Products)?,
            "add-product" => match args.as_slice() {
                [price, category, name @ ..] if !name.is_empty() => Command::AddProduct {
                    price: price.to_string(),
                    category: category.to_string(),
                    name: name.join(" "),
                },
                _ => {
                    return Err(ApiError::invalid_input(
                        "usage: add-product <price> <category> <name>",
                    ))
                }
            },
            "edit" => match args.as_slice() {
                [product, field, value @ ..] if !value.is_empty() => Command::Edit {
                    product: product.to_string(),
                    field: field.to_ascii_lowercase(),
                    value: value.join(" "),
                },
                _ => return Err(ApiError::invalid_input("usage: edit <product> <field> <value>")),
            },
            "toggle" => Command::Toggle(one("toggle <product>")?),
            "delete" => Command::Delete(one("delete <product>")?),
            "seed" => none(Command::Seed)?,
            "tap" => Command::Tap(one("tap <product>")?),
            "qty" => match args.as_slice() {
                [line, quantity] => Command::Qty {
                    line: line.to_string(),
                    quantity: quantity.parse().map_err(|_| {
                        ApiError::invalid_input(format!("not a whole number: {}", quantity))
                    })?,
                },
                _ => return Err(ApiError::invalid_input("usage: qty <line> <n>")),
            },
            "inc" => Command::Inc(one("inc <line>")?),
            "dec" => Command::Dec(one("dec <line>")?),
            "rm" => Command::Rm(one("rm <line>")?),
            "cart" => none(Command::Cart)?,
            "clear" => none(Command::Clear)?,
            "checkout" => Command::Checkout {
                table: (!args.is_empty()).then(|| args.join(" ")),
            },
            "orders" => none(Command::Orders)?,
            "next" => Command::Next(one("next <order>")?),
            "cancel" => Command::Cancel(one("cancel <order>")?),
            "print" => Command::Print(one("print <order>")?),
            "test-print" => none(Command::TestPrint)?,
            "settings" => none(Command::Settings)?,
            "set" => match args.as_slice() {
                [field, value @ ..] if !value.is_empty() => Command::Set {
                    field: field.to_ascii_lowercase(),
                    value: value.join(" "),
                },
                _ => return Err(ApiError::invalid_input("usage: set <field> <value>")),
            },
            "printer" => Command::Printer(one("printer <ip:port|off>")?),
            "export" => none(Command::Export)?,
            "quit" | "exit" => none(Command::Quit)?,
            other => {
                return Err(ApiError::invalid_input(format!(
                    "unknown command '{}', try 'help'",
                    other
                )))
            }
        };

        Ok(Some(command))
    }
}

// =============================================================================
// Register
// =============================================================================

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// JSON dump produced by `export`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    settings: &'a AppSettings,
    products: &'a [Product],
    cart: &'a [OrderItem],
    orders: &'a [Order],
}

/// The register front end: one context, one printer.
pub struct Register<P> {
    ctx: AppContext,
    printer: P,
}

impl<P: ReceiptPrinter> Register<P> {
    pub fn new(ctx: AppContext, printer: P) -> Self {
        Register { ctx, printer }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub async fn execute(&mut self, command: Command) -> Result<Reply, ApiError> {
        debug!(?command, "executing");
        let text = match command {
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),

            Command::Products => self.list_products(),
            Command::AddProduct {
                price,
                category,
                name,
            } => {
                let draft = NewProduct::new(name, validate_price(&price)?, category);
                draft.validate()?;
                let product = self.ctx.add_product(draft);
                format!("Added {} ({})", product.name, product.id)
            }
            Command::Edit {
                product,
                field,
                value,
            } => {
                let current = self.find_product(&product)?;
                let id = current.id.clone();
                let mut draft = current.to_draft();
                edit_draft(&mut draft, &field, &value)?;
                draft.validate()?;

                let edited = draft.into_product(id);
                let summary = format!(
                    "{} ({}, {})",
                    edited.name,
                    edited.category,
                    self.money(edited.price)
                );
                let _ = self.ctx.update_product(edited);
                format!("Updated {}", summary)
            }
            Command::Toggle(key) => {
                let mut product = self.find_product(&key)?.clone();
                product.is_available = !product.is_available;
                let state = if product.is_available { "available" } else { "unavailable" };
                let name = product.name.clone();
                let _ = self.ctx.update_product(product);
                format!("{} is now {}", name, state)
            }
            Command::Delete(key) => {
                let product = self.find_product(&key)?.clone();
                let _ = self.ctx.remove_product(&product.id);
                format!("Removed {} from the menu", product.name)
            }
            Command::Seed => {
                let added = seed_menu(&mut self.ctx);
                format!("Added {} demo products", added)
            }

            Command::Tap(key) => {
                let id = self.find_product(&key)?.id.clone();
                let _ = self.ctx.tap_product(&id)?;
                self.describe_cart()
            }
            Command::Qty { line, quantity } => {
                let id = self.find_cart_line(&line)?;
                let quantity = if quantity == 0 { 0 } else { validate_quantity(quantity)? };
                let _ = self.ctx.cart_mut().set_quantity(&id, quantity)?;
                self.describe_cart()
            }
            Command::Inc(line) => {
                let id = self.find_cart_line(&line)?;
                let _ = self.ctx.cart_mut().increment(&id)?;
                self.describe_cart()
            }
            Command::Dec(line) => {
                let id = self.find_cart_line(&line)?;
                if !self.ctx.cart_mut().decrement(&id).is_applied() {
                    return Err(ApiError::new(
                        ErrorCode::CartError,
                        "Quantity is already 1; use 'rm' to remove the line",
                    ));
                }
                self.describe_cart()
            }
            Command::Rm(line) => {
                let id = self.find_cart_line(&line)?;
                let _ = self.ctx.cart_mut().remove_item(&id);
                self.describe_cart()
            }
            Command::Cart => self.describe_cart(),
            Command::Clear => {
                self.ctx.cart_mut().clear();
                "Cart cleared".to_string()
            }
            Command::Checkout { table } => self.checkout(table).await?,

            Command::Orders => self.list_orders(),
            Command::Next(key) => {
                let order = self.find_order(&key)?;
                let current = order.status();
                let next = current.next_step().ok_or_else(|| {
                    ApiError::new(
                        ErrorCode::BusinessLogic,
                        format!("Order #{} is already {}", order.short_id(), current.label()),
                    )
                })?;
                let id = order.id().to_string();
                let order = self.ctx.advance_order(&id, next)?;
                format!("Order #{} is now {}", order.short_id(), order.status().label())
            }
            Command::Cancel(key) => {
                let id = self.find_order(&key)?.id().to_string();
                let order = self.ctx.advance_order(&id, OrderStatus::Cancelled)?;
                format!("Order #{} cancelled", order.short_id())
            }
            Command::Print(key) => {
                let id = self.find_order(&key)?.id().to_string();
                let request = self.ctx.receipt_for(&id)?;
                describe_print(&self.print(&request).await)
            }
            Command::TestPrint => {
                let request = self.ctx.test_receipt();
                describe_print(&self.print(&request).await)
            }

            Command::Settings => describe_settings(self.ctx.settings()),
            Command::Set { field, value } => {
                let patch = settings_patch(&field, &value)?;
                describe_settings(self.ctx.try_update_settings(patch)?)
            }
            Command::Printer(arg) => {
                let printer = if arg.eq_ignore_ascii_case("off") {
                    let mut printer = self.ctx.settings().printer.clone();
                    printer.is_enabled = false;
                    printer
                } else {
                    parse_printer_addr(&arg)?
                };
                let settings = self
                    .ctx
                    .try_update_settings(SettingsPatch::default().printer(printer))?;
                if settings.printer.is_enabled {
                    format!("Printer set to {}", settings.printer.address())
                } else {
                    "Printer disabled".to_string()
                }
            }
            Command::Export => {
                let snapshot = Snapshot {
                    settings: self.ctx.settings(),
                    products: self.ctx.catalog().list(),
                    cart: self.ctx.cart().items(),
                    orders: self.ctx.orders().list(),
                };
                serde_json::to_string_pretty(&snapshot)?
            }
        };

        Ok(Reply::Text(text))
    }

    /// Commits the cart, then prints if the printer is on.
    ///
    /// A print failure is reported after the confirmation; the order stays.
    async fn checkout(&mut self, table: Option<String>) -> Result<String, ApiError> {
        let details = table.map(OrderDetails::for_table).unwrap_or_default();
        let order = self.ctx.checkout(details)?;
        let currency = self.ctx.settings().currency.clone();

        let mut text = format!(
            "Order #{} created: {} ({} items)",
            order.short_id(),
            order.total().format_with(&currency),
            order.item_count()
        );

        if self.ctx.settings().printer.is_enabled {
            let request = ReceiptRequest::new(order, self.ctx.settings());
            text.push('\n');
            text.push_str(&describe_print(&self.print(&request).await));
        }
        Ok(text)
    }

    async fn print(&self, request: &ReceiptRequest) -> PrintOutcome {
        let outcome = self.printer.print(request).await;
        if outcome.success {
            info!(order_id = %request.order.id(), "receipt printed");
        } else {
            warn!(order_id = %request.order.id(), message = %outcome.message, "receipt not printed");
        }
        outcome
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    fn find_product(&self, key: &str) -> Result<&Product, ApiError> {
        let products = self.ctx.catalog().list();
        resolve(products, key, |p| p.id.as_str()).ok_or_else(|| ApiError::not_found("Product", key))
    }

    fn find_cart_line(&self, key: &str) -> Result<String, ApiError> {
        let items = self.ctx.cart().items();
        resolve(items, key, |item| item.product_id.as_str())
            .map(|item| item.product_id.clone())
            .ok_or_else(|| ApiError::not_found("Cart line", key))
    }

    fn find_order(&self, key: &str) -> Result<&Order, ApiError> {
        let orders = self.ctx.orders().list();
        resolve(orders, key, Order::id).ok_or_else(|| ApiError::not_found("Order", key))
    }

    // =========================================================================
    // Views
    // =========================================================================

    fn money(&self, amount: driwich_core::Money) -> String {
        amount.format_with(&self.ctx.settings().currency)
    }

    fn list_products(&self) -> String {
        let catalog = self.ctx.catalog();
        if catalog.is_empty() {
            return "No products yet; try 'seed' or 'add-product'".to_string();
        }

        let mut out = Vec::new();
        for category in catalog.categories() {
            out.push(format!("[{}]", category));
            for (n, product) in catalog.list().iter().enumerate() {
                if product.category != category {
                    continue;
                }
                out.push(format!(
                    "  {:>2}. {:<24} {:>9}{}",
                    n + 1,
                    product.name,
                    self.money(product.price),
                    if product.is_available { "" } else { "  (unavailable)" }
                ));
            }
        }
        out.join("\n")
    }

    fn describe_cart(&self) -> String {
        let cart = self.ctx.cart();
        if cart.is_empty() {
            return "Cart is empty".to_string();
        }

        let mut out: Vec<String> = cart
            .items()
            .iter()
            .enumerate()
            .map(|(n, item)| {
                format!(
                    "  {:>2}. {} x {} @ {} = {}",
                    n + 1,
                    item.quantity,
                    item.product_name,
                    self.money(item.unit_price),
                    self.money(item.line_total())
                )
            })
            .collect();
        out.push(format!(
            "Subtotal: {} ({} items)",
            self.money(cart.subtotal()),
            cart.total_quantity()
        ));
        out.join("\n")
    }

    fn list_orders(&self) -> String {
        let orders = self.ctx.orders();
        if orders.is_empty() {
            return "No orders yet".to_string();
        }

        orders
            .list()
            .iter()
            .enumerate()
            .map(|(n, order)| {
                let table = order
                    .table_number()
                    .map(|t| format!("  table {}", t))
                    .unwrap_or_default();
                format!(
                    "  {:>2}. #{}  {}  {:>9}  {:<10}{}",
                    n + 1,
                    order.short_id(),
                    order.created_at().format("%H:%M"),
                    self.money(order.total()),
                    order.status().label(),
                    table
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Finds `key` as a 1-based position, an exact id, or a unique id prefix.
fn resolve<'a, T>(items: &'a [T], key: &str, id: impl Fn(&T) -> &str) -> Option<&'a T> {
    if let Ok(n) = key.parse::<usize>() {
        if (1..=items.len()).contains(&n) {
            return Some(&items[n - 1]);
        }
    }
    if let Some(item) = items.iter().find(|item| id(item) == key) {
        return Some(item);
    }

    let mut matches = items.iter().filter(|item| id(item).starts_with(key));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Some(item),
        _ => None,
    }
}

fn settings_patch(field: &str, value: &str) -> Result<SettingsPatch, ApiError> {
    let value = value.trim();
    let patch = match field {
        "shop" | "shop-name" | "name" => {
            validate_shop_name(value)?;
            SettingsPatch::default().shop_name(value)
        }
        "currency" => {
            validate_currency(value)?;
            SettingsPatch::default().currency(value.to_uppercase())
        }
        "tax" | "tax-rate" => SettingsPatch::default().tax_rate(validate_tax_rate(value)?),
        "footer" => {
            let footer = (!value.eq_ignore_ascii_case("none")).then(|| value.to_string());
            SettingsPatch::default().receipt_footer(footer)
        }
        other => {
            return Err(ApiError::invalid_input(format!(
                "unknown setting '{}' (shop, currency, tax, footer)",
                other
            )))
        }
    };
    Ok(patch)
}

/// Applies one `edit` field to a product draft. Validation of the whole
/// draft happens afterwards.
fn edit_draft(draft: &mut NewProduct, field: &str, value: &str) -> Result<(), ApiError> {
    let value = value.trim();
    let optional = || (!value.eq_ignore_ascii_case("none")).then(|| value.to_string());
    match field {
        "name" => draft.name = value.to_string(),
        "price" => draft.price = validate_price(value)?,
        "category" | "cat" => draft.category = value.to_string(),
        "description" | "desc" => draft.description = optional(),
        "image" => draft.image = optional(),
        other => {
            return Err(ApiError::invalid_input(format!(
                "unknown product field '{}' (name, price, category, description, image)",
                other
            )))
        }
    }
    Ok(())
}

fn describe_print(outcome: &PrintOutcome) -> String {
    if outcome.success {
        outcome.message.clone()
    } else {
        format!("Notice: receipt not printed ({})", outcome.message)
    }
}

fn describe_settings(settings: &AppSettings) -> String {
    let printer = &settings.printer;
    format!(
        "Shop:     {}\nCurrency: {}\nTax rate: {}%\nFooter:   {}\nPrinter:  {} ({})",
        settings.shop_name,
        settings.currency,
        settings.tax_rate.percentage(),
        settings.receipt_footer.as_deref().unwrap_or("(none)"),
        printer.address(),
        if printer.is_enabled { "enabled" } else { "disabled" }
    )
}

/// Loads a small demo menu. Returns how many products were added.
pub fn seed_menu(ctx: &mut AppContext) -> usize {
    use driwich_core::Money;

    let menu = [
        ("Falafel Wrap", 500, "Wraps", Some("Falafel, hummus, pickles")),
        ("Chicken Shawarma", 650, "Wraps", None),
        ("Hummus Plate", 400, "Sides", Some("With warm pita")),
        ("Fries", 250, "Sides", None),
        ("Mint Tea", 350, "Drinks", None),
        ("Ayran", 200, "Drinks", None),
    ];

    for (name, cents, category, description) in menu {
        let mut draft = NewProduct::new(name, Money::from_cents(cents), category);
        if let Some(description) = description {
            draft = draft.with_description(description);
        }
        ctx.add_product(draft);
    }
    menu.len()
}

// =============================================================================
// Unit Tests
// =============================================================================

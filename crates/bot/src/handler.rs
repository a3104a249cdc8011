use chrono::Local;
use gastobot_core::{parse_expense, ExpenseRecord, ParseError, PaymentMethodRegistry};
use gastobot_storage::{insert_expense, recent_expenses, DbPool};

const RECENT_LIMIT: i64 = 5;

/// Everything a handler needs: the store and the immutable registry.
/// Both are fixed at startup and shared by every incoming message.
pub struct BotContext {
    pub db: DbPool,
    pub registry: PaymentMethodRegistry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub html: bool,
}

impl Reply {
    fn plain(text: String) -> Self {
        Reply { text, html: false }
    }

    fn html(text: String) -> Self {
        Reply { text, html: true }
    }
}

/// Routes one incoming chat message to a reply.
///
/// `/start` and `/help` are static informational replies; anything else is
/// treated as an expense line. A parse rejection ("could not understand") and
/// a storage failure ("could not save") produce different messages and are
/// never conflated.
pub async fn handle_message(ctx: &BotContext, text: &str, sender: Option<&str>) -> Reply {
    let trimmed = text.trim();
    match trimmed.split_whitespace().next() {
        Some("/start") => Reply::html(welcome_text(&ctx.registry, sender)),
        Some("/help") => Reply::html(help_text(&ctx.registry)),
        Some("/recientes") => recent_reply(ctx).await,
        _ => record_expense(ctx, trimmed).await,
    }
}

async fn record_expense(ctx: &BotContext, line: &str) -> Reply {
    let today = Local::now().date_naive();

    let record = match parse_expense(line, &ctx.registry, today) {
        Ok(record) => record,
        Err(reason) => {
            tracing::info!("rejected input: {reason}");
            return Reply::html(rejection_text(&reason, &ctx.registry));
        }
    };

    match insert_expense(&ctx.db, &record).await {
        Ok(id) => {
            tracing::info!(id, "expense stored");
            Reply::plain(confirmation_text(&record))
        }
        Err(e) => {
            tracing::error!("failed to store expense: {e}");
            Reply::plain(
                "❌ Ocurrió un error al guardar el gasto en la base de datos. \
                 Por favor, inténtalo de nuevo."
                    .to_string(),
            )
        }
    }
}

async fn recent_reply(ctx: &BotContext) -> Reply {
    match recent_expenses(&ctx.db, RECENT_LIMIT).await {
        Ok(expenses) if expenses.is_empty() => {
            Reply::plain("Todavía no hay gastos registrados.".to_string())
        }
        Ok(expenses) => {
            let mut text = String::from("🧾 Últimos gastos:\n");
            for e in expenses {
                text.push_str(&format!(
                    "{} — {} ({}, {})\n",
                    e.amount, e.description, e.payment_method, e.date
                ));
            }
            Reply::plain(text.trim_end().to_string())
        }
        Err(e) => {
            tracing::error!("failed to list expenses: {e}");
            Reply::plain(
                "❌ Ocurrió un error al leer los gastos. Por favor, inténtalo de nuevo."
                    .to_string(),
            )
        }
    }
}

fn confirmation_text(record: &ExpenseRecord) -> String {
    format!(
        "✅ ¡Gasto registrado exitosamente! ✅\n\
         Monto: {}\n\
         Descripción: {}\n\
         Medio de Pago: {}\n\
         Fecha: {}",
        record.amount, record.description, record.payment_method, record.date
    )
}

fn rejection_text(reason: &ParseError, registry: &PaymentMethodRegistry) -> String {
    let hint = match reason {
        ParseError::MalformedInput(n) => format!(
            "Esperaba 3 o 4 campos separados por comas, pero recibí {n}."
        ),
        ParseError::InvalidAmount(raw) => {
            format!("El monto '{raw}' no es un número válido.")
        }
        ParseError::UnknownPaymentMethod(raw) => format!(
            "Medio de pago '{raw}' no reconocido. Los válidos son: {}.",
            registry.listing()
        ),
        ParseError::InvalidDateFormat(raw) => {
            format!("La fecha '{raw}' no es válida. Use DD/MM/AAAA.")
        }
    };

    format!(
        "❌ No pude entender tu mensaje. {hint}\n\
         Formato: <b>monto,descripcion,medio_pago,fecha(opcional)</b>\n\
         Ejemplo: <code>150.75,Cena con amigos,TC BBVA</code>"
    )
}

fn welcome_text(registry: &PaymentMethodRegistry, sender: Option<&str>) -> String {
    format!(
        "¡Hola, {}! 👋\n\
         Soy tu asistente personal de gastos. Puedes registrar un gasto \
         enviándome un mensaje en formato CSV:\n\n\
         <b>monto,descripcion,medio_pago,fecha(opcional)</b>\n\n\
         Ejemplo: <code>150.75,Cena con amigos,TC BBVA</code>\n\
         Ejemplo con fecha: <code>50,Café,Efectivo,12/07/2025</code>\n\n\
         Medios de pago válidos: {}\n\n\
         ¡Estoy listo para ayudarte a llevar un control de tus finanzas!",
        sender.unwrap_or("amigo"),
        registry.listing()
    )
}

fn help_text(registry: &PaymentMethodRegistry) -> String {
    format!(
        "Para registrar un gasto, usa el formato: \
         <b>monto,descripcion,medio_pago,fecha(opcional)</b>\n\
         Ejemplo: <code>150.75,Cena con amigos,TC BBVA</code>\n\
         Si no pones la fecha, usaré la de hoy. Medios de pago válidos: {}\n\
         Con /recientes te muestro los últimos gastos registrados.",
        registry.listing()
    )
}
